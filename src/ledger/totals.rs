//! Transaction classifier and aggregator
//!
//! Partitions the log by kind and produces the group-wide figures: total
//! deposits, total expenses, total meals, the meal rate and what is left in
//! the pool.

use serde::Serialize;
use tracing::trace;

use crate::models::{Money, Transaction, TransactionKind};

use super::snapshot::{LedgerEntry, LedgerSnapshot};

/// Group-wide totals for a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GroupTotals {
    /// Sum of all deposits
    pub total_deposits: Money,
    /// Sum of expenses and shared expenses
    pub total_expenses: Money,
    /// Sum of plain expenses only (the meal-rate numerator)
    pub total_meal_expenses: Money,
    /// Sum of shared expenses only
    pub total_shared_expenses: Money,
    /// Sum of effective meal counts
    pub total_meal_count: u64,
    /// Cost of a single meal; zero when no meals were eaten
    pub meal_rate: Money,
    /// Deposits minus all expenses
    pub remaining_pool_balance: Money,
}

/// Compute group totals over a transaction log
///
/// Only plain expenses feed the meal rate; shared expenses are non-food bills
/// and only reduce the pool. Input order does not matter.
pub fn compute_group_totals(transactions: &[Transaction]) -> GroupTotals {
    LedgerSnapshot::from_transactions(transactions).group_totals()
}

pub(crate) fn aggregate(entries: &[LedgerEntry<'_>]) -> GroupTotals {
    let mut totals = GroupTotals::default();

    for entry in entries {
        let amount = entry.transaction.amount;
        match entry.kind() {
            TransactionKind::Deposit => totals.total_deposits += amount,
            TransactionKind::Expense => totals.total_meal_expenses += amount,
            TransactionKind::SharedExpense => totals.total_shared_expenses += amount,
            TransactionKind::Meal => totals.total_meal_count += entry.meals,
        }
    }

    totals.total_expenses = totals.total_meal_expenses + totals.total_shared_expenses;
    totals.remaining_pool_balance = totals.total_deposits - totals.total_expenses;
    totals.meal_rate = totals
        .total_meal_expenses
        .divided_by(totals.total_meal_count)
        .unwrap_or_default();

    trace!(
        deposits = %totals.total_deposits,
        expenses = %totals.total_expenses,
        meals = totals.total_meal_count,
        meal_rate = %totals.meal_rate,
        "aggregated group totals"
    );

    totals
}
