//! Per-member balance resolver
//!
//! Turns the group totals plus each member's slice of the log into the
//! figures shown per flatmate. The balance is
//! `deposits - meal_cost - shared_expense_share`; what a member paid out for
//! expenses is reported but deliberately left out of the balance.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{Member, MemberId, Money, Transaction, TransactionKind};

use super::snapshot::{LedgerEntry, LedgerSnapshot};
use super::totals::GroupTotals;

/// Computed figures for one member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberBalance {
    pub member_id: MemberId,
    pub name: String,
    /// Money this member put into the pool
    pub deposits: Money,
    /// Expenses and shared expenses this member paid (informational)
    pub expenses_paid: Money,
    /// Meals eaten
    pub meal_count: u64,
    /// `meal_count * meal_rate`
    pub meal_cost: Money,
    /// Unrounded sum of this member's equal shares of shared expenses
    pub shared_expense_share: Money,
    /// Positive: the pool owes the member. Negative: the member owes the pool.
    pub balance: Money,
}

impl MemberBalance {
    fn zeroed(member: &Member) -> Self {
        Self {
            member_id: member.id,
            name: member.name.clone(),
            deposits: Money::zero(),
            expenses_paid: Money::zero(),
            meal_count: 0,
            meal_cost: Money::zero(),
            shared_expense_share: Money::zero(),
            balance: Money::zero(),
        }
    }
}

#[derive(Default)]
struct Tally {
    deposits: Money,
    expenses_paid: Money,
    meal_count: u64,
    shared_expense_share: Money,
}

/// Compute per-member balances, one per member in input order
///
/// Transactions pointing at unknown members contribute to nobody. A member
/// with no transactions gets all-zero figures.
pub fn compute_member_balances(
    members: &[Member],
    transactions: &[Transaction],
    group_totals: &GroupTotals,
) -> Vec<MemberBalance> {
    let snapshot = LedgerSnapshot::new(members, transactions);
    resolve_member_balances(members, snapshot.entries(), group_totals)
}

pub(crate) fn resolve_member_balances(
    members: &[Member],
    entries: &[LedgerEntry<'_>],
    group_totals: &GroupTotals,
) -> Vec<MemberBalance> {
    let mut tallies: HashMap<MemberId, Tally> =
        members.iter().map(|m| (m.id, Tally::default())).collect();

    for entry in entries {
        let txn = entry.transaction;
        let owner = txn.member_id.and_then(|id| tallies.get_mut(&id));

        match entry.kind() {
            TransactionKind::Deposit => {
                if let Some(tally) = owner {
                    tally.deposits += txn.amount;
                }
            }
            TransactionKind::Expense => {
                if let Some(tally) = owner {
                    tally.expenses_paid += txn.amount;
                }
            }
            TransactionKind::SharedExpense => {
                if let Some(tally) = owner {
                    tally.expenses_paid += txn.amount;
                }
                // The divisor counts every listed id, known or not
                let Some(share) = txn.amount.divided_by(txn.shared_with.len() as u64) else {
                    continue;
                };
                for id in &txn.shared_with {
                    if let Some(tally) = tallies.get_mut(id) {
                        tally.shared_expense_share += share;
                    }
                }
            }
            TransactionKind::Meal => {
                if let Some(tally) = owner {
                    tally.meal_count += entry.meals;
                }
            }
        }
    }

    members
        .iter()
        .map(|member| {
            let Some(tally) = tallies.get(&member.id) else {
                return MemberBalance::zeroed(member);
            };
            let meal_cost = group_totals.meal_rate.times(tally.meal_count);
            MemberBalance {
                member_id: member.id,
                name: member.name.clone(),
                deposits: tally.deposits,
                expenses_paid: tally.expenses_paid,
                meal_count: tally.meal_count,
                meal_cost,
                shared_expense_share: tally.shared_expense_share,
                balance: tally.deposits - meal_cost - tally.shared_expense_share,
            }
        })
        .collect()
}
