//! Ledger Summary Report
//!
//! Group totals, the meal rate and every member's balance in one view.

use std::io::Write;

use crate::error::MealPoolResult;
use crate::ledger::{GroupTotals, LedgerSnapshot, MemberBalance};
use crate::storage::Storage;

use super::DEFAULT_CURRENCY;

/// Ledger Summary Report
#[derive(Debug, Clone)]
pub struct LedgerSummaryReport {
    /// Group-wide totals
    pub totals: GroupTotals,
    /// One row per member, oldest member first
    pub balances: Vec<MemberBalance>,
    /// Symbol used by `format_terminal`
    pub currency_symbol: String,
}

impl LedgerSummaryReport {
    /// Generate the summary from the current state of storage
    pub fn generate(storage: &Storage) -> MealPoolResult<Self> {
        let (members, transactions) = storage.snapshot()?;
        let snapshot = LedgerSnapshot::new(&members, &transactions);
        let totals = snapshot.group_totals();
        let balances = snapshot.member_balances();

        Ok(Self {
            totals,
            balances,
            currency_symbol: DEFAULT_CURRENCY.to_string(),
        })
    }

    /// Use a different currency symbol for terminal output
    pub fn with_currency(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    /// Sum of all member balances
    ///
    /// Plain expenses are covered by meal costs and shared expenses by the
    /// shares, so with no dangling references this equals the pool balance.
    pub fn balance_total(&self) -> crate::models::Money {
        self.balances.iter().map(|b| b.balance).sum()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let sym = self.currency_symbol.as_str();
        let t = &self.totals;
        let mut output = String::new();

        output.push_str("Meal Pool Summary\n");
        output.push_str(&"=".repeat(90));
        output.push('\n');
        output.push_str(&format!(
            "Total Deposits:    {:>14}\n",
            t.total_deposits.format_with_symbol(sym)
        ));
        output.push_str(&format!(
            "Meal Expenses:     {:>14}\n",
            t.total_meal_expenses.format_with_symbol(sym)
        ));
        output.push_str(&format!(
            "Shared Expenses:   {:>14}\n",
            t.total_shared_expenses.format_with_symbol(sym)
        ));
        output.push_str(&format!("Total Meals:       {:>14}\n", t.total_meal_count));
        output.push_str(&format!(
            "Meal Rate:         {:>14}\n",
            t.meal_rate.format_with_symbol(sym)
        ));
        output.push_str(&format!(
            "Pool Balance:      {:>14}\n\n",
            t.remaining_pool_balance.format_with_symbol(sym)
        ));

        if self.balances.is_empty() {
            output.push_str("No members yet.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<20} {:>6} {:>11} {:>11} {:>11} {:>11} {:>11}\n",
            "Member", "Meals", "Meal Cost", "Deposits", "Paid", "Shared", "Balance"
        ));
        output.push_str(&"-".repeat(90));
        output.push('\n');

        for b in &self.balances {
            output.push_str(&format!(
                "{:<20} {:>6} {:>11} {:>11} {:>11} {:>11} {:>11}\n",
                crate::display::truncate(&b.name, 20),
                b.meal_count,
                b.meal_cost.format_with_symbol(sym),
                b.deposits.format_with_symbol(sym),
                b.expenses_paid.format_with_symbol(sym),
                b.shared_expense_share.format_with_symbol(sym),
                b.balance.format_with_symbol(sym),
            ));
        }

        output
    }

    /// Export the member rows to CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> MealPoolResult<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record([
            "Member",
            "Meals",
            "Meal Cost",
            "Deposits",
            "Expenses Paid",
            "Shared Share",
            "Balance",
        ])?;

        for b in &self.balances {
            wtr.write_record([
                b.name.clone(),
                b.meal_count.to_string(),
                b.meal_cost.to_plain_string(),
                b.deposits.to_plain_string(),
                b.expenses_paid.to_plain_string(),
                b.shared_expense_share.to_plain_string(),
                b.balance.to_plain_string(),
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }
}
