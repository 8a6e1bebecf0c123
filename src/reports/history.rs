//! History Report
//!
//! Newest-first ledger rows with a reconstructed running balance, for the
//! whole pool or for one member.

use std::io::Write;

use chrono::{DateTime, Utc};

use crate::display::{truncate, MemberNames};
use crate::error::{MealPoolError, MealPoolResult};
use crate::ledger::{
    compute_running_balances, ending_balance_for, opening_balance, BalanceScope, LedgerSnapshot,
};
use crate::models::{Money, Transaction, TransactionId, TransactionKind};
use crate::storage::Storage;

use super::DEFAULT_CURRENCY;

/// A single row in the history report
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub transaction_id: TransactionId,
    pub date: DateTime<Utc>,
    pub kind: TransactionKind,
    /// Owner name, `-` for unowned legacy meals
    pub member: String,
    pub description: String,
    /// Effective meal count; zero for non-meal rows
    pub meals: u64,
    /// Stored amount (always non-negative)
    pub amount: Money,
    /// Balance as of and including this row
    pub balance_after: Money,
}

/// History Report
#[derive(Debug, Clone)]
pub struct HistoryReport {
    pub scope: BalanceScope,
    /// "Pool" or the member's name
    pub title: String,
    /// Balance the walk started from (now)
    pub ending_balance: Money,
    /// Balance before the oldest row shown
    pub opening_balance: Money,
    /// Rows, newest first
    pub entries: Vec<HistoryEntry>,
    /// Rows that matched the scope before `limit` was applied
    pub total_rows: usize,
    pub currency_symbol: String,
}

impl HistoryReport {
    /// Generate the history for a scope, keeping at most `limit` newest rows
    pub fn generate(
        storage: &Storage,
        scope: BalanceScope,
        limit: Option<usize>,
    ) -> MealPoolResult<Self> {
        let (members, transactions) = storage.snapshot()?;
        let names = MemberNames::new(&members);

        let title = match scope {
            BalanceScope::Global => "Pool".to_string(),
            BalanceScope::Member(id) => members
                .iter()
                .find(|m| m.id == id)
                .map(|m| m.name.clone())
                .ok_or_else(|| MealPoolError::member_not_found(id.to_string()))?,
        };

        let snapshot = LedgerSnapshot::new(&members, &transactions);
        let totals = snapshot.group_totals();
        let balances = snapshot.member_balances();
        let ending_balance = ending_balance_for(&scope, &totals, &balances);

        // Storage hands transactions back newest first already
        let in_scope: Vec<Transaction> = transactions
            .iter()
            .filter(|t| scope.includes(t))
            .cloned()
            .collect();
        let rows = compute_running_balances(&in_scope, ending_balance, &scope);
        let total_rows = rows.len();

        // Truncate after the walk so that kept rows keep their real balances
        let shown = &rows[..limit.unwrap_or(total_rows).min(total_rows)];
        let opening = opening_balance(shown, ending_balance);

        let entries = shown
            .iter()
            .map(|row| {
                let txn = row.transaction;
                HistoryEntry {
                    transaction_id: txn.id,
                    date: txn.date,
                    kind: txn.kind,
                    member: names.owner(txn.member_id).to_string(),
                    description: txn.description.clone(),
                    meals: match txn.kind {
                        TransactionKind::Meal => txn.effective_meal_count(),
                        _ => 0,
                    },
                    amount: txn.amount,
                    balance_after: row.balance_after,
                }
            })
            .collect();

        Ok(Self {
            scope,
            title,
            ending_balance,
            opening_balance: opening,
            entries,
            total_rows,
            currency_symbol: DEFAULT_CURRENCY.to_string(),
        })
    }

    /// Use a different currency symbol for terminal output
    pub fn with_currency(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let sym = self.currency_symbol.as_str();
        let mut output = String::new();

        output.push_str(&format!("History: {}\n", self.title));
        output.push_str(&"=".repeat(96));
        output.push('\n');
        output.push_str(&format!(
            "Current Balance: {}\n",
            self.ending_balance.format_with_symbol(sym)
        ));
        if self.entries.len() < self.total_rows {
            output.push_str(&format!(
                "Showing {} of {} rows\n",
                self.entries.len(),
                self.total_rows
            ));
        }
        output.push('\n');

        if self.entries.is_empty() {
            output.push_str("No transactions found.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<10} {:<14} {:<16} {:<22} {:>14} {:>14}\n",
            "Date", "Type", "Member", "Description", "Amount", "Balance"
        ));
        output.push_str(&"-".repeat(96));
        output.push('\n');

        for entry in &self.entries {
            let amount = match entry.kind {
                TransactionKind::Meal => format!("x{}", entry.meals),
                TransactionKind::Deposit => entry.amount.format_with_symbol(sym),
                _ => (-entry.amount).format_with_symbol(sym),
            };
            output.push_str(&format!(
                "{:<10} {:<14} {:<16} {:<22} {:>14} {:>14}\n",
                entry.date.format("%Y-%m-%d"),
                entry.kind.to_string(),
                truncate(&entry.member, 16),
                truncate(&entry.description, 22),
                amount,
                entry.balance_after.format_with_symbol(sym),
            ));
        }

        output.push_str(&"-".repeat(96));
        output.push('\n');
        output.push_str(&format!(
            "Opening Balance: {}\n",
            self.opening_balance.format_with_symbol(sym)
        ));

        output
    }

    /// Export the rows to CSV
    pub fn export_csv<W: Write>(&self, writer: W) -> MealPoolResult<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record([
            "Date",
            "Type",
            "Member",
            "Description",
            "Meals",
            "Amount",
            "Balance",
            "Transaction",
        ])?;

        for entry in &self.entries {
            wtr.write_record([
                entry.date.to_rfc3339(),
                entry.kind.to_string(),
                entry.member.clone(),
                entry.description.clone(),
                entry.meals.to_string(),
                entry.amount.to_plain_string(),
                entry.balance_after.to_plain_string(),
                entry.transaction_id.as_uuid().to_string(),
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }
}
