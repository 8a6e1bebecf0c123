//! Transaction display formatting
//!
//! Register rows and detail views for the ledger.

use crate::models::{Transaction, TransactionKind};

use super::{truncate, MemberNames};

/// Short "what" column: meal count or signed pool effect
fn format_effect(txn: &Transaction, symbol: &str) -> String {
    match txn.kind {
        TransactionKind::Meal => format!("x{}", txn.effective_meal_count()),
        _ => txn.pool_effect().format_with_symbol(symbol),
    }
}

/// Format a single transaction for display (register row)
pub fn format_transaction_row(txn: &Transaction, names: &MemberNames, symbol: &str) -> String {
    let mut description = txn.description.clone();
    if txn.kind == TransactionKind::SharedExpense {
        let split = format!("[/{}]", txn.shared_with.len());
        description = if description.is_empty() {
            split
        } else {
            format!("{} {}", description, split)
        };
    }

    format!(
        "{:<12} {:<10} {:<14} {:<16} {:<24} {:>12}",
        txn.id.to_string(),
        txn.date.format("%Y-%m-%d"),
        txn.kind.to_string(),
        truncate(names.owner(txn.member_id), 16),
        truncate(&description, 24),
        format_effect(txn, symbol),
    )
}

/// Format a list of transactions as a register
pub fn format_transaction_register(
    transactions: &[Transaction],
    names: &MemberNames,
    symbol: &str,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12} {:<10} {:<14} {:<16} {:<24} {:>12}\n",
        "ID", "Date", "Type", "Member", "Description", "Amount"
    ));
    output.push_str(&"-".repeat(93));
    output.push('\n');

    for txn in transactions {
        output.push_str(&format_transaction_row(txn, names, symbol));
        output.push('\n');
    }

    output
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, names: &MemberNames, symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Type:        {}\n", txn.kind));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d %H:%M UTC")));
    output.push_str(&format!("Member:      {}\n", names.owner(txn.member_id)));

    match txn.kind {
        TransactionKind::Meal => {
            output.push_str(&format!("Meals:       {}\n", txn.effective_meal_count()));
            if let Some(details) = &txn.meal_details {
                output.push_str(&format!("Breakdown:   {}\n", details));
            }
        }
        _ => {
            output.push_str(&format!(
                "Amount:      {}\n",
                txn.amount.format_with_symbol(symbol)
            ));
        }
    }

    if !txn.shared_with.is_empty() {
        output.push_str(&format!("Shared with: {}\n", names.join(&txn.shared_with)));
        if let Some(share) = txn.amount.divided_by(txn.shared_with.len() as u64) {
            output.push_str(&format!(
                "Each pays:   {}\n",
                share.format_with_symbol(symbol)
            ));
        }
    }

    if !txn.payer_ids.is_empty() {
        output.push_str(&format!("Paid by:     {}\n", names.join(&txn.payer_ids)));
    }

    if !txn.description.is_empty() {
        output.push_str(&format!("Note:        {}\n", txn.description));
    }

    output
}
