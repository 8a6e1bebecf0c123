//! Transaction CLI commands
//!
//! Implements CLI commands for browsing and deleting ledger entries.

use chrono::Duration;
use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::transaction::{format_transaction_details, format_transaction_register};
use crate::display::MemberNames;
use crate::error::{MealPoolError, MealPoolResult};
use crate::models::TransactionKind;
use crate::services::{MemberService, TransactionFilter, TransactionService};
use crate::storage::Storage;

use super::{parse_date, resolve_member};

/// Transaction subcommands
#[derive(Subcommand, Debug)]
pub enum TransactionCommands {
    /// List transactions, newest first
    List {
        /// Only transactions involving this member
        #[arg(short, long)]
        member: Option<String>,
        /// Only this kind (meal, deposit, expense, shared)
        #[arg(short = 't', long = "type")]
        kind: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Show transaction details
    Show {
        /// Transaction ID
        id: String,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> MealPoolResult<()> {
    let service = TransactionService::new(storage);
    let names = MemberNames::new(&MemberService::new(storage).list()?);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        TransactionCommands::List {
            member,
            kind,
            limit,
            from,
            to,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);

            if let Some(member) = &member {
                filter = filter.member(resolve_member(storage, member)?.id);
            }

            if let Some(kind_str) = &kind {
                let kind = TransactionKind::parse(kind_str).ok_or_else(|| {
                    MealPoolError::Validation(format!(
                        "Invalid type: '{}'. Use meal, deposit, expense, or shared",
                        kind_str
                    ))
                })?;
                filter = filter.kind(kind);
            }

            if let Some(from) = &from {
                filter.start_date = Some(parse_date(Some(from))?);
            }
            if let Some(to) = &to {
                // Inclusive of the whole end day
                let end = parse_date(Some(to))? + Duration::days(1) - Duration::nanoseconds(1);
                filter.end_date = Some(end);
            }

            let transactions = service.list(filter)?;
            print!("{}", format_transaction_register(&transactions, &names, symbol));
            println!("\nShowing {} transactions", transactions.len());
        }

        TransactionCommands::Show { id } => {
            let txn = service
                .find(&id)?
                .ok_or_else(|| MealPoolError::transaction_not_found(&id))?;
            print!("{}", format_transaction_details(&txn, &names, symbol));
        }

        TransactionCommands::Delete { id, force } => {
            let txn = service
                .find(&id)?
                .ok_or_else(|| MealPoolError::transaction_not_found(&id))?;

            if !force {
                println!("About to delete transaction:");
                println!("  Date:   {}", txn.date.format(&settings.date_format));
                println!("  Type:   {}", txn.kind);
                println!("  Member: {}", names.owner(txn.member_id));
                if txn.kind != TransactionKind::Meal {
                    println!("  Amount: {}", txn.amount.format_with_symbol(symbol));
                }
                println!();
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            let deleted = service.delete(txn.id)?;
            println!("Deleted transaction: {}", deleted.id);
        }
    }

    Ok(())
}
