//! CLI commands for reports
//!
//! `summary` prints the meal rate and member balances; `history` prints the
//! running balance. Both can be exported to CSV instead.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::settings::Settings;
use crate::error::{MealPoolError, MealPoolResult};
use crate::ledger::BalanceScope;
use crate::reports::{HistoryReport, LedgerSummaryReport};
use crate::storage::Storage;

use super::resolve_member;

/// Arguments for `summary`
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Export to CSV file instead of printing
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,
}

/// Arguments for `history`
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Member name or ID (omit for the whole pool)
    #[arg(short, long)]
    pub member: Option<String>,
    /// Show only the newest N rows
    #[arg(short, long)]
    pub limit: Option<usize>,
    /// Export to CSV file instead of printing
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,
}

fn create_export(path: &Path) -> MealPoolResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        MealPoolError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

/// Handle `summary`
pub fn handle_summary_command(
    storage: &Storage,
    settings: &Settings,
    args: SummaryArgs,
) -> MealPoolResult<()> {
    let report = LedgerSummaryReport::generate(storage)?.with_currency(&settings.currency_symbol);

    if let Some(path) = args.csv {
        report.export_csv(create_export(&path)?)?;
        println!("Summary exported to: {}", path.display());
    } else {
        println!("{}", report.format_terminal());
    }

    Ok(())
}

/// Handle `history`
pub fn handle_history_command(
    storage: &Storage,
    settings: &Settings,
    args: HistoryArgs,
) -> MealPoolResult<()> {
    let scope = match &args.member {
        Some(member) => BalanceScope::Member(resolve_member(storage, member)?.id),
        None => BalanceScope::Global,
    };

    let report = HistoryReport::generate(storage, scope, args.limit)?
        .with_currency(&settings.currency_symbol);

    if let Some(path) = args.csv {
        report.export_csv(create_export(&path)?)?;
        println!("History exported to: {}", path.display());
    } else {
        print!("{}", report.format_terminal());
    }

    Ok(())
}
