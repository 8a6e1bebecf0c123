//! Reports module for mealpool
//!
//! The ledger summary (totals, meal rate, member balances) and the
//! running-balance history, each printable to the terminal or exportable as
//! CSV.

pub mod history;
pub mod summary;

pub use history::{HistoryEntry, HistoryReport};
pub use summary::LedgerSummaryReport;

/// Currency symbol used until the caller applies the configured one
pub const DEFAULT_CURRENCY: &str = "$";
