//! Ledger calculations
//!
//! Pure functions over a snapshot of members and transactions. Nothing here
//! touches storage; callers load a snapshot, compute, and throw the results
//! away when the data changes.

pub mod balances;
pub mod running;
pub mod snapshot;
pub mod totals;

pub use balances::{compute_member_balances, MemberBalance};
pub use running::{
    compute_running_balances, ending_balance_for, is_descending, newest_first, opening_balance,
    replay_forward, sort_descending, BalanceScope, RunningBalanceRow,
};
pub use snapshot::{LedgerEntry, LedgerSnapshot};
pub use totals::{compute_group_totals, GroupTotals};
