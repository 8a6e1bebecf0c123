//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod entry;
pub mod member;
pub mod report;
pub mod transaction;

pub use entry::{
    handle_deposit_command, handle_expense_command, handle_meal_command, handle_shared_command,
    DepositArgs, ExpenseArgs, MealArgs, SharedArgs,
};
pub use member::{handle_member_command, MemberCommands};
pub use report::{handle_history_command, handle_summary_command, HistoryArgs, SummaryArgs};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

use crate::error::{MealPoolError, MealPoolResult};
use crate::models::{Member, Money};
use crate::services::MemberService;
use crate::storage::Storage;

/// Parse a `--date` value, defaulting to now
///
/// Accepts `YYYY-MM-DD` (local midnight) or a full RFC 3339 timestamp.
pub fn parse_date(input: Option<&str>) -> MealPoolResult<DateTime<Utc>> {
    let Some(raw) = input.map(str::trim) else {
        return Ok(Utc::now());
    };

    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(stamp.with_timezone(&Utc));
    }

    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        MealPoolError::Validation(format!(
            "Invalid date '{}'. Use YYYY-MM-DD or an RFC 3339 timestamp",
            raw
        ))
    })?;
    let midnight = day.and_time(chrono::NaiveTime::MIN);

    Ok(match Local.from_local_datetime(&midnight).earliest() {
        Some(local) => local.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&midnight),
    })
}

/// Parse an amount argument
pub fn parse_amount(input: &str) -> MealPoolResult<Money> {
    Money::parse(input).map_err(|e| {
        MealPoolError::Validation(format!("{}. Use a format like '50' or '50.25'", e))
    })
}

/// Look up a member by name or id, failing if there is none
pub fn resolve_member(storage: &Storage, identifier: &str) -> MealPoolResult<Member> {
    MemberService::new(storage).resolve(identifier)
}
