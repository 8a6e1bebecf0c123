//! Display formatting for terminal output
//!
//! Plain-text tables and detail views for members and transactions. Amounts
//! are rounded to two decimals here and nowhere earlier.

pub mod member;
pub mod transaction;

pub use member::{format_member_details, format_member_list};
pub use transaction::{format_transaction_details, format_transaction_register};

use std::collections::HashMap;

use crate::models::{Member, MemberId};

/// Shown for a reference to a member who no longer exists
pub const UNKNOWN_MEMBER: &str = "(removed)";

/// Lookup from member id to display name
#[derive(Debug, Clone, Default)]
pub struct MemberNames(HashMap<MemberId, String>);

impl MemberNames {
    pub fn new(members: &[Member]) -> Self {
        Self(members.iter().map(|m| (m.id, m.name.clone())).collect())
    }

    pub fn get(&self, id: MemberId) -> &str {
        self.0.get(&id).map(String::as_str).unwrap_or(UNKNOWN_MEMBER)
    }

    /// Name for an optional owner; legacy meal rows have none
    pub fn owner(&self, id: Option<MemberId>) -> &str {
        id.map_or("-", |id| self.get(id))
    }

    /// Comma-separated names
    pub fn join(&self, ids: &[MemberId]) -> String {
        ids.iter()
            .map(|&id| self.get(id))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Truncate to at most `max_len` characters, marking the cut with "..."
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
