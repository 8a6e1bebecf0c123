//! Member model
//!
//! A flatmate taking part in the shared meal pool.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::MemberId;

/// Maximum length of a member name
pub const MAX_NAME_LEN: usize = 100;

/// A member of the household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    /// Unique identifier
    pub id: MemberId,

    /// Display name (trimmed, unique case-insensitively)
    pub name: String,

    /// Optional avatar image reference (path or URL)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    /// When the member was added
    pub created_at: DateTime<Utc>,

    /// When the member was last modified
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Create a new member; the name is trimmed
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: MemberId::new(),
            name: name.into().trim().to_string(),
            avatar: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a member with an avatar reference
    pub fn with_avatar(name: impl Into<String>, avatar: impl Into<String>) -> Self {
        let mut member = Self::new(name);
        member.avatar = Some(avatar.into());
        member
    }

    /// Rename the member
    pub fn rename(&mut self, name: &str) {
        self.name = name.trim().to_string();
        self.updated_at = Utc::now();
    }

    /// Replace or clear the avatar
    pub fn set_avatar(&mut self, avatar: Option<String>) {
        self.avatar = avatar;
        self.updated_at = Utc::now();
    }

    /// Normalize a name for uniqueness checks
    pub fn normalize_name(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// Check if this member has the given name (case-insensitive)
    pub fn matches_name(&self, name: &str) -> bool {
        Self::normalize_name(&self.name) == Self::normalize_name(name)
    }

    /// Validate the member
    pub fn validate(&self) -> Result<(), MemberValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(MemberValidationError::EmptyName);
        }

        if name.chars().count() > MAX_NAME_LEN {
            return Err(MemberValidationError::NameTooLong(name.chars().count()));
        }

        Ok(())
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for members
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for MemberValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Member name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Member name too long ({} chars, max {})", len, MAX_NAME_LEN)
            }
        }
    }
}

impl std::error::Error for MemberValidationError {}
