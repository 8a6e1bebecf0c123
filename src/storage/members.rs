//! Member repository for JSON storage
//!
//! Manages loading and saving members to members.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::debug;

use crate::error::MealPoolError;
use crate::models::{Member, MemberId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_guard, write_guard};

/// Serializable member data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub(crate) struct MemberData {
    pub members: Vec<Member>,
}

/// Repository for member persistence
pub struct MemberRepository {
    path: PathBuf,
    data: RwLock<HashMap<MemberId, Member>>,
}

impl MemberRepository {
    /// Create a new member repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load members from disk
    pub fn load(&self) -> Result<(), MealPoolError> {
        let file_data: MemberData = read_json(&self.path)?;

        let mut data = write_guard(&self.data)?;
        data.clear();
        for member in file_data.members {
            data.insert(member.id, member);
        }

        debug!(count = data.len(), "loaded members");
        Ok(())
    }

    /// Save members to disk
    pub fn save(&self) -> Result<(), MealPoolError> {
        let members = self.get_all()?;
        debug!(count = members.len(), "saving members");
        write_json_atomic(&self.path, &MemberData { members })
    }

    /// Get a member by ID
    pub fn get(&self, id: MemberId) -> Result<Option<Member>, MealPoolError> {
        let data = read_guard(&self.data)?;
        Ok(data.get(&id).cloned())
    }

    /// Get all members, oldest first
    pub fn get_all(&self) -> Result<Vec<Member>, MealPoolError> {
        let data = read_guard(&self.data)?;
        let mut members: Vec<_> = data.values().cloned().collect();
        members.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        Ok(members)
    }

    /// Get a member by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Member>, MealPoolError> {
        let data = read_guard(&self.data)?;
        Ok(data.values().find(|m| m.matches_name(name)).cloned())
    }

    /// Check whether a name is taken, ignoring `exclude`
    pub fn name_exists(
        &self,
        name: &str,
        exclude: Option<MemberId>,
    ) -> Result<bool, MealPoolError> {
        let data = read_guard(&self.data)?;
        Ok(data
            .values()
            .any(|m| m.matches_name(name) && Some(m.id) != exclude))
    }

    /// Insert or update a member
    pub fn upsert(&self, member: Member) -> Result<(), MealPoolError> {
        let mut data = write_guard(&self.data)?;
        data.insert(member.id, member);
        Ok(())
    }

    /// Delete a member
    pub fn delete(&self, id: MemberId) -> Result<bool, MealPoolError> {
        let mut data = write_guard(&self.data)?;
        Ok(data.remove(&id).is_some())
    }

    /// Count members
    pub fn count(&self) -> Result<usize, MealPoolError> {
        let data = read_guard(&self.data)?;
        Ok(data.len())
    }
}
