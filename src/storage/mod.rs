//! Storage layer for mealpool
//!
//! Provides JSON file storage with atomic writes and automatic directory
//! creation.

pub mod file_io;
pub mod init;
pub mod members;
pub mod transactions;

pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use members::MemberRepository;
pub use transactions::TransactionRepository;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::paths::MealPoolPaths;
use crate::error::MealPoolError;
use crate::models::{Member, Transaction};
use crate::services::SubmissionGuard;

pub(crate) fn read_guard<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, MealPoolError> {
    lock.read()
        .map_err(|e| MealPoolError::Storage(format!("Failed to acquire read lock: {}", e)))
}

pub(crate) fn write_guard<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, MealPoolError> {
    lock.write()
        .map_err(|e| MealPoolError::Storage(format!("Failed to acquire write lock: {}", e)))
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: MealPoolPaths,
    pub members: MemberRepository,
    pub transactions: TransactionRepository,
    submissions: SubmissionGuard,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: MealPoolPaths) -> Result<Self, MealPoolError> {
        paths.ensure_directories()?;

        Ok(Self {
            members: MemberRepository::new(paths.members_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            submissions: SubmissionGuard::new(),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &MealPoolPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), MealPoolError> {
        self.members.load()?;
        self.transactions.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), MealPoolError> {
        self.members.save()?;
        self.transactions.save()?;
        Ok(())
    }

    /// The in-flight lock shared by every mutating service
    pub fn submissions(&self) -> &SubmissionGuard {
        &self.submissions
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// A settled copy of every member and transaction for the ledger
    ///
    /// Members come oldest first, transactions newest first.
    pub fn snapshot(&self) -> Result<(Vec<Member>, Vec<Transaction>), MealPoolError> {
        Ok((self.members.get_all()?, self.transactions.get_all()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::Utc;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MealPoolPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_save_all_and_snapshot_after_reload() {
        let temp_dir = TempDir::new().unwrap();
        let paths = MealPoolPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths.clone()).unwrap();

        let member = Member::new("Rahim");
        let deposit = Transaction::deposit(member.id, Utc::now(), Money::from_major(500));
        storage.members.upsert(member.clone()).unwrap();
        storage.transactions.upsert(deposit.clone()).unwrap();
        storage.save_all().unwrap();

        let mut reloaded = Storage::new(paths).unwrap();
        reloaded.load_all().unwrap();
        let (members, transactions) = reloaded.snapshot().unwrap();
        assert_eq!(members, vec![member]);
        assert_eq!(transactions, vec![deposit]);
    }
}
