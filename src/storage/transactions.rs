//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use tracing::debug;

use crate::error::MealPoolError;
use crate::ledger::newest_first;
use crate::models::{MemberId, Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_guard, write_guard};

/// Serializable transaction data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub(crate) struct TransactionData {
    pub transactions: Vec<Transaction>,
}

/// Repository for transaction persistence with a per-member index
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    /// Index: member_id -> transaction_ids owned by that member
    by_member: RwLock<HashMap<MemberId, Vec<TransactionId>>>,
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_member: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and build the index
    pub fn load(&self) -> Result<(), MealPoolError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = write_guard(&self.data)?;
        let mut by_member = write_guard(&self.by_member)?;
        data.clear();
        by_member.clear();

        for txn in file_data.transactions {
            if let Some(member_id) = txn.member_id {
                by_member.entry(member_id).or_default().push(txn.id);
            }
            data.insert(txn.id, txn);
        }

        debug!(count = data.len(), "loaded transactions");
        Ok(())
    }

    /// Save transactions to disk, newest first
    pub fn save(&self) -> Result<(), MealPoolError> {
        let transactions = self.get_all()?;
        debug!(count = transactions.len(), "saving transactions");
        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, MealPoolError> {
        let data = read_guard(&self.data)?;
        Ok(data.get(&id).cloned())
    }

    /// Get all transactions, newest first
    pub fn get_all(&self) -> Result<Vec<Transaction>, MealPoolError> {
        let data = read_guard(&self.data)?;
        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(newest_first);
        Ok(transactions)
    }

    /// Get transactions owned by a member, newest first
    pub fn get_by_member(&self, member_id: MemberId) -> Result<Vec<Transaction>, MealPoolError> {
        let data = read_guard(&self.data)?;
        let by_member = read_guard(&self.by_member)?;

        let ids = by_member.get(&member_id).map(Vec::as_slice).unwrap_or(&[]);
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        transactions.sort_by(newest_first);
        Ok(transactions)
    }

    /// Remove every transaction owned by a member, returning how many went
    pub fn delete_by_member(&self, member_id: MemberId) -> Result<usize, MealPoolError> {
        let mut data = write_guard(&self.data)?;
        let mut by_member = write_guard(&self.by_member)?;

        let ids = by_member.remove(&member_id).unwrap_or_default();
        Ok(ids.iter().filter(|id| data.remove(*id).is_some()).count())
    }

    /// Insert or update a transaction
    pub fn upsert(&self, txn: Transaction) -> Result<(), MealPoolError> {
        let mut data = write_guard(&self.data)?;
        let mut by_member = write_guard(&self.by_member)?;

        if let Some(old_member) = data.get(&txn.id).and_then(|old| old.member_id) {
            if let Some(ids) = by_member.get_mut(&old_member) {
                ids.retain(|&id| id != txn.id);
            }
        }

        if let Some(member_id) = txn.member_id {
            by_member.entry(member_id).or_default().push(txn.id);
        }

        data.insert(txn.id, txn);
        Ok(())
    }

    /// Delete a transaction
    pub fn delete(&self, id: TransactionId) -> Result<bool, MealPoolError> {
        let mut data = write_guard(&self.data)?;
        let mut by_member = write_guard(&self.by_member)?;

        let Some(txn) = data.remove(&id) else {
            return Ok(false);
        };
        if let Some(ids) = txn.member_id.and_then(|m| by_member.get_mut(&m)) {
            ids.retain(|&tid| tid != id);
        }
        Ok(true)
    }

    /// Count transactions
    pub fn count(&self) -> Result<usize, MealPoolError> {
        let data = read_guard(&self.data)?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::{DateTime, TimeZone, Utc};
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, TransactionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.json");
        let repo = TransactionRepository::new(path);
        (temp_dir, repo)
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        let txn = Transaction::deposit(MemberId::new(), day(15), Money::from_major(50));
        let id = txn.id;

        repo.upsert(txn).unwrap();
        assert_eq!(repo.get(id).unwrap().unwrap().amount, Money::from_major(50));
    }

    #[test]
    fn test_get_all_is_newest_first() {
        let (_temp_dir, repo) = create_test_repo();
        let member = MemberId::new();
        for d in [3, 9, 1] {
            repo.upsert(Transaction::deposit(member, day(d), Money::from_major(d as i64)))
                .unwrap();
        }

        let dates: Vec<_> = repo.get_all().unwrap().iter().map(|t| t.date).collect();
        assert_eq!(dates, vec![day(9), day(3), day(1)]);
    }

    #[test]
    fn test_get_by_member() {
        let (_temp_dir, repo) = create_test_repo();
        let a = MemberId::new();
        let b = MemberId::new();

        repo.upsert(Transaction::deposit(a, day(1), Money::from_major(1))).unwrap();
        repo.upsert(Transaction::expense(a, day(2), Money::from_major(2))).unwrap();
        repo.upsert(Transaction::deposit(b, day(3), Money::from_major(3))).unwrap();
        repo.upsert(Transaction::legacy_meal(None, day(4), 2)).unwrap();

        assert_eq!(repo.get_by_member(a).unwrap().len(), 2);
        assert_eq!(repo.get_by_member(b).unwrap().len(), 1);
    }

    #[test]
    fn test_upsert_moves_index_entry() {
        let (_temp_dir, repo) = create_test_repo();
        let a = MemberId::new();
        let b = MemberId::new();
        let mut txn = Transaction::deposit(a, day(1), Money::from_major(10));
        repo.upsert(txn.clone()).unwrap();

        txn.member_id = Some(b);
        repo.upsert(txn).unwrap();

        assert!(repo.get_by_member(a).unwrap().is_empty());
        assert_eq!(repo.get_by_member(b).unwrap().len(), 1);
    }

    #[test]
    fn test_delete_by_member() {
        let (_temp_dir, repo) = create_test_repo();
        let a = MemberId::new();
        let b = MemberId::new();
        repo.upsert(Transaction::deposit(a, day(1), Money::from_major(1))).unwrap();
        repo.upsert(Transaction::legacy_meal(Some(a), day(2), 3)).unwrap();
        repo.upsert(Transaction::deposit(b, day(3), Money::from_major(3))).unwrap();

        assert_eq!(repo.delete_by_member(a).unwrap(), 2);
        assert_eq!(repo.count().unwrap(), 1);
        assert_eq!(repo.delete_by_member(a).unwrap(), 0);
    }

    #[test]
    fn test_save_and_reload_is_lossless() {
        let (temp_dir, repo) = create_test_repo();
        let a = MemberId::new();
        let b = MemberId::new();
        let shared = Transaction::shared_expense(
            a,
            day(5),
            Money::from_major(100).divided_by(3).unwrap(),
            [a, b],
        )
        .with_description("Internet");
        let original = shared.clone();

        repo.upsert(shared).unwrap();
        repo.save().unwrap();

        let repo2 = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.get(original.id).unwrap(), Some(original));
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        let member = MemberId::new();
        let txn = Transaction::deposit(member, day(1), Money::from_major(5));
        let id = txn.id;

        repo.upsert(txn).unwrap();
        assert!(repo.delete(id).unwrap());
        assert!(!repo.delete(id).unwrap());
        assert!(repo.get_by_member(member).unwrap().is_empty());
    }
}
