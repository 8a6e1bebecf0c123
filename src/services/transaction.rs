//! Transaction service
//!
//! Records meals, deposits and expenses into the ledger. Every mutation is
//! validated, runs under the submission guard and is written to disk before
//! returning.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::{MealPoolError, MealPoolResult};
use crate::models::{
    MealDetails, MemberId, Money, Transaction, TransactionId, TransactionKind,
};
use crate::storage::Storage;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Only transactions the member takes part in
    pub member_id: Option<MemberId>,
    /// Only transactions of this kind
    pub kind: Option<TransactionKind>,
    /// Filter by date range start (inclusive)
    pub start_date: Option<DateTime<Utc>>,
    /// Filter by date range end (inclusive)
    pub end_date: Option<DateTime<Utc>>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by member
    pub fn member(mut self, member_id: MemberId) -> Self {
        self.member_id = Some(member_id);
        self
    }

    /// Filter by kind
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Filter by date range
    pub fn date_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Limit results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, txn: &Transaction) -> bool {
        self.member_id.map_or(true, |id| txn.involves(id))
            && self.kind.map_or(true, |kind| txn.kind == kind)
            && self.start_date.map_or(true, |start| txn.date >= start)
            && self.end_date.map_or(true, |end| txn.date <= end)
    }
}

impl<'a> TransactionService<'a> {
    /// Create a new transaction service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record meals eaten, broken down by slot
    pub fn record_meal(
        &self,
        member_id: MemberId,
        date: DateTime<Utc>,
        details: MealDetails,
        description: Option<&str>,
    ) -> MealPoolResult<Transaction> {
        let txn = Transaction::meal(member_id, date, details);
        self.record(with_note(txn, description))
    }

    /// Record meals as a flat count with no slot breakdown
    pub fn record_meal_count(
        &self,
        member_id: MemberId,
        date: DateTime<Utc>,
        count: u32,
        description: Option<&str>,
    ) -> MealPoolResult<Transaction> {
        let txn = Transaction::legacy_meal(Some(member_id), date, count);
        self.record(with_note(txn, description))
    }

    /// Record money paid into the pool
    pub fn record_deposit(
        &self,
        member_id: MemberId,
        date: DateTime<Utc>,
        amount: Money,
        description: Option<&str>,
    ) -> MealPoolResult<Transaction> {
        let txn = Transaction::deposit(member_id, date, amount);
        self.record(with_note(txn, description))
    }

    /// Record a food expense, optionally paid jointly by several members
    pub fn record_expense(
        &self,
        payer: MemberId,
        date: DateTime<Utc>,
        amount: Money,
        joint_payers: Vec<MemberId>,
        description: Option<&str>,
    ) -> MealPoolResult<Transaction> {
        let mut txn = Transaction::expense(payer, date, amount);
        if !joint_payers.is_empty() {
            txn = txn.with_payers(joint_payers);
        }
        self.record(with_note(txn, description))
    }

    /// Record a non-food bill split equally among `shared_with`
    pub fn record_shared_expense(
        &self,
        payer: MemberId,
        date: DateTime<Utc>,
        amount: Money,
        shared_with: Vec<MemberId>,
        description: Option<&str>,
    ) -> MealPoolResult<Transaction> {
        let txn = Transaction::shared_expense(payer, date, amount, shared_with);
        self.record(with_note(txn, description))
    }

    /// Replace a stored transaction wholesale, keeping its id and creation time
    pub fn replace(&self, id: TransactionId, replacement: Transaction) -> MealPoolResult<Transaction> {
        let _submission = self.storage.submissions().try_begin()?;

        let mut txn = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| MealPoolError::transaction_not_found(id.to_string()))?;
        txn.replace_with(replacement);
        self.validate_entry(&txn)?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        info!(transaction = %txn.id, kind = %txn.kind, "transaction replaced");
        Ok(txn)
    }

    /// Delete a transaction
    pub fn delete(&self, id: TransactionId) -> MealPoolResult<Transaction> {
        let _submission = self.storage.submissions().try_begin()?;

        let txn = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| MealPoolError::transaction_not_found(id.to_string()))?;

        self.storage.transactions.delete(id)?;
        self.storage.transactions.save()?;

        info!(transaction = %txn.id, kind = %txn.kind, "transaction deleted");
        Ok(txn)
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> MealPoolResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Find a transaction by full or short id reference
    pub fn find(&self, reference: &str) -> MealPoolResult<Option<Transaction>> {
        Ok(self
            .storage
            .transactions
            .get_all()?
            .into_iter()
            .find(|t| t.id.matches_ref(reference)))
    }

    /// List transactions newest first
    pub fn list(&self, filter: TransactionFilter) -> MealPoolResult<Vec<Transaction>> {
        let matching = self
            .storage
            .transactions
            .get_all()?
            .into_iter()
            .filter(|t| filter.matches(t));

        Ok(match filter.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        })
    }

    /// Count transactions
    pub fn count(&self) -> MealPoolResult<usize> {
        self.storage.transactions.count()
    }

    fn record(&self, txn: Transaction) -> MealPoolResult<Transaction> {
        let _submission = self.storage.submissions().try_begin()?;

        self.validate_entry(&txn)?;
        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;

        info!(transaction = %txn.id, kind = %txn.kind, amount = %txn.amount, "transaction recorded");
        Ok(txn)
    }

    /// Entry-time rules on top of the model invariants
    fn validate_entry(&self, txn: &Transaction) -> MealPoolResult<()> {
        txn.validate()
            .map_err(|e| MealPoolError::Validation(e.to_string()))?;

        match txn.kind {
            TransactionKind::Meal => {
                if txn.effective_meal_count() == 0 {
                    return Err(MealPoolError::Validation(
                        "A meal entry needs at least one meal".into(),
                    ));
                }
            }
            kind => {
                if !txn.amount.is_positive() {
                    return Err(MealPoolError::Validation(format!(
                        "{} amount must be greater than zero",
                        kind
                    )));
                }
                if txn.amount > Money::entry_limit() {
                    return Err(MealPoolError::Validation(format!(
                        "{} amount must not exceed {}",
                        kind,
                        Money::entry_limit()
                    )));
                }
            }
        }

        if let Some(member_id) = txn.member_id {
            self.require_member(member_id)?;
        }
        for &id in txn.shared_with.iter().chain(&txn.payer_ids) {
            self.require_member(id)?;
        }
        Ok(())
    }

    fn require_member(&self, id: MemberId) -> MealPoolResult<()> {
        match self.storage.members.get(id)? {
            Some(_) => Ok(()),
            None => Err(MealPoolError::member_not_found(id.to_string())),
        }
    }
}

fn with_note(txn: Transaction, description: Option<&str>) -> Transaction {
    match description.map(str::trim).filter(|d| !d.is_empty()) {
        Some(note) => txn.with_description(note),
        None => txn,
    }
}
