//! Transaction model
//!
//! A single entry in the household log: a meal eaten, a deposit into the
//! pool, an expense, or an expense split among a named set of members.
//! Amounts are never negative; whether an entry adds to or draws from the
//! pool is decided by its kind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{MemberId, TransactionId};
use super::meal::MealDetails;
use super::money::Money;

/// Kind of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionKind {
    /// Meals eaten by a member; carries no amount
    Meal,
    /// A food expense paid out of the pool
    Expense,
    /// A non-food bill split equally among `shared_with`
    SharedExpense,
    /// Money paid into the pool by a member
    Deposit,
}

impl TransactionKind {
    /// Parse a kind from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "meal" | "meals" => Some(Self::Meal),
            "expense" => Some(Self::Expense),
            "shared-expense" | "shared_expense" | "shared" => Some(Self::SharedExpense),
            "deposit" => Some(Self::Deposit),
            _ => None,
        }
    }

    /// Expense-like kinds draw from the pool
    pub fn is_expense_like(&self) -> bool {
        matches!(self, Self::Expense | Self::SharedExpense)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Meal => write!(f, "Meal"),
            Self::Expense => write!(f, "Expense"),
            Self::SharedExpense => write!(f, "Shared Expense"),
            Self::Deposit => write!(f, "Deposit"),
        }
    }
}

/// A household transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// What kind of entry this is
    #[serde(rename = "type")]
    pub kind: TransactionKind,

    /// The member who ate, deposited or paid. Only legacy meal records lack one.
    #[serde(default)]
    pub member_id: Option<MemberId>,

    /// When the transaction happened
    pub date: DateTime<Utc>,

    /// Non-negative amount; always zero for meals
    #[serde(default)]
    pub amount: Money,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Per-slot meal counts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_details: Option<MealDetails>,

    /// Legacy flat meal count, superseded by `meal_details` when that is present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_count: Option<u32>,

    /// Members splitting a shared expense, in entry order, without repeats
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shared_with: Vec<MemberId>,

    /// Members who jointly paid an expense (display only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub payer_ids: Vec<MemberId>,

    /// When the transaction was created
    pub created_at: DateTime<Utc>,

    /// When the transaction was last replaced
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    fn base(kind: TransactionKind, member_id: Option<MemberId>, date: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            kind,
            member_id,
            date,
            amount: Money::zero(),
            description: String::new(),
            meal_details: None,
            meal_count: None,
            shared_with: Vec::new(),
            payer_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Meals eaten by a member, broken down by slot
    pub fn meal(member_id: MemberId, date: DateTime<Utc>, details: MealDetails) -> Self {
        let mut txn = Self::base(TransactionKind::Meal, Some(member_id), date);
        txn.meal_details = Some(details);
        txn
    }

    /// Meals recorded with the legacy flat count
    pub fn legacy_meal(member_id: Option<MemberId>, date: DateTime<Utc>, count: u32) -> Self {
        let mut txn = Self::base(TransactionKind::Meal, member_id, date);
        txn.meal_count = Some(count);
        txn
    }

    /// Money paid into the pool
    pub fn deposit(member_id: MemberId, date: DateTime<Utc>, amount: Money) -> Self {
        let mut txn = Self::base(TransactionKind::Deposit, Some(member_id), date);
        txn.amount = amount;
        txn
    }

    /// A food expense paid by `payer`
    pub fn expense(payer: MemberId, date: DateTime<Utc>, amount: Money) -> Self {
        let mut txn = Self::base(TransactionKind::Expense, Some(payer), date);
        txn.amount = amount;
        txn
    }

    /// A bill paid by `payer` and split equally among `shared_with`
    ///
    /// Repeated ids in `shared_with` are dropped, keeping first occurrence order.
    pub fn shared_expense(
        payer: MemberId,
        date: DateTime<Utc>,
        amount: Money,
        shared_with: impl IntoIterator<Item = MemberId>,
    ) -> Self {
        let mut txn = Self::base(TransactionKind::SharedExpense, Some(payer), date);
        txn.amount = amount;
        txn.shared_with = dedup_ordered(shared_with);
        txn
    }

    /// Builder-style description setter
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder-style setter for joint payers
    pub fn with_payers(mut self, payers: impl IntoIterator<Item = MemberId>) -> Self {
        self.payer_ids = dedup_ordered(payers);
        self
    }

    /// Meals attributed to this transaction
    ///
    /// The per-slot breakdown wins when present; otherwise the legacy flat
    /// count; otherwise zero.
    pub fn effective_meal_count(&self) -> u64 {
        match (&self.meal_details, self.meal_count) {
            (Some(details), _) => details.total(),
            (None, Some(count)) => u64::from(count),
            (None, None) => 0,
        }
    }

    /// True for expenses and shared expenses
    pub fn is_expense_like(&self) -> bool {
        self.kind.is_expense_like()
    }

    /// Signed effect of this transaction on the pool balance
    ///
    /// Deposits add, expense-like entries subtract, meals do not move it.
    pub fn pool_effect(&self) -> Money {
        match self.kind {
            TransactionKind::Deposit => self.amount,
            TransactionKind::Expense | TransactionKind::SharedExpense => -self.amount,
            TransactionKind::Meal => Money::zero(),
        }
    }

    /// Whether the member takes part in this transaction at all
    pub fn involves(&self, member_id: MemberId) -> bool {
        self.member_id == Some(member_id)
            || self.shared_with.contains(&member_id)
            || self.payer_ids.contains(&member_id)
    }

    /// Replace the contents of this transaction with `replacement`, keeping identity
    pub fn replace_with(&mut self, replacement: Transaction) {
        let id = self.id;
        let created_at = self.created_at;
        *self = replacement;
        self.id = id;
        self.created_at = created_at;
        self.updated_at = Utc::now();
    }

    /// Validate the data-model invariants
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.amount.is_negative() {
            return Err(TransactionValidationError::NegativeAmount(self.amount));
        }

        match self.kind {
            TransactionKind::Meal => {
                if !self.amount.is_zero() {
                    return Err(TransactionValidationError::MealWithAmount(self.amount));
                }
            }
            _ => {
                if self.member_id.is_none() {
                    return Err(TransactionValidationError::MissingMember(self.kind));
                }
            }
        }

        if self.kind == TransactionKind::SharedExpense {
            if self.shared_with.is_empty() {
                return Err(TransactionValidationError::EmptySharedWith);
            }
            let mut seen = std::collections::HashSet::new();
            if !self.shared_with.iter().all(|id| seen.insert(*id)) {
                return Err(TransactionValidationError::DuplicateSharedWith);
            }
        } else if !self.shared_with.is_empty() {
            return Err(TransactionValidationError::SharingOnUnsharedKind(self.kind));
        }

        Ok(())
    }
}

fn dedup_ordered(ids: impl IntoIterator<Item = MemberId>) -> Vec<MemberId> {
    let mut out: Vec<MemberId> = Vec::new();
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TransactionKind::Meal => write!(
                f,
                "{} {} x{}",
                self.date.format("%Y-%m-%d"),
                self.kind,
                self.effective_meal_count()
            ),
            _ => write!(
                f,
                "{} {} {}",
                self.date.format("%Y-%m-%d"),
                self.kind,
                self.amount
            ),
        }
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NegativeAmount(Money),
    MealWithAmount(Money),
    MissingMember(TransactionKind),
    EmptySharedWith,
    DuplicateSharedWith,
    SharingOnUnsharedKind(TransactionKind),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount(amount) => {
                write!(f, "Amount cannot be negative (got {})", amount)
            }
            Self::MealWithAmount(amount) => {
                write!(f, "Meal entries carry no amount (got {})", amount)
            }
            Self::MissingMember(kind) => write!(f, "{} needs a member", kind),
            Self::EmptySharedWith => {
                write!(f, "Shared expense must be shared with at least one member")
            }
            Self::DuplicateSharedWith => {
                write!(f, "Shared expense lists the same member more than once")
            }
            Self::SharingOnUnsharedKind(kind) => {
                write!(f, "{} cannot be shared between members", kind)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}
