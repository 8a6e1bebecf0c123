//! Ingestion snapshot
//!
//! Normalises the transaction log once, before any figures are computed: each
//! transaction is paired with its effective meal count so that the aggregator
//! and the balance resolver never look at the legacy/detailed meal shape.

use crate::models::{Member, MemberId, Transaction, TransactionKind};

use super::balances::{resolve_member_balances, MemberBalance};
use super::totals::{aggregate, GroupTotals};

/// A transaction with its meal count already resolved
#[derive(Debug, Clone, Copy)]
pub struct LedgerEntry<'a> {
    pub transaction: &'a Transaction,
    /// Effective meal count; zero for every kind other than meal
    pub meals: u64,
}

impl<'a> LedgerEntry<'a> {
    pub fn new(transaction: &'a Transaction) -> Self {
        let meals = match transaction.kind {
            TransactionKind::Meal => transaction.effective_meal_count(),
            _ => 0,
        };
        Self { transaction, meals }
    }

    pub fn kind(&self) -> TransactionKind {
        self.transaction.kind
    }
}

/// An immutable, settled view of members and transactions
#[derive(Debug, Clone)]
pub struct LedgerSnapshot<'a> {
    members: &'a [Member],
    entries: Vec<LedgerEntry<'a>>,
}

impl<'a> LedgerSnapshot<'a> {
    /// Build a snapshot over members and their transaction log
    pub fn new(members: &'a [Member], transactions: &'a [Transaction]) -> Self {
        Self {
            members,
            entries: transactions.iter().map(LedgerEntry::new).collect(),
        }
    }

    /// Build a snapshot with no members (enough for group totals)
    pub fn from_transactions(transactions: &'a [Transaction]) -> Self {
        Self::new(&[], transactions)
    }

    pub fn members(&self) -> &'a [Member] {
        self.members
    }

    pub fn entries(&self) -> &[LedgerEntry<'a>] {
        &self.entries
    }

    /// Group-wide totals and meal rate
    pub fn group_totals(&self) -> GroupTotals {
        aggregate(&self.entries)
    }

    /// Per-member figures, in member order
    pub fn member_balances(&self) -> Vec<MemberBalance> {
        let totals = self.group_totals();
        resolve_member_balances(self.members, &self.entries, &totals)
    }

    /// Figures for a single member, if the member is part of the snapshot
    pub fn member_balance(&self, member_id: MemberId) -> Option<MemberBalance> {
        self.member_balances()
            .into_iter()
            .find(|balance| balance.member_id == member_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MealDetails, MealSlot, Money};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_entries_resolve_meal_counts_once() {
        let member = Member::new("A");
        let date = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        let transactions = vec![
            Transaction::meal(
                member.id,
                date,
                MealDetails::new().with(MealSlot::Breakfast, 2),
            ),
            Transaction::legacy_meal(Some(member.id), date, 5),
            Transaction::deposit(member.id, date, Money::from_major(100)),
        ];
        let members = vec![member];

        let snapshot = LedgerSnapshot::new(&members, &transactions);
        let meals: Vec<u64> = snapshot.entries().iter().map(|e| e.meals).collect();
        assert_eq!(meals, vec![2, 5, 0]);
    }

    #[test]
    fn test_meal_fields_on_other_kinds_are_ignored() {
        let member = Member::new("A");
        let date = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        let mut deposit = Transaction::deposit(member.id, date, Money::from_major(10));
        deposit.meal_count = Some(7);

        assert_eq!(LedgerEntry::new(&deposit).meals, 0);
    }

    #[test]
    fn test_member_balance_lookup() {
        let a = Member::new("A");
        let stranger = MemberId::new();
        let members = vec![a.clone()];
        let transactions: Vec<Transaction> = Vec::new();

        let snapshot = LedgerSnapshot::new(&members, &transactions);
        assert!(snapshot.member_balance(a.id).is_some());
        assert!(snapshot.member_balance(stranger).is_none());
    }
}
