//! Running-balance reconstruction
//!
//! Rebuilds a "balance as of this row" column for a newest-first ledger view
//! by walking backward from the current balance. Nothing is stored; the
//! column is recomputed every time it is displayed.

use std::cmp::Ordering;

use crate::models::{MemberId, Money, Transaction};

use super::balances::MemberBalance;
use super::totals::GroupTotals;

/// Whose balance a running-balance column tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceScope {
    /// The shared pool
    Global,
    /// A single member's balance
    Member(MemberId),
}

impl BalanceScope {
    /// Whether a transaction appears in this scope's history
    ///
    /// Global history shows every row; a member's history shows rows the
    /// member owns plus shared expenses they take part in.
    pub fn includes(&self, txn: &Transaction) -> bool {
        match self {
            Self::Global => true,
            Self::Member(id) => txn.member_id == Some(*id) || txn.shared_with.contains(id),
        }
    }
}

/// One row of a running-balance column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningBalanceRow<'a> {
    pub transaction: &'a Transaction,
    /// Balance as of and including this transaction
    pub balance_after: Money,
}

impl RunningBalanceRow<'_> {
    /// Balance just before this transaction
    pub fn balance_before(&self) -> Money {
        self.balance_after - self.transaction.pool_effect()
    }
}

/// The starting point of the backward walk for a scope
///
/// An unknown member resolves to zero.
pub fn ending_balance_for(
    scope: &BalanceScope,
    totals: &GroupTotals,
    balances: &[MemberBalance],
) -> Money {
    match scope {
        BalanceScope::Global => totals.remaining_pool_balance,
        BalanceScope::Member(id) => balances
            .iter()
            .find(|b| b.member_id == *id)
            .map(|b| b.balance)
            .unwrap_or_default(),
    }
}

/// Reconstruct running balances for newest-first transactions
///
/// `ordered` must already be sorted newest first (see [`sort_descending`]).
/// Each row records the balance including that transaction, then the walk
/// undoes the transaction: deposits are taken back out, expenses and shared
/// expenses are added back, meals leave the balance untouched.
pub fn compute_running_balances<'a>(
    ordered: &'a [Transaction],
    ending_balance: Money,
    scope: &BalanceScope,
) -> Vec<RunningBalanceRow<'a>> {
    debug_assert!(
        is_descending(ordered),
        "running balances need newest-first transactions ({:?})",
        scope
    );

    let mut balance = ending_balance;
    ordered
        .iter()
        .map(|transaction| {
            let row = RunningBalanceRow {
                transaction,
                balance_after: balance,
            };
            balance -= transaction.pool_effect();
            row
        })
        .collect()
}

/// Balance before the oldest row (the end of the backward walk)
pub fn opening_balance(rows: &[RunningBalanceRow<'_>], ending_balance: Money) -> Money {
    rows.last()
        .map(RunningBalanceRow::balance_before)
        .unwrap_or(ending_balance)
}

/// Replay rows oldest to newest from the opening balance
///
/// Returns the balance reached after the newest row, which equals the ending
/// balance the rows were built from.
pub fn replay_forward(rows: &[RunningBalanceRow<'_>], opening: Money) -> Money {
    rows.iter()
        .rev()
        .fold(opening, |balance, row| balance + row.transaction.pool_effect())
}

/// Check the newest-first precondition
pub fn is_descending(transactions: &[Transaction]) -> bool {
    transactions
        .windows(2)
        .all(|pair| pair[0].date >= pair[1].date)
}

/// Sort newest first; ties broken by creation time, then id
pub fn sort_descending(transactions: &mut [Transaction]) {
    transactions.sort_by(newest_first);
}

/// Newest-first comparator shared with storage and reports
pub fn newest_first(a: &Transaction, b: &Transaction) -> Ordering {
    b.date
        .cmp(&a.date)
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| b.id.cmp(&a.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{compute_group_totals, compute_member_balances};
    use crate::models::Member;
    use chrono::{DateTime, TimeZone, Utc};

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, d, 10, 0, 0).unwrap()
    }

    fn pool_log(a: MemberId, b: MemberId) -> Vec<Transaction> {
        let mut log = vec![
            Transaction::deposit(a, day(1), Money::from_major(1000)),
            Transaction::deposit(b, day(2), Money::from_major(500)),
            Transaction::expense(a, day(3), Money::from_major(300)),
            Transaction::legacy_meal(Some(a), day(4), 10),
            Transaction::shared_expense(b, day(5), Money::from_major(150), [a, b]),
        ];
        sort_descending(&mut log);
        log
    }

    #[test]
    fn test_global_walk() {
        let a = MemberId::new();
        let b = MemberId::new();
        let log = pool_log(a, b);
        let totals = compute_group_totals(&log);
        assert_eq!(totals.remaining_pool_balance, Money::from_major(1050));

        let rows = compute_running_balances(
            &log,
            totals.remaining_pool_balance,
            &BalanceScope::Global,
        );
        let column: Vec<Money> = rows.iter().map(|r| r.balance_after).collect();
        assert_eq!(
            column,
            vec![
                Money::from_major(1050), // shared expense (day 5)
                Money::from_major(1200), // meal (day 4) does not step
                Money::from_major(1200), // expense (day 3)
                Money::from_major(1500), // deposit B (day 2)
                Money::from_major(1000), // deposit A (day 1)
            ]
        );
        assert!(opening_balance(&rows, totals.remaining_pool_balance).is_zero());
    }

    #[test]
    fn test_forward_replay_reaches_ending_balance() {
        let a = MemberId::new();
        let b = MemberId::new();
        let log = pool_log(a, b);
        let ending = Money::from_minor(-4_321);

        let rows = compute_running_balances(&log, ending, &BalanceScope::Member(a));
        let opening = opening_balance(&rows, ending);
        assert_eq!(replay_forward(&rows, opening), ending);
    }

    #[test]
    fn test_empty_input() {
        let rows = compute_running_balances(&[], Money::from_major(5), &BalanceScope::Global);
        assert!(rows.is_empty());
        assert_eq!(opening_balance(&rows, Money::from_major(5)), Money::from_major(5));
    }

    #[test]
    fn test_member_scope_starts_from_member_balance() {
        let a = Member::new("A");
        let b = Member::new("B");
        let log = pool_log(a.id, b.id);
        let members = vec![a.clone(), b.clone()];
        let totals = compute_group_totals(&log);
        let balances = compute_member_balances(&members, &log, &totals);

        let scope = BalanceScope::Member(a.id);
        let ending = ending_balance_for(&scope, &totals, &balances);
        assert_eq!(ending, balances[0].balance);

        let history: Vec<Transaction> = log.iter().filter(|t| scope.includes(t)).cloned().collect();
        assert_eq!(history.len(), 4);

        let rows = compute_running_balances(&history, ending, &scope);
        assert_eq!(rows[0].balance_after, ending);
    }

    #[test]
    fn test_unknown_member_scope_is_zero() {
        let totals = GroupTotals::default();
        let ending = ending_balance_for(&BalanceScope::Member(MemberId::new()), &totals, &[]);
        assert!(ending.is_zero());
    }

    #[test]
    fn test_sort_descending_and_precondition() {
        let a = MemberId::new();
        let mut log = vec![
            Transaction::deposit(a, day(1), Money::from_major(1)),
            Transaction::deposit(a, day(3), Money::from_major(3)),
            Transaction::deposit(a, day(2), Money::from_major(2)),
        ];
        assert!(!is_descending(&log));

        sort_descending(&mut log);
        assert!(is_descending(&log));
        assert_eq!(log[0].amount, Money::from_major(3));
        assert_eq!(log[2].amount, Money::from_major(1));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "newest-first")]
    fn test_ascending_input_is_a_caller_bug() {
        let a = MemberId::new();
        let log = vec![
            Transaction::deposit(a, day(1), Money::from_major(1)),
            Transaction::deposit(a, day(2), Money::from_major(2)),
        ];
        compute_running_balances(&log, Money::zero(), &BalanceScope::Global);
    }
}
