//! Member service
//!
//! Provides business logic for flatmate management: unique names, lookups by
//! name or id, and the cascade that runs when someone moves out.

use tracing::info;

use crate::error::{MealPoolError, MealPoolResult};
use crate::models::{Member, MemberId};
use crate::storage::Storage;

/// Service for member management
pub struct MemberService<'a> {
    storage: &'a Storage,
}

/// What a member removal took with it
#[derive(Debug, Clone, PartialEq)]
pub struct MemberRemoval {
    pub member: Member,
    /// Transactions the member owned, now deleted
    pub transactions_removed: usize,
}

impl<'a> MemberService<'a> {
    /// Create a new member service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add a member
    pub fn create(&self, name: &str, avatar: Option<String>) -> MealPoolResult<Member> {
        let _submission = self.storage.submissions().try_begin()?;

        let name = name.trim();
        if name.is_empty() {
            return Err(MealPoolError::Validation("Member name cannot be empty".into()));
        }
        self.ensure_name_free(name, None)?;

        let mut member = Member::new(name);
        member.avatar = avatar;
        member
            .validate()
            .map_err(|e| MealPoolError::Validation(e.to_string()))?;

        self.storage.members.upsert(member.clone())?;
        self.storage.members.save()?;

        info!(member = %member.id, name = %member.name, "member created");
        Ok(member)
    }

    /// Rename a member
    pub fn rename(&self, id: MemberId, new_name: &str) -> MealPoolResult<Member> {
        let _submission = self.storage.submissions().try_begin()?;

        let mut member = self.require(id)?;
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(MealPoolError::Validation("Member name cannot be empty".into()));
        }
        self.ensure_name_free(new_name, Some(id))?;

        let old_name = std::mem::take(&mut member.name);
        member.rename(new_name);
        member
            .validate()
            .map_err(|e| MealPoolError::Validation(e.to_string()))?;

        self.storage.members.upsert(member.clone())?;
        self.storage.members.save()?;

        info!(member = %member.id, from = %old_name, to = %member.name, "member renamed");
        Ok(member)
    }

    /// Replace or clear a member's avatar
    pub fn set_avatar(&self, id: MemberId, avatar: Option<String>) -> MealPoolResult<Member> {
        let _submission = self.storage.submissions().try_begin()?;

        let mut member = self.require(id)?;
        member.set_avatar(avatar.filter(|a| !a.trim().is_empty()));

        self.storage.members.upsert(member.clone())?;
        self.storage.members.save()?;
        Ok(member)
    }

    /// Get a member by ID
    pub fn get(&self, id: MemberId) -> MealPoolResult<Option<Member>> {
        self.storage.members.get(id)
    }

    /// Find a member by name or id reference
    ///
    /// Names match case-insensitively; ids may be the full UUID or the short
    /// display form.
    pub fn find(&self, identifier: &str) -> MealPoolResult<Option<Member>> {
        if let Some(member) = self.storage.members.get_by_name(identifier)? {
            return Ok(Some(member));
        }

        Ok(self
            .storage
            .members
            .get_all()?
            .into_iter()
            .find(|m| m.id.matches_ref(identifier)))
    }

    /// Like [`find`](Self::find) but missing members are an error
    pub fn resolve(&self, identifier: &str) -> MealPoolResult<Member> {
        self.find(identifier)?
            .ok_or_else(|| MealPoolError::member_not_found(identifier))
    }

    /// All members, oldest first
    pub fn list(&self) -> MealPoolResult<Vec<Member>> {
        self.storage.members.get_all()
    }

    /// Remove a member together with the transactions they own
    ///
    /// Other members' transactions are left untouched. Shared expenses keep
    /// the removed id in `shared_with`, so the split and every remaining
    /// member's share stay exactly as they were.
    pub fn delete(&self, id: MemberId) -> MealPoolResult<MemberRemoval> {
        let _submission = self.storage.submissions().try_begin()?;

        let member = self.require(id)?;
        let transactions_removed = self.storage.transactions.delete_by_member(id)?;

        self.storage.members.delete(id)?;
        self.storage.transactions.save()?;
        self.storage.members.save()?;

        info!(
            member = %member.id,
            name = %member.name,
            removed = transactions_removed,
            "member removed"
        );

        Ok(MemberRemoval {
            member,
            transactions_removed,
        })
    }

    /// Count members
    pub fn count(&self) -> MealPoolResult<usize> {
        self.storage.members.count()
    }

    fn require(&self, id: MemberId) -> MealPoolResult<Member> {
        self.storage
            .members
            .get(id)?
            .ok_or_else(|| MealPoolError::member_not_found(id.to_string()))
    }

    fn ensure_name_free(&self, name: &str, exclude: Option<MemberId>) -> MealPoolResult<()> {
        if self.storage.members.name_exists(name, exclude)? {
            return Err(MealPoolError::Duplicate {
                entity_type: "Member",
                identifier: name.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::MealPoolPaths;
    use crate::models::{Money, Transaction};
    use chrono::Utc;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = MealPoolPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_member() {
        let (_temp_dir, storage) = create_test_storage();
        let service = MemberService::new(&storage);

        let member = service.create("  Rahim ", None).unwrap();
        assert_eq!(member.name, "Rahim");
        assert_eq!(service.count().unwrap(), 1);
    }

    #[test]
    fn test_empty_name_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = MemberService::new(&storage);

        let err = service.create("   ", None).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_duplicate_name_rejected_case_insensitively() {
        let (_temp_dir, storage) = create_test_storage();
        let service = MemberService::new(&storage);

        service.create("Rahim", None).unwrap();
        let err = service.create("rahim", None).unwrap_err();
        assert!(matches!(err, MealPoolError::Duplicate { .. }));
        assert_eq!(service.count().unwrap(), 1);
    }

    #[test]
    fn test_rename() {
        let (_temp_dir, storage) = create_test_storage();
        let service = MemberService::new(&storage);

        let rahim = service.create("Rahim", None).unwrap();
        service.create("Karim", None).unwrap();

        // Changing only the case of one's own name is fine
        assert_eq!(service.rename(rahim.id, "RAHIM").unwrap().name, "RAHIM");
        assert!(matches!(
            service.rename(rahim.id, "karim").unwrap_err(),
            MealPoolError::Duplicate { .. }
        ));
        assert!(service.rename(MemberId::new(), "Someone").unwrap_err().is_not_found());
    }

    #[test]
    fn test_find_by_name_or_id() {
        let (_temp_dir, storage) = create_test_storage();
        let service = MemberService::new(&storage);
        let member = service.create("Rahim", None).unwrap();

        assert_eq!(service.find("RAHIM").unwrap().unwrap().id, member.id);
        assert_eq!(
            service.find(&member.id.to_string()).unwrap().unwrap().id,
            member.id
        );
        assert!(service.find("nobody").unwrap().is_none());
        assert!(service.resolve("nobody").unwrap_err().is_not_found());
    }

    #[test]
    fn test_set_avatar() {
        let (_temp_dir, storage) = create_test_storage();
        let service = MemberService::new(&storage);
        let member = service.create("Rahim", None).unwrap();

        let updated = service
            .set_avatar(member.id, Some("rahim.png".into()))
            .unwrap();
        assert_eq!(updated.avatar.as_deref(), Some("rahim.png"));

        let cleared = service.set_avatar(member.id, Some("  ".into())).unwrap();
        assert!(cleared.avatar.is_none());
    }

    #[test]
    fn test_delete_removes_only_owned_transactions() {
        let (_temp_dir, storage) = create_test_storage();
        let service = MemberService::new(&storage);
        let a = service.create("A", None).unwrap();
        let b = service.create("B", None).unwrap();
        let now = Utc::now();

        let txns = &storage.transactions;
        txns.upsert(Transaction::deposit(b.id, now, Money::from_major(100))).unwrap();
        txns.upsert(Transaction::legacy_meal(Some(b.id), now, 2)).unwrap();
        let split = Transaction::shared_expense(a.id, now, Money::from_major(60), [a.id, b.id]);
        let split_id = split.id;
        txns.upsert(split).unwrap();
        let only_b = Transaction::shared_expense(a.id, now, Money::from_major(30), [b.id]);
        let only_b_id = only_b.id;
        txns.upsert(only_b).unwrap();
        let joint = Transaction::expense(a.id, now, Money::from_major(20)).with_payers([a.id, b.id]);
        let joint_id = joint.id;
        txns.upsert(joint).unwrap();

        let removal = service.delete(b.id).unwrap();
        assert_eq!(removal.transactions_removed, 2);

        assert!(service.get(b.id).unwrap().is_none());
        assert_eq!(txns.count().unwrap(), 3);
        assert_eq!(txns.get(split_id).unwrap().unwrap().shared_with, vec![a.id, b.id]);
        assert_eq!(txns.get(only_b_id).unwrap().unwrap().shared_with, vec![b.id]);
        assert_eq!(txns.get(joint_id).unwrap().unwrap().payer_ids, vec![a.id, b.id]);
    }

    #[test]
    fn test_delete_keeps_survivor_share() {
        let (_temp_dir, storage) = create_test_storage();
        let service = MemberService::new(&storage);
        let a = service.create("A", None).unwrap();
        let b = service.create("B", None).unwrap();
        storage
            .transactions
            .upsert(Transaction::shared_expense(
                a.id,
                Utc::now(),
                Money::from_major(150),
                [a.id, b.id],
            ))
            .unwrap();

        let balance_of_a = || {
            let (members, transactions) = storage.snapshot().unwrap();
            crate::ledger::LedgerSnapshot::new(&members, &transactions)
                .member_balance(a.id)
                .unwrap()
        };
        let before = balance_of_a();
        service.delete(b.id).unwrap();
        let after = balance_of_a();

        assert_eq!(before.shared_expense_share, Money::from_major(75));
        assert_eq!(after, before);
    }

    #[test]
    fn test_mutation_rejected_while_submission_open() {
        let (_temp_dir, storage) = create_test_storage();
        let service = MemberService::new(&storage);

        let _open = storage.submissions().try_begin().unwrap();
        let err = service.create("Rahim", None).unwrap_err();
        assert!(matches!(err, MealPoolError::SubmissionInProgress));
    }
}
