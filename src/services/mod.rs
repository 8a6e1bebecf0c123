//! Service layer for mealpool
//!
//! The service layer provides the rules on top of the storage layer:
//! validation, unique member names, cascading deletes and the single
//! in-flight submission lock.

pub mod guard;
pub mod member;
pub mod transaction;

pub use guard::{Submission, SubmissionGuard};
pub use member::{MemberRemoval, MemberService};
pub use transaction::{TransactionFilter, TransactionService};
