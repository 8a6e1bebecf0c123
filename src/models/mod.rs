//! Core data models for mealpool
//!
//! This module contains the data structures that represent the household
//! domain: members, transactions, meal breakdowns and money.

pub mod ids;
pub mod meal;
pub mod member;
pub mod money;
pub mod transaction;

pub use ids::{MemberId, TransactionId};
pub use meal::{MealDetails, MealSlot};
pub use member::{Member, MemberValidationError};
pub use money::{Money, MoneyParseError};
pub use transaction::{Transaction, TransactionKind, TransactionValidationError};
