//! mealpool - shared meal and expense ledger for flatmates
//!
//! Members pay money into a common pool, record the meals they eat and the
//! bills they cover. From that log this library derives the group meal rate,
//! each member's balance against the pool and a running balance over time.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (members, transactions, meals, money)
//! - `ledger`: Pure balance calculations over a snapshot of the log
//! - `storage`: JSON file storage layer
//! - `services`: Validation and persistence of ledger changes
//! - `reports`: Summary and history reports with CSV export
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the `mealpool` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use mealpool::config::paths::MealPoolPaths;
//! use mealpool::ledger::LedgerSnapshot;
//! use mealpool::storage::Storage;
//!
//! let mut storage = Storage::new(MealPoolPaths::new()?)?;
//! storage.load_all()?;
//! let (members, transactions) = storage.snapshot()?;
//! let totals = LedgerSnapshot::new(&members, &transactions).group_totals();
//! println!("Meal rate: {}", totals.meal_rate);
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod ledger;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{MealPoolError, MealPoolResult};
