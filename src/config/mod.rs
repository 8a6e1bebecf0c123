//! Configuration module for mealpool
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - Meal-slot entry preferences

pub mod paths;
pub mod settings;

pub use paths::MealPoolPaths;
pub use settings::{MealSlotSettings, Settings, SlotSetting};
