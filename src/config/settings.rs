//! User settings for mealpool
//!
//! Manages user preferences: currency symbol, date format and which meal slots
//! are offered during data entry (with their default counts).

use serde::{Deserialize, Serialize};

use super::paths::MealPoolPaths;
use crate::error::MealPoolError;
use crate::models::{MealDetails, MealSlot};

/// Data-entry settings for a single meal slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSetting {
    /// Whether the slot is offered when recording meals
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Count pre-filled for the slot
    #[serde(default = "default_slot_count")]
    pub default_count: u32,
}

impl Default for SlotSetting {
    fn default() -> Self {
        Self {
            enabled: true,
            default_count: default_slot_count(),
        }
    }
}

/// Meal-slot settings used by data entry
///
/// The ledger ignores these entirely: it sums whatever meal details it is
/// given, whether or not a slot is enabled here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealSlotSettings {
    #[serde(default)]
    pub breakfast: SlotSetting,
    #[serde(default)]
    pub lunch: SlotSetting,
    #[serde(default)]
    pub dinner: SlotSetting,
}

impl MealSlotSettings {
    /// Settings for a slot
    pub fn slot(&self, slot: MealSlot) -> &SlotSetting {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::Lunch => &self.lunch,
            MealSlot::Dinner => &self.dinner,
        }
    }

    /// Mutable settings for a slot
    pub fn slot_mut(&mut self, slot: MealSlot) -> &mut SlotSetting {
        match slot {
            MealSlot::Breakfast => &mut self.breakfast,
            MealSlot::Lunch => &mut self.lunch,
            MealSlot::Dinner => &mut self.dinner,
        }
    }

    /// Slots currently offered for entry
    pub fn enabled_slots(&self) -> Vec<MealSlot> {
        MealSlot::all()
            .iter()
            .copied()
            .filter(|slot| self.slot(*slot).enabled)
            .collect()
    }

    /// Pre-filled meal breakdown for a new entry
    pub fn default_details(&self) -> MealDetails {
        MealDetails::from_counts(
            self.enabled_slots()
                .into_iter()
                .map(|slot| (slot, self.slot(slot).default_count)),
        )
    }
}

/// User settings for mealpool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used when displaying amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Meal slot entry settings
    #[serde(default)]
    pub meal_slots: MealSlotSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_true() -> bool {
    true
}

fn default_slot_count() -> u32 {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
            meal_slots: MealSlotSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &MealPoolPaths) -> Result<Self, MealPoolError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Not persisted until the caller decides to save
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| MealPoolError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| MealPoolError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &MealPoolPaths) -> Result<(), MealPoolError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| MealPoolError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| MealPoolError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
