//! Meal slots and per-slot meal counts

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A meal slot within a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealSlot {
    /// All slots in serving order
    pub fn all() -> &'static [MealSlot] {
        &[Self::Breakfast, Self::Lunch, Self::Dinner]
    }

    /// Parse a slot from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" | "b" => Some(Self::Breakfast),
            "lunch" | "l" => Some(Self::Lunch),
            "dinner" | "d" | "supper" => Some(Self::Dinner),
            _ => None,
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Breakfast => write!(f, "Breakfast"),
            Self::Lunch => write!(f, "Lunch"),
            Self::Dinner => write!(f, "Dinner"),
        }
    }
}

/// Structured per-slot meal counts for a single meal entry
///
/// Serialized as a plain `{"breakfast": 1, "dinner": 2}` map. Slots that were
/// never set are absent rather than zero, so a stored record reads back
/// exactly as it was written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MealDetails(BTreeMap<MealSlot, u32>);

impl MealDetails {
    /// Create an empty breakdown
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a breakdown from `(slot, count)` pairs
    pub fn from_counts(counts: impl IntoIterator<Item = (MealSlot, u32)>) -> Self {
        Self(counts.into_iter().collect())
    }

    /// Builder-style setter
    pub fn with(mut self, slot: MealSlot, count: u32) -> Self {
        self.set(slot, count);
        self
    }

    /// Set the count for a slot
    pub fn set(&mut self, slot: MealSlot, count: u32) {
        self.0.insert(slot, count);
    }

    /// Count for a slot (zero if absent)
    pub fn get(&self, slot: MealSlot) -> u32 {
        self.0.get(&slot).copied().unwrap_or(0)
    }

    /// Sum of all slot counts, widened so that no combination can overflow
    pub fn total(&self) -> u64 {
        self.0.values().map(|&count| u64::from(count)).sum()
    }

    /// True if no slot has been recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(slot, count)` pairs in slot order
    pub fn iter(&self) -> impl Iterator<Item = (MealSlot, u32)> + '_ {
        self.0.iter().map(|(slot, count)| (*slot, *count))
    }
}

impl fmt::Display for MealDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .filter(|(_, count)| *count > 0)
            .map(|(slot, count)| format!("{} x{}", slot, count))
            .collect();
        if parts.is_empty() {
            write!(f, "-")
        } else {
            write!(f, "{}", parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total() {
        let details = MealDetails::new()
            .with(MealSlot::Breakfast, 1)
            .with(MealSlot::Lunch, 2)
            .with(MealSlot::Dinner, 0);
        assert_eq!(details.total(), 3);
        assert_eq!(details.get(MealSlot::Dinner), 0);
    }

    #[test]
    fn test_total_does_not_overflow() {
        let details = MealDetails::new()
            .with(MealSlot::Breakfast, u32::MAX)
            .with(MealSlot::Lunch, u32::MAX)
            .with(MealSlot::Dinner, 2);
        assert_eq!(details.total(), 2 * u64::from(u32::MAX) + 2);
    }

    #[test]
    fn test_parse_slot() {
        assert_eq!(MealSlot::parse("Lunch"), Some(MealSlot::Lunch));
        assert_eq!(MealSlot::parse(" d "), Some(MealSlot::Dinner));
        assert_eq!(MealSlot::parse("brunch"), None);
    }

    #[test]
    fn test_serialization_keeps_only_written_slots() {
        let details = MealDetails::new().with(MealSlot::Dinner, 2);
        let json = serde_json::to_string(&details).unwrap();
        assert_eq!(json, r#"{"dinner":2}"#);

        let back: MealDetails = serde_json::from_str(&json).unwrap();
        assert_eq!(back, details);
    }

    #[test]
    fn test_display() {
        let details = MealDetails::new()
            .with(MealSlot::Lunch, 1)
            .with(MealSlot::Dinner, 2);
        assert_eq!(details.to_string(), "Lunch x1, Dinner x2");
        assert_eq!(MealDetails::new().to_string(), "-");
    }
}
