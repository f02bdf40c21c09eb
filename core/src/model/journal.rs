use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::model::calendar::{format_date_key, parse_date_key};
use crate::validate::{loose_number, shift_hours};

pub const DEFAULT_BASE_SHIFT_HOURS: f64 = 12.0;
pub const DEFAULT_EXTRA_SHIFT_HOURS: f64 = 4.0;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JournalSettings {
    pub base_shift_hours: f64,
    pub extra_shift_hours: f64,
}

impl Default for JournalSettings {
    fn default() -> Self {
        Self {
            base_shift_hours: DEFAULT_BASE_SHIFT_HOURS,
            extra_shift_hours: DEFAULT_EXTRA_SHIFT_HOURS,
        }
    }
}

/// Shifts logged for one day.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DayEntry {
    pub regular: u32,
    pub extra: u32,
}

/// How a day is highlighted in the journal calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayMark {
    Empty,
    /// Regular shifts only; the level is the shift count capped at 4.
    Regular(u32),
    ExtraOnly,
    Mixed,
}

impl DayEntry {
    pub fn new(regular: u32, extra: u32) -> Self {
        Self { regular, extra }
    }

    pub fn is_empty(&self) -> bool {
        self.regular == 0 && self.extra == 0
    }

    pub fn hours(&self, settings: &JournalSettings) -> f64 {
        f64::from(self.regular) * settings.base_shift_hours
            + f64::from(self.extra) * settings.extra_shift_hours
    }

    pub fn mark(&self) -> DayMark {
        match (self.regular, self.extra) {
            (0, 0) => DayMark::Empty,
            (0, _) => DayMark::ExtraOnly,
            (regular, 0) => DayMark::Regular(regular.min(4)),
            _ => DayMark::Mixed,
        }
    }

    /// A bare number is a regular shift count; an object carries both
    /// counts. Anything unreadable counts as zero.
    fn from_loose(raw: &Value) -> Self {
        match raw {
            Value::Number(_) => Self::new(shift_count(raw), 0),
            Value::Object(fields) => Self::new(
                fields.get("regular").map(shift_count).unwrap_or(0),
                fields.get("extra").map(shift_count).unwrap_or(0),
            ),
            _ => Self::default(),
        }
    }
}

fn shift_count(raw: &Value) -> u32 {
    match loose_number(raw) {
        Some(n) if n.is_finite() && n > 0.0 => n.floor().min(f64::from(u32::MAX)) as u32,
        _ => 0,
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JournalData {
    pub settings: JournalSettings,
    /// Keyed by `YYYY-MM-DD`. Empty days are never stored.
    pub entries: BTreeMap<String, DayEntry>,
    /// Opaque save stamp, kept as stored.
    pub updated_at: Option<String>,
}

impl JournalData {
    /// Rebuilds journal data from stored JSON, replacing or dropping
    /// whatever does not validate.
    pub fn normalize(raw: &Value) -> Self {
        let empty = serde_json::Map::new();
        let source = raw.as_object().unwrap_or(&empty);
        let settings_source = source
            .get("settings")
            .and_then(Value::as_object)
            .unwrap_or(&empty);

        let settings = JournalSettings {
            base_shift_hours: stored_hours(
                settings_source.get("baseShiftHours"),
                "base shift hours",
                DEFAULT_BASE_SHIFT_HOURS,
            ),
            extra_shift_hours: stored_hours(
                settings_source.get("extraShiftHours"),
                "extra shift hours",
                DEFAULT_EXTRA_SHIFT_HOURS,
            ),
        };

        let mut entries = BTreeMap::new();
        if let Some(raw_entries) = source.get("entries").and_then(Value::as_object) {
            for (key, raw_entry) in raw_entries {
                let Ok(date) = parse_date_key(key) else {
                    warn!(key = %key, "dropping journal entry with invalid date");
                    continue;
                };
                let canonical = format_date_key(date);
                if *key != canonical && raw_entries.contains_key(&canonical) {
                    warn!(key = %key, canonical = %canonical, "dropping journal entry shadowed by padded date key");
                    continue;
                }
                let entry = DayEntry::from_loose(raw_entry);
                if !entry.is_empty() {
                    entries.insert(canonical, entry);
                }
            }
        }

        let updated_at = source
            .get("updatedAt")
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            settings,
            entries,
            updated_at,
        }
    }
}

fn stored_hours(raw: Option<&Value>, field: &'static str, fallback: f64) -> f64 {
    let Some(raw) = raw else {
        return fallback;
    };
    match loose_number(raw).map(|hours| shift_hours(field, hours)) {
        Some(Ok(hours)) => hours,
        _ => {
            warn!(field, value = %raw, fallback, "stored shift length is invalid, using default");
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_defaults() {
        let data = JournalData::normalize(&Value::Null);
        assert_eq!(data.settings, JournalSettings::default());
        assert!(data.entries.is_empty());
        assert!(data.updated_at.is_none());
    }

    #[test]
    fn test_normalize_settings_out_of_range() {
        let data = JournalData::normalize(&json!({
            "settings": { "baseShiftHours": 30, "extraShiftHours": "6" }
        }));
        assert_eq!(data.settings.base_shift_hours, DEFAULT_BASE_SHIFT_HOURS);
        assert_eq!(data.settings.extra_shift_hours, 6.0);
    }

    #[test]
    fn test_normalize_entries() {
        let data = JournalData::normalize(&json!({
            "entries": {
                "2024-01-01": 2,
                "2024-01-02": { "regular": 1.7, "extra": 1 },
                "2024-01-03": { "regular": 0, "extra": 0 },
                "2024-01-04": { "regular": -2, "extra": "x" },
                "2024-1-5": { "extra": 2 },
                "garbage": 1,
            },
            "updatedAt": "2024-01-05T10:00:00Z",
        }));

        assert_eq!(data.entries.len(), 3);
        assert_eq!(data.entries["2024-01-01"], DayEntry::new(2, 0));
        assert_eq!(data.entries["2024-01-02"], DayEntry::new(1, 1));
        assert_eq!(data.entries["2024-01-05"], DayEntry::new(0, 2));
        assert_eq!(data.updated_at.as_deref(), Some("2024-01-05T10:00:00Z"));
    }

    #[test]
    fn test_normalize_prefers_padded_key() {
        let data = JournalData::normalize(&json!({
            "entries": { "2024-01-05": 1, "2024-1-5": 3 }
        }));
        assert_eq!(data.entries.len(), 1);
        assert_eq!(data.entries["2024-01-05"], DayEntry::new(1, 0));
    }

    #[test]
    fn test_normalize_keeps_any_updated_at_string() {
        let data = JournalData::normalize(&json!({ "updatedAt": "Fri Jan 05 2024 10:00" }));
        assert_eq!(data.updated_at.as_deref(), Some("Fri Jan 05 2024 10:00"));

        let data = JournalData::normalize(&json!({ "updatedAt": 1704448800 }));
        assert!(data.updated_at.is_none());
    }

    #[test]
    fn test_day_marks_and_hours() {
        let settings = JournalSettings::default();
        assert_eq!(DayEntry::new(0, 0).mark(), DayMark::Empty);
        assert_eq!(DayEntry::new(0, 2).mark(), DayMark::ExtraOnly);
        assert_eq!(DayEntry::new(7, 0).mark(), DayMark::Regular(4));
        assert_eq!(DayEntry::new(1, 1).mark(), DayMark::Mixed);
        assert_eq!(DayEntry::new(2, 1).hours(&settings), 28.0);
    }

    #[test]
    fn test_round_trip_through_normalize() {
        let mut data = JournalData::default();
        data.entries.insert("2024-03-01".into(), DayEntry::new(1, 2));
        data.settings.base_shift_hours = 8.0;
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(JournalData::normalize(&value), data);
    }
}
