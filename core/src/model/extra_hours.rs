use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::ValidationError;
use crate::model::calendar::{format_date_key, parse_date_key, MonthRef};
use crate::validate::{loose_number, round2, shift_hours};

/// Extra hours worked on top of the regular schedule, keyed by date.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct ExtraHoursMap {
    entries: BTreeMap<NaiveDate, f64>,
}

impl ExtraHoursMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the map from stored JSON, dropping every entry whose key is
    /// not a real calendar date or whose value is not a positive finite
    /// number. One bad entry never invalidates the rest.
    pub fn sanitize(raw: &Value) -> Self {
        let mut map = Self::default();
        let Some(object) = raw.as_object() else {
            if !raw.is_null() {
                warn!("extra hours are not a JSON object, ignoring them");
            }
            return map;
        };

        for (key, value) in object {
            let date = match parse_date_key(key) {
                Ok(date) => date,
                Err(_) => {
                    warn!(key = %key, "dropping extra hours entry with invalid date");
                    continue;
                }
            };
            let canonical = format_date_key(date);
            if *key != canonical && object.contains_key(&canonical) {
                warn!(key = %key, canonical = %canonical, "dropping extra hours entry shadowed by padded date key");
                continue;
            }
            match loose_number(value) {
                Some(hours) if hours.is_finite() && hours > 0.0 => {
                    map.entries.insert(date, round2(hours));
                }
                _ => {
                    warn!(key = %key, value = %value, "dropping extra hours entry with invalid hours");
                }
            }
        }
        map
    }

    /// Adds hours to a day, on top of whatever the day already has.
    /// Returns the new total for that day.
    pub fn add(&mut self, date: NaiveDate, hours: f64) -> Result<f64, ValidationError> {
        let hours = shift_hours("extra shift hours", hours)?;
        let total = round2(self.get(date) + hours);
        self.entries.insert(date, total);
        Ok(total)
    }

    pub fn remove(&mut self, date: NaiveDate) -> bool {
        self.entries.remove(&date).is_some()
    }

    pub fn get(&self, date: NaiveDate) -> f64 {
        match self.entries.get(&date) {
            Some(hours) if hours.is_finite() && *hours > 0.0 => *hours,
            _ => 0.0,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.entries.iter().map(|(date, hours)| (*date, *hours))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_in(&self, month: MonthRef) -> f64 {
        self.iter()
            .filter(|(date, _)| month.contains(*date))
            .map(|(_, hours)| hours)
            .sum()
    }
}
