use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::calendar::day_number;

/// A repeating block of `work_days` shifts followed by `rest_days` days off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CyclePattern {
    work_days: u32,
    rest_days: u32,
}

impl CyclePattern {
    pub fn new(work_days: u32, rest_days: u32) -> Result<Self, ValidationError> {
        if work_days < 1 {
            return Err(ValidationError::WorkDays(work_days.to_string()));
        }
        if rest_days < 1 {
            return Err(ValidationError::RestDays(rest_days.to_string()));
        }
        Ok(Self {
            work_days,
            rest_days,
        })
    }

    pub fn work_days(&self) -> u32 {
        self.work_days
    }

    pub fn rest_days(&self) -> u32 {
        self.rest_days
    }

    /// Widened so that any pair of `u32` block lengths sums without overflow.
    pub fn cycle_length(&self) -> i64 {
        i64::from(self.work_days) + i64::from(self.rest_days)
    }

    /// Position inside the cycle for a signed day offset from the anchor.
    /// Always in `0..cycle_length`, including for offsets before the anchor.
    pub fn position(&self, offset: i64) -> i64 {
        offset.rem_euclid(self.cycle_length())
    }

    pub fn is_work_offset(&self, offset: i64) -> bool {
        self.position(offset) < i64::from(self.work_days)
    }

    /// `anchor` is the first day of some work block.
    pub fn is_work_day(&self, date: NaiveDate, anchor: NaiveDate) -> bool {
        self.is_work_offset(day_number(date) - day_number(anchor))
    }

    pub fn label(&self) -> String {
        format!("{}/{}", self.work_days, self.rest_days)
    }
}

impl fmt::Display for CyclePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.work_days, self.rest_days)
    }
}

impl FromStr for CyclePattern {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (work, rest) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| ValidationError::Schedule(s.to_string()))?;
        let work_days = work
            .trim()
            .parse()
            .map_err(|_| ValidationError::WorkDays(work.to_string()))?;
        let rest_days = rest
            .trim()
            .parse()
            .map_err(|_| ValidationError::RestDays(rest.to_string()))?;
        Self::new(work_days, rest_days)
    }
}

/// How the schedule is chosen: a fixed `W/R` preset, or `custom`, where
/// the separately stored work/rest day counts apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SchedulePreset {
    Fixed(CyclePattern),
    Custom,
}

pub const CUSTOM_PRESET: &str = "custom";

impl Default for SchedulePreset {
    fn default() -> Self {
        SchedulePreset::Fixed(CyclePattern {
            work_days: 2,
            rest_days: 2,
        })
    }
}

impl fmt::Display for SchedulePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulePreset::Fixed(pattern) => fmt::Display::fmt(pattern, f),
            SchedulePreset::Custom => f.write_str(CUSTOM_PRESET),
        }
    }
}

impl FromStr for SchedulePreset {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(CUSTOM_PRESET) {
            return Ok(SchedulePreset::Custom);
        }
        if !s.contains('/') {
            return Err(ValidationError::Schedule(s.to_string()));
        }
        s.parse().map(SchedulePreset::Fixed)
    }
}

impl TryFrom<String> for SchedulePreset {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SchedulePreset> for String {
    fn from(preset: SchedulePreset) -> Self {
        preset.to_string()
    }
}
