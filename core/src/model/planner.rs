use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::ValidationError;
use crate::model::calendar::{parse_date_key, MonthRef};
use crate::model::extra_hours::ExtraHoursMap;
use crate::model::pattern::{CyclePattern, SchedulePreset};
use crate::time::{is_valid_time_zone, system_time_zone};
use crate::validate::{self, loose_number};

pub const DEFAULT_HOURS_PER_SHIFT: f64 = 12.0;

/// Everything the planner remembers between runs.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlannerSettings {
    /// First day of some work block. Filled with "today" on first use.
    pub start_date: Option<NaiveDate>,
    pub schedule_preset: SchedulePreset,
    /// Only used with the `custom` preset.
    pub work_days: u32,
    pub rest_days: u32,
    pub hours_per_shift: f64,
    pub hour_rate: f64,
    pub target_month: Option<MonthRef>,
    pub time_zone: String,
    pub extra_shifts: ExtraHoursMap,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self::with_time_zone(system_time_zone())
    }
}

impl PlannerSettings {
    pub fn with_time_zone(time_zone: String) -> Self {
        Self {
            start_date: None,
            schedule_preset: SchedulePreset::default(),
            work_days: 2,
            rest_days: 2,
            hours_per_shift: DEFAULT_HOURS_PER_SHIFT,
            hour_rate: 0.0,
            target_month: None,
            time_zone,
            extra_shifts: ExtraHoursMap::new(),
        }
    }

    /// Restores settings from stored JSON. Each field is taken only when
    /// present and valid; everything else keeps its default.
    pub fn restore(raw: &Value, defaults: PlannerSettings) -> Self {
        let mut settings = defaults;
        let Some(source) = raw.as_object() else {
            warn!("stored planner settings are not a JSON object, using defaults");
            return settings;
        };

        if let Some(date) = source
            .get("startDate")
            .and_then(Value::as_str)
            .and_then(|s| parse_date_key(s).ok())
        {
            settings.start_date = Some(date);
        }
        if let Some(preset) = source
            .get("schedulePreset")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
        {
            settings.schedule_preset = preset;
        }
        if let Some(days) = source.get("workDays").and_then(stored_day_count) {
            settings.work_days = days;
        }
        if let Some(days) = source.get("restDays").and_then(stored_day_count) {
            settings.rest_days = days;
        }
        if let Some(hours) = source
            .get("hoursPerShift")
            .and_then(loose_number)
            .and_then(|h| validate::shift_hours("hours per shift", h).ok())
        {
            settings.hours_per_shift = hours;
        }
        if let Some(rate) = source
            .get("hourRate")
            .and_then(loose_number)
            .and_then(|r| validate::hour_rate(r).ok())
        {
            settings.hour_rate = rate;
        }
        if let Some(month) = source
            .get("targetMonth")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
        {
            settings.target_month = Some(month);
        }
        match source.get("timeZone").and_then(Value::as_str) {
            Some(zone) if is_valid_time_zone(zone) => settings.time_zone = zone.to_string(),
            Some(zone) => warn!(zone, "stored time zone is unknown, keeping default"),
            None => {}
        }
        if let Some(raw_extra) = source.get("extraShifts") {
            settings.extra_shifts = ExtraHoursMap::sanitize(raw_extra);
        }
        settings
    }

    pub fn pattern(&self) -> Result<CyclePattern, ValidationError> {
        match self.schedule_preset {
            SchedulePreset::Fixed(pattern) => Ok(pattern),
            SchedulePreset::Custom => CyclePattern::new(self.work_days, self.rest_days),
        }
    }

    pub fn apply(&mut self, update: &SettingsUpdate) {
        if let Some(date) = update.start_date {
            self.start_date = Some(date);
        }
        if let Some(days) = update.work_days {
            self.work_days = days;
        }
        if let Some(days) = update.rest_days {
            self.rest_days = days;
        }
        match update.schedule_preset {
            Some(preset) => self.schedule_preset = preset,
            None if update.work_days.is_some() || update.rest_days.is_some() => {
                self.schedule_preset = SchedulePreset::Custom;
            }
            None => {}
        }
        if let Some(hours) = update.hours_per_shift {
            self.hours_per_shift = hours;
        }
        if let Some(rate) = update.hour_rate {
            self.hour_rate = rate;
        }
        if let Some(month) = update.target_month {
            self.target_month = Some(month);
        }
        if let Some(zone) = &update.time_zone {
            self.time_zone = zone.clone();
        }
    }
}

fn stored_day_count(raw: &Value) -> Option<u32> {
    let n = loose_number(raw)?;
    (n.fract() == 0.0 && n >= 1.0 && n <= f64::from(u32::MAX)).then_some(n as u32)
}

pub const SETTING_KEYS: &[&str] = &["schedule", "work", "rest", "start", "hours", "rate", "month", "tz"];

/// A validated set of changes to [`PlannerSettings`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsUpdate {
    pub schedule_preset: Option<SchedulePreset>,
    pub work_days: Option<u32>,
    pub rest_days: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub hours_per_shift: Option<f64>,
    pub hour_rate: Option<f64>,
    pub target_month: Option<MonthRef>,
    pub time_zone: Option<String>,
}

impl SettingsUpdate {
    /// Builds an update from `(key, value)` pairs whose keys are already
    /// expanded to one of [`SETTING_KEYS`]. The first invalid value rejects
    /// the whole update.
    pub fn parse(assignments: &[(String, String)]) -> Result<Self, ValidationError> {
        let mut update = Self::default();
        for (key, value) in assignments {
            match key.as_str() {
                "schedule" => update.schedule_preset = Some(value.parse()?),
                "work" => update.work_days = Some(parse_day_count(value, ValidationError::WorkDays)?),
                "rest" => update.rest_days = Some(parse_day_count(value, ValidationError::RestDays)?),
                "start" => update.start_date = Some(parse_date_key(value)?),
                "hours" => {
                    update.hours_per_shift = Some(validate::parse_shift_hours("hours per shift", value)?)
                }
                "rate" => update.hour_rate = Some(validate::parse_hour_rate(value)?),
                "month" => update.target_month = Some(value.parse()?),
                "tz" => {
                    let zone = value.trim();
                    if !is_valid_time_zone(zone) {
                        return Err(ValidationError::TimeZone(value.clone()));
                    }
                    update.time_zone = Some(zone.to_string());
                }
                other => return Err(ValidationError::UnknownSetting(other.to_string())),
            }
        }
        Ok(update)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn parse_day_count(raw: &str, error: fn(String) -> ValidationError) -> Result<u32, ValidationError> {
    match raw.trim().parse::<u32>() {
        Ok(days) if days >= 1 => Ok(days),
        _ => Err(error(raw.to_string())),
    }
}
