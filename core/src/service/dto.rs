use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::calendar::MonthRef;
use crate::model::journal::{DayEntry, DayMark};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DayResult {
    pub date: NaiveDate,
    pub day_of_month: u32,
    pub is_work_day: bool,
    pub is_today: bool,
    pub is_future: bool,
    /// Scheduled shift hours; zero on rest days.
    pub base_hours: f64,
    pub extra_hours: f64,
    pub total_hours: f64,
    /// Zero for days after today.
    pub earned_amount: f64,
    pub cumulative_earned_amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayKind {
    Shift,
    ShiftWithExtra,
    ExtraOnly,
    Rest,
}

impl DayResult {
    pub fn kind(&self) -> DayKind {
        match (self.is_work_day, self.extra_hours > 0.0) {
            (true, true) => DayKind::ShiftWithExtra,
            (true, false) => DayKind::Shift,
            (false, true) => DayKind::ExtraOnly,
            (false, false) => DayKind::Rest,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct MonthAggregate {
    pub work_day_count: u32,
    pub rest_day_count: u32,
    pub total_hours: f64,
    pub extra_hours_total: f64,
    pub total_income: f64,
    pub earned_to_date: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MonthPlan {
    pub month: MonthRef,
    /// Monday-based column of day 1.
    pub first_weekday_index: u32,
    pub days: Vec<DayResult>,
    pub aggregate: MonthAggregate,
}

/// A computed month together with the settings that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerReport {
    pub plan: MonthPlan,
    pub pattern_label: String,
    pub time_zone: String,
    pub today: NaiveDate,
    pub hours_per_shift: f64,
    pub hour_rate: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct JournalMonthSummary {
    pub regular_count: u64,
    pub extra_count: u64,
    pub worked_days: u32,
    pub regular_hours: f64,
    pub extra_hours: f64,
    pub total_hours: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct JournalTotals {
    pub regular_count: u64,
    pub extra_count: u64,
    pub total_hours: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JournalDay {
    pub date: NaiveDate,
    pub day_of_month: u32,
    pub entry: DayEntry,
    pub hours: f64,
    pub mark: DayMark,
    pub is_today: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JournalMonthView {
    pub month: MonthRef,
    pub first_weekday_index: u32,
    pub days: Vec<JournalDay>,
    pub summary: JournalMonthSummary,
    pub all_time: JournalTotals,
    pub updated_at: Option<String>,
}
