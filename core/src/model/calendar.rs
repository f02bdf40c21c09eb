use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A calendar month. Always holds the first day of the month, so every
/// value is a month chrono can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthRef {
    first: NaiveDate,
}

impl MonthRef {
    /// `month_index` is zero based: 0 is January, 11 is December.
    pub fn new(year: i32, month_index: u32) -> Result<Self, ValidationError> {
        if month_index > 11 {
            return Err(ValidationError::MonthIndex(month_index));
        }
        NaiveDate::from_ymd_opt(year, month_index + 1, 1)
            .map(|first| Self { first })
            .ok_or_else(|| ValidationError::Month(format!("{}-{:02}", year, month_index + 1)))
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month_index(&self) -> u32 {
        self.first.month0()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    pub fn days_in_month(&self) -> u32 {
        match self.month() {
            4 | 6 | 9 | 11 => 30,
            2 if is_leap_year(self.year()) => 29,
            2 => 28,
            _ => 31,
        }
    }

    pub fn day(&self, day_of_month: u32) -> Option<NaiveDate> {
        self.first.with_day(day_of_month)
    }

    /// Every date of the month in ascending order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (1..=self.days_in_month()).filter_map(move |d| self.day(d))
    }

    /// Column of the first day in a Monday-first week grid.
    pub fn first_weekday_index(&self) -> u32 {
        self.first.weekday().num_days_from_monday()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month0() == self.month_index()
    }

    pub fn next(&self) -> Option<Self> {
        let (year, index) = if self.month_index() == 11 {
            (self.year().checked_add(1)?, 0)
        } else {
            (self.year(), self.month_index() + 1)
        };
        Self::new(year, index).ok()
    }

    pub fn previous(&self) -> Option<Self> {
        let (year, index) = if self.month_index() == 0 {
            (self.year().checked_sub(1)?, 11)
        } else {
            (self.year(), self.month_index() - 1)
        };
        Self::new(year, index).ok()
    }
}

impl fmt::Display for MonthRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for MonthRef {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::Month(s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Self::new(year, month - 1).map_err(|_| invalid())
    }
}

impl TryFrom<String> for MonthRef {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthRef> for String {
    fn from(month: MonthRef) -> Self {
        month.to_string()
    }
}

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Whole days since the start of the proleptic Gregorian calendar.
/// Offsets between dates are differences of these numbers, so no local
/// clock or daylight-saving shift can distort them.
pub fn day_number(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce())
}

/// Orders `date` against `today` by (year, month, day).
pub fn compare_to_today(date: NaiveDate, today: NaiveDate) -> Ordering {
    date.cmp(&today)
}

pub fn format_date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parses `YYYY-MM-DD`. The three parts must be numeric and name a real
/// calendar day, so `2024-02-30` is rejected.
pub fn parse_date_key(key: &str) -> Result<NaiveDate, ValidationError> {
    let invalid = || ValidationError::Date(key.to_string());
    let parts: Vec<&str> = key.trim().split('-').collect();
    if parts.len() != 3 {
        return Err(invalid());
    }
    let year: i32 = parts[0].parse().map_err(|_| invalid())?;
    let month: u32 = parts[1].parse().map_err(|_| invalid())?;
    let day: u32 = parts[2].parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}
