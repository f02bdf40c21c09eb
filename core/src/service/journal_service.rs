use anyhow::Result;
use chrono::NaiveDate;
use tracing::debug;

use crate::model::calendar::{format_date_key, parse_date_key, MonthRef};
use crate::model::journal::{DayEntry, JournalData, JournalSettings};
use crate::repository::JournalRepository;
use crate::service::dto::{JournalMonthSummary, JournalTotals};
use crate::time::Clock;
use crate::validate::shift_hours;

/// The shift journal of one logged-in profile.
pub struct JournalService<R: JournalRepository, C: Clock> {
    repo: R,
    clock: C,
    username: String,
}

impl<R: JournalRepository, C: Clock> JournalService<R, C> {
    pub fn new(repo: R, clock: C, username: impl Into<String>) -> Self {
        Self {
            repo,
            clock,
            username: username.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today_local()
    }

    pub fn data(&self) -> Result<JournalData> {
        self.repo.load(&self.username)
    }

    pub fn day(&self, date: NaiveDate) -> Result<DayEntry> {
        let data = self.data()?;
        Ok(data
            .entries
            .get(&format_date_key(date))
            .copied()
            .unwrap_or_default())
    }

    /// Replaces the counts of `date`. Zero counts remove the day.
    pub fn set_day(&self, date: NaiveDate, regular: u32, extra: u32) -> Result<DayEntry> {
        let entry = DayEntry::new(regular, extra);
        self.mutate(|data| {
            let key = format_date_key(date);
            if entry.is_empty() {
                data.entries.remove(&key);
            } else {
                data.entries.insert(key, entry);
            }
        })?;
        Ok(entry)
    }

    pub fn clear_day(&self, date: NaiveDate) -> Result<()> {
        self.mutate(|data| {
            data.entries.remove(&format_date_key(date));
        })?;
        Ok(())
    }

    /// Either length may be left as is by passing `None`.
    pub fn update_settings(
        &self,
        base_shift_hours: Option<f64>,
        extra_shift_hours: Option<f64>,
    ) -> Result<JournalSettings> {
        let base = base_shift_hours
            .map(|h| shift_hours("base shift hours", h))
            .transpose()?;
        let extra = extra_shift_hours
            .map(|h| shift_hours("extra shift hours", h))
            .transpose()?;

        let data = self.mutate(|data| {
            if let Some(hours) = base {
                data.settings.base_shift_hours = hours;
            }
            if let Some(hours) = extra {
                data.settings.extra_shift_hours = hours;
            }
        })?;
        Ok(data.settings)
    }

    pub fn month_summary(&self, month: MonthRef) -> Result<JournalMonthSummary> {
        Ok(summarize_month(&self.data()?, month))
    }

    pub fn all_time_summary(&self) -> Result<JournalTotals> {
        Ok(summarize_all(&self.data()?))
    }

    fn mutate(&self, change: impl FnOnce(&mut JournalData)) -> Result<JournalData> {
        let mut data = self.data()?;
        change(&mut data);
        data.updated_at = Some(self.clock.now().to_rfc3339());
        self.repo.save(&self.username, &data)?;
        debug!(username = %self.username, entries = data.entries.len(), "journal saved");
        Ok(data)
    }
}

pub fn summarize_month(data: &JournalData, month: MonthRef) -> JournalMonthSummary {
    let mut summary = JournalMonthSummary::default();
    for (key, entry) in &data.entries {
        let Ok(date) = parse_date_key(key) else {
            continue;
        };
        if !month.contains(date) || entry.is_empty() {
            continue;
        }
        summary.regular_count += u64::from(entry.regular);
        summary.extra_count += u64::from(entry.extra);
        summary.worked_days += 1;
    }
    summary.regular_hours = summary.regular_count as f64 * data.settings.base_shift_hours;
    summary.extra_hours = summary.extra_count as f64 * data.settings.extra_shift_hours;
    summary.total_hours = summary.regular_hours + summary.extra_hours;
    summary
}

pub fn summarize_all(data: &JournalData) -> JournalTotals {
    let mut totals = JournalTotals::default();
    for entry in data.entries.values() {
        totals.regular_count += u64::from(entry.regular);
        totals.extra_count += u64::from(entry.extra);
        totals.total_hours += entry.hours(&data.settings);
    }
    totals
}
