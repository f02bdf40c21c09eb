use anyhow::Result;
use chrono::Datelike;

use crate::model::calendar::{format_date_key, MonthRef};
use crate::repository::JournalRepository;
use crate::service::dto::{JournalDay, JournalMonthView};
use crate::service::journal_service::{summarize_all, summarize_month, JournalService};
use crate::time::Clock;

/// Builds the journal calendar for one month from a single load.
pub struct JournalMonthUseCase<'a, R: JournalRepository, C: Clock> {
    journal: &'a JournalService<R, C>,
}

impl<'a, R: JournalRepository, C: Clock> JournalMonthUseCase<'a, R, C> {
    pub fn new(journal: &'a JournalService<R, C>) -> Self {
        Self { journal }
    }

    /// `month` defaults to the month containing today.
    pub fn view(&self, month: Option<MonthRef>) -> Result<JournalMonthView> {
        let today = self.journal.today();
        let month = month.unwrap_or_else(|| MonthRef::containing(today));
        let data = self.journal.data()?;

        let days = month
            .days()
            .map(|date| {
                let entry = data
                    .entries
                    .get(&format_date_key(date))
                    .copied()
                    .unwrap_or_default();
                JournalDay {
                    date,
                    day_of_month: date.day(),
                    entry,
                    hours: entry.hours(&data.settings),
                    mark: entry.mark(),
                    is_today: date == today,
                }
            })
            .collect();

        Ok(JournalMonthView {
            month,
            first_weekday_index: month.first_weekday_index(),
            days,
            summary: summarize_month(&data, month),
            all_time: summarize_all(&data),
            updated_at: data.updated_at,
        })
    }
}
