use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::model::calendar::MonthRef;
use crate::model::planner::{PlannerSettings, SettingsUpdate};
use crate::repository::PlannerRepository;
use crate::service::dto::PlannerReport;
use crate::service::evaluator::{evaluate, ScheduleConfig};
use crate::time::{resolve_time_zone, system_time_zone, Clock};

pub struct PlannerService<R: PlannerRepository, C: Clock> {
    repo: R,
    clock: C,
}

impl<R: PlannerRepository, C: Clock> PlannerService<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Stored settings, or fresh defaults on first run.
    pub fn settings(&self) -> Result<PlannerSettings> {
        Ok(self.repo.load()?.unwrap_or_default())
    }

    pub fn update(&self, changes: &SettingsUpdate) -> Result<PlannerSettings> {
        let mut settings = self.settings()?;
        settings.apply(changes);
        // A custom preset must still describe a real cycle.
        settings.pattern()?;
        self.repo.save(&settings)?;
        Ok(settings)
    }

    /// Adds `hours` on top of whatever is already logged for `date` and
    /// returns the new total for that day.
    pub fn add_extra_shift(&self, date: NaiveDate, hours: f64) -> Result<f64> {
        let mut settings = self.settings()?;
        let total = settings.extra_shifts.add(date, hours)?;
        self.repo.save(&settings)?;
        Ok(total)
    }

    /// Returns whether anything was stored for `date`.
    pub fn remove_extra_shift(&self, date: NaiveDate) -> Result<bool> {
        let mut settings = self.settings()?;
        let removed = settings.extra_shifts.remove(date);
        if removed {
            self.repo.save(&settings)?;
        }
        Ok(removed)
    }

    pub fn use_system_time_zone(&self) -> Result<String> {
        let mut settings = self.settings()?;
        settings.time_zone = system_time_zone();
        self.repo.save(&settings)?;
        Ok(settings.time_zone)
    }

    /// Evaluates `month`, or the stored target month, in the configured
    /// zone. Unset start date and target month are filled from today.
    pub fn compute(&self, month: Option<MonthRef>) -> Result<PlannerReport> {
        let mut settings = self.settings()?;
        let tz = resolve_time_zone(&settings.time_zone);
        let today = self.clock.today_in(tz);

        let anchor = *settings.start_date.get_or_insert(today);
        let target = month
            .or(settings.target_month)
            .unwrap_or_else(|| MonthRef::containing(today));
        settings.target_month = Some(target);

        let pattern = settings.pattern()?;
        let config = ScheduleConfig::new(pattern, anchor, settings.hours_per_shift, settings.hour_rate)?;
        let plan = evaluate(&config, target, &settings.extra_shifts, today);
        debug!(month = %target, pattern = %pattern, %today, "computed month plan");

        if let Err(error) = self.repo.save(&settings) {
            warn!(error = %error, "could not save planner settings");
        }

        Ok(PlannerReport {
            plan,
            pattern_label: pattern.label(),
            time_zone: tz.name().to_string(),
            today,
            hours_per_shift: config.hours_per_shift(),
            hour_rate: config.hour_rate(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::pattern::SchedulePreset;
    use crate::error::ValidationError;
    use crate::time::FixedClock;
    use anyhow::anyhow;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct MockPlannerRepo {
        stored: RefCell<Option<PlannerSettings>>,
        fail_saves: Cell<bool>,
        saves: Cell<u32>,
    }

    impl PlannerRepository for &MockPlannerRepo {
        fn load(&self) -> Result<Option<PlannerSettings>> {
            Ok(self.stored.borrow().clone())
        }

        fn save(&self, settings: &PlannerSettings) -> Result<()> {
            if self.fail_saves.get() {
                return Err(anyhow!("disk full"));
            }
            self.saves.set(self.saves.get() + 1);
            *self.stored.borrow_mut() = Some(settings.clone());
            Ok(())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn repo_with(settings: PlannerSettings) -> MockPlannerRepo {
        MockPlannerRepo {
            stored: RefCell::new(Some(settings)),
            ..Default::default()
        }
    }

    fn utc_settings() -> PlannerSettings {
        PlannerSettings::with_time_zone("UTC".to_string())
    }

    #[test]
    fn test_first_compute_fills_anchor_and_month() {
        let repo = repo_with(utc_settings());
        let service = PlannerService::new(&repo, FixedClock::at_date(date(2024, 1, 1)));

        let report = service.compute(None).unwrap();
        assert_eq!(report.plan.month, MonthRef::new(2024, 0).unwrap());
        assert_eq!(report.today, date(2024, 1, 1));
        assert_eq!(report.pattern_label, "2/2");
        assert_eq!(report.plan.aggregate.work_day_count, 16);

        let stored = repo.stored.borrow().clone().unwrap();
        assert_eq!(stored.start_date, Some(date(2024, 1, 1)));
        assert_eq!(stored.target_month, Some(MonthRef::new(2024, 0).unwrap()));
    }

    #[test]
    fn test_compute_matches_reference_month() {
        let mut settings = utc_settings();
        settings.start_date = Some(date(2024, 1, 1));
        settings.hour_rate = 200.0;
        let repo = repo_with(settings);
        let service = PlannerService::new(&repo, FixedClock::at_date(date(2024, 1, 1)));

        let report = service.compute(Some(MonthRef::new(2024, 0).unwrap())).unwrap();
        assert_eq!(report.plan.aggregate.total_income, 38400.0);
        assert_eq!(report.plan.aggregate.earned_to_date, 2400.0);
        assert_eq!(report.hour_rate, 200.0);
    }

    #[test]
    fn test_month_override_becomes_target() {
        let mut settings = utc_settings();
        settings.start_date = Some(date(2024, 1, 1));
        let repo = repo_with(settings);
        let service = PlannerService::new(&repo, FixedClock::at_date(date(2024, 1, 1)));

        let march = MonthRef::new(2024, 2).unwrap();
        service.compute(Some(march)).unwrap();
        let report = service.compute(None).unwrap();
        assert_eq!(report.plan.month, march);
        assert_eq!(report.plan.aggregate.earned_to_date, 0.0);
    }

    #[test]
    fn test_today_follows_configured_zone() {
        use chrono::TimeZone;
        let clock = FixedClock(chrono::Utc.with_ymd_and_hms(2024, 1, 31, 22, 0, 0).unwrap());
        let repo = repo_with(PlannerSettings::with_time_zone("Asia/Tokyo".to_string()));
        let service = PlannerService::new(&repo, clock);

        let report = service.compute(None).unwrap();
        assert_eq!(report.today, date(2024, 2, 1));
        assert_eq!(report.plan.month, MonthRef::new(2024, 1).unwrap());
        assert_eq!(report.time_zone, "Asia/Tokyo");
    }

    #[test]
    fn test_unknown_stored_zone_falls_back_to_utc() {
        let repo = repo_with(PlannerSettings::with_time_zone("Mars/Olympus".to_string()));
        let service = PlannerService::new(&repo, FixedClock::at_date(date(2024, 5, 10)));

        let report = service.compute(None).unwrap();
        assert_eq!(report.time_zone, "UTC");
        assert_eq!(report.today, date(2024, 5, 10));
    }

    #[test]
    fn test_failed_save_still_returns_report() {
        let repo = repo_with(utc_settings());
        repo.fail_saves.set(true);
        let service = PlannerService::new(&repo, FixedClock::at_date(date(2024, 1, 1)));

        let report = service.compute(None).unwrap();
        assert_eq!(report.plan.days.len(), 31);
        assert_eq!(repo.saves.get(), 0);
    }

    #[test]
    fn test_update_saves_validated_changes() {
        let repo = repo_with(utc_settings());
        let service = PlannerService::new(&repo, FixedClock::at_date(date(2024, 1, 1)));

        let update = SettingsUpdate {
            schedule_preset: Some(SchedulePreset::Custom),
            work_days: Some(5),
            rest_days: Some(2),
            hour_rate: Some(300.0),
            ..Default::default()
        };
        let settings = service.update(&update).unwrap();
        assert_eq!(settings.pattern().unwrap().label(), "5/2");
        assert_eq!(repo.stored.borrow().as_ref().unwrap().hour_rate, 300.0);
    }

    #[test]
    fn test_invalid_custom_cycle_is_not_saved() {
        let mut settings = utc_settings();
        settings.work_days = 0;
        let repo = repo_with(settings);
        let service = PlannerService::new(&repo, FixedClock::at_date(date(2024, 1, 1)));

        let update = SettingsUpdate {
            schedule_preset: Some(SchedulePreset::Custom),
            ..Default::default()
        };
        let error = service.update(&update).unwrap_err();
        assert_eq!(
            error.downcast_ref::<ValidationError>(),
            Some(&ValidationError::WorkDays("0".into()))
        );
        assert_eq!(repo.saves.get(), 0);
    }

    #[test]
    fn test_extra_shifts_accumulate_and_remove() {
        let mut settings = utc_settings();
        settings.start_date = Some(date(2024, 1, 1));
        let repo = repo_with(settings);
        let service = PlannerService::new(&repo, FixedClock::at_date(date(2024, 1, 31)));

        assert_eq!(service.add_extra_shift(date(2024, 1, 3), 2.0).unwrap(), 2.0);
        assert_eq!(service.add_extra_shift(date(2024, 1, 3), 1.5).unwrap(), 3.5);
        assert!(service.add_extra_shift(date(2024, 1, 3), 0.0).is_err());

        let report = service.compute(None).unwrap();
        assert_eq!(report.plan.aggregate.extra_hours_total, 3.5);

        assert!(service.remove_extra_shift(date(2024, 1, 3)).unwrap());
        assert!(!service.remove_extra_shift(date(2024, 1, 3)).unwrap());
    }

    #[test]
    fn test_defaults_when_nothing_stored() {
        let repo = MockPlannerRepo::default();
        let service = PlannerService::new(&repo, FixedClock::at_date(date(2024, 1, 1)));
        let settings = service.settings().unwrap();
        assert_eq!(settings.hours_per_shift, 12.0);
        assert_eq!(settings.hour_rate, 0.0);
        assert!(settings.extra_shifts.is_empty());
    }
}
