use chrono::{Datelike, NaiveDate};

use crate::error::ValidationError;
use crate::model::calendar::{compare_to_today, day_number, MonthRef};
use crate::model::extra_hours::ExtraHoursMap;
use crate::model::pattern::CyclePattern;
use crate::service::dto::{DayResult, MonthAggregate, MonthPlan};
use crate::validate;

/// Validated inputs of [`evaluate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleConfig {
    pattern: CyclePattern,
    anchor: NaiveDate,
    hours_per_shift: f64,
    hour_rate: f64,
}

impl ScheduleConfig {
    pub fn new(
        pattern: CyclePattern,
        anchor: NaiveDate,
        hours_per_shift: f64,
        hour_rate: f64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            pattern,
            anchor,
            hours_per_shift: validate::shift_hours("hours per shift", hours_per_shift)?,
            hour_rate: validate::hour_rate(hour_rate)?,
        })
    }

    pub fn pattern(&self) -> CyclePattern {
        self.pattern
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn hours_per_shift(&self) -> f64 {
        self.hours_per_shift
    }

    pub fn hour_rate(&self) -> f64 {
        self.hour_rate
    }
}

/// Classifies every day of `month` and accumulates hours and earnings.
///
/// Only days on or before `today` earn; the running total is carried in
/// ascending day order, so past months come out fully earned and future
/// months not at all without any month-level special case.
pub fn evaluate(
    config: &ScheduleConfig,
    month: MonthRef,
    extra: &ExtraHoursMap,
    today: NaiveDate,
) -> MonthPlan {
    let anchor_day = day_number(config.anchor);
    let mut days = Vec::with_capacity(month.days_in_month() as usize);
    let mut work_day_count = 0u32;
    let mut extra_hours_total = 0.0;
    let mut earned_so_far = 0.0;

    for date in month.days() {
        let is_work_day = config.pattern.is_work_offset(day_number(date) - anchor_day);
        let extra_hours = extra.get(date);
        let base_hours = if is_work_day { config.hours_per_shift } else { 0.0 };
        let total_hours = base_hours + extra_hours;

        let relation = compare_to_today(date, today);
        let earned_amount = if relation.is_le() {
            total_hours * config.hour_rate
        } else {
            0.0
        };
        earned_so_far += earned_amount;

        if is_work_day {
            work_day_count += 1;
        }
        extra_hours_total += extra_hours;

        days.push(DayResult {
            date,
            day_of_month: date.day(),
            is_work_day,
            is_today: relation.is_eq(),
            is_future: relation.is_gt(),
            base_hours,
            extra_hours,
            total_hours,
            earned_amount,
            cumulative_earned_amount: earned_so_far,
        });
    }

    let total_hours = f64::from(work_day_count) * config.hours_per_shift + extra_hours_total;
    let aggregate = MonthAggregate {
        work_day_count,
        rest_day_count: month.days_in_month() - work_day_count,
        total_hours,
        extra_hours_total,
        total_income: total_hours * config.hour_rate,
        earned_to_date: earned_so_far,
    };

    MonthPlan {
        month,
        first_weekday_index: month.first_weekday_index(),
        days,
        aggregate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::dto::DayKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn january() -> MonthRef {
        MonthRef::new(2024, 0).unwrap()
    }

    fn two_two(anchor: NaiveDate) -> ScheduleConfig {
        ScheduleConfig::new(CyclePattern::new(2, 2).unwrap(), anchor, 12.0, 200.0).unwrap()
    }

    #[test]
    fn test_two_two_january_on_new_year() {
        let config = two_two(date(2024, 1, 1));
        let plan = evaluate(&config, january(), &ExtraHoursMap::new(), date(2024, 1, 1));

        assert_eq!(plan.days.len(), 31);
        let day1 = &plan.days[0];
        assert!(day1.is_work_day && day1.is_today && !day1.is_future);
        assert_eq!(day1.earned_amount, 2400.0);

        let day2 = &plan.days[1];
        assert!(day2.is_work_day && day2.is_future);
        assert_eq!(day2.earned_amount, 0.0);

        assert!(!plan.days[2].is_work_day);
        assert!(!plan.days[3].is_work_day);
        assert!(plan.days[4].is_work_day);

        assert_eq!(plan.aggregate.work_day_count, 16);
        assert_eq!(plan.aggregate.rest_day_count, 15);
        assert_eq!(plan.aggregate.total_hours, 192.0);
        assert_eq!(plan.aggregate.total_income, 38400.0);
        assert_eq!(plan.aggregate.earned_to_date, 2400.0);
    }

    #[test]
    fn test_extra_hours_on_rest_day() {
        let config =
            ScheduleConfig::new(CyclePattern::new(4, 4).unwrap(), date(2024, 1, 1), 12.0, 200.0).unwrap();
        let mut extra = ExtraHoursMap::new();
        extra.add(date(2024, 1, 5), 3.0).unwrap();

        let plan = evaluate(&config, january(), &extra, date(2024, 1, 31));
        let day5 = &plan.days[4];

        assert!(!day5.is_work_day);
        assert_eq!(day5.kind(), DayKind::ExtraOnly);
        assert_eq!(day5.total_hours, 3.0);
        assert_eq!(day5.earned_amount, 600.0);
        // Offsets 0-3, 8-11, 16-19, 24-27 are work days.
        assert_eq!(plan.aggregate.work_day_count, 16);
        assert_eq!(plan.aggregate.extra_hours_total, 3.0);
        assert_eq!(plan.aggregate.total_hours, 16.0 * 12.0 + 3.0);
    }

    #[test]
    fn test_extra_hours_on_work_day() {
        let config = two_two(date(2024, 1, 1));
        let mut extra = ExtraHoursMap::new();
        extra.add(date(2024, 1, 2), 2.5).unwrap();

        let plan = evaluate(&config, january(), &extra, date(2024, 1, 2));
        assert_eq!(plan.days[1].kind(), DayKind::ShiftWithExtra);
        assert_eq!(plan.days[1].total_hours, 14.5);
        assert_eq!(plan.aggregate.earned_to_date, (12.0 + 14.5) * 200.0);
    }

    #[test]
    fn test_month_before_anchor() {
        // Anchor after the whole target month: offsets are all negative.
        let config = two_two(date(2024, 2, 1));
        let plan = evaluate(&config, january(), &ExtraHoursMap::new(), date(2024, 1, 1));

        // Jan 31 is offset -1 (position 3, rest), Jan 30 offset -2 (rest),
        // Jan 29 and Jan 28 are work days.
        assert!(!plan.days[30].is_work_day);
        assert!(!plan.days[29].is_work_day);
        assert!(plan.days[28].is_work_day);
        assert!(plan.days[27].is_work_day);
        for day in &plan.days {
            let offset = day_number(day.date) - day_number(config.anchor());
            assert_eq!(day.is_work_day, offset.rem_euclid(4) < 2);
        }
    }

    #[test]
    fn test_today_after_month_earns_everything() {
        let config = two_two(date(2024, 1, 1));
        let plan = evaluate(&config, january(), &ExtraHoursMap::new(), date(2024, 3, 15));

        assert!(plan.days.iter().all(|d| !d.is_future && !d.is_today));
        assert_eq!(plan.aggregate.earned_to_date, plan.aggregate.total_income);
    }

    #[test]
    fn test_today_before_month_earns_nothing() {
        let config = two_two(date(2024, 1, 1));
        let plan = evaluate(&config, january(), &ExtraHoursMap::new(), date(2023, 12, 31));

        assert!(plan.days.iter().all(|d| d.is_future));
        assert_eq!(plan.aggregate.earned_to_date, 0.0);
        assert!(plan.days.iter().all(|d| d.cumulative_earned_amount == 0.0));
    }

    #[test]
    fn test_cumulative_is_monotonic_and_sums_earned() {
        let config =
            ScheduleConfig::new(CyclePattern::new(3, 2).unwrap(), date(2023, 11, 17), 8.0, 150.0).unwrap();
        let mut extra = ExtraHoursMap::new();
        extra.add(date(2024, 1, 10), 4.0).unwrap();
        extra.add(date(2024, 1, 25), 6.0).unwrap();

        let today = date(2024, 1, 20);
        let plan = evaluate(&config, january(), &extra, today);

        let mut previous = 0.0;
        for day in &plan.days {
            assert!(day.cumulative_earned_amount >= previous);
            previous = day.cumulative_earned_amount;
        }
        let earned: f64 = plan
            .days
            .iter()
            .filter(|d| d.date <= today)
            .map(|d| d.earned_amount)
            .sum();
        assert!((earned - plan.aggregate.earned_to_date).abs() < 1e-9);
        assert_eq!(plan.days[24].earned_amount, 0.0);
    }

    #[test]
    fn test_zero_rate_earns_nothing() {
        let config =
            ScheduleConfig::new(CyclePattern::new(1, 1).unwrap(), date(2024, 1, 1), 24.0, 0.0).unwrap();
        let plan = evaluate(&config, MonthRef::new(2024, 1).unwrap(), &ExtraHoursMap::new(), date(2024, 2, 29));

        // Feb 1 is offset 31, so the even offsets 32..=58 are the shifts.
        assert_eq!(plan.aggregate.work_day_count, 14);
        assert_eq!(plan.aggregate.rest_day_count, 15);
        assert_eq!(plan.aggregate.total_income, 0.0);
    }

    #[test]
    fn test_hours_per_shift_used_as_given() {
        let config =
            ScheduleConfig::new(CyclePattern::new(1, 1).unwrap(), date(2024, 1, 1), 7.999, 1000.0).unwrap();
        assert_eq!(config.hours_per_shift(), 7.999);

        let plan = evaluate(&config, january(), &ExtraHoursMap::new(), date(2024, 1, 1));
        assert_eq!(plan.aggregate.work_day_count, 16);
        assert!((plan.aggregate.total_income - 127_984.0).abs() < 1e-6);
    }

    #[test]
    fn test_longest_blocks_evaluate() {
        let config =
            ScheduleConfig::new(CyclePattern::new(u32::MAX, 1).unwrap(), date(2024, 1, 1), 12.0, 100.0).unwrap();
        let plan = evaluate(&config, january(), &ExtraHoursMap::new(), date(2024, 1, 31));
        assert_eq!(plan.aggregate.work_day_count, 31);

        // Before the anchor the single rest day falls on Dec 31.
        let plan = evaluate(&config, MonthRef::new(2023, 11).unwrap(), &ExtraHoursMap::new(), date(2024, 1, 31));
        assert!(!plan.days[30].is_work_day);
        assert_eq!(plan.aggregate.work_day_count, 30);
    }

    #[test]
    fn test_config_rejects_bad_numbers() {
        let pattern = CyclePattern::new(2, 2).unwrap();
        let anchor = date(2024, 1, 1);
        assert!(ScheduleConfig::new(pattern, anchor, 0.0, 100.0).is_err());
        assert!(ScheduleConfig::new(pattern, anchor, f64::NAN, 100.0).is_err());
        assert!(ScheduleConfig::new(pattern, anchor, 12.0, -1.0).is_err());
    }

    #[test]
    fn test_first_weekday_for_grid() {
        let config = two_two(date(2024, 1, 1));
        let plan = evaluate(&config, MonthRef::new(2024, 8).unwrap(), &ExtraHoursMap::new(), date(2024, 1, 1));
        // 2024-09-01 was a Sunday.
        assert_eq!(plan.first_weekday_index, 6);
        assert_eq!(plan.days.len(), 30);
    }
}
