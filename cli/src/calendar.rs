use shiftplan_core::model::calendar::{format_date_key, MonthRef};
use shiftplan_core::model::extra_hours::ExtraHoursMap;
use shiftplan_core::model::journal::DayMark;
use shiftplan_core::service::dto::{DayKind, DayResult, JournalDay, JournalMonthView, PlannerReport};
use shiftplan_core::usecase::month_grid::{weeks, WEEKDAY_LABELS};
use tabled::builder::Builder;
use tabled::settings::object::Rows;
use tabled::settings::{Color, Modify, Style};
use tabled::{Table, Tabled};

use crate::format::{format_money, format_money_compact, format_number};

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

pub fn month_title(month: MonthRef) -> String {
    format!("{} {}", MONTH_NAMES[month.month_index() as usize], month.year())
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct ExtraRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Weekday")]
    weekday: String,
    #[tabled(rename = "Extra (h)")]
    hours: String,
}

pub fn day_label(day: &DayResult) -> &'static str {
    match day.kind() {
        DayKind::ShiftWithExtra => "shift + extra",
        DayKind::ExtraOnly => "extra",
        DayKind::Shift => "shift",
        DayKind::Rest => "rest",
    }
}

fn plan_cell(day: &DayResult) -> String {
    let mut lines = vec![if day.is_today {
        format!("{} today", day.day_of_month)
    } else {
        day.day_of_month.to_string()
    }];
    lines.push(day_label(day).to_string());
    if day.extra_hours > 0.0 {
        lines.push(format!("+{} h", format_number(day.extra_hours)));
    }
    if day.earned_amount > 0.0 {
        lines.push(format!("+{}", format_money_compact(day.earned_amount)));
    }
    if day.is_today {
        lines.push(format!("= {}", format_money(day.cumulative_earned_amount)));
    }
    lines.join("\n")
}

fn grid_table<T: Clone>(first_weekday_index: u32, days: &[T], cell: impl Fn(&T) -> String) -> Table {
    let mut builder = Builder::default();
    builder.push_record(WEEKDAY_LABELS.iter().map(|label| label.to_string()));
    for week in weeks(first_weekday_index, days) {
        builder.push_record(
            week.iter()
                .map(|day| day.as_ref().map(&cell).unwrap_or_default()),
        );
    }
    let mut table = builder.build();
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table
}

fn summary_table(rows: Vec<SummaryRow>) -> Table {
    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    table
}

pub fn print_plan(report: &PlannerReport) {
    let plan = &report.plan;
    let aggregate = &plan.aggregate;

    println!("\n\x1b[1;36m{}\x1b[0m", month_title(plan.month));
    println!(
        "Schedule {} · {} h/shift · extra {} h · {}/h",
        report.pattern_label,
        format_number(report.hours_per_shift),
        format_number(aggregate.extra_hours_total),
        format_money(report.hour_rate),
    );
    println!("Today in {}: {}", report.time_zone, report.today.format("%Y-%m-%d (%a)"));

    println!("{}", grid_table(plan.first_weekday_index, &plan.days, plan_cell));

    println!(
        "{}",
        summary_table(vec![
            SummaryRow { metric: "Shifts", value: format_number(f64::from(aggregate.work_day_count)) },
            SummaryRow { metric: "Hours", value: format_number(aggregate.total_hours) },
            SummaryRow { metric: "Extra hours", value: format_number(aggregate.extra_hours_total) },
            SummaryRow { metric: "Days off", value: format_number(f64::from(aggregate.rest_day_count)) },
            SummaryRow { metric: "Month income", value: format_money(aggregate.total_income) },
            SummaryRow { metric: "Earned to date", value: format_money(aggregate.earned_to_date) },
        ])
    );
}

pub fn print_extra_shifts(extra: &ExtraHoursMap) {
    if extra.is_empty() {
        println!("No extra shifts recorded.");
        return;
    }

    let rows: Vec<ExtraRow> = extra
        .iter()
        .map(|(date, hours)| ExtraRow {
            date: format_date_key(date),
            weekday: date.format("%a").to_string(),
            hours: format_number(hours),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN));
    println!("{}", table);
}

fn journal_cell(day: &JournalDay) -> String {
    let mut lines = vec![if day.is_today {
        format!("{} today", day.day_of_month)
    } else {
        day.day_of_month.to_string()
    }];
    match day.mark {
        DayMark::Empty => {}
        DayMark::Regular(_) => lines.push(format!("{}×", day.entry.regular)),
        DayMark::ExtraOnly => lines.push(format!("+{} extra", day.entry.extra)),
        DayMark::Mixed => lines.push(format!("{}× +{}", day.entry.regular, day.entry.extra)),
    }
    if day.hours > 0.0 {
        lines.push(format!("{} h", format_number(day.hours)));
    }
    lines.join("\n")
}

pub fn print_journal(username: &str, view: &JournalMonthView) {
    println!("\n\x1b[1;36m{}\x1b[0m · {}", month_title(view.month), username);
    println!("{}", grid_table(view.first_weekday_index, &view.days, journal_cell));

    let summary = &view.summary;
    let all_time = &view.all_time;
    println!(
        "{}",
        summary_table(vec![
            SummaryRow { metric: "Regular shifts", value: summary.regular_count.to_string() },
            SummaryRow { metric: "Extra shifts", value: summary.extra_count.to_string() },
            SummaryRow { metric: "Days worked", value: summary.worked_days.to_string() },
            SummaryRow { metric: "Regular hours", value: format_number(summary.regular_hours) },
            SummaryRow { metric: "Extra hours", value: format_number(summary.extra_hours) },
            SummaryRow { metric: "Month hours", value: format_number(summary.total_hours) },
            SummaryRow {
                metric: "All time",
                value: format!(
                    "{} regular, {} extra, {} h",
                    all_time.regular_count,
                    all_time.extra_count,
                    format_number(all_time.total_hours)
                ),
            },
        ])
    );
    if let Some(updated_at) = &view.updated_at {
        println!("Last saved {}", saved_label(updated_at));
    }
}

/// Local time for RFC 3339 stamps; anything else is shown as stored.
fn saved_label(raw: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(raw) {
        Ok(stamp) => stamp.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}
