use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};
use shiftplan_core::repository::PlannerRepository;
use shiftplan_core::service::dto::{DayKind, DayResult, PlannerReport};
use shiftplan_core::time::Clock;
use shiftplan_core::usecase::month_grid::{weeks, WEEKDAY_LABELS};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::calendar::{day_label, month_title};
use crate::format::{format_money, format_money_compact, format_number};
use crate::tui::app::App;

const CELL_HEIGHT: u16 = 4;

pub fn draw<R: PlannerRepository, C: Clock>(f: &mut Frame, app: &App<R, C>) {
    let size = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(0)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Footer/Help
        ])
        .split(size);

    let title = match &app.report {
        Some(report) => format!(
            "{} · {} · {}",
            month_title(report.plan.month),
            report.pattern_label,
            report.time_zone
        ),
        None => "SHIFTPLAN".to_string(),
    };
    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
    f.render_widget(header, main_chunks[0]);

    match &app.report {
        Some(report) => {
            let content_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
                .split(main_chunks[1]);
            draw_calendar(f, report, content_chunks[0]);
            draw_summary(f, app, report, content_chunks[1]);
        }
        None => {
            let message = app.error.clone().unwrap_or_else(|| "No data available".to_string());
            let body = Paragraph::new(message)
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
            f.render_widget(body, main_chunks[1]);
        }
    }

    let footer = Paragraph::new("h/←: Prev | l/→: Next | t: Today | z: System zone | r: Reload | q: Quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(footer, main_chunks[2]);
}

fn day_style(day: &DayResult) -> Style {
    let base = match day.kind() {
        DayKind::Shift => Style::default().fg(Color::Green),
        DayKind::ShiftWithExtra => Style::default().fg(Color::LightGreen),
        DayKind::ExtraOnly => Style::default().fg(Color::Yellow),
        DayKind::Rest => Style::default().fg(Color::DarkGray),
    };
    if day.is_today {
        base.add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else if day.is_future {
        base.add_modifier(Modifier::DIM)
    } else {
        base
    }
}

/// Cuts `text` to at most `width` terminal columns.
pub fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width.saturating_sub(1) {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

fn day_cell(day: &DayResult, width: usize) -> Cell<'static> {
    let mut lines = vec![Line::from(Span::styled(
        day.day_of_month.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    lines.push(Line::from(fit(day_label(day), width)));
    if day.extra_hours > 0.0 {
        lines.push(Line::from(fit(&format!("+{} h", format_number(day.extra_hours)), width)));
    }
    if day.earned_amount > 0.0 {
        lines.push(Line::from(fit(&format!("+{}", format_money_compact(day.earned_amount)), width)));
    }
    Cell::from(Text::from(lines)).style(day_style(day))
}

fn draw_calendar(f: &mut Frame, report: &PlannerReport, area: Rect) {
    let column_width = (area.width.saturating_sub(2) / 7).max(1);
    let text_width = usize::from(column_width.saturating_sub(1));

    let rows: Vec<Row> = weeks(report.plan.first_weekday_index, &report.plan.days)
        .into_iter()
        .map(|week| {
            let cells: Vec<Cell> = week
                .iter()
                .map(|day| match day {
                    Some(day) => day_cell(day, text_width),
                    None => Cell::from(""),
                })
                .collect();
            Row::new(cells).height(CELL_HEIGHT)
        })
        .collect();

    let header = Row::new(WEEKDAY_LABELS.to_vec()).style(Style::default().fg(Color::Yellow));
    let table = Table::new(rows, [Constraint::Length(column_width); 7])
        .header(header)
        .block(
            Block::default()
                .title(" Calendar ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );
    f.render_widget(table, area);
}

fn summary_line(label: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<15}", label), Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ])
}

fn draw_summary<R: PlannerRepository, C: Clock>(f: &mut Frame, app: &App<R, C>, report: &PlannerReport, area: Rect) {
    let aggregate = &report.plan.aggregate;
    let mut text = vec![
        summary_line("Shifts", format_number(f64::from(aggregate.work_day_count)), Color::Green),
        summary_line("Hours", format_number(aggregate.total_hours), Color::White),
        summary_line("Extra hours", format_number(aggregate.extra_hours_total), Color::Yellow),
        summary_line("Days off", format_number(f64::from(aggregate.rest_day_count)), Color::White),
        Line::from(""),
        summary_line("Month income", format_money(aggregate.total_income), Color::Cyan),
        summary_line("Earned so far", format_money(aggregate.earned_to_date), Color::Cyan),
        Line::from(""),
        summary_line("Per shift", format!("{} h", format_number(report.hours_per_shift)), Color::White),
        summary_line("Rate", format!("{}/h", format_money(report.hour_rate)), Color::White),
        summary_line("Today", report.today.format("%Y-%m-%d").to_string(), Color::White),
    ];

    if let Some(status) = &app.status {
        text.push(Line::from(""));
        text.push(Line::from(Span::styled(status.clone(), Style::default().fg(Color::Green))));
    }
    if let Some(error) = &app.error {
        text.push(Line::from(""));
        text.push(Line::from(Span::styled(error.clone(), Style::default().fg(Color::Red))));
    }

    let summary = Paragraph::new(text)
        .block(
            Block::default()
                .title(" Summary ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(summary, area);
}
