use chrono::{DateTime, Duration, Local};
use hifz::progress::{fmt_percent, last_practised_label, ProgressRecord};
use itertools::Itertools;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table},
    Frame,
};

use crate::{
    ui::charting::{compute_chart_params, format_label, timeline_coords},
    App,
};

/// Weekday initials for the seven days ending `now`, oldest first.
fn week_labels(now: DateTime<Local>) -> [String; 7] {
    std::array::from_fn(|i| {
        let day = now - Duration::days(6 - i as i64);
        day.format("%a").to_string()
    })
}

fn dots(counts: &[usize; 7]) -> String {
    counts
        .iter()
        .map(|&c| if c > 0 { "●" } else { "○" })
        .join("   ")
}

/// Text version of the dashboard for `hifz stats --plain`.
pub fn summary_lines(record: &ProgressRecord, now: DateTime<Local>) -> Vec<String> {
    if record.is_empty() {
        return vec!["No sessions yet. Finish a recall drill to start tracking.".to_string()];
    }

    let mut lines = vec![
        format!("Sessions: {}", record.total_sessions),
        format!("Streak: {} days", record.streak_days),
        format!("This week: {}", record.sessions_this_week),
        format!("Average recall: {}", fmt_percent(record.average)),
        format!(
            "Last 7 days: {}  ({})",
            dots(&record.last_7_days),
            week_labels(now).join(" ")
        ),
    ];

    let (primary, translit, unknown) = record.focus.percents();
    lines.push(format!(
        "Focus: primary script {primary}% · transliteration {translit}% · unrecorded {unknown}%"
    ));

    if !record.documents.is_empty() {
        lines.push(String::new());
        lines.push("Documents:".to_string());
        for doc in &record.documents {
            lines.push(format!(
                "{:>4}  {:<16} {:>5}  {}",
                doc.number,
                doc.name,
                fmt_percent(doc.last_score),
                last_practised_label(doc.last_practiced_at, now)
            ));
        }
    }

    if !record.recent.is_empty() {
        lines.push(String::new());
        lines.push("Recent:".to_string());
        for s in &record.recent {
            lines.push(format!(
                "  {} {} {}  {}/{} ({}%)  {}",
                s.document_name,
                s.range,
                s.mode,
                s.correct_count,
                s.total_count,
                s.percent,
                last_practised_label(Some(s.completed_at), now)
            ));
        }
    }
    lines
}

fn card<'a>(title: &'a str, value: String) -> Paragraph<'a> {
    Paragraph::new(Span::styled(
        value,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title(title))
}

/// Render the progress dashboard
pub fn render_stats(app: &mut App, f: &mut Frame) {
    let now = Local::now();
    let record = &app.progress;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // cards
            Constraint::Length(4), // last 7 days
            Constraint::Min(6),    // documents and timeline
            Constraint::Length(1), // focus breakdown
            Constraint::Length(2), // instructions
        ])
        .split(f.area());

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(chunks[0]);
    f.render_widget(card("Sessions", record.total_sessions.to_string()), cards[0]);
    f.render_widget(card("Streak", format!("{} days", record.streak_days)), cards[1]);
    f.render_widget(card("This week", record.sessions_this_week.to_string()), cards[2]);
    f.render_widget(
        card(
            "Average recall",
            format!(
                "{} (last {})",
                fmt_percent(record.average),
                app.config.average_window
            ),
        ),
        cards[3],
    );

    let week = Paragraph::new(vec![
        Line::from(Span::styled(
            dots(&record.last_7_days),
            Style::default().fg(Color::Green),
        )),
        Line::from(Span::styled(
            week_labels(now).iter().map(|l| format!("{l:<3}")).join(" "),
            Style::default().add_modifier(Modifier::DIM),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title("Last 7 days"));
    f.render_widget(week, chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);

    if record.documents.is_empty() {
        let no_data = Paragraph::new("No sessions yet. Finish a recall drill to start tracking.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL).title("Documents"));
        f.render_widget(no_data, body[0]);
    } else {
        let header = Row::new(vec![
            Cell::from("#"),
            Cell::from("Document"),
            Cell::from("Last"),
            Cell::from("Practised"),
        ])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
        let rows: Vec<Row> = record
            .documents
            .iter()
            .map(|doc| {
                Row::new(vec![
                    Cell::from(doc.number.to_string()),
                    Cell::from(doc.name.clone()),
                    Cell::from(fmt_percent(doc.last_score)),
                    Cell::from(last_practised_label(doc.last_practiced_at, now)),
                ])
            })
            .collect();
        let widths = [
            Constraint::Length(4),
            Constraint::Min(12),
            Constraint::Length(6),
            Constraint::Length(14),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title("Documents"))
            .column_spacing(2);
        f.render_widget(table, body[0]);
    }

    let coords = timeline_coords(&record.timeline);
    let (x_max, y_max) = compute_chart_params(&coords);
    let first_day = record
        .timeline
        .first()
        .map(|p| p.day.format("%b %-d").to_string())
        .unwrap_or_default();
    let last_day = record
        .timeline
        .last()
        .map(|p| p.day.format("%b %-d").to_string())
        .unwrap_or_default();
    let datasets = vec![Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Magenta))
        .data(&coords)];
    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title("Daily recall"))
        .x_axis(
            Axis::default()
                .bounds([0.0, x_max])
                .labels(vec![Span::raw(first_day), Span::raw(last_day)]),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, y_max])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format_label(y_max / 2.0)),
                    Span::raw(format_label(y_max)),
                ]),
        );
    f.render_widget(chart, body[1]);

    let (primary, translit, unknown) = record.focus.percents();
    let focus = Paragraph::new(format!(
        "Focus: primary script {primary}% · transliteration {translit}% · unrecorded {unknown}%"
    ))
    .alignment(Alignment::Center)
    .style(Style::default().add_modifier(Modifier::DIM));
    f.render_widget(focus, chunks[3]);

    let back = if app.guided.is_some() {
        "(b/backspace) back  "
    } else {
        ""
    };
    let instructions = Paragraph::new(format!("{back}(q/esc) quit"))
        .alignment(Alignment::Center)
        .style(Style::default().add_modifier(Modifier::ITALIC));
    f.render_widget(instructions, chunks[4]);
}
