pub mod charting;
pub mod screen;
pub mod stats;

use hifz::guided::{GuidedSession, Stage};
use hifz::masking::{self, HidePolicy};
use hifz::record::FocusMode;
use hifz::session::DrillSession;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Widget, Wrap},
};

use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn hint() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::ITALIC)
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Guided => {
                if let Some(guided) = &self.guided {
                    render_guided(guided, self.focus, self.status.as_deref(), area, buf);
                }
            }
            AppState::Drill => {
                if let Some(drill) = &self.drill {
                    render_drill(
                        drill,
                        self.revealed,
                        self.guided.is_some(),
                        self.status.as_deref(),
                        area,
                        buf,
                    );
                }
            }
            // drawn by the stats screen
            AppState::Stats => {}
        }
    }
}

/// Verse line for guided display: the transliteration when it is the focus
/// and available.
fn guided_line(guided: &GuidedSession, offset: usize, focus: FocusMode) -> String {
    let verse = guided.verses()[offset].as_str();
    match (focus, guided.transliteration(offset)) {
        (FocusMode::Transliteration, Some(t)) if !t.is_empty() => t.to_string(),
        _ => verse.to_string(),
    }
}

fn render_guided(
    guided: &GuidedSession,
    focus: FocusMode,
    status: Option<&str>,
    area: Rect,
    buf: &mut Buffer,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // title and step
            Constraint::Length(1), // padding
            Constraint::Length(1), // instruction
            Constraint::Length(1), // sub-instruction
            Constraint::Length(1), // padding
            Constraint::Min(3),    // verses
            Constraint::Length(1), // status
            Constraint::Length(1), // keys
        ])
        .split(area);

    let title = Line::from(vec![
        Span::styled(
            format!("{} · {}", guided.document_name, guided.range),
            bold(),
        ),
        Span::raw("   "),
        Span::styled(guided.label(), Style::default().fg(Color::Magenta)),
    ]);
    Paragraph::new(title).render(chunks[0], buf);

    Paragraph::new(Span::styled(guided.instruction(), bold()))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);
    Paragraph::new(Span::styled(guided.sub_instruction(), hint()))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[3], buf);

    let visible = match guided.stage() {
        Stage::FullRead | Stage::Complete => 0..guided.total(),
        _ => guided.chunk_bounds(),
    };
    let active = guided.active_verse_offset();
    let hide = guided.hide_policy();
    let mut lines = Vec::new();
    for offset in visible {
        let number = guided.range.verse_number(offset);
        let style = match active {
            Some(a) if a == offset => bold().fg(Color::Green),
            Some(_) => dim(),
            None => bold(),
        };
        let text = masking::render(&guided_line(guided, offset, focus), hide, false);
        lines.push(Line::from(vec![
            Span::styled(format!("{number:>3}. "), dim()),
            Span::styled(text, style),
        ]));
        if hide == HidePolicy::None {
            if let Some(translation) = guided.translation(offset) {
                lines.push(Line::from(Span::styled(
                    format!("     {translation}"),
                    dim().add_modifier(Modifier::ITALIC),
                )));
            }
        }
    }
    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .render(chunks[5], buf);

    if let Some(status) = status {
        Paragraph::new(Span::styled(status, Style::default().fg(Color::Yellow)))
            .alignment(Alignment::Center)
            .render(chunks[6], buf);
    }

    let mut keys = format!("(space) {}", guided.button_label());
    if guided.stage().is_recall() {
        keys.push_str("   (d) open recall drill");
    }
    keys.push_str("   (f) focus   (r) restart   (s) stats   (esc) quit");
    Paragraph::new(Span::styled(keys, Style::default().add_modifier(Modifier::ITALIC)))
        .alignment(Alignment::Center)
        .render(chunks[7], buf);
}

fn render_drill(
    drill: &DrillSession,
    revealed: bool,
    from_guided: bool,
    status: Option<&str>,
    area: Rect,
    buf: &mut Buffer,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(1), // progress gauge
            Constraint::Length(1), // padding
            Constraint::Min(1),    // context
            Constraint::Length(3), // focus line
            Constraint::Length(2), // translation
            Constraint::Length(1), // status
            Constraint::Length(1), // keys
        ])
        .split(area);

    let title = format!(
        "{} · {} · {} · hide {} · focus {}",
        drill.document_name, drill.range, drill.mode, drill.hide, drill.focus
    );
    Paragraph::new(Span::styled(title, bold())).render(chunks[0], buf);

    let (position, total) = drill.progress();
    Gauge::default()
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(drill.progress_ratio().clamp(0.0, 1.0))
        .label(format!("{position}/{total} · score {}", drill.score()))
        .render(chunks[1], buf);

    if drill.is_finished() {
        let pct = hifz::record::percent_of(drill.score() as u32, total as u32);
        Paragraph::new(vec![
            Line::from(Span::styled("Session complete", bold().fg(Color::Green))),
            Line::from(Span::styled(
                format!("{}/{} remembered ({pct}%)", drill.score(), total),
                bold(),
            )),
        ])
        .alignment(Alignment::Center)
        .render(chunks[4], buf);
    } else {
        // only the verses nearest the current one fit comfortably
        let context = drill.context_lines();
        let shown = &context[context.len().saturating_sub(chunks[3].height as usize)..];
        let first_number = drill.current_number() - shown.len();
        let lines: Vec<Line> = shown
            .iter()
            .enumerate()
            .map(|(i, text)| {
                Line::from(Span::styled(
                    format!("{:>3}. {}", first_number + i, text),
                    dim(),
                ))
            })
            .collect();
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(chunks[3], buf);

        let focus_line = Line::from(vec![
            Span::styled(format!("{:>3}. ", drill.current_number()), dim()),
            Span::styled(
                masking::render(drill.focus_text(), drill.hide, revealed),
                bold().fg(if revealed { Color::Green } else { Color::White }),
            ),
        ]);
        Paragraph::new(focus_line)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[4], buf);

        if revealed {
            if let Some(translation) = drill.current_translation() {
                Paragraph::new(Span::styled(
                    translation,
                    dim().add_modifier(Modifier::ITALIC),
                ))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(chunks[5], buf);
            }
        }
    }

    if let Some(status) = status {
        Paragraph::new(Span::styled(status, Style::default().fg(Color::Yellow)))
            .alignment(Alignment::Center)
            .render(chunks[6], buf);
    }

    let back = if from_guided { "   (b) back to guided" } else { "" };
    let keys = if drill.is_finished() {
        format!("(r) again   (s) stats{back}   (esc) quit")
    } else if revealed {
        format!("(→/space) remembered   (←) forgot   (r) restart   (f) focus{back}")
    } else {
        format!("(space) reveal   (r) restart   (f) focus{back}   (esc) quit")
    };
    Paragraph::new(Span::styled(keys, Style::default().add_modifier(Modifier::ITALIC)))
        .alignment(Alignment::Center)
        .render(chunks[7], buf);
}
