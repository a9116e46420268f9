//! Topic browser: search field and the filtered topic list

use std::ops::Range;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::widgets::draw_list;
use crate::app::state::{TopicRow, UiState, topic_rows};
use crate::study::{StudySession, TopicSource};
use crate::theme::Theme;

/// Split `text` into spans, styling the byte `ranges` as matches
pub fn highlight_matches(
    text: &str,
    ranges: &[Range<usize>],
    base: Style,
    matched: Style,
) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut pos = 0;
    for range in ranges {
        if range.start > pos {
            spans.push(Span::styled(text[pos..range.start].to_string(), base));
        }
        spans.push(Span::styled(text[range.clone()].to_string(), matched));
        pos = range.end;
    }
    if pos < text.len() {
        spans.push(Span::styled(text[pos..].to_string(), base));
    }
    spans
}

fn row_line(row: &TopicRow, failed: bool, theme: &Theme) -> Line<'static> {
    match row {
        TopicRow::Custom(query) => Line::from(vec![
            Span::styled("✎ Study Topic: ", Style::default().fg(theme.accent_secondary)),
            Span::styled(
                format!("\"{}\"", query.trim()),
                Style::default().fg(theme.fg_secondary).add_modifier(Modifier::BOLD),
            ),
        ]),
        TopicRow::Listed { topic, .. } if failed => Line::from(vec![
            Span::styled(topic.to_string(), Style::default().fg(theme.error)),
            Span::styled("  (Enter to retry)", Style::default().fg(theme.fg_muted)),
        ]),
        TopicRow::Listed { topic, matches } => Line::from(highlight_matches(
            topic,
            matches,
            Style::default().fg(theme.fg_primary),
            Style::default().fg(theme.search_match).add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )),
    }
}

fn draw_search(frame: &mut Frame, area: Rect, ui: &UiState, theme: &Theme) {
    let border = if ui.searching { theme.border_focused } else { theme.border };
    let block = Block::default()
        .title(" Search or type any topic ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let query = ui.topic_search.as_str();
    let line = if query.is_empty() && !ui.searching {
        Line::from(Span::styled("Press / to search", Style::default().fg(theme.fg_muted)))
    } else {
        Line::from(Span::styled(query.to_string(), Style::default().fg(theme.fg_primary)))
    };
    frame.render_widget(Paragraph::new(line), inner);

    if ui.searching {
        let x = inner.x + (ui.topic_search.cursor() as u16).min(inner.width.saturating_sub(1));
        frame.set_cursor_position(Position::new(x, inner.y));
    }
}

pub fn draw(frame: &mut Frame, area: Rect, session: &StudySession, ui: &mut UiState, theme: &Theme) {
    let [search_area, list_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(area);
    draw_search(frame, search_area, ui, theme);

    let subject = session.selection().subject.map(|s| s.name).unwrap_or("Topics");
    let list = session.topic_list();
    let title = match list.map(|l| l.source()) {
        Some(TopicSource::Fallback) => format!(" {} (syllabus unavailable) ", subject),
        _ => format!(" {} ", subject),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if ui.searching { theme.border } else { theme.border_focused }))
        .style(Style::default().bg(theme.bg_primary));
    let inner = block.inner(list_area);
    frame.render_widget(block, list_area);

    let query = ui.topic_search.as_str();
    let rows = topic_rows(list, query);
    let failed = list.is_some_and(|l| l.is_failure());
    let has_query = !query.trim().is_empty();
    let listed = rows.len() - usize::from(has_query);

    let mut lines: Vec<Line<'static>> = rows.iter().map(|r| row_line(r, failed, theme)).collect();
    let selectable = lines.len();

    let muted = Style::default().fg(theme.fg_muted);
    if session.topics_loading() {
        lines.push(Line::from(Span::styled("Loading syllabus topics…", muted)));
    } else if listed == 0 && !has_query {
        lines.push(Line::from(Span::styled("No topics found", muted)));
    } else if listed == 0 {
        lines.push(Line::from(Span::styled(
            "No listed topic matches. Press Enter to study your own topic.",
            muted,
        )));
    }

    if selectable == 0 {
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
        return;
    }

    let notes = lines.split_off(selectable);
    let [rows_area, notes_area] = Layout::vertical([
        Constraint::Length((selectable as u16).min(inner.height.saturating_sub(notes.len() as u16))),
        Constraint::Min(0),
    ])
    .areas(inner);
    draw_list(frame, rows_area, lines, &mut ui.topic_cursor, theme);
    if !notes.is_empty() {
        let notes_area = Rect { y: notes_area.y.saturating_add(1), ..notes_area };
        frame.render_widget(Paragraph::new(notes).wrap(Wrap { trim: true }), notes_area.intersection(inner));
    }
}
