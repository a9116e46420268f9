//! Tutor chat: transcript and message input

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use textwrap::{Options, wrap};

use super::notes::render_document;
use super::widgets::draw_scrollbar;
use crate::app::state::{TranscriptView, UiState};
use crate::study::{ChatEntry, Speaker, TutorChat};
use crate::theme::Theme;

/// Transcript lines for every entry
pub fn transcript_lines(
    chat: &TutorChat,
    view: &mut TranscriptView,
    theme: &Theme,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (index, entry) in chat.transcript().iter().enumerate() {
        entry_lines(&mut lines, view, index, entry, theme, width);
    }
    if chat.is_typing() {
        lines.push(Line::from(Span::styled(
            "  Tutor is typing…",
            Style::default().fg(theme.fg_muted).add_modifier(Modifier::ITALIC),
        )));
    }
    lines
}

fn entry_lines(
    lines: &mut Vec<Line<'static>>,
    view: &mut TranscriptView,
    index: usize,
    entry: &ChatEntry,
    theme: &Theme,
    width: usize,
) {
    if entry.pending && entry.text.is_empty() {
        return;
    }
    match entry.speaker {
        Speaker::Student => {
            lines.push(Line::from(Span::styled(
                "You",
                Style::default().fg(theme.accent_secondary).add_modifier(Modifier::BOLD),
            )));
            let options = Options::new(width.saturating_sub(2).max(1))
                .initial_indent("  ")
                .subsequent_indent("  ");
            for line in wrap(&entry.text, options) {
                lines.push(Line::from(Span::styled(
                    line.into_owned(),
                    Style::default().fg(theme.fg_secondary),
                )));
            }
            lines.push(Line::from(""));
        }
        Speaker::Tutor => {
            lines.push(Line::from(Span::styled(
                "Tutor",
                Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
            )));
            lines.extend(render_document(view.document(index, entry), theme, width));
            if lines.last().is_some_and(|l| l.width() > 0) {
                lines.push(Line::from(""));
            }
        }
    }
}

fn draw_input(frame: &mut Frame, area: Rect, chat: Option<&TutorChat>, ui: &UiState, theme: &Theme) {
    let waiting = chat.is_some_and(|c| c.in_flight().is_some());
    let block = Block::default()
        .title(if waiting { " Waiting for the tutor… " } else { " Ask the tutor " })
        .title_bottom(Line::from(" [Enter] send  [Esc] clear  [PgUp/PgDn] scroll ").centered())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if waiting { theme.border } else { theme.border_focused }));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let input = ui.chat_input.as_str();
    let line = if input.is_empty() {
        Line::from(Span::styled(
            "e.g. Explain photosynthesis with an example",
            Style::default().fg(theme.fg_muted),
        ))
    } else {
        Line::from(Span::styled(input.to_string(), Style::default().fg(theme.fg_primary)))
    };

    // Keep the cursor visible on long input
    let cursor = ui.chat_input.cursor() as u16;
    let width = inner.width.max(1);
    let shift = cursor.saturating_sub(width - 1);
    frame.render_widget(Paragraph::new(line).scroll((0, shift)), inner);
    frame.set_cursor_position(Position::new(inner.x + cursor - shift, inner.y));
}

pub fn draw(frame: &mut Frame, area: Rect, chat: Option<&TutorChat>, ui: &mut UiState, theme: &Theme) {
    let [transcript_area, input_area] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).areas(area);

    let model = chat.map(|c| c.model().display_name()).unwrap_or("");
    let block = Block::default()
        .title(format!(" AI Tutor · {} ", model))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.bg_primary));
    let inner = block.inner(transcript_area);
    frame.render_widget(block, transcript_area);

    if let Some(chat) = chat {
        let content_area = Rect { width: inner.width.saturating_sub(1), ..inner };
        let lines = transcript_lines(chat, &mut ui.transcript, theme, content_area.width as usize);
        let scroll = &mut ui.chat_scroll;
        scroll.update_size(lines.len(), inner.height as usize);

        let visible: Vec<Line> =
            lines.iter().skip(scroll.offset).take(inner.height as usize).cloned().collect();
        frame.render_widget(Paragraph::new(visible), content_area);
        draw_scrollbar(
            frame,
            inner.x + inner.width.saturating_sub(1),
            inner.y,
            inner.height,
            scroll.offset,
            lines.len(),
            theme,
        );
    }

    draw_input(frame, input_area, chat, ui, theme);
}
