//! Fatal configuration screen

use ratatui::{
    Frame,
    layout::Alignment,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::widgets::centered_rect;
use crate::theme::Theme;

pub fn draw(frame: &mut Frame, message: &str, theme: &Theme) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(theme.bg_primary)), area);

    let popup = centered_rect(70, 50, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .title(" SmartStudy cannot start ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.error))
        .style(Style::default().bg(theme.bg_secondary));

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Set GEMINI_API_KEY in your environment, or store a key with:",
            Style::default().fg(theme.fg_primary),
        )),
        Line::from(Span::styled(
            "smartstudy auth set <KEY>",
            Style::default().fg(theme.code_fg).bg(theme.code_bg),
        )),
        Line::from(""),
        Line::from(Span::styled("Press q to quit", Style::default().fg(theme.fg_muted))),
    ];

    let body = Paragraph::new(lines).block(block).alignment(Alignment::Center).wrap(Wrap { trim: true });
    frame.render_widget(body, popup);
}
