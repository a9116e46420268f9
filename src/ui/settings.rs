//! Settings tab

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::controller::Screen;
use crate::theme::Theme;

fn row(label: &str, value: String, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<16}", label), Style::default().fg(theme.fg_muted)),
        Span::styled(value, Style::default().fg(theme.fg_primary)),
    ])
}

pub fn draw(frame: &mut Frame, area: Rect, screen: &Screen, theme: &Theme) {
    let block = Block::default()
        .title(" Settings ")
        .title_bottom(Line::from(" [m] change model ").centered())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .padding(Padding::uniform(1))
        .style(Style::default().bg(theme.bg_primary));

    let config = screen.config;
    let mut lines = vec![
        Line::from(Span::styled(
            "Generation",
            Style::default().fg(theme.heading).add_modifier(Modifier::BOLD),
        )),
        row(
            "Model",
            format!("{} ({})", config.model.display_name(), config.model.model_id()),
            theme,
        ),
    ];
    if let Some(chat) = screen.chat.filter(|c| c.model() != config.model) {
        lines.push(row(
            "Tutor chat",
            format!("{} (chosen when the chat started)", chat.model().display_name()),
            theme,
        ));
    }
    lines.push(row("Request timeout", format!("{}s", config.request_timeout_secs), theme));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(
        "Account",
        Style::default().fg(theme.heading).add_modifier(Modifier::BOLD),
    )));
    lines.push(row(
        "API key",
        screen.credential.unwrap_or("not configured").to_string(),
        theme,
    ));
    lines.push(Line::from(""));

    lines.push(Line::from(Span::styled(
        "Application",
        Style::default().fg(theme.heading).add_modifier(Modifier::BOLD),
    )));
    lines.push(row("Vim keys", if config.vim_keys { "on" } else { "off" }.to_string(), theme));
    lines.push(row(
        "Config file",
        screen.config_path.map(|p| p.display().to_string()).unwrap_or_else(|| "(not saved)".into()),
        theme,
    ));
    lines.push(row("Version", env!("CARGO_PKG_VERSION").to_string(), theme));

    frame.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}
