//! Product header with breadcrumb and tab bar

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
};

use crate::study::{Selection, StudySession, Tab};
use crate::theme::Theme;

pub const HEIGHT: u16 = 3;

/// "S2 › Mathematics › Sets" for the choices made so far
pub fn breadcrumb(selection: &Selection) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(class) = selection.class {
        parts.push(class.label());
    }
    if let Some(subject) = selection.subject {
        parts.push(subject.name);
    }
    if let Some(topic) = &selection.topic {
        parts.push(topic);
    }
    parts.join(" › ")
}

pub fn draw(frame: &mut Frame, area: Rect, session: &StudySession, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.bg_secondary));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut title = vec![
        Span::styled(
            " SmartStudy ",
            Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
        ),
        Span::styled("Uganda NCDC Lower Secondary", Style::default().fg(theme.fg_muted)),
    ];
    let crumb = breadcrumb(session.selection());
    if !crumb.is_empty() {
        title.push(Span::styled("  ·  ", Style::default().fg(theme.border)));
        title.push(Span::styled(crumb, Style::default().fg(theme.fg_secondary)));
    }

    let title_area = Rect { height: 1, ..inner };
    frame.render_widget(Paragraph::new(Line::from(title)), title_area);

    if !session.tabs_visible() || inner.height < 2 {
        return;
    }
    let tabs_area = Rect { y: inner.y + 1, height: 1, ..inner };
    let selected = Tab::ALL.iter().position(|t| *t == session.tab()).unwrap_or(0);
    let tabs = Tabs::new(Tab::ALL.iter().enumerate().map(|(i, t)| format!("{} {}", i + 1, t.title())))
        .select(selected)
        .style(Style::default().fg(theme.fg_muted))
        .highlight_style(Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD))
        .divider(Span::styled("│", Style::default().fg(theme.border)));
    frame.render_widget(tabs, tabs_area);
}
