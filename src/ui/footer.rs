//! Footer: status message or key hints

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::controller::Screen;
use crate::study::{Tab, View};
use crate::theme::Theme;

/// Key hints for the current screen
pub fn hints(screen: &Screen) -> &'static str {
    if screen.ui.diagram.is_some() {
        return "d/j next · k previous · Esc close";
    }
    match (screen.session.tab(), screen.session.view()) {
        (Tab::Study, View::ClassPicker) => "j/k move · Enter choose · q quit",
        (Tab::Study, View::SubjectPicker) => "j/k move · Enter choose · Esc back · Tab switch tabs",
        (Tab::Study, View::TopicBrowser) if screen.ui.searching => {
            "type to filter · Enter study · Esc stop searching"
        }
        (Tab::Study, View::TopicBrowser) => "/ search · Enter study · Esc back · Ctrl-g home",
        (Tab::Study, View::NoteViewer) => "j/k scroll · c copy · d diagrams · Esc back · Ctrl-g home",
        (Tab::Chat, _) => "Enter send · Tab switch tabs · Ctrl-c quit",
        (Tab::Settings, _) => "m change model · Tab switch tabs · q quit",
    }
}

pub fn draw(frame: &mut Frame, area: Rect, screen: &Screen, theme: &Theme) {
    let status = &screen.ui.status;
    let line = match &status.message {
        Some(message) => {
            let color = if status.is_error { theme.error } else { theme.success };
            Line::from(Span::styled(format!(" {}", message), Style::default().fg(color)))
        }
        None => Line::from(Span::styled(format!(" {}", hints(screen)), Style::default().fg(theme.fg_muted))),
    };
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(theme.bg_secondary)), area);
}
