//! Class and subject pickers

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
};

use super::widgets::draw_list;
use crate::app::state::ListCursor;
use crate::catalog::{ClassLevel, SUBJECTS};
use crate::theme::Theme;

fn class_name(class: ClassLevel) -> &'static str {
    match class {
        ClassLevel::S1 => "Senior One",
        ClassLevel::S2 => "Senior Two",
        ClassLevel::S3 => "Senior Three",
        ClassLevel::S4 => "Senior Four",
    }
}

fn framed(frame: &mut Frame, area: Rect, title: &str, prompt: &str, theme: &Theme) -> Rect {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(theme.bg_primary));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [prompt_area, _, list_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Min(1)])
            .areas(inner);
    frame.render_widget(
        Paragraph::new(prompt.to_string()).style(Style::default().fg(theme.fg_muted)),
        prompt_area,
    );
    list_area
}

pub fn draw_classes(frame: &mut Frame, area: Rect, cursor: &mut ListCursor, theme: &Theme) {
    let list_area = framed(frame, area, "Choose your class", "Which class are you in?", theme);
    let rows = ClassLevel::ALL
        .iter()
        .map(|class| {
            Line::from(vec![
                Span::styled(
                    format!("{:<4}", class.label()),
                    Style::default().fg(theme.accent_primary).add_modifier(Modifier::BOLD),
                ),
                Span::styled(class_name(*class), Style::default().fg(theme.fg_primary)),
            ])
        })
        .collect();
    draw_list(frame, list_area, rows, cursor, theme);
}

pub fn draw_subjects(
    frame: &mut Frame,
    area: Rect,
    class: Option<ClassLevel>,
    cursor: &mut ListCursor,
    theme: &Theme,
) {
    let prompt = match class {
        Some(class) => format!("{} subjects. Pick one to see its syllabus topics.", class_name(class)),
        None => "Pick a subject".to_string(),
    };
    let list_area = framed(frame, area, "Subjects", &prompt, theme);
    let rows = SUBJECTS
        .iter()
        .map(|subject| {
            Line::from(vec![
                Span::styled(format!("{}  ", subject.glyph), Style::default().fg(theme.accent_secondary)),
                Span::styled(subject.name, Style::default().fg(theme.fg_primary)),
            ])
        })
        .collect();
    draw_list(frame, list_area, rows, cursor, theme);
}
