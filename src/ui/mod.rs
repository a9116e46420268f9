//! UI rendering components

pub mod chat;
pub mod diagram;
pub mod fatal;
pub mod footer;
pub mod header;
pub mod notes;
pub mod pickers;
pub mod settings;
pub mod topics;
pub mod widgets;

use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::Style,
    widgets::Block,
};

use crate::app::controller::Screen;
use crate::study::{Tab, View};
use crate::theme::Theme;
use diagram::DiagramCache;

/// Main draw function
pub fn draw(frame: &mut Frame, screen: &mut Screen, theme: &Theme, diagrams: &mut DiagramCache) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(theme.bg_primary)), area);

    let [header_area, body, footer_area] = Layout::vertical([
        Constraint::Length(header::HEIGHT),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(area);

    let session = screen.session;
    header::draw(frame, header_area, session, theme);

    match session.tab() {
        Tab::Study => match session.view() {
            View::ClassPicker => pickers::draw_classes(frame, body, &mut screen.ui.class_cursor, theme),
            View::SubjectPicker => pickers::draw_subjects(
                frame,
                body,
                session.selection().class,
                &mut screen.ui.subject_cursor,
                theme,
            ),
            View::TopicBrowser => topics::draw(frame, body, session, screen.ui, theme),
            View::NoteViewer => {
                notes::draw(frame, body, session, screen.ui, theme);
                if let Some(index) = screen.ui.diagram {
                    diagram::draw_overlay(
                        frame,
                        body,
                        &screen.ui.note_view.document,
                        index,
                        diagrams,
                        theme,
                    );
                }
            }
        },
        Tab::Chat => chat::draw(frame, body, screen.chat, screen.ui, theme),
        Tab::Settings => settings::draw(frame, body, screen, theme),
    }

    footer::draw(frame, footer_area, screen, theme);
}
