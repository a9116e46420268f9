//! Note viewer: renders a parsed note document to styled lines

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::widgets::{draw_scrollbar, wrap_spans};
use crate::app::state::UiState;
use crate::study::render::{InlineStyle, RichText};
use crate::study::{BufferPhase, NoteBlock, NoteDocument, StudySession};
use crate::syntax;
use crate::theme::Theme;

/// Draw the notes for the current topic
pub fn draw(frame: &mut Frame, area: Rect, session: &StudySession, ui: &mut UiState, theme: &Theme) {
    let topic = session.selection().topic.as_deref().unwrap_or("Notes");
    let buffer = session.notes();

    let status = match buffer.map(|b| b.phase()) {
        Some(BufferPhase::Streaming) => " · writing…",
        Some(BufferPhase::Failed) => " · incomplete",
        _ => "",
    };
    let diagrams = ui.note_view.document.diagrams.len();
    let hints = if diagrams > 0 {
        format!(" [c] copy  [d] diagrams ({})  [Esc] back ", diagrams)
    } else {
        " [c] copy  [Esc] back ".to_string()
    };

    let block = Block::default()
        .title(format!(" {}{} ", topic, status))
        .title_bottom(Line::from(hints).centered())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_primary));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if buffer.is_some_and(|b| b.is_loading()) {
        let waiting = Paragraph::new(Line::from(Span::styled(
            "Preparing your notes…",
            Style::default().fg(theme.fg_muted).add_modifier(Modifier::ITALIC),
        )));
        frame.render_widget(waiting, inner);
        return;
    }

    // Reserve 1 column for scrollbar
    let content_area = Rect { width: inner.width.saturating_sub(1), ..inner };
    let scrollbar_x = inner.x + inner.width.saturating_sub(1);

    let lines = render_document(&ui.note_view.document, theme, content_area.width as usize);
    let scroll = &mut ui.note_scroll;
    scroll.update_size(lines.len(), inner.height as usize);

    let visible: Vec<Line> =
        lines.iter().skip(scroll.offset).take(inner.height as usize).cloned().collect();
    frame.render_widget(Paragraph::new(visible), content_area);
    draw_scrollbar(frame, scrollbar_x, inner.y, inner.height, scroll.offset, lines.len(), theme);
}

/// Render document blocks to styled lines
pub fn render_document(document: &NoteDocument, theme: &Theme, width: usize) -> Vec<Line<'static>> {
    let mut lines: Vec<Line<'static>> = Vec::new();

    for block in &document.blocks {
        match block {
            NoteBlock::Heading { level, text } => render_heading(&mut lines, *level, text, theme),
            NoteBlock::Paragraph(text) => {
                lines.extend(wrap_spans(rich_spans(text, theme), width.saturating_sub(1)));
                lines.push(Line::from(""));
            }
            NoteBlock::BulletList(items) => {
                let bullets = items.iter().map(|_| "  • ".to_string());
                render_list(&mut lines, items, bullets, theme, width);
            }
            NoteBlock::OrderedList { start, items } => {
                let numbers = (*start..).map(|n| format!("  {}. ", n));
                render_list(&mut lines, items, numbers, theme, width);
            }
            NoteBlock::Code { language, code } => {
                render_code_block(&mut lines, language.as_deref(), code, theme);
            }
            NoteBlock::Quote(text) => render_quote(&mut lines, text, theme, width),
            NoteBlock::Rule => {
                let rule = "─".repeat(width.saturating_sub(4).min(32));
                lines.push(Line::from(Span::styled(rule, Style::default().fg(theme.border))));
                lines.push(Line::from(""));
            }
            NoteBlock::Diagram(index) => {
                lines.push(Line::from(vec![
                    Span::styled("  ▣ ", Style::default().fg(theme.accent_primary)),
                    Span::styled(
                        format!("Diagram {}", index + 1),
                        Style::default().fg(theme.fg_secondary).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled("  press d to view", Style::default().fg(theme.fg_muted)),
                ]));
                lines.push(Line::from(""));
            }
            NoteBlock::PendingDiagram => {
                lines.push(Line::from(Span::styled(
                    "  ◌ drawing diagram…",
                    Style::default().fg(theme.fg_muted).add_modifier(Modifier::ITALIC),
                )));
            }
        }
    }

    lines
}

fn run_style(style: InlineStyle, base: Style, theme: &Theme) -> Style {
    match style {
        InlineStyle::Plain => base,
        InlineStyle::Strong => base.add_modifier(Modifier::BOLD),
        InlineStyle::Emphasis => base.add_modifier(Modifier::ITALIC),
        InlineStyle::StrongEmphasis => base.add_modifier(Modifier::BOLD | Modifier::ITALIC),
        InlineStyle::Code => Style::default().fg(theme.code_fg).bg(theme.code_bg),
    }
}

fn styled_runs(text: &RichText, base: Style, theme: &Theme) -> Vec<Span<'static>> {
    text.iter().map(|run| Span::styled(run.text.clone(), run_style(run.style, base, theme))).collect()
}

fn rich_spans(text: &RichText, theme: &Theme) -> Vec<Span<'static>> {
    styled_runs(text, Style::default().fg(theme.fg_primary), theme)
}

fn render_heading(lines: &mut Vec<Line<'static>>, level: u8, text: &RichText, theme: &Theme) {
    let (base, prefix) = match level {
        1 => (
            Style::default().fg(theme.heading).add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            "",
        ),
        2 => (Style::default().fg(theme.heading).add_modifier(Modifier::BOLD), ""),
        3 => (Style::default().fg(theme.accent_secondary).add_modifier(Modifier::BOLD), "  "),
        _ => (Style::default().fg(theme.fg_secondary).add_modifier(Modifier::BOLD), "    "),
    };

    let mut spans = vec![Span::styled(prefix, base)];
    spans.extend(styled_runs(text, base, theme));

    if !lines.is_empty() {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(spans));
    if level <= 2 {
        lines.push(Line::from(""));
    }
}

fn render_list(
    lines: &mut Vec<Line<'static>>,
    items: &[RichText],
    markers: impl Iterator<Item = String>,
    theme: &Theme,
    width: usize,
) {
    for (item, marker) in items.iter().zip(markers) {
        let indent = " ".repeat(marker.chars().count());
        let wrapped = wrap_spans(rich_spans(item, theme), width.saturating_sub(marker.len() + 1));

        for (i, line) in wrapped.into_iter().enumerate() {
            let prefix = if i == 0 {
                Span::styled(marker.clone(), Style::default().fg(theme.accent_secondary))
            } else {
                Span::raw(indent.clone())
            };
            let mut spans = vec![prefix];
            spans.extend(line.spans);
            lines.push(Line::from(spans));
        }
    }
    lines.push(Line::from(""));
}

fn render_code_block(lines: &mut Vec<Line<'static>>, language: Option<&str>, code: &str, theme: &Theme) {
    let border = Style::default().fg(theme.border);
    lines.push(Line::from(vec![
        Span::styled("┌─ ", border),
        Span::styled(language.unwrap_or("code").to_string(), Style::default().fg(theme.info)),
        Span::styled(" ─", border),
    ]));

    for line in syntax::highlight_block(code, language, theme) {
        let mut spans = vec![Span::styled("│ ", border)];
        spans.extend(line.spans);
        lines.push(Line::from(spans));
    }

    lines.push(Line::from(Span::styled("└──────", border)));
    lines.push(Line::from(""));
}

fn render_quote(lines: &mut Vec<Line<'static>>, text: &RichText, theme: &Theme, width: usize) {
    let muted = Style::default().fg(theme.fg_muted);
    let wrapped = wrap_spans(styled_runs(text, muted, theme), width.saturating_sub(5));
    for line in wrapped {
        let mut spans = vec![Span::styled("  │ ", Style::default().fg(theme.accent_primary))];
        spans.extend(line.spans);
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(""));
}
