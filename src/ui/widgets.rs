//! Small drawing helpers shared by the screens

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::state::ListCursor;
use crate::theme::Theme;

/// Create a centered rectangle with the given percentage of width and height
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

/// Draw a scrollbar indicator
pub fn draw_scrollbar(
    frame: &mut Frame,
    x: u16,
    y: u16,
    height: u16,
    scroll_offset: usize,
    total_lines: usize,
    theme: &Theme,
) {
    let height = height as usize;
    if total_lines <= height || height == 0 {
        return;
    }

    let thumb_height = ((height * height).div_ceil(total_lines)).max(1);
    let max_scroll = total_lines - height;
    let thumb_top = ((height - thumb_height) * scroll_offset.min(max_scroll)) / max_scroll;

    for i in 0..height {
        let in_thumb = i >= thumb_top && i < thumb_top + thumb_height;
        let (ch, color) = if in_thumb { ("█", theme.accent_secondary) } else { ("░", theme.bg_tertiary) };
        frame.render_widget(
            Paragraph::new(ch).style(Style::default().fg(color)),
            Rect { x, y: y.saturating_add(i as u16), width: 1, height: 1 },
        );
    }
}

/// Wrap styled spans into lines while preserving formatting
pub fn wrap_spans(spans: Vec<Span<'static>>, width: usize) -> Vec<Line<'static>> {
    if width == 0 {
        return vec![Line::from(spans)];
    }

    let mut lines = Vec::new();
    let mut current_line: Vec<Span<'static>> = Vec::new();
    let mut current_width = 0;

    for span in spans {
        let style = span.style;
        for word in span.content.split_inclusive(char::is_whitespace) {
            let word_len = word.chars().count();

            if current_width + word_len > width && current_width > 0 {
                lines.push(Line::from(std::mem::take(&mut current_line)));
                current_width = 0;
            }

            current_line.push(Span::styled(word.to_string(), style));
            current_width += word_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(Line::from(current_line));
    }

    if lines.is_empty() {
        lines.push(Line::from(""));
    }

    lines
}

/// Draw a selectable list, keeping the cursor row in view
pub fn draw_list(
    frame: &mut Frame,
    area: Rect,
    rows: Vec<Line<'static>>,
    cursor: &mut ListCursor,
    theme: &Theme,
) {
    cursor.visible_height = area.height as usize;
    cursor.clamp(rows.len());

    let selected_style =
        Style::default().bg(theme.selection).fg(theme.fg_primary).add_modifier(Modifier::BOLD);
    let lines: Vec<Line> = rows
        .into_iter()
        .enumerate()
        .skip(cursor.scroll_offset)
        .take(area.height as usize)
        .map(|(i, line)| {
            let marker = if i == cursor.selected { "▸ " } else { "  " };
            let mut spans = vec![Span::styled(marker, Style::default().fg(theme.accent_primary))];
            spans.extend(line.spans);
            let line = Line::from(spans);
            if i == cursor.selected { line.style(selected_style) } else { line }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn wrap_breaks_on_words() {
        let lines = wrap_spans(vec![Span::raw("the quick brown fox")], 10);
        let text: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(text, vec!["the quick ", "brown fox"]);
    }

    #[test]
    fn wrap_keeps_styles_across_lines() {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let lines = wrap_spans(vec![Span::raw("plain "), Span::styled("bold words", bold)], 8);
        let text: Vec<String> = lines.iter().map(line_text).collect();
        assert_eq!(text, vec!["plain ", "bold ", "words"]);
        assert_eq!(lines[1].spans[0].style, bold);
    }

    #[test]
    fn wrap_zero_width_is_one_line() {
        assert_eq!(wrap_spans(vec![Span::raw("a b c")], 0).len(), 1);
    }

    #[test]
    fn centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(80, 80, outer);
        assert!(inner.width <= 80 && inner.height <= 40);
        assert!(inner.x >= 10 && inner.y >= 5);
    }
}
