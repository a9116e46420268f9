//! UI-side state: cursors, text inputs, scroll positions and the status line
//!
//! Everything the study core does not care about lives here.

use std::ops::Range;

use crate::study::render::{NoteDocument, parse_note, parse_streaming_note};
use crate::study::topics::filter_topics;
use crate::study::{ChatEntry, GenerationBuffer, RequestId, TopicList};

/// A single-line text input with a character cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    /// Input buffer
    text: String,
    /// Cursor position (character index)
    cursor: usize,
}

impl TextInput {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Take the text out, leaving the input empty
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    /// Convert character index to byte index
    fn char_to_byte_index(&self, char_idx: usize) -> usize {
        self.text.char_indices().nth(char_idx).map(|(i, _)| i).unwrap_or(self.text.len())
    }

    fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Insert a character at cursor
    pub fn insert_char(&mut self, c: char) {
        let byte_idx = self.char_to_byte_index(self.cursor);
        self.text.insert(byte_idx, c);
        self.cursor += 1;
    }

    /// Delete character before cursor
    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_idx = self.char_to_byte_index(self.cursor);
            self.text.remove(byte_idx);
        }
    }

    /// Delete character at cursor
    pub fn delete_char_forward(&mut self) {
        if self.cursor < self.char_count() {
            let byte_idx = self.char_to_byte_index(self.cursor);
            self.text.remove(byte_idx);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }
}

/// Selection within a vertical list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListCursor {
    /// Currently selected row
    pub selected: usize,
    /// First visible row
    pub scroll_offset: usize,
    /// Visible height in rows (updated on render)
    pub visible_height: usize,
}

impl ListCursor {
    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.ensure_selection_visible();
    }

    pub fn down(&mut self, len: usize) {
        if self.selected + 1 < len {
            self.selected += 1;
        }
        self.ensure_selection_visible();
    }

    pub fn top(&mut self) {
        self.selected = 0;
        self.ensure_selection_visible();
    }

    pub fn bottom(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
        self.ensure_selection_visible();
    }

    /// Keep the selection inside a list of `len` rows
    pub fn clamp(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
        self.ensure_selection_visible();
    }

    pub fn reset(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    /// Ensure the selected item is visible by adjusting scroll offset
    pub fn ensure_selection_visible(&mut self) {
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        }
        if self.visible_height > 0 && self.selected >= self.scroll_offset + self.visible_height {
            self.scroll_offset = self.selected + 1 - self.visible_height;
        }
    }
}

/// Scroll position of a long text view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollState {
    /// Current scroll position (lines from top)
    pub offset: usize,
    /// Total rendered lines (updated on render)
    pub total_lines: usize,
    /// Visible height in lines (updated on render)
    pub visible_height: usize,
    /// Stick to the bottom as content grows
    pub follow: bool,
}

impl ScrollState {
    pub fn following() -> Self {
        Self { follow: true, ..Self::default() }
    }

    /// Get the maximum allowed scroll offset
    pub fn max_scroll(&self) -> usize {
        self.total_lines.saturating_sub(self.visible_height)
    }

    /// Record the rendered size and re-clamp
    pub fn update_size(&mut self, total_lines: usize, visible_height: usize) {
        self.total_lines = total_lines;
        self.visible_height = visible_height;
        if self.follow {
            self.offset = self.max_scroll();
        }
        self.offset = self.offset.min(self.max_scroll());
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.offset = self.offset.saturating_sub(lines);
        self.follow = false;
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.offset = (self.offset + lines).min(self.max_scroll());
        self.follow = self.offset == self.max_scroll() && self.follow;
    }

    pub fn page(&self) -> usize {
        self.visible_height.saturating_sub(2).max(1)
    }

    pub fn to_top(&mut self) {
        self.offset = 0;
        self.follow = false;
    }

    pub fn to_bottom(&mut self) {
        self.offset = self.max_scroll();
    }
}

/// Message shown in the footer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusLine {
    pub message: Option<String>,
    pub is_error: bool,
}

impl StatusLine {
    /// Set a status message
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = false;
    }

    /// Set an error message
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
        self.is_error = true;
    }

    pub fn clear(&mut self) {
        self.message = None;
    }
}

/// A row of the topic browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicRow<'a> {
    /// Study the typed query as a topic
    Custom(&'a str),
    /// A listed topic with highlighted match ranges
    Listed { topic: &'a str, matches: Vec<Range<usize>> },
}

impl TopicRow<'_> {
    /// Text passed to topic selection
    pub fn topic(&self) -> &str {
        match self {
            TopicRow::Custom(query) => query.trim(),
            TopicRow::Listed { topic, .. } => topic,
        }
    }
}

/// Rows of the topic browser for a search query
///
/// A non-empty query always offers itself as a custom topic first.
pub fn topic_rows<'a>(list: Option<&'a TopicList>, query: &'a str) -> Vec<TopicRow<'a>> {
    let mut rows = Vec::new();
    if !query.trim().is_empty() {
        rows.push(TopicRow::Custom(query));
    }
    if let Some(list) = list {
        rows.extend(
            filter_topics(list.topics(), query)
                .into_iter()
                .map(|m| TopicRow::Listed { topic: m.topic, matches: m.matches }),
        );
    }
    rows
}

/// Parsed form of the current note buffer, rebuilt when the buffer changes
#[derive(Debug, Clone, Default)]
pub struct NoteView {
    source: Option<(RequestId, usize, bool)>,
    pub document: NoteDocument,
}

impl NoteView {
    /// Re-render if the buffer moved on since the last call
    pub fn refresh(&mut self, buffer: Option<&GenerationBuffer>) {
        let key = buffer.map(|b| (b.request(), b.text().len(), b.is_streaming()));
        if key == self.source {
            return;
        }
        self.document = match buffer {
            Some(b) if b.is_streaming() => parse_streaming_note(&b.display_text()),
            Some(b) => parse_note(&b.display_text()),
            None => NoteDocument::default(),
        };
        self.source = key;
    }
}

#[derive(Debug, Clone, Default)]
struct ParsedReply {
    len: usize,
    pending: bool,
    document: NoteDocument,
}

/// Parsed tutor replies, one slot per transcript entry
///
/// An entry is parsed again only when its text length or pending flag changes.
#[derive(Debug, Clone, Default)]
pub struct TranscriptView {
    replies: Vec<ParsedReply>,
}

impl TranscriptView {
    pub fn document(&mut self, index: usize, entry: &ChatEntry) -> &NoteDocument {
        if self.replies.len() <= index {
            self.replies.resize_with(index + 1, ParsedReply::default);
        }
        let reply = &mut self.replies[index];
        if reply.len != entry.text.len() || reply.pending != entry.pending {
            reply.document = if entry.pending {
                parse_streaming_note(&entry.text)
            } else {
                parse_note(&entry.text)
            };
            reply.len = entry.text.len();
            reply.pending = entry.pending;
        }
        &reply.document
    }
}

/// Full UI state
#[derive(Debug, Default)]
pub struct UiState {
    pub class_cursor: ListCursor,
    pub subject_cursor: ListCursor,
    pub topic_cursor: ListCursor,

    /// Topic search field
    pub topic_search: TextInput,
    /// Keys go to the topic search field
    pub searching: bool,

    pub note_scroll: ScrollState,
    pub note_view: NoteView,
    /// Diagram shown in the overlay, as an index into the note's diagrams
    pub diagram: Option<usize>,

    pub chat_input: TextInput,
    pub chat_scroll: ScrollState,
    pub transcript: TranscriptView,

    pub status: StatusLine,
}

impl UiState {
    pub fn new() -> Self {
        Self { chat_scroll: ScrollState::following(), ..Self::default() }
    }

    /// Forget per-topic UI state when the funnel moves
    pub fn reset_topic_browser(&mut self) {
        self.topic_cursor.reset();
        self.topic_search.clear();
        self.searching = false;
    }

    pub fn reset_note_view(&mut self) {
        self.note_scroll = ScrollState::default();
        self.diagram = None;
    }
}
