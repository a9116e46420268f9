//! Content renderer
//!
//! Turns sanitized note text (markdown with inline SVG) into display blocks.
//! Stateless and cheap enough to run on every streamed chunk.

use std::ops::Range;

use once_cell::sync::Lazy;
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use regex::Regex;

/// Start of an `<svg` element
static SVG_OPEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<svg\b").unwrap());

/// End of an `<svg>` element
static SVG_CLOSE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</svg\s*>").unwrap());

/// Inline styling of a run of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineStyle {
    Plain,
    Strong,
    Emphasis,
    StrongEmphasis,
    Code,
}

/// A run of text with one style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineRun {
    pub text: String,
    pub style: InlineStyle,
}

impl InlineRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self { text: text.into(), style: InlineStyle::Plain }
    }
}

/// Text made of styled runs
pub type RichText = Vec<InlineRun>;

/// Flatten rich text to its characters
pub fn rich_to_string(runs: &[InlineRun]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}

/// A display block of a note
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteBlock {
    Heading { level: u8, text: RichText },
    Paragraph(RichText),
    BulletList(Vec<RichText>),
    OrderedList { start: u64, items: Vec<RichText> },
    Code { language: Option<String>, code: String },
    Quote(RichText),
    Rule,
    /// Index into [`NoteDocument::diagrams`]
    Diagram(usize),
    /// An `<svg` that has started streaming but not yet closed
    PendingDiagram,
}

/// Parsed note ready for display
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDocument {
    pub blocks: Vec<NoteBlock>,
    /// Complete SVG sources, numbered in order of appearance
    pub diagrams: Vec<String>,
}

impl NoteDocument {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Where an `<svg` found in markup leads
enum Found {
    Diagram(Range<usize>),
    /// Still streaming and nothing closes it yet
    Pending(usize),
}

/// A slice of one event after diagrams are taken out
enum Piece {
    Text(Range<usize>),
    Diagram(usize),
    Pending,
}

/// Finds diagrams in the raw source as the markdown events reach them
///
/// Only markup and plain text events are scanned, so an `<svg` inside a code
/// span or code block is never taken for a diagram.
struct DiagramScanner<'a> {
    source: &'a str,
    streaming: bool,
    diagrams: Vec<String>,
    /// Source span of the last diagram; events inside it are consumed
    covered: Range<usize>,
    pending_at: Option<usize>,
}

impl<'a> DiagramScanner<'a> {
    fn new(source: &'a str, streaming: bool) -> Self {
        Self { source, streaming, diagrams: Vec::new(), covered: 0..0, pending_at: None }
    }

    /// Whether an event lies inside a diagram or after a pending one
    ///
    /// Events starting exactly where a diagram starts were already seen, or
    /// close a container opened there, so they are kept.
    fn consumed(&self, range: &Range<usize>) -> bool {
        if self.pending_at.is_some_and(|at| range.start > at) {
            return true;
        }
        range.start > self.covered.start && range.end <= self.covered.end
    }

    /// An `<svg` opening before `until` whose element closes before another opens
    ///
    /// A stray `<svg` with no close is left alone once the text is final.
    fn find(&self, from: usize, until: usize) -> Option<Found> {
        // An open tag may start in this event and run into the next one
        let mut reach = (until + "<svg ".len()).min(self.source.len());
        while !self.source.is_char_boundary(reach) {
            reach += 1;
        }
        let mut pos = from;
        while let Some(open) = SVG_OPEN_RE.find_at(&self.source[..reach], pos) {
            if open.start() >= until {
                return None;
            }
            let close = SVG_CLOSE_RE.find_at(self.source, open.end());
            let next_open = SVG_OPEN_RE.find_at(self.source, open.end());
            match close {
                Some(close) if next_open.is_none_or(|next| next.start() > close.start()) => {
                    return Some(Found::Diagram(open.start()..close.end()));
                }
                None if self.streaming && next_open.is_none() => {
                    return Some(Found::Pending(open.start()));
                }
                _ => pos = open.end(),
            }
        }
        None
    }

    /// Split an event's source range around the diagrams it starts
    fn split(&mut self, range: Range<usize>) -> Vec<Piece> {
        let mut pieces = Vec::new();
        let mut pos = range.start.max(self.covered.end);
        while pos < range.end {
            match self.find(pos, range.end) {
                Some(Found::Diagram(span)) => {
                    if span.start > pos {
                        pieces.push(Piece::Text(pos..span.start));
                    }
                    self.diagrams.push(self.source[span.clone()].to_string());
                    pieces.push(Piece::Diagram(self.diagrams.len() - 1));
                    pos = span.end;
                    self.covered = span;
                }
                Some(Found::Pending(at)) => {
                    if at > pos {
                        pieces.push(Piece::Text(pos..at));
                    }
                    pieces.push(Piece::Pending);
                    self.pending_at = Some(at);
                    return pieces;
                }
                None => {
                    pieces.push(Piece::Text(pos..range.end));
                    break;
                }
            }
        }
        pieces
    }
}

/// Parse finished note text into a document
pub fn parse_note(text: &str) -> NoteDocument {
    parse(text, false)
}

/// Parse note text that is still streaming
///
/// A trailing `<svg` that has not closed yet becomes
/// [`NoteBlock::PendingDiagram`] and hides what follows it.
pub fn parse_streaming_note(text: &str) -> NoteDocument {
    parse(text, true)
}

// skipcq: RS-R1000 - Parser functions inherently have high cyclomatic complexity
#[allow(clippy::cognitive_complexity)]
fn parse(text: &str, streaming: bool) -> NoteDocument {
    let mut scanner = DiagramScanner::new(text, streaming);
    let mut pending = false;

    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
    let parser = Parser::new_ext(text, options).into_offset_iter();
    let mut blocks = Vec::new();

    let mut current: RichText = Vec::new();
    let mut strong = 0usize;
    let mut emphasis = 0usize;

    let mut heading_level: Option<u8> = None;

    let mut in_code_block = false;
    let mut code_language: Option<String> = None;
    let mut code_content = String::new();

    // Lists may nest; nested items are flattened into the outermost list
    let mut list_depth = 0usize;
    let mut list_start: Option<u64> = None;
    let mut list_items: Vec<RichText> = Vec::new();

    let mut quote_depth = 0usize;
    let mut quote_content: RichText = Vec::new();

    for (event, range) in parser {
        if scanner.consumed(&range) {
            continue;
        }
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                flush_paragraph(&mut current, &mut blocks);
                heading_level = Some(heading_level_to_u8(level));
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(level) = heading_level.take() {
                    let text = trim_runs(std::mem::take(&mut current));
                    if !text.is_empty() {
                        blocks.push(NoteBlock::Heading { level, text });
                    }
                }
            }

            Event::Start(Tag::Paragraph) => {}
            Event::End(TagEnd::Paragraph) => {
                if quote_depth > 0 {
                    if !quote_content.is_empty() {
                        quote_content.push(InlineRun::plain(" "));
                    }
                    quote_content.append(&mut current);
                } else if list_depth > 0 {
                    // Item text is collected at End(Item)
                } else {
                    flush_paragraph(&mut current, &mut blocks);
                }
            }

            Event::Start(Tag::CodeBlock(kind)) => {
                flush_paragraph(&mut current, &mut blocks);
                in_code_block = true;
                code_language = match kind {
                    CodeBlockKind::Fenced(lang) => {
                        let lang = lang.trim().to_string();
                        if lang.is_empty() { None } else { Some(lang) }
                    }
                    CodeBlockKind::Indented => None,
                };
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                let code = std::mem::take(&mut code_content).trim_end().to_string();
                blocks.push(NoteBlock::Code { language: code_language.take(), code });
            }

            Event::Start(Tag::List(first)) => {
                if list_depth == 0 {
                    flush_paragraph(&mut current, &mut blocks);
                    list_start = first;
                    list_items.clear();
                } else {
                    // Text of the parent item so far
                    push_item(&mut list_items, &mut current);
                }
                list_depth += 1;
            }
            Event::End(TagEnd::List(_)) => {
                list_depth = list_depth.saturating_sub(1);
                if list_depth == 0 {
                    let items = std::mem::take(&mut list_items);
                    if !items.is_empty() {
                        blocks.push(match list_start.take() {
                            Some(start) => NoteBlock::OrderedList { start, items },
                            None => NoteBlock::BulletList(items),
                        });
                    }
                }
            }
            Event::Start(Tag::Item) => {}
            Event::End(TagEnd::Item) => {
                push_item(&mut list_items, &mut current);
            }

            Event::Start(Tag::BlockQuote(_)) => {
                flush_paragraph(&mut current, &mut blocks);
                quote_depth += 1;
            }
            Event::End(TagEnd::BlockQuote(_)) => {
                quote_depth = quote_depth.saturating_sub(1);
                if quote_depth == 0 {
                    let content = trim_runs(std::mem::take(&mut quote_content));
                    if !content.is_empty() {
                        blocks.push(NoteBlock::Quote(content));
                    }
                }
            }

            Event::Start(Tag::Strong) => strong += 1,
            Event::End(TagEnd::Strong) => strong = strong.saturating_sub(1),
            Event::Start(Tag::Emphasis) => emphasis += 1,
            Event::End(TagEnd::Emphasis) => emphasis = emphasis.saturating_sub(1),

            // Table cells read as plain text separated by bars
            Event::End(TagEnd::TableCell) => push_text(&mut current, " | ", InlineStyle::Plain),
            Event::End(TagEnd::TableHead) | Event::End(TagEnd::TableRow) => {
                flush_paragraph(&mut current, &mut blocks);
            }

            Event::Rule => {
                flush_paragraph(&mut current, &mut blocks);
                blocks.push(NoteBlock::Rule);
            }

            Event::Text(chunk) if in_code_block => code_content.push_str(&chunk),
            Event::Text(chunk) => {
                let style = style_for(strong, emphasis);
                match scanner.split(range.clone()).as_slice() {
                    [Piece::Text(piece)] if *piece == range => push_text(&mut current, &chunk, style),
                    pieces => {
                        for piece in pieces {
                            match piece {
                                Piece::Text(piece) => push_text(&mut current, &text[piece.clone()], style),
                                Piece::Diagram(index) => {
                                    flush_paragraph(&mut current, &mut blocks);
                                    blocks.push(NoteBlock::Diagram(*index));
                                }
                                Piece::Pending => pending = true,
                            }
                        }
                    }
                }
            }
            Event::Code(code) => push_text(&mut current, &code, InlineStyle::Code),

            Event::SoftBreak | Event::HardBreak => {
                if in_code_block {
                    code_content.push('\n');
                } else {
                    push_text(&mut current, " ", InlineStyle::Plain);
                }
            }

            // Markup around diagrams, such as wrapper divs, carries no text of its own
            Event::Html(html) | Event::InlineHtml(html) => {
                match scanner.split(range.clone()).as_slice() {
                    [Piece::Text(piece)] if *piece == range => {
                        let visible = strip_tags(&html);
                        if !visible.trim().is_empty() {
                            push_text(&mut current, visible.trim(), InlineStyle::Plain);
                        }
                    }
                    pieces => {
                        for piece in pieces {
                            match piece {
                                Piece::Text(_) => {}
                                Piece::Diagram(index) => {
                                    flush_paragraph(&mut current, &mut blocks);
                                    blocks.push(NoteBlock::Diagram(*index));
                                }
                                Piece::Pending => pending = true,
                            }
                        }
                    }
                }
            }

            _ => {}
        }
    }

    flush_paragraph(&mut current, &mut blocks);
    if pending {
        blocks.push(NoteBlock::PendingDiagram);
    }

    NoteDocument { blocks, diagrams: scanner.diagrams }
}

fn style_for(strong: usize, emphasis: usize) -> InlineStyle {
    match (strong > 0, emphasis > 0) {
        (true, true) => InlineStyle::StrongEmphasis,
        (true, false) => InlineStyle::Strong,
        (false, true) => InlineStyle::Emphasis,
        (false, false) => InlineStyle::Plain,
    }
}

/// Append text, merging with the previous run when the style matches
fn push_text(runs: &mut RichText, text: &str, style: InlineStyle) {
    if text.is_empty() {
        return;
    }
    match runs.last_mut() {
        Some(last) if last.style == style => last.text.push_str(text),
        _ => runs.push(InlineRun { text: text.to_string(), style }),
    }
}

/// Trim leading and trailing whitespace across runs, dropping empty ones
fn trim_runs(mut runs: RichText) -> RichText {
    if let Some(first) = runs.first_mut() {
        first.text = first.text.trim_start().to_string();
    }
    if let Some(last) = runs.last_mut() {
        last.text = last.text.trim_end().to_string();
    }
    runs.retain(|r| !r.text.is_empty());
    runs
}

fn flush_paragraph(current: &mut RichText, blocks: &mut Vec<NoteBlock>) {
    let text = trim_runs(std::mem::take(current));
    if !text.is_empty() {
        blocks.push(NoteBlock::Paragraph(text));
    }
}

fn push_item(items: &mut Vec<RichText>, current: &mut RichText) {
    let item = trim_runs(std::mem::take(current));
    if !item.is_empty() {
        items.push(item);
    }
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Visible text of an HTML fragment
fn strip_tags(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result.replace("&lt;", "<").replace("&gt;", ">").replace("&quot;", "\"").replace("&amp;", "&")
}

/// Render sanitized note text to HTML, passing raw markup through unescaped
pub fn render_html(text: &str) -> String {
    let parser = Parser::new_ext(text, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);
    let mut html = String::with_capacity(text.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut html, parser);
    html
}

/// Plain-text rendering for the clipboard; diagrams are omitted
pub fn plain_text(document: &NoteDocument) -> String {
    let mut sections: Vec<String> = Vec::new();
    for block in &document.blocks {
        match block {
            NoteBlock::Heading { text, .. } | NoteBlock::Paragraph(text) => {
                sections.push(rich_to_string(text));
            }
            NoteBlock::BulletList(items) => sections.push(
                items.iter().map(|i| format!("- {}", rich_to_string(i))).collect::<Vec<_>>().join("\n"),
            ),
            NoteBlock::OrderedList { start, items } => sections.push(
                items
                    .iter()
                    .zip(*start..)
                    .map(|(item, n)| format!("{}. {}", n, rich_to_string(item)))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            NoteBlock::Code { code, .. } => sections.push(code.clone()),
            NoteBlock::Quote(text) => sections.push(format!("> {}", rich_to_string(text))),
            NoteBlock::Rule => sections.push("---".to_string()),
            NoteBlock::Diagram(_) | NoteBlock::PendingDiagram => {}
        }
    }
    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn plain(text: &str) -> RichText {
        vec![InlineRun::plain(text)]
    }

    #[test]
    fn parse_heading_and_paragraph() {
        let doc = parse_note("### Learning Goal\nKnow the parts of a cell.");
        assert_eq!(
            doc.blocks,
            vec![
                NoteBlock::Heading { level: 3, text: plain("Learning Goal") },
                NoteBlock::Paragraph(plain("Know the parts of a cell.")),
            ]
        );
    }

    #[test]
    fn parse_inline_styles() {
        let doc = parse_note("A **cell** is *tiny* and uses `ATP`.");
        let NoteBlock::Paragraph(runs) = &doc.blocks[0] else {
            panic!("Expected paragraph");
        };
        let styles: Vec<_> = runs.iter().map(|r| r.style).collect();
        assert_eq!(
            styles,
            vec![
                InlineStyle::Plain,
                InlineStyle::Strong,
                InlineStyle::Plain,
                InlineStyle::Emphasis,
                InlineStyle::Plain,
                InlineStyle::Code,
                InlineStyle::Plain,
            ]
        );
        assert_eq!(rich_to_string(runs), "A cell is tiny and uses ATP.");
    }

    #[test]
    fn parse_lists() {
        let doc = parse_note("- one\n- two\n\n3. three\n4. four");
        assert_eq!(
            doc.blocks,
            vec![
                NoteBlock::BulletList(vec![plain("one"), plain("two")]),
                NoteBlock::OrderedList { start: 3, items: vec![plain("three"), plain("four")] },
            ]
        );
    }

    #[test]
    fn nested_list_items_are_flattened() {
        let doc = parse_note("- outer\n  - inner\n- last");
        assert_eq!(
            doc.blocks,
            vec![NoteBlock::BulletList(vec![plain("outer"), plain("inner"), plain("last")])]
        );
    }

    #[test]
    fn parse_code_block() {
        let doc = parse_note("```python\nprint('hi')\n```");
        assert_eq!(
            doc.blocks,
            vec![NoteBlock::Code { language: Some("python".into()), code: "print('hi')".into() }]
        );
    }

    #[test]
    fn parse_quote_and_rule() {
        let doc = parse_note("> Remember this\n\n---");
        assert_eq!(doc.blocks, vec![NoteBlock::Quote(plain("Remember this")), NoteBlock::Rule]);
    }

    #[test]
    fn diagrams_are_extracted_and_numbered() {
        let text = "Before\n\n<div class=\"my-8 flex\"><div class=\"w-full\"><svg viewBox=\"0 0 4 4\"><text>label</text></svg></div></div>\n\nMiddle\n\n<svg><rect/></svg>\n\nAfter";
        let doc = parse_note(text);
        assert_eq!(doc.diagrams.len(), 2);
        assert!(doc.diagrams[0].starts_with("<svg viewBox"));
        assert_eq!(doc.diagrams[1], "<svg><rect/></svg>");
        assert_eq!(
            doc.blocks,
            vec![
                NoteBlock::Paragraph(plain("Before")),
                NoteBlock::Diagram(0),
                NoteBlock::Paragraph(plain("Middle")),
                NoteBlock::Diagram(1),
                NoteBlock::Paragraph(plain("After")),
            ]
        );
    }

    #[test]
    fn unterminated_svg_is_pending_while_streaming() {
        let doc = parse_streaming_note(
            "Core idea\n\n<div class=\"my-8\"><svg viewBox=\"0 0 4 4\"><path d=\"M0",
        );
        assert_eq!(doc.blocks, vec![NoteBlock::Paragraph(plain("Core idea")), NoteBlock::PendingDiagram]);
        assert!(doc.diagrams.is_empty());

        let doc = parse_streaming_note("Core idea\n\n<svg viewBox=\"0 0 4");
        assert_eq!(doc.blocks, vec![NoteBlock::Paragraph(plain("Core idea")), NoteBlock::PendingDiagram]);
    }

    #[test]
    fn unterminated_svg_in_finished_text_keeps_content() {
        let doc = parse_note(
            "Core idea\n\n<div class=\"my-8\"><svg viewBox=\"0 0 4 4\"><path d=\"M0\n\n## Summary\n\nCells divide.",
        );
        assert!(!doc.blocks.contains(&NoteBlock::PendingDiagram));
        assert!(doc.diagrams.is_empty());
        assert_eq!(doc.blocks[0], NoteBlock::Paragraph(plain("Core idea")));
        assert!(doc.blocks.contains(&NoteBlock::Heading { level: 2, text: plain("Summary") }));
        assert!(plain_text(&doc).ends_with("Cells divide."));
    }

    #[test]
    fn svg_in_inline_code_is_text() {
        let text = "In HTML, the `<svg>` tag draws vector graphics.\n\n## Summary\n\nVector images scale without blurring.";
        for doc in [parse_note(text), parse_streaming_note(text)] {
            assert!(doc.diagrams.is_empty());
            assert_eq!(
                plain_text(&doc),
                "In HTML, the <svg> tag draws vector graphics.\n\nSummary\n\nVector images scale without blurring."
            );
        }
    }

    #[test]
    fn svg_in_inline_code_does_not_swallow_a_later_diagram() {
        let doc = parse_note(
            "Use the `<svg>` element.\n\n## Core Knowledge\n\nShapes are drawn with paths.\n\n<svg><rect/></svg>\n\nEnd",
        );
        assert_eq!(doc.diagrams, vec!["<svg><rect/></svg>".to_string()]);
        assert_eq!(doc.blocks.len(), 5);
        assert_eq!(doc.blocks[1], NoteBlock::Heading { level: 2, text: plain("Core Knowledge") });
        assert_eq!(doc.blocks[2], NoteBlock::Paragraph(plain("Shapes are drawn with paths.")));
        assert_eq!(doc.blocks[3], NoteBlock::Diagram(0));
        assert_eq!(doc.blocks[4], NoteBlock::Paragraph(plain("End")));
    }

    #[test]
    fn svg_in_code_block_is_code() {
        let text = "```html\n<svg viewBox=\"0 0 1 1\">\n```\n\nClose the element with a matching tag.";
        for doc in [parse_note(text), parse_streaming_note(text)] {
            assert!(doc.diagrams.is_empty());
            assert_eq!(
                doc.blocks,
                vec![
                    NoteBlock::Code {
                        language: Some("html".into()),
                        code: "<svg viewBox=\"0 0 1 1\">".into(),
                    },
                    NoteBlock::Paragraph(plain("Close the element with a matching tag.")),
                ]
            );
        }
    }

    #[test]
    fn bare_svg_mention_before_a_diagram_is_not_a_diagram() {
        let doc = parse_note("The <svg> tag is the container.\n\n<svg><rect/></svg>\n\nEnd");
        assert_eq!(doc.diagrams, vec!["<svg><rect/></svg>".to_string()]);
        assert_eq!(doc.blocks[1], NoteBlock::Diagram(0));
        assert_eq!(doc.blocks[2], NoteBlock::Paragraph(plain("End")));
        assert!(plain_text(&doc).contains("container"));
    }

    #[test]
    fn multiline_diagram_with_blank_lines_is_one_block() {
        let text = "Intro\n\n<div class=\"my-8\">\n  <svg viewBox=\"0 0 4 4\">\n    <rect/>\n\n    <text>Label</text>\n  </svg>\n</div>\n\nAfter";
        let doc = parse_note(text);
        assert_eq!(doc.diagrams.len(), 1);
        assert!(doc.diagrams[0].contains("<text>Label</text>"));
        assert_eq!(
            doc.blocks,
            vec![
                NoteBlock::Paragraph(plain("Intro")),
                NoteBlock::Diagram(0),
                NoteBlock::Paragraph(plain("After")),
            ]
        );
    }

    #[test]
    fn render_html_passes_svg_through() {
        let html = render_html("**Bold**\n\n<svg><circle r=\"1\"/></svg>\n");
        assert!(html.contains("<strong>Bold</strong>"));
        assert!(html.contains("<svg><circle r=\"1\"/></svg>"));
    }

    #[test]
    fn plain_text_omits_diagrams() {
        let doc = parse_note(
            "## Summary\n\n- **Cells** divide\n\n1. First\n2. Second\n\n<svg><rect/></svg>\n\nEnd",
        );
        assert_eq!(plain_text(&doc), "Summary\n\n- Cells divide\n\n1. First\n2. Second\n\nEnd");
    }

    #[test]
    fn empty_text_is_empty_document() {
        assert!(parse_note("").is_empty());
        assert!(parse_note("   \n\n").is_empty());
    }
}
