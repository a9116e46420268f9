//! Syntax highlighting for code blocks in notes, using syntect

use once_cell::sync::Lazy;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::theme::Theme;

/// Global syntax set with all default syntaxes
static SYNTAX_SET: Lazy<SyntaxSet> = Lazy::new(SyntaxSet::load_defaults_newlines);

/// Global theme set; only the foreground colours are used
static THEME_SET: Lazy<ThemeSet> = Lazy::new(ThemeSet::load_defaults);

const SYNTECT_THEME: &str = "base16-ocean.dark";

/// Map the language tags models tend to emit to syntect syntax names
fn normalize_language(lang: &str) -> &str {
    let base = lang.split([',', ' ']).next().unwrap_or(lang).trim();

    match base.to_lowercase().as_str() {
        "py" | "python" | "python3" => "Python",
        "js" | "javascript" => "JavaScript",
        "html" | "htm" => "HTML",
        "css" => "CSS",
        "sql" => "SQL",
        "c" => "C",
        "cpp" | "c++" => "C++",
        "java" => "Java",
        "json" => "JSON",
        "xml" | "svg" => "XML",
        "sh" | "bash" | "shell" | "console" => "Bourne Again Shell (bash)",
        "php" => "PHP",
        _ => base,
    }
}

/// Find the syntax definition for a given language
fn find_syntax(language: Option<&str>) -> Option<&'static SyntaxReference> {
    let lang = language?;
    let normalized = normalize_language(lang);

    SYNTAX_SET
        .find_syntax_by_name(normalized)
        .or_else(|| SYNTAX_SET.find_syntax_by_extension(&normalized.to_lowercase()))
        .or_else(|| SYNTAX_SET.find_syntax_by_extension(lang))
}

/// Whether a code block in `language` gets real highlighting
pub fn is_language_supported(language: &str) -> bool {
    find_syntax(Some(language)).is_some()
}

/// Highlight a whole code block, one [`Line`] per source line
///
/// Highlighter state carries across lines so multi-line strings and comments
/// colour correctly. Unknown languages come back in the plain code colour.
pub fn highlight_block(code: &str, language: Option<&str>, theme: &Theme) -> Vec<Line<'static>> {
    let base = Style::default().fg(theme.code_fg).bg(theme.code_bg);

    let (Some(syntax), Some(syntect_theme)) =
        (find_syntax(language), THEME_SET.themes.get(SYNTECT_THEME))
    else {
        return plain_block(code, base);
    };

    let mut highlighter = HighlightLines::new(syntax, syntect_theme);
    let mut lines = Vec::new();
    for line in LinesWithEndings::from(code) {
        let ranges = match highlighter.highlight_line(line, &SYNTAX_SET) {
            Ok(ranges) => ranges,
            Err(e) => {
                tracing::debug!("Highlighting failed, falling back to plain: {}", e);
                return plain_block(code, base);
            }
        };

        let spans: Vec<Span<'static>> = ranges
            .into_iter()
            .filter_map(|(style, text)| {
                let text = text.trim_end_matches(['\n', '\r']);
                if text.is_empty() {
                    return None;
                }
                let fg = style.foreground;
                let mut span_style = base.fg(Color::Rgb(fg.r, fg.g, fg.b));
                if style.font_style.contains(FontStyle::BOLD) {
                    span_style = span_style.add_modifier(Modifier::BOLD);
                }
                if style.font_style.contains(FontStyle::ITALIC) {
                    span_style = span_style.add_modifier(Modifier::ITALIC);
                }
                Some(Span::styled(text.to_string(), span_style))
            })
            .collect();
        lines.push(Line::from(spans));
    }
    lines
}

fn plain_block(code: &str, style: Style) -> Vec<Line<'static>> {
    code.lines().map(|l| Line::from(Span::styled(l.to_string(), style))).collect()
}
