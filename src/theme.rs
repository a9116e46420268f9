//! Colour palette

use ratatui::style::Color;

/// Colours read by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub bg_primary: Color,
    pub bg_secondary: Color,
    pub bg_tertiary: Color,

    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub fg_muted: Color,

    /// Brand green: titles, tutor name, focused borders
    pub accent_primary: Color,
    /// Highlight yellow: list markers, scrollbar thumb, student name
    pub accent_secondary: Color,

    pub success: Color,
    pub error: Color,
    pub info: Color,

    pub heading: Color,
    pub code_fg: Color,
    pub code_bg: Color,
    pub search_match: Color,

    pub border: Color,
    pub border_focused: Color,
    pub selection: Color,
}

impl Theme {
    /// Greens on a dark background
    pub const SAVANNA: Theme = Theme {
        bg_primary: Color::Rgb(17, 24, 20),
        bg_secondary: Color::Rgb(26, 36, 30),
        bg_tertiary: Color::Rgb(44, 61, 51),

        fg_primary: Color::Rgb(214, 228, 218),
        fg_secondary: Color::Rgb(236, 244, 238),
        fg_muted: Color::Rgb(120, 142, 128),

        accent_primary: Color::Rgb(74, 222, 128),
        accent_secondary: Color::Rgb(250, 204, 21),

        success: Color::Rgb(134, 239, 172),
        error: Color::Rgb(248, 113, 113),
        info: Color::Rgb(96, 165, 250),

        heading: Color::Rgb(110, 231, 183),
        code_fg: Color::Rgb(253, 186, 116),
        code_bg: Color::Rgb(22, 31, 26),
        search_match: Color::Rgb(250, 204, 21),

        border: Color::Rgb(44, 61, 51),
        border_focused: Color::Rgb(74, 222, 128),
        selection: Color::Rgb(22, 101, 52),
    };
}

impl Default for Theme {
    fn default() -> Self {
        Self::SAVANNA
    }
}
