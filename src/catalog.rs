//! Static study catalog: class levels and subjects
//!
//! The funnel starts from these fixed tables. Topics are never listed here;
//! they are generated per class and subject.

use serde::{Deserialize, Serialize};

/// Lower secondary class level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassLevel {
    S1,
    S2,
    S3,
    S4,
}

impl ClassLevel {
    /// All class levels in display order
    pub const ALL: [ClassLevel; 4] = [Self::S1, Self::S2, Self::S3, Self::S4];

    /// Short label used in prompts and headings (e.g. "S2")
    pub fn label(&self) -> &'static str {
        match self {
            Self::S1 => "S1",
            Self::S2 => "S2",
            Self::S3 => "S3",
            Self::S4 => "S4",
        }
    }

    /// Parse from a label, case-insensitive
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "S1" => Some(Self::S1),
            "S2" => Some(Self::S2),
            "S3" => Some(Self::S3),
            "S4" => Some(Self::S4),
            _ => None,
        }
    }
}

impl std::fmt::Display for ClassLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ClassLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unknown class: {}. Options: S1, S2, S3, S4", s))
    }
}

/// A subject in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subject {
    /// Stable short identifier
    pub id: &'static str,
    /// Display name, also used in prompts
    pub name: &'static str,
    /// Glyph shown next to the name
    pub glyph: &'static str,
}

/// All subjects offered for every class
pub const SUBJECTS: &[Subject] = &[
    Subject { id: "math", name: "Mathematics", glyph: "∑" },
    Subject { id: "eng", name: "English", glyph: "✎" },
    Subject { id: "phy", name: "Physics", glyph: "⚛" },
    Subject { id: "chem", name: "Chemistry", glyph: "⚗" },
    Subject { id: "bio", name: "Biology", glyph: "❦" },
    Subject { id: "geo", name: "Geography", glyph: "◍" },
    Subject { id: "hist", name: "History", glyph: "⌛" },
    Subject { id: "cre", name: "C.R.E", glyph: "✝" },
    Subject { id: "ent", name: "Entrepreneurship", glyph: "◆" },
    Subject { id: "ict", name: "ICT", glyph: "⌨" },
];

/// Find a subject by id or display name, case-insensitive
pub fn find_subject(query: &str) -> Option<&'static Subject> {
    let query = query.trim();
    SUBJECTS
        .iter()
        .find(|s| s.id.eq_ignore_ascii_case(query) || s.name.eq_ignore_ascii_case(query))
}
