//! Response sanitizer
//!
//! Generated notes embed raw SVG diagrams. The prompt asks the model not to
//! fence them, but it sometimes does anyway, and a fenced diagram renders as a
//! code listing instead of a picture. This module strips those fences.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

/// One fence-unwrapping rewrite: the whole match is replaced by capture group 1
struct FenceRule {
    name: &'static str,
    pattern: Lazy<Regex>,
}

impl FenceRule {
    fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.pattern.replace_all(text, "$1")
    }
}

/// Fence (optional `html`/`xml` tag) around a `<div>` that contains a full `<svg>…</svg>`
static FENCED_CONTAINER_WITH_SVG: FenceRule = FenceRule {
    name: "container-with-svg",
    pattern: Lazy::new(|| {
        Regex::new(r"(?i)```(?:html|xml)?\s*(<div[\s\S]*?<svg[\s\S]*?</svg>[\s\S]*?</div>)\s*```")
            .unwrap()
    }),
};

/// Fence around a bare `<svg>…</svg>`
static FENCED_BARE_SVG: FenceRule = FenceRule {
    name: "bare-svg",
    pattern: Lazy::new(|| {
        Regex::new(r"(?i)```(?:html|xml)?\s*(<svg[\s\S]*?</svg>)\s*```").unwrap()
    }),
};

/// Fence around the diagram wrapper, recognised by its `my-8` marker class
static FENCED_MARKED_CONTAINER: FenceRule = FenceRule {
    name: "marked-container",
    pattern: Lazy::new(|| {
        Regex::new(r#"(?i)```(?:html|xml)?\s*(<div class="my-8[\s\S]*?</div>)\s*```"#).unwrap()
    }),
};

/// Remove code fences wrapping embedded diagram markup
///
/// Every rule is applied, in order, and the pass repeats until the text stops
/// changing, so the result is a fixpoint: `sanitize(sanitize(x)) == sanitize(x)`.
/// Each productive pass removes at least six backticks, so this terminates.
/// Safe on partial streamed text; an unclosed fence or tag simply does not match.
pub fn sanitize(text: &str) -> String {
    let mut current = text.to_string();
    loop {
        let before = current.len();
        // Priority order
        for rule in [&FENCED_CONTAINER_WITH_SVG, &FENCED_BARE_SVG, &FENCED_MARKED_CONTAINER] {
            if let Cow::Owned(rewritten) = rule.apply(&current) {
                tracing::trace!("Sanitizer rule {} unwrapped a fence", rule.name);
                current = rewritten;
            }
        }
        if current.len() == before {
            return current;
        }
    }
}
