//! Diagram overlay
//!
//! Diagrams arrive as SVG source inside the notes. They are rasterized with
//! resvg and drawn with ratatui-image using the best protocol the terminal
//! offers (Sixel, Kitty, iTerm2), falling back to Unicode half-blocks.

use std::collections::HashMap;
use std::sync::Arc;

use image::{DynamicImage, RgbaImage};
use once_cell::sync::Lazy;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
};
use ratatui_image::StatefulImage;
use ratatui_image::picker::{Picker, ProtocolType};
use ratatui_image::protocol::StatefulProtocol;
use resvg::usvg::fontdb;

use super::widgets::centered_rect;
use crate::study::NoteDocument;
use crate::theme::Theme;

/// System fonts, loaded once for text inside diagrams
static FONTS: Lazy<Arc<fontdb::Database>> = Lazy::new(|| {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    Arc::new(db)
});

/// Largest raster produced, in pixels
const MAX_WIDTH: f32 = 1200.0;
const MAX_HEIGHT: f32 = 900.0;

/// Rasterized diagrams and their terminal encodings, keyed by SVG source
pub struct DiagramCache {
    picker: Picker,
    /// `None` marks a diagram that failed to rasterize
    images: HashMap<String, Option<DynamicImage>>,
    protocols: HashMap<String, StatefulProtocol>,
}

impl DiagramCache {
    /// Create a cache, detecting terminal capabilities
    ///
    /// Must be called after entering the alternate screen.
    pub fn new() -> Self {
        let mut picker = match Picker::from_query_stdio() {
            Ok(p) => {
                tracing::debug!("Terminal graphics protocol detected: {:?}", p.protocol_type());
                p
            }
            Err(e) => {
                tracing::debug!("Failed to detect terminal graphics: {:?}", e);
                Picker::from_fontsize((8, 16))
            }
        };

        // Ghostty speaks the Kitty protocol but does not always answer the query
        if picker.protocol_type() == ProtocolType::Halfblocks && is_ghostty() {
            picker.set_protocol_type(ProtocolType::Kitty);
        }

        Self { picker, images: HashMap::new(), protocols: HashMap::new() }
    }

    /// Create a cache with halfblocks only (safe fallback)
    pub fn new_halfblocks() -> Self {
        Self {
            picker: Picker::from_fontsize((8, 16)),
            images: HashMap::new(),
            protocols: HashMap::new(),
        }
    }

    fn image(&mut self, svg: &str) -> Option<&DynamicImage> {
        self.images
            .entry(svg.to_string())
            .or_insert_with(|| match rasterize_svg(svg) {
                Ok(img) => Some(img),
                Err(e) => {
                    tracing::warn!("Failed to draw diagram: {}", e);
                    None
                }
            })
            .as_ref()
    }

    /// Draw `svg` into `area`; false if it cannot be drawn
    pub fn render(&mut self, frame: &mut Frame, area: Rect, svg: &str) -> bool {
        if !self.protocols.contains_key(svg) {
            let Some(img) = self.image(svg).cloned() else {
                return false;
            };
            let protocol = self.picker.new_resize_protocol(img);
            self.protocols.insert(svg.to_string(), protocol);
        }
        let Some(protocol) = self.protocols.get_mut(svg) else {
            return false;
        };
        frame.render_stateful_widget(StatefulImage::default(), area, protocol);
        true
    }

    /// Drop every cached diagram
    pub fn clear(&mut self) {
        self.images.clear();
        self.protocols.clear();
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl Default for DiagramCache {
    fn default() -> Self {
        Self::new_halfblocks()
    }
}

/// Detect if running in Ghostty terminal
fn is_ghostty() -> bool {
    std::env::var("TERM_PROGRAM").map(|v| v.contains("ghostty")).unwrap_or(false)
        || std::env::var("GHOSTTY_RESOURCES_DIR").is_ok()
}

/// Rasterize SVG source onto a white background
pub fn rasterize_svg(svg: &str) -> Result<DynamicImage, String> {
    let options = resvg::usvg::Options { fontdb: Arc::clone(&FONTS), ..Default::default() };
    let tree = resvg::usvg::Tree::from_str(svg, &options)
        .map_err(|e| format!("Failed to parse SVG: {}", e))?;

    // Render at 2x, capped so protocol encoding stays fast
    let size = tree.size();
    let scale = 2.0_f32.min(MAX_WIDTH / size.width()).min(MAX_HEIGHT / size.height());
    let width = (size.width() * scale).round() as u32;
    let height = (size.height() * scale).round() as u32;
    if width == 0 || height == 0 {
        return Err("SVG has zero dimensions".to_string());
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| "Failed to create pixmap".to_string())?;

    // Generated diagrams assume a white page
    pixmap.fill(resvg::tiny_skia::Color::WHITE);
    resvg::render(&tree, resvg::tiny_skia::Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    let rgba = RgbaImage::from_raw(width, height, pixmap.take())
        .ok_or_else(|| "Failed to create RGBA image".to_string())?;
    Ok(DynamicImage::ImageRgba8(rgba))
}

/// Draw diagram `index` of `document` as a centered overlay
pub fn draw_overlay(
    frame: &mut Frame,
    area: Rect,
    document: &NoteDocument,
    index: usize,
    cache: &mut DiagramCache,
    theme: &Theme,
) {
    let overlay = centered_rect(90, 90, area);
    frame.render_widget(Clear, overlay);

    let total = document.diagrams.len();
    let block = Block::default()
        .title(format!(" Diagram {}/{} ", index + 1, total))
        .title_bottom(Line::from(" [d] next  [k] previous  [Esc] close ").centered())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_secondary));
    let inner = block.inner(overlay);
    frame.render_widget(block, overlay);

    let drawn = document.diagrams.get(index).is_some_and(|svg| cache.render(frame, inner, svg));
    if !drawn {
        let message = Paragraph::new("This diagram could not be drawn")
            .style(Style::default().fg(theme.fg_muted))
            .alignment(Alignment::Center);
        frame.render_widget(message, inner);
    }
}
