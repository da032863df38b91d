//! Text measurement and rendering.
//!
//! Node sizes are derived from their label's bounding box, so labels have to
//! be measured before layout runs. Measurement uses `cosmic-text` shaping
//! against the system fonts through a process-wide [`TextManager`]. When no
//! usable font is found the width is estimated from the character count, so
//! layout still produces sensible boxes on headless machines.
//!
//! ```
//! # use stepviz_core::draw::{Text, TextDefinition};
//! let style = TextDefinition::new();
//! let label = Text::new(&style, "ProcessPayment");
//!
//! let size = label.calculate_size();
//! assert!(size.width() > 0.0);
//! assert!(size.height() > 0.0);
//! ```

use std::sync::{Mutex, OnceLock};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::{debug, info};
use svg::node::{Text as SvgText, element as svg_element};

use crate::{
    draw::{Drawable, LayeredOutput, RenderLayer},
    geometry::{Point, Size},
};

/// Horizontal alignment of rendered text relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    /// Text starts at the position
    Start,
    /// Text is centered on the position
    #[default]
    Middle,
}

impl TextAnchor {
    fn to_svg_value(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
        }
    }
}

/// Font and anchor of a label. Fill is inherited from the enclosing element.
///
/// | Property | Default |
/// |----------|---------|
/// | Font family | `"sans-serif"` |
/// | Font size | `12` |
/// | Anchor | [`TextAnchor::Middle`] |
#[derive(Debug, Clone, PartialEq)]
pub struct TextDefinition {
    font_family: String,
    font_size: u16,
    anchor: TextAnchor,
}

impl TextDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_font_family(&mut self, family: &str) {
        self.font_family = family.to_string();
    }

    pub fn set_font_size(&mut self, size: u16) {
        self.font_size = size;
    }

    pub fn set_anchor(&mut self, anchor: TextAnchor) {
        self.anchor = anchor;
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn anchor(&self) -> TextAnchor {
        self.anchor
    }
}

impl Default for TextDefinition {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 12,
            anchor: TextAnchor::default(),
        }
    }
}

/// A label bound to its style.
#[derive(Debug, Clone)]
pub struct Text<'a> {
    definition: &'a TextDefinition,
    content: &'a str,
}

impl<'a> Text<'a> {
    pub fn new(definition: &'a TextDefinition, content: &'a str) -> Self {
        Self {
            definition,
            content,
        }
    }

    pub fn content(&self) -> &str {
        self.content
    }

    /// Bounding box of the shaped text.
    pub fn calculate_size(&self) -> Size {
        TEXT_MANAGER
            .get_or_init(TextManager::new)
            .calculate_text_size(self.content, self.definition)
    }
}

impl Drawable for Text<'_> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        let lines: Vec<&str> = self.content.lines().collect();
        let total_height = self.calculate_size().height();
        let line_height = if lines.is_empty() {
            0.0
        } else {
            total_height / lines.len() as f32
        };
        let y_offset = -(total_height + line_height) / 2.0;

        let mut rendered = svg_element::Text::new("")
            .set("x", position.x())
            .set("y", position.y() + y_offset)
            .set("text-anchor", self.definition.anchor().to_svg_value())
            .set("dominant-baseline", "central")
            .set("font-family", self.definition.font_family())
            .set("font-size", self.definition.font_size());

        for line in lines {
            let tspan = svg_element::TSpan::new("")
                .set("x", position.x())
                .set("dy", line_height)
                .add(SvgText::new(line));
            rendered = rendered.add(tspan);
        }

        output.add_to_layer(RenderLayer::Text, Box::new(rendered));
        output
    }

    fn size(&self) -> Size {
        self.calculate_size()
    }
}

/// Shared font system used to measure labels.
struct TextManager {
    font_system: Mutex<FontSystem>,
}

impl TextManager {
    fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }

    /// Measures `text` with real font metrics and shaping.
    fn calculate_text_size(&self, text: &str, text_def: &TextDefinition) -> Size {
        if text.is_empty() {
            return Size::default();
        }

        // Points to pixels at standard DPI
        let font_size_px = text_def.font_size() as f32 * 1.33;
        let metrics = Metrics::new(font_size_px, font_size_px * 1.15);
        let line_count = text.lines().count().max(1);

        let Ok(mut font_system) = self.font_system.lock() else {
            return estimate_size(text, font_size_px, metrics.line_height, line_count);
        };

        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);
        let attrs = Attrs::new().family(Family::Name(text_def.font_family()));

        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut max_width: f32 = 0.0;
        let mut total_height: f32 = 0.0;
        for run in buffer.layout_runs() {
            if let Some(last) = run.glyphs.last() {
                max_width = max_width.max(last.x + last.w);
            }
            total_height += metrics.line_height;
        }

        if max_width <= 0.0 || total_height <= 0.0 {
            debug!(text; "No glyphs measured, estimating text size");
            return estimate_size(text, font_size_px, metrics.line_height, line_count);
        }

        Size::new(max_width, total_height)
    }
}

/// Character-count estimate used when no font produced glyphs.
fn estimate_size(text: &str, font_size_px: f32, line_height: f32, line_count: usize) -> Size {
    let longest = text
        .lines()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    Size::new(
        longest as f32 * font_size_px * 0.55,
        line_height * line_count as f32,
    )
}

static TEXT_MANAGER: OnceLock<TextManager> = OnceLock::new();
