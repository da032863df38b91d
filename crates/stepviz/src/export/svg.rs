//! SVG export backend.
//!
//! [`SvgBuilder`] resolves the style configuration once (colors, fonts) into
//! an [`Svg`] exporter. Each exported document gets a fresh
//! [`ArrowDrawer`], so marker ids are scoped to that document.

mod graph;
mod timeline;

use indexmap::IndexMap;
use log::debug;
use svg::{Document, node::element as svg_element};

use stepviz_core::{
    color::Color,
    draw::{ArrowDrawer, TextDefinition},
    geometry::Size,
    semantic::ExecutionStatus,
};

use crate::{config::StyleConfig, export, timeline::TimelineChart};

pub use graph::GraphScene;

/// Builder for [`Svg`] exporters.
#[derive(Debug, Clone)]
pub struct SvgBuilder<'a> {
    style: &'a StyleConfig,
    id_prefix: String,
}

impl<'a> SvgBuilder<'a> {
    pub fn new(style: &'a StyleConfig) -> Self {
        Self {
            style,
            id_prefix: "stepviz".to_string(),
        }
    }

    /// Prefix of generated element ids, such as markers and clip paths.
    ///
    /// Documents embedded in the same page need distinct prefixes.
    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }

    /// # Errors
    ///
    /// Returns [`export::Error::Render`] if a configured color is invalid.
    pub fn build(self) -> Result<Svg, export::Error> {
        let invalid = |err: String| export::Error::Render(format!("Invalid style: {err}"));

        let mut status_colors = IndexMap::new();
        for status in ExecutionStatus::ALL {
            status_colors.insert(status, self.style.status_color(status).map_err(invalid)?);
        }

        Ok(Svg {
            id_prefix: self.id_prefix,
            background_color: self.style.background_color().map_err(invalid)?,
            status_colors,
            text: self.style.text_definition(),
            arrow_drawer: ArrowDrawer::default(),
        })
    }
}

/// SVG exporter for graphs and timelines.
#[derive(Debug)]
pub struct Svg {
    id_prefix: String,
    background_color: Option<Color>,
    status_colors: IndexMap<ExecutionStatus, Color>,
    text: TextDefinition,
    arrow_drawer: ArrowDrawer,
}

impl Svg {
    /// Starts a document of `size`, with a fresh marker session.
    fn begin_document(&mut self, size: Size, kind: &str) -> Document {
        self.arrow_drawer = ArrowDrawer::new(&format!("{}-{kind}", self.id_prefix));

        let doc = Document::new()
            .set("viewBox", format!("0 0 {} {}", size.width(), size.height()))
            .set("width", size.width())
            .set("height", size.height());

        self.add_background(doc, size)
    }

    fn add_background(&self, doc: Document, size: Size) -> Document {
        let Some(color) = self.background_color else {
            return doc;
        };
        doc.add(
            svg_element::Rectangle::new()
                .set("class", "background")
                .set("x", 0)
                .set("y", 0)
                .set("width", size.width())
                .set("height", size.height())
                .set("fill", color.to_string())
                .set("fill-opacity", color.alpha()),
        )
    }

    fn status_color(&self, status: ExecutionStatus) -> Color {
        self.status_colors.get(&status).copied().unwrap_or_default()
    }

    fn id(&self, name: &str) -> String {
        format!("{}-{name}", self.id_prefix)
    }
}

impl export::Exporter for Svg {
    fn export_graph(&mut self, scene: &GraphScene<'_>) -> Result<String, export::Error> {
        let doc = self.render_graph(scene)?;
        debug!("Graph SVG document rendered");
        Ok(doc.to_string())
    }

    fn export_timeline(&mut self, chart: &TimelineChart) -> Result<String, export::Error> {
        let doc = self.render_timeline(chart)?;
        debug!("Timeline SVG document rendered");
        Ok(doc.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_status_color_is_a_render_error() {
        let style: StyleConfig =
            serde_json::from_str(r##"{ "status_colors": { "Failed": "not-a-color" } }"##).unwrap();

        let err = SvgBuilder::new(&style).build().unwrap_err();
        assert!(matches!(err, export::Error::Render(_)));
        assert!(err.to_string().starts_with("Render error: Invalid style"));
    }

    #[test]
    fn test_background_is_drawn_when_configured() {
        let style: StyleConfig =
            serde_json::from_str(r##"{ "background_color": "#fafafa" }"##).unwrap();
        let mut svg = SvgBuilder::new(&style).build().unwrap();

        let doc = svg.begin_document(Size::new(100.0, 50.0), "graph").to_string();
        assert!(doc.contains(r#"class="background""#));
        assert!(doc.contains(r#"viewBox="0 0 100 50""#));
    }

    #[test]
    fn test_no_background_by_default() {
        let style = StyleConfig::default();
        let mut svg = SvgBuilder::new(&style).build().unwrap();

        let doc = svg.begin_document(Size::new(100.0, 50.0), "graph").to_string();
        assert!(!doc.contains("background"));
    }
}
