//! Configuration types for stepviz rendering.
//!
//! This module provides configuration structures that control how workflows
//! are laid out and styled, how the viewport behaves, and how timelines are
//! charted. All types implement [`serde::Deserialize`] so they can be loaded
//! from TOML; every field falls back to its default when omitted.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`LayoutConfig`] - Flow direction and spacing between ranks, nodes and edges.
//! - [`StyleConfig`] - Background, fonts and execution status colors.
//! - [`ViewportConfig`] - Fit padding and zoom step.
//! - [`TimelineConfig`] - Timeline chart geometry.
//!
//! # Example
//!
//! ```
//! # use stepviz::config::{AppConfig, Orientation};
//! let config = AppConfig::default();
//! assert_eq!(config.layout().direction(), Orientation::TopBottom);
//! assert!(config.style().background_color().is_ok());
//! ```

use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use serde::Deserialize;

use stepviz_core::{color::Color, draw::TextDefinition, semantic::ExecutionStatus};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,

    /// Viewport configuration section.
    #[serde(default)]
    viewport: ViewportConfig,

    /// Timeline configuration section.
    #[serde(default)]
    timeline: TimelineConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(
        layout: LayoutConfig,
        style: StyleConfig,
        viewport: ViewportConfig,
        timeline: TimelineConfig,
    ) -> Self {
        Self {
            layout,
            style,
            viewport,
            timeline,
        }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut LayoutConfig {
        &mut self.layout
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn viewport(&self) -> &ViewportConfig {
        &self.viewport
    }

    pub fn timeline(&self) -> &TimelineConfig {
        &self.timeline
    }
}

/// Direction in which the workflow flows.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Orientation {
    /// Ranks stacked top to bottom
    #[default]
    #[serde(rename = "TB", alias = "TD")]
    TopBottom,
    /// Ranks placed left to right
    #[serde(rename = "LR")]
    LeftRight,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TopBottom => "TB",
            Self::LeftRight => "LR",
        }
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TB" | "TD" => Ok(Self::TopBottom),
            "LR" => Ok(Self::LeftRight),
            _ => Err(format!("Invalid direction `{s}`, expected TB or LR")),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flow direction and spacing used by the layered layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    direction: Orientation,
    rank_spacing: f32,
    node_spacing: f32,
    edge_spacing: f32,
}

impl LayoutConfig {
    pub fn new(direction: Orientation) -> Self {
        Self {
            direction,
            ..Self::default()
        }
    }

    pub fn direction(&self) -> Orientation {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Orientation) {
        self.direction = direction;
    }

    /// Gap between consecutive ranks.
    pub fn rank_spacing(&self) -> f32 {
        self.rank_spacing
    }

    /// Gap between neighbouring nodes of the same rank.
    pub fn node_spacing(&self) -> f32 {
        self.node_spacing
    }

    /// Offset between parallel edges joining the same two nodes.
    pub fn edge_spacing(&self) -> f32 {
        self.edge_spacing
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            direction: Orientation::default(),
            rank_spacing: 25.0,
            node_spacing: 40.0,
            edge_spacing: 30.0,
        }
    }
}

/// Visual styling configuration for rendered documents.
///
/// `status_colors` maps an [`ExecutionStatus`] name to a color string and
/// overrides the built-in palette for that status only.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    background_color: Option<String>,
    font_family: String,
    font_size: u16,
    status_colors: IndexMap<String, String>,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    /// Fill color used for states with the given `status`.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured override cannot be parsed.
    pub fn status_color(&self, status: ExecutionStatus) -> Result<Color, String> {
        match self.status_colors.get(status.css_class()) {
            Some(color) => Color::new(color)
                .map_err(|err| format!("Invalid color for status {status} in config: {err}")),
            None => Color::new(default_status_color(status)),
        }
    }

    /// Label style derived from the font settings.
    pub fn text_definition(&self) -> TextDefinition {
        let mut text = TextDefinition::new();
        text.set_font_family(&self.font_family);
        text.set_font_size(self.font_size);
        text
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            font_family: "sans-serif".to_string(),
            font_size: 12,
            status_colors: IndexMap::new(),
        }
    }
}

fn default_status_color(status: ExecutionStatus) -> &'static str {
    match status {
        ExecutionStatus::NotYetStarted => "#ffffff",
        ExecutionStatus::InProgress => "#4f8fd6",
        ExecutionStatus::Succeeded => "#2bd62e",
        ExecutionStatus::Failed => "#de322f",
        ExecutionStatus::Cancelled => "#bcbcbc",
        ExecutionStatus::CaughtError => "#ffa500",
    }
}

/// Viewport fitting and zoom settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    padding: f32,
    zoom_step: f32,
}

impl ViewportConfig {
    /// Padding added around the content on every side before fitting.
    pub fn padding(&self) -> f32 {
        self.padding
    }

    /// Relative scale change of one zoom in/out step.
    pub fn zoom_step(&self) -> f32 {
        self.zoom_step
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            padding: 40.0,
            zoom_step: 0.4,
        }
    }
}

/// Geometry of timeline charts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    width: f32,
    row_height: f32,
    min_inside_label_offset: f32,
    visible_rows: usize,
}

impl TimelineConfig {
    /// Total chart width, axis labels included.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Height of one category row. Bars take 80% of it.
    pub fn row_height(&self) -> f32 {
        self.row_height
    }

    /// A duration label only goes inside its bar when the bar reaches at least this x.
    pub fn min_inside_label_offset(&self) -> f32 {
        self.min_inside_label_offset
    }

    /// Rows shown at once by the row window.
    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            row_height: 40.0,
            min_inside_label_offset: 180.0,
            visible_rows: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_from_str() {
        assert_eq!("TB".parse::<Orientation>(), Ok(Orientation::TopBottom));
        assert_eq!("td".parse::<Orientation>(), Ok(Orientation::TopBottom));
        assert_eq!("LR".parse::<Orientation>(), Ok(Orientation::LeftRight));
        assert!("RL".parse::<Orientation>().is_err());
    }

    #[test]
    fn test_status_color_override() {
        let mut style = StyleConfig::default();
        style
            .status_colors
            .insert("Failed".to_string(), "purple".to_string());

        assert_eq!(
            style.status_color(ExecutionStatus::Failed).unwrap(),
            Color::new("purple").unwrap()
        );
        assert_eq!(
            style.status_color(ExecutionStatus::Succeeded).unwrap(),
            Color::new("#2bd62e").unwrap()
        );
    }

    #[test]
    fn test_invalid_background_color() {
        let style = StyleConfig {
            background_color: Some("not-a-color".to_string()),
            ..StyleConfig::default()
        };
        assert!(style.background_color().is_err());
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.layout().rank_spacing(), 25.0);
        assert_eq!(config.layout().node_spacing(), 40.0);
        assert_eq!(config.viewport().padding(), 40.0);
        assert_eq!(config.viewport().zoom_step(), 0.4);
        assert_eq!(config.timeline().min_inside_label_offset(), 180.0);
        assert_eq!(config.timeline().visible_rows(), 10);
    }
}
