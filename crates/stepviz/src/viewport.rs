//! Fitting, panning and zooming of a rendered graph.
//!
//! A [`Viewport`] maps graph coordinates onto the canvas through a
//! [`Transform`]. [`Viewport::fit`] computes the initial transform that
//! centers the padded content on the canvas, scaled down when it would not
//! fit. Pan and zoom then adjust the current transform, and
//! [`Viewport::reset`] restores the fitted one.

use std::fmt;

use log::{debug, trace};

use stepviz_core::geometry::{Point, Size};

use crate::config::ViewportConfig;

/// Translation followed by a uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    dx: f32,
    dy: f32,
    scale: f32,
}

impl Transform {
    pub fn new(dx: f32, dy: f32, scale: f32) -> Self {
        Self { dx, dy, scale }
    }

    pub fn dx(&self) -> f32 {
        self.dx
    }

    pub fn dy(&self) -> f32 {
        self.dy
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Maps a graph point onto the canvas.
    pub fn apply(&self, point: Point) -> Point {
        Point::new(
            point.x() * self.scale + self.dx,
            point.y() * self.scale + self.dy,
        )
    }

    /// Maps a canvas point back into graph coordinates.
    ///
    /// A zero scale maps everything onto the translation origin.
    pub fn invert(&self, point: Point) -> Point {
        if self.scale == 0.0 {
            return Point::default();
        }
        Point::new(
            (point.x() - self.dx) / self.scale,
            (point.y() - self.dy) / self.scale,
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }
}

/// Formats as an SVG `transform` attribute value.
impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "translate({},{}) scale({})",
            self.dx, self.dy, self.scale
        )
    }
}

/// Size constraints of the canvas a graph is fitted into.
///
/// A fixed `width`/`height` takes precedence over the matching maximum.
/// Without either, the content keeps its natural size along that axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CanvasOptions {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub max_width: Option<f32>,
    pub max_height: Option<f32>,
}

impl CanvasOptions {
    /// Canvas of exactly `width` by `height`.
    pub fn fixed(width: f32, height: f32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    /// Canvas that shrinks to the content but never exceeds the given size.
    pub fn bounded(max_width: f32, max_height: f32) -> Self {
        Self {
            max_width: Some(max_width),
            max_height: Some(max_height),
            ..Self::default()
        }
    }

    fn target_width(&self) -> Option<f32> {
        self.width.or(self.max_width)
    }

    fn target_height(&self) -> Option<f32> {
        self.height.or(self.max_height)
    }
}

/// Modifier state and delta of a wheel gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelEvent {
    /// Vertical wheel delta, forwarded for page scrolling.
    pub delta_y: f32,
    /// Whether ctrl or meta was held.
    pub modifier: bool,
    /// Accumulated gesture translation, relative to the fit.
    pub translate: Point,
    /// Accumulated gesture scale, relative to the fit.
    pub scale: f32,
}

/// Side effects a wheel gesture asks the host to perform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportSignal {
    /// Scroll the surrounding page by `offset`.
    ScrollPage { offset: f32 },
    /// Show the "hold ctrl to zoom" hint.
    ShowScrollHint,
}

/// Current and fitted transforms of a canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    canvas: Size,
    fit: Transform,
    current: Transform,
}

impl Viewport {
    /// Fits `content` into a canvas described by `options`.
    ///
    /// The content is padded on every side, then scaled down along the axis
    /// that overflows most. Content that fits keeps a scale of 1. The result
    /// is centered on the canvas.
    ///
    /// # Examples
    ///
    /// ```
    /// # use stepviz::config::ViewportConfig;
    /// # use stepviz::geometry::Size;
    /// # use stepviz::viewport::{CanvasOptions, Viewport};
    /// let viewport = Viewport::fit(
    ///     Size::new(920.0, 120.0),
    ///     CanvasOptions::fixed(500.0, 500.0),
    ///     &ViewportConfig::default(),
    /// );
    ///
    /// assert_eq!(viewport.transform().scale(), 0.5);
    /// ```
    pub fn fit(content: Size, options: CanvasOptions, config: &ViewportConfig) -> Self {
        let padding = config.padding();
        let padded = Size::new(
            content.width() + 2.0 * padding,
            content.height() + 2.0 * padding,
        );

        let scale_x = axis_scale(padded.width(), options.target_width());
        let scale_y = axis_scale(padded.height(), options.target_height());
        let scale = scale_x.min(scale_y);

        let canvas = Size::new(
            options.width.unwrap_or(padded.width() * scale),
            options.height.unwrap_or(padded.height() * scale),
        );

        let fit = Transform::new(
            (canvas.width() - padded.width() * scale) / 2.0 + padding * scale,
            (canvas.height() - padded.height() * scale) / 2.0 + padding * scale,
            scale,
        );

        debug!(
            width = canvas.width(),
            height = canvas.height(),
            scale = scale;
            "Viewport fitted"
        );

        Self {
            canvas,
            fit,
            current: fit,
        }
    }

    /// Canvas size chosen by the fit.
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    /// Transform currently applied to the graph.
    pub fn transform(&self) -> Transform {
        self.current
    }

    /// Transform computed by the fit.
    pub fn fit_transform(&self) -> Transform {
        self.fit
    }

    /// Moves the graph by a drag delta.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.current.dx += dx;
        self.current.dy += dy;
    }

    /// Multiplies the scale by `1 + diff`.
    ///
    /// Steps that would make the scale zero or negative are ignored.
    pub fn zoom(&mut self, diff: f32) {
        let scale = self.current.scale * (1.0 + diff);
        if scale <= 0.0 || !scale.is_finite() {
            debug!(scale = scale, diff = diff; "Ignoring zoom step");
            return;
        }
        self.current.scale = scale;
        trace!(scale = scale; "Zoomed");
    }

    pub fn zoom_in(&mut self, config: &ViewportConfig) {
        self.zoom(config.zoom_step());
    }

    pub fn zoom_out(&mut self, config: &ViewportConfig) {
        self.zoom(-config.zoom_step());
    }

    /// Handles a wheel gesture.
    ///
    /// With ctrl or meta held the gesture zooms and pans relative to the
    /// fitted transform. Otherwise the graph stays put and the host is asked
    /// to scroll the page instead.
    pub fn wheel(&mut self, event: WheelEvent) -> Vec<ViewportSignal> {
        if event.modifier {
            self.current = Transform::new(
                self.fit.dx + event.translate.x(),
                self.fit.dy + event.translate.y(),
                self.fit.scale * event.scale,
            );
            return Vec::new();
        }

        vec![
            ViewportSignal::ScrollPage {
                offset: event.delta_y,
            },
            ViewportSignal::ShowScrollHint,
        ]
    }

    /// Restores the fitted transform.
    pub fn reset(&mut self) {
        self.current = self.fit;
    }

    /// Maps a canvas point into graph coordinates.
    pub fn to_graph_point(&self, point: Point) -> Point {
        self.current.invert(point)
    }
}

/// Scale that makes `length` fit into `target`, never above 1.
fn axis_scale(length: f32, target: Option<f32>) -> f32 {
    match target {
        Some(target) if length > target && length > 0.0 => target / length,
        _ => 1.0,
    }
}
