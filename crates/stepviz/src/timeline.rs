//! Mapping of execution records onto a Gantt-style chart.
//!
//! [`TimelineMapper::map`] places every [`TimelineRecord`] on its own
//! category row and turns its `[start_time, end_time]` interval into a bar
//! on a shared time axis. Each bar carries a duration label that goes inside
//! the bar when it has room and right next to it otherwise.
//!
//! The produced [`TimelineChart`] is a plain, serializable description of the
//! chart. It can be handed to an external charting library as JSON or drawn
//! natively by [`crate::export::svg`].
//!
//! # Data zoom
//!
//! [`DataZoom`] narrows what is shown:
//!
//! - the time window keeps every record that overlaps it, even partially;
//! - the row window shows a fixed number of category rows starting at
//!   `first_row`.
//!
//! Everything is clipped to the plot rectangle.

use std::collections::HashMap;

use log::{debug, info};
use serde::Serialize;

use stepviz_core::{
    draw::{Text, TextDefinition},
    semantic::{TimelineData, TimelineRecord},
};

use crate::{config::TimelineConfig, error::StepvizError};

const PLOT_MARGIN_LEFT: f32 = 80.0;
const PLOT_MARGIN_RIGHT: f32 = 40.0;
const PLOT_MARGIN_TOP: f32 = 60.0;
const PLOT_MARGIN_BOTTOM: f32 = 60.0;

/// Share of the row height taken by a bar.
const BAR_HEIGHT_RATIO: f32 = 0.8;
/// Room a label needs around it to go inside its bar.
const INSIDE_LABEL_SLACK: f32 = 40.0;
/// Gap between a bar and a label placed after it.
const OUTSIDE_LABEL_GAP: f32 = 5.0;
/// Number of intervals on the time axis.
const SPLIT_NUMBER: usize = 5;

const BAR_COLOR: &str = "#5470c6";
const INSIDE_LABEL_COLOR: &str = "#fff";
const OUTSIDE_LABEL_COLOR: &str = "#777";

/// Visible part of the time axis, in percent of the full data range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeWindow {
    start: f32,
    end: f32,
}

impl TimeWindow {
    /// # Errors
    ///
    /// Returns [`StepvizError::Timeline`] unless `0 <= start <= end <= 100`.
    pub fn new(start: f32, end: f32) -> Result<Self, StepvizError> {
        if !(0.0..=100.0).contains(&start) || !(0.0..=100.0).contains(&end) || start > end {
            return Err(StepvizError::Timeline(format!(
                "Invalid time window {start}%..{end}%, expected 0 <= start <= end <= 100"
            )));
        }
        Ok(Self { start, end })
    }

    /// The whole data range.
    pub fn full() -> Self {
        Self {
            start: 0.0,
            end: 100.0,
        }
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn end(&self) -> f32 {
        self.end
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::full()
    }
}

/// Time and row windows applied when mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DataZoom {
    pub time: TimeWindow,
    pub first_row: usize,
}

/// Rows currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowWindow {
    pub first: usize,
    pub count: usize,
}

/// Axis-aligned rectangle in chart coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Part of `self` inside `clip`, `None` when they do not overlap.
    pub fn clip(&self, clip: &Rect) -> Option<Rect> {
        let x1 = self.x.max(clip.x);
        let y1 = self.y.max(clip.y);
        let x2 = (self.x + self.width).min(clip.x + clip.width);
        let y2 = (self.y + self.height).min(clip.y + clip.height);
        (x2 > x1 && y2 > y1).then(|| Rect::new(x1, y1, x2 - x1, y2 - y1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPlacement {
    Inside,
    Outside,
}

/// Duration text of a bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationLabel {
    pub text: String,
    pub placement: LabelPlacement,
    pub color: &'static str,
    /// Area the text is centered in, `None` when clipped away.
    pub rect: Option<Rect>,
}

/// One record drawn as a bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
    pub id: String,
    pub name: String,
    pub row: usize,
    pub start_time: i64,
    pub end_time: i64,
    pub color: &'static str,
    /// Bar geometry, `None` when clipped away.
    pub rect: Option<Rect>,
    pub label: DurationLabel,
}

/// Polyline from a parent bar to a child bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub from: String,
    pub to: String,
    pub points: Vec<[f32; 2]>,
}

/// Label on the time axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTick {
    pub time: i64,
    pub x: f32,
    pub label: String,
}

/// Everything needed to draw a timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineChart {
    pub width: f32,
    pub height: f32,
    pub plot: Rect,
    pub row_height: f32,
    /// Record ids, one per row, top to bottom.
    pub categories: Vec<String>,
    pub row_window: RowWindow,
    pub time_window: TimeWindow,
    /// Visible time range in epoch milliseconds.
    pub time_range: [i64; 2],
    pub bars: Vec<Bar>,
    pub parent_connectors: Vec<Connector>,
    pub precedence_edges: Vec<Connector>,
    pub ticks: Vec<AxisTick>,
}

impl TimelineChart {
    /// Center of `row` on the y axis, if the row is visible.
    pub fn row_center(&self, row: usize) -> Option<f32> {
        let window = self.row_window;
        (window.first..window.first + window.count)
            .contains(&row)
            .then(|| self.plot.y + ((row - window.first) as f32 + 0.5) * self.row_height)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Maps timeline records to charts.
#[derive(Debug, Clone)]
pub struct TimelineMapper {
    config: TimelineConfig,
    text: TextDefinition,
}

impl TimelineMapper {
    pub fn new(config: TimelineConfig, text: TextDefinition) -> Self {
        Self { config, text }
    }

    /// Maps every record of `data`, filtered by `zoom`.
    pub fn map(&self, data: &TimelineData, zoom: &DataZoom) -> TimelineChart {
        let (full_min, full_max) = time_extent(data.nodes());
        let window_min = time_at(full_min, full_max, zoom.time.start);
        let window_max = time_at(full_min, full_max, zoom.time.end);

        // Weak filter: anything overlapping the window stays.
        let records: Vec<&TimelineRecord> = data
            .nodes()
            .iter()
            .filter(|record| record.end_time() >= window_min && record.start_time() <= window_max)
            .collect();

        let mut categories: Vec<String> = Vec::new();
        let mut rows: HashMap<&str, usize> = HashMap::new();
        for record in &records {
            if !rows.contains_key(record.id()) {
                rows.insert(record.id(), categories.len());
                categories.push(record.id().to_string());
            }
        }

        let count = self.config.visible_rows().min(categories.len());
        let first = zoom.first_row.min(categories.len() - count);
        let row_window = RowWindow { first, count };

        let row_height = self.config.row_height();
        let plot = Rect::new(
            PLOT_MARGIN_LEFT,
            PLOT_MARGIN_TOP,
            (self.config.width() - PLOT_MARGIN_LEFT - PLOT_MARGIN_RIGHT).max(0.0),
            count as f32 * row_height,
        );

        let mut chart = TimelineChart {
            width: self.config.width(),
            height: PLOT_MARGIN_TOP + plot.height + PLOT_MARGIN_BOTTOM,
            plot,
            row_height,
            categories,
            row_window,
            time_window: zoom.time,
            time_range: [window_min, window_max],
            bars: Vec::new(),
            parent_connectors: Vec::new(),
            precedence_edges: Vec::new(),
            ticks: Vec::new(),
        };
        let scale = TimeScale::new(window_min, window_max, &plot);

        chart.bars = records
            .iter()
            .filter_map(|record| {
                let row = rows[record.id()];
                let center = chart.row_center(row)?;
                Some(self.bar(record, row, center, &scale, &plot))
            })
            .collect();

        let visible: HashMap<&str, (&TimelineRecord, f32)> = records
            .iter()
            .filter_map(|record| {
                let center = chart.row_center(rows[record.id()])?;
                Some((record.id(), (*record, center)))
            })
            .collect();

        for record in &records {
            let Some(parent_id) = record.parent_id() else {
                continue;
            };
            let (Some((parent, parent_y)), Some((_, child_y))) =
                (visible.get(parent_id), visible.get(record.id()))
            else {
                continue;
            };
            let parent_x = scale.x(parent.start_time());
            chart.parent_connectors.push(Connector {
                from: parent.id().to_string(),
                to: record.id().to_string(),
                points: vec![
                    [parent_x, *parent_y],
                    [parent_x, *child_y],
                    [scale.x(record.start_time()), *child_y],
                ],
            });
        }

        for (from, to) in data.edges() {
            let (Some((from_record, from_y)), Some((to_record, to_y))) =
                (visible.get(from.as_str()), visible.get(to.as_str()))
            else {
                continue;
            };
            chart.precedence_edges.push(Connector {
                from: from.clone(),
                to: to.clone(),
                points: vec![
                    [scale.x(from_record.end_time()), *from_y],
                    [scale.x(to_record.start_time()), *to_y],
                ],
            });
        }

        chart.ticks = (0..=SPLIT_NUMBER)
            .map(|i| {
                let offset = span_ms(window_min, window_max) * i as i128 / SPLIT_NUMBER as i128;
                // Within [window_min, window_max]
                let time = (i128::from(window_min) + offset) as i64;
                AxisTick {
                    time,
                    x: scale.x(time),
                    label: format_time(time, span_ms(window_min, window_max)),
                }
            })
            .collect();

        debug!(
            records = data.nodes().len(),
            rows = chart.categories.len(),
            bars = chart.bars.len();
            "Timeline mapped"
        );
        chart
    }

    /// Maps only the direct children of record `parent_id`.
    ///
    /// Precedence edges are kept when both ends are children.
    ///
    /// # Errors
    ///
    /// Returns [`StepvizError::Timeline`] when no record has id `parent_id`.
    pub fn drill_down(
        &self,
        data: &TimelineData,
        parent_id: &str,
        zoom: &DataZoom,
    ) -> Result<TimelineChart, StepvizError> {
        if data.find(parent_id).is_none() {
            return Err(StepvizError::Timeline(format!(
                "Unknown timeline record `{parent_id}`"
            )));
        }

        let children: Vec<TimelineRecord> = data.children_of(parent_id).cloned().collect();
        let edges = data
            .edges()
            .iter()
            .filter(|(from, to)| {
                children.iter().any(|c| c.id() == from) && children.iter().any(|c| c.id() == to)
            })
            .cloned()
            .collect();

        info!(parent = parent_id, children = children.len(); "Drilling down");
        Ok(self.map(&TimelineData::new(children, edges), zoom))
    }

    fn bar(&self, record: &TimelineRecord, row: usize, center: f32, scale: &TimeScale, plot: &Rect) -> Bar {
        let x = scale.x(record.start_time());
        let length = scale.x(record.end_time()) - x;
        let height = self.config.row_height() * BAR_HEIGHT_RATIO;
        let y = center - height / 2.0;

        let text = format!("{} ms", record.duration_ms());
        let text_width = Text::new(&self.text, &text).calculate_size().width();
        let inside = length > text_width + INSIDE_LABEL_SLACK
            && x + length >= self.config.min_inside_label_offset();

        let label_rect = if inside {
            Rect::new(x, y, length, height)
        } else {
            Rect::new(x + length + OUTSIDE_LABEL_GAP, y, text_width, height)
        };

        Bar {
            id: record.id().to_string(),
            name: record.name().to_string(),
            row,
            start_time: record.start_time(),
            end_time: record.end_time(),
            color: BAR_COLOR,
            rect: Rect::new(x, y, length, height).clip(plot),
            label: DurationLabel {
                text,
                placement: if inside {
                    LabelPlacement::Inside
                } else {
                    LabelPlacement::Outside
                },
                color: if inside {
                    INSIDE_LABEL_COLOR
                } else {
                    OUTSIDE_LABEL_COLOR
                },
                rect: label_rect.clip(plot),
            },
        }
    }
}

/// Linear map from epoch milliseconds to x.
struct TimeScale {
    min: i64,
    span: f64,
    left: f32,
    width: f32,
}

impl TimeScale {
    fn new(min: i64, max: i64, plot: &Rect) -> Self {
        Self {
            min,
            span: span_ms(min, max) as f64,
            left: plot.x,
            width: plot.width,
        }
    }

    fn x(&self, time: i64) -> f32 {
        if self.span <= 0.0 {
            return self.left;
        }
        self.left + (span_ms(self.min, time) as f64 / self.span) as f32 * self.width
    }
}

fn time_extent(records: &[TimelineRecord]) -> (i64, i64) {
    let min = records.iter().map(TimelineRecord::start_time).min();
    let max = records.iter().map(TimelineRecord::end_time).max();
    match (min, max) {
        (Some(min), Some(max)) => (min, max.max(min)),
        _ => (0, 0),
    }
}

/// Signed distance from `from` to `to`, wide enough for any pair of epoch times.
fn span_ms(from: i64, to: i64) -> i128 {
    i128::from(to) - i128::from(from)
}

/// Time at `percent` of the way from `min` to `max`, clamped to that range.
fn time_at(min: i64, max: i64, percent: f32) -> i64 {
    let offset = (span_ms(min, max) as f64 * f64::from(percent) / 100.0).round() as i128;
    (i128::from(min) + offset).clamp(i128::from(min), i128::from(max)) as i64
}

/// UTC time of day, with milliseconds when the axis spans under a minute.
fn format_time(time: i64, span: i128) -> String {
    let ms = time.rem_euclid(86_400_000);
    let (hours, minutes, seconds) = (ms / 3_600_000, ms / 60_000 % 60, ms / 1000 % 60);
    if span < 60_000 {
        format!("{hours:02}:{minutes:02}:{seconds:02}.{:03}", ms % 1000)
    } else {
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn mapper() -> TimelineMapper {
        TimelineMapper::new(TimelineConfig::default(), TextDefinition::default())
    }

    fn nested_data() -> TimelineData {
        TimelineData::new(
            vec![
                TimelineRecord::new("1-1", "Prepare", 1_609_669_658_000, 1_609_669_660_000),
                TimelineRecord::new("1-2", "Process", 1_609_669_660_000, 1_609_669_667_000),
                TimelineRecord::new("2-1", "Fetch", 1_609_669_658_000, 1_609_669_659_000)
                    .with_parent("1-1"),
                TimelineRecord::new("2-2", "Store", 1_609_669_659_000, 1_609_669_660_000)
                    .with_parent("1-1"),
            ],
            vec![("2-1".to_string(), "2-2".to_string())],
        )
    }

    #[test]
    fn test_one_row_per_record_with_scaled_bars() {
        let chart = mapper().map(&nested_data(), &DataZoom::default());

        assert_eq!(chart.categories, ["1-1", "1-2", "2-1", "2-2"]);
        assert_eq!(chart.bars.len(), 4);
        assert_eq!(chart.time_range, [1_609_669_658_000, 1_609_669_667_000]);

        // 2 of 9 seconds over a 680 wide plot
        let first = chart.bars[0].rect.unwrap();
        assert_approx_eq!(f32, first.x, PLOT_MARGIN_LEFT);
        assert_approx_eq!(f32, first.width, 680.0 * 2.0 / 9.0, epsilon = 0.01);
        assert_approx_eq!(f32, first.height, 32.0);
        assert_eq!(chart.bars[1].label.text, "7000 ms");
    }

    #[test]
    fn test_short_bar_gets_label_outside() {
        let data = TimelineData::new(
            vec![
                TimelineRecord::new("long", "Long", 0, 1_000_000),
                TimelineRecord::new("short", "Short", 0, 5000),
            ],
            Vec::new(),
        );
        let chart = mapper().map(&data, &DataZoom::default());

        let bar = &chart.bars[1];
        let rect = bar.rect.unwrap();
        let label = bar.label.rect.unwrap();
        assert_eq!(bar.label.text, "5000 ms");
        assert_eq!(bar.label.placement, LabelPlacement::Outside);
        assert_eq!(bar.label.color, "#777");
        assert_approx_eq!(f32, label.x, rect.x + rect.width + 5.0, epsilon = 0.01);
    }

    #[test]
    fn test_wide_bar_gets_label_inside() {
        let data = TimelineData::new(vec![TimelineRecord::new("a", "A", 0, 5000)], Vec::new());
        let chart = mapper().map(&data, &DataZoom::default());

        let bar = &chart.bars[0];
        assert_eq!(bar.label.placement, LabelPlacement::Inside);
        assert_eq!(bar.label.color, "#fff");
        assert_eq!(bar.label.rect, bar.rect);
    }

    #[test]
    fn test_bar_ending_left_of_offset_keeps_label_outside() {
        let config: TimelineConfig =
            serde_json::from_str(r#"{ "min_inside_label_offset": 10000.0 }"#).unwrap();
        let mapper = TimelineMapper::new(config, TextDefinition::default());
        let data = TimelineData::new(vec![TimelineRecord::new("a", "A", 0, 5000)], Vec::new());

        let chart = mapper.map(&data, &DataZoom::default());
        assert_eq!(chart.bars[0].label.placement, LabelPlacement::Outside);
        // Label sits right of a full width bar, outside the plot
        assert!(chart.bars[0].label.rect.is_none());
    }

    #[test]
    fn test_parent_connector_runs_down_then_across() {
        let chart = mapper().map(&nested_data(), &DataZoom::default());

        let connector = chart
            .parent_connectors
            .iter()
            .find(|c| c.to == "2-2")
            .unwrap();
        assert_eq!(connector.from, "1-1");
        let [start, corner, end] = connector.points[..] else {
            panic!("expected three points");
        };
        assert_eq!(start[0], corner[0]);
        assert_eq!(corner[1], end[1]);
        assert!(end[0] > corner[0]);
        assert!(corner[1] > start[1]);
    }

    #[test]
    fn test_precedence_edge_runs_from_end_to_start() {
        let chart = mapper().map(&nested_data(), &DataZoom::default());

        assert_eq!(chart.precedence_edges.len(), 1);
        let edge = &chart.precedence_edges[0];
        let from = chart.bars.iter().find(|b| b.id == "2-1").unwrap().rect.unwrap();
        let to = chart.bars.iter().find(|b| b.id == "2-2").unwrap().rect.unwrap();
        assert_approx_eq!(f32, edge.points[0][0], from.x + from.width, epsilon = 0.01);
        assert_approx_eq!(f32, edge.points[1][0], to.x, epsilon = 0.01);
    }

    #[test]
    fn test_time_window_keeps_overlapping_records() {
        let data = TimelineData::new(
            vec![
                TimelineRecord::new("a", "A", 0, 40),
                TimelineRecord::new("b", "B", 30, 70),
                TimelineRecord::new("c", "C", 80, 100),
            ],
            Vec::new(),
        );
        let zoom = DataZoom {
            time: TimeWindow::new(50.0, 75.0).unwrap(),
            first_row: 0,
        };

        let chart = mapper().map(&data, &zoom);
        assert_eq!(chart.categories, ["b"]);
        assert_eq!(chart.time_range, [50, 75]);
        // Clipped to the window on the left
        assert_approx_eq!(f32, chart.bars[0].rect.unwrap().x, PLOT_MARGIN_LEFT);
    }

    #[test]
    fn test_row_window_shows_ten_rows() {
        let records = (0..15)
            .map(|i| TimelineRecord::new(format!("r{i}"), "R", i * 10, i * 10 + 5))
            .collect();
        let data = TimelineData::new(records, Vec::new());

        let chart = mapper().map(
            &data,
            &DataZoom {
                time: TimeWindow::full(),
                first_row: 12,
            },
        );

        assert_eq!(chart.categories.len(), 15);
        assert_eq!(chart.row_window, RowWindow { first: 5, count: 10 });
        assert_eq!(chart.bars.len(), 10);
        assert_eq!(chart.bars[0].id, "r5");
        assert_approx_eq!(f32, chart.plot.height, 400.0);
    }

    #[test]
    fn test_drill_down_keeps_children() {
        let chart = mapper()
            .drill_down(&nested_data(), "1-1", &DataZoom::default())
            .unwrap();
        assert_eq!(chart.categories, ["2-1", "2-2"]);
        assert_eq!(chart.precedence_edges.len(), 1);
        assert!(chart.parent_connectors.is_empty());
    }

    #[test]
    fn test_drill_down_unknown_parent() {
        let err = mapper()
            .drill_down(&nested_data(), "9-9", &DataZoom::default())
            .unwrap_err();
        assert!(matches!(err, StepvizError::Timeline(_)));
    }

    #[test]
    fn test_empty_data() {
        let chart = mapper().map(&TimelineData::default(), &DataZoom::default());
        assert!(chart.is_empty());
        assert!(chart.bars.is_empty());
        assert_eq!(chart.ticks.len(), SPLIT_NUMBER + 1);
    }

    #[test]
    fn test_invalid_time_window() {
        assert!(TimeWindow::new(60.0, 40.0).is_err());
        assert!(TimeWindow::new(-1.0, 40.0).is_err());
        assert!(TimeWindow::new(0.0, 100.0).is_ok());
    }

    #[test]
    fn test_chart_serializes_camel_case() {
        let chart = mapper().map(&nested_data(), &DataZoom::default());
        let json = serde_json::to_value(&chart).unwrap();

        assert_eq!(json["rowWindow"]["count"], 4);
        assert_eq!(json["bars"][0]["label"]["placement"], "inside");
        assert!(json["parentConnectors"].is_array());
    }

    #[test]
    fn test_span_of_whole_epoch_range() {
        let data = TimelineData::new(vec![TimelineRecord::new("a", "Forever", 0, i64::MAX)], vec![]);
        let chart = mapper().map(&data, &DataZoom::default());

        assert_eq!(chart.time_range, [0, i64::MAX]);
        assert_eq!(chart.bars.len(), 1);
        assert_eq!(chart.bars[0].label.text, format!("{} ms", i64::MAX));
        assert_eq!(chart.ticks.first().unwrap().time, 0);
        assert_eq!(chart.ticks.last().unwrap().time, i64::MAX);
        assert!(chart.ticks.windows(2).all(|pair| pair[0].time <= pair[1].time));
        assert!(chart.ticks.iter().all(|tick| tick.x.is_finite()));
    }

    #[test]
    fn test_records_before_epoch_minimum_window() {
        let data = TimelineData::new(
            vec![
                TimelineRecord::new("a", "Early", i64::MIN, 0),
                TimelineRecord::new("b", "Late", 0, 10),
            ],
            vec![("a".to_string(), "b".to_string())],
        );
        let zoom = DataZoom {
            time: TimeWindow::new(50.0, 100.0).unwrap(),
            first_row: 0,
        };
        let chart = mapper().map(&data, &zoom);

        let [min, max] = chart.time_range;
        assert!(min > i64::MIN && min <= 0);
        assert_eq!(max, 10);
        assert_eq!(chart.bars.len(), 2);
        assert_eq!(chart.bars[0].label.text, format!("{} ms", i64::MAX));
        assert!(chart.ticks.iter().all(|tick| tick.x.is_finite()));
        assert_eq!(chart.precedence_edges.len(), 1);
    }

    #[test]
    fn test_time_at_clamps_to_range() {
        assert_eq!(time_at(i64::MIN, i64::MAX, 0.0), i64::MIN);
        assert_eq!(time_at(i64::MIN, i64::MAX, 100.0), i64::MAX);
        assert_eq!(time_at(1000, 2000, 50.0), 1500);
    }

    #[test]
    fn test_time_labels() {
        assert_eq!(format_time(3_723_000, 120_000), "01:02:03");
        assert_eq!(format_time(3_723_045, 1000), "01:02:03.045");
    }
}
