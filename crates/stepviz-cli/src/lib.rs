//! CLI logic for the Stepviz workflow tool.
//!
//! Reads JSON inputs, renders them through [`stepviz::WorkflowRenderer`] and
//! writes the result next to the caller.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command, GraphArgs, TimelineArgs, TimelineFormat};

use std::fs;

use log::info;

use stepviz::{
    StepvizError, WorkflowRenderer,
    config::AppConfig,
    timeline::{DataZoom, TimeWindow},
    viewport::CanvasOptions,
};

/// Canvas bounds used when no fixed size is requested.
const DEFAULT_MAX_WIDTH: f32 = 1200.0;
const DEFAULT_MAX_HEIGHT: f32 = 900.0;

/// Run the Stepviz CLI application
///
/// # Errors
///
/// Returns `StepvizError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Graph, layout and timeline errors
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), StepvizError> {
    let app_config = config::load_config(args.config.as_ref())?;

    match &args.command {
        Command::Graph(graph) => run_graph(graph, app_config),
        Command::Timeline(timeline) => run_timeline(timeline, app_config),
    }
}

fn run_graph(args: &GraphArgs, mut app_config: AppConfig) -> Result<(), StepvizError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing workflow definition"
    );

    if let Some(direction) = args.direction {
        app_config.layout_mut().set_direction(direction);
    }

    let renderer = WorkflowRenderer::new(app_config).with_legend(args.legend);
    let source = fs::read_to_string(&args.input)?;
    let definition = renderer.parse_definition(&source)?;

    let statuses = match &args.status {
        Some(path) => {
            let source = fs::read_to_string(path)?;
            renderer.parse_status_overlay(&source)?
        }
        None => Default::default(),
    };

    let canvas = CanvasOptions {
        width: args.width,
        height: args.height,
        max_width: Some(DEFAULT_MAX_WIDTH),
        max_height: Some(DEFAULT_MAX_HEIGHT),
    };

    let svg = renderer.render_graph_svg(&definition, Some(&statuses), canvas)?;

    fs::write(&args.output, svg)?;
    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}

fn run_timeline(args: &TimelineArgs, app_config: AppConfig) -> Result<(), StepvizError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing timeline"
    );

    let renderer = WorkflowRenderer::new(app_config);
    let source = fs::read_to_string(&args.input)?;
    let data = renderer.parse_timeline(&source)?;

    let time = match args.window {
        Some((start, end)) => TimeWindow::new(start, end)?,
        None => TimeWindow::full(),
    };
    let zoom = DataZoom {
        time,
        first_row: args.first_row,
    };
    let drill_down = args.drill_down.as_deref();

    let output = match args.format {
        TimelineFormat::Svg => renderer.render_timeline_svg(&data, &zoom, drill_down)?,
        TimelineFormat::Json => renderer.render_timeline_json(&data, &zoom, drill_down)?,
    };

    fs::write(&args.output, output)?;
    info!(output_file = args.output, format:? = args.format; "Timeline exported successfully");

    Ok(())
}
