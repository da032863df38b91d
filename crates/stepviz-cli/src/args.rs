//! Command-line argument definitions for the Stepviz CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. A subcommand selects what to render; global arguments
//! control configuration file selection and logging verbosity.

use clap::{Parser, Subcommand, ValueEnum};

use stepviz::config::Orientation;

/// Command-line arguments for the Stepviz workflow tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a workflow definition as a state machine graph
    Graph(GraphArgs),
    /// Render execution records as a timeline chart
    Timeline(TimelineArgs),
}

#[derive(clap::Args, Debug)]
pub struct GraphArgs {
    /// Path to the JSON workflow definition
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Flow direction, TB or LR. Defaults to the configured direction
    #[arg(short, long)]
    pub direction: Option<Orientation>,

    /// Path to a JSON status overlay used to color the states
    #[arg(short, long)]
    pub status: Option<String>,

    /// Fixed canvas width; the graph is scaled down to fit
    #[arg(long)]
    pub width: Option<f32>,

    /// Fixed canvas height
    #[arg(long)]
    pub height: Option<f32>,

    /// Append a legend of execution status colors
    #[arg(long)]
    pub legend: bool,
}

#[derive(clap::Args, Debug)]
pub struct TimelineArgs {
    /// Path to the JSON timeline records
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = TimelineFormat::Svg)]
    pub format: TimelineFormat,

    /// Chart only the direct children of this record id
    #[arg(long)]
    pub drill_down: Option<String>,

    /// Visible time window as start,end percentages, e.g. 0,50
    #[arg(long, value_parser = parse_window)]
    pub window: Option<(f32, f32)>,

    /// Index of the first visible row
    #[arg(long, default_value_t = 0)]
    pub first_row: usize,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineFormat {
    Svg,
    Json,
}

fn parse_window(value: &str) -> Result<(f32, f32), String> {
    let (start, end) = value
        .split_once(',')
        .ok_or_else(|| format!("Expected `start,end`, got `{value}`"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<f32>()
            .map_err(|err| format!("Invalid percentage `{part}`: {err}"))
    };
    Ok((parse(start)?, parse(end)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_arguments() {
        let args = Args::parse_from([
            "stepviz", "graph", "flow.json", "-o", "flow.svg", "--direction", "LR", "--legend",
        ]);

        let Command::Graph(graph) = args.command else {
            panic!("Expected graph command");
        };
        assert_eq!(graph.input, "flow.json");
        assert_eq!(graph.output, "flow.svg");
        assert_eq!(graph.direction, Some(Orientation::LeftRight));
        assert!(graph.legend);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_timeline_arguments() {
        let args = Args::parse_from([
            "stepviz",
            "timeline",
            "runs.json",
            "--format",
            "json",
            "--window",
            "10, 60",
            "--log-level",
            "debug",
        ]);

        let Command::Timeline(timeline) = args.command else {
            panic!("Expected timeline command");
        };
        assert_eq!(timeline.format, TimelineFormat::Json);
        assert_eq!(timeline.window, Some((10.0, 60.0)));
        assert_eq!(args.log_level, "debug");
    }

    #[test]
    fn test_invalid_window_is_rejected() {
        assert!(parse_window("10").is_err());
        assert!(parse_window("a,b").is_err());
    }
}
