//! Command-line argument definitions for the bpmn2faas CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the input document, output directory,
//! endpoint map, configuration file, lane selection and logging verbosity.

use clap::{Parser, ValueEnum};

/// Command-line arguments for the bpmn2faas compiler
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input BPMN file
    #[arg(help = "Path to the input BPMN 2.0 XML file")]
    pub input: String,

    /// Directory the generated functions are written to
    #[arg(short, long, default_value = "out")]
    pub output: String,

    /// Path to the endpoint map (TOML with an `[endpoints]` table)
    #[arg(short, long)]
    pub endpoints: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Only compile the lane with this name or id (repeatable)
    #[arg(long = "lane", value_name = "LANE")]
    pub lanes: Vec<String>,

    /// What to write for each lane
    #[arg(long, value_enum, default_value_t = OutputFormat::Code)]
    pub format: OutputFormat,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// Output written for each lane.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Source code rendered from the templates
    #[default]
    Code,
    /// The compiled function descriptor as JSON
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["bpmn2faas", "orders.bpmn"]).unwrap();
        assert_eq!(args.input, "orders.bpmn");
        assert_eq!(args.output, "out");
        assert_eq!(args.format, OutputFormat::Code);
        assert!(args.lanes.is_empty());
        assert!(args.endpoints.is_none());
    }

    #[test]
    fn test_repeated_lanes_and_format() {
        let args = Args::try_parse_from([
            "bpmn2faas",
            "orders.bpmn",
            "-o",
            "build",
            "-e",
            "endpoints.toml",
            "--lane",
            "Order API",
            "--lane",
            "Lane_Worker",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(args.output, "build");
        assert_eq!(args.endpoints.as_deref(), Some("endpoints.toml"));
        assert_eq!(args.lanes, vec!["Order API", "Lane_Worker"]);
        assert_eq!(args.format, OutputFormat::Json);
    }
}
