//! `bpmn2faas` binary: compiles the lanes of a BPMN document into functions.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};
use miette::GraphicalReportHandler;

use bpmn2faas::Bpmn2FaasError;
use bpmn2faas_cli::{Args, error_adapter::to_reportables};

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();
    init_logging(&args.log_level);
    debug!(args:?; "Parsed arguments");

    info!(input = args.input; "Compiling BPMN lanes");
    if let Err(err) = bpmn2faas_cli::run(&args) {
        report(&err);
        process::exit(1);
    }

    info!(output_dir = args.output; "All lanes written");
}

/// Route `log` through env_logger, falling back to `warn` for an unknown level.
fn init_logging(level: &str) {
    let log_level = LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {level}. Using 'warn' instead.");
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();
}

/// Render every diagnostic and failed lane of `err` as its own report.
fn report(err: &Bpmn2FaasError) {
    let reporter = GraphicalReportHandler::new();
    let reportables = to_reportables(err);

    for reportable in &reportables {
        let mut rendered = String::new();
        match reporter.render_report(&mut rendered, reportable) {
            Ok(()) => error!("{rendered}"),
            Err(_) => error!("{reportable}"),
        }
    }

    if reportables.len() > 1 {
        error!(problems = reportables.len(); "bpmn2faas failed");
    }
}
