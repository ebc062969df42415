//! bpmn2faas CLI library
//!
//! This module contains the core CLI logic: it compiles the lanes of a BPMN
//! document and writes one generated function per lane.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, OutputFormat};

use std::{collections::HashSet, fs, path::Path};

use log::{debug, info, warn};

use bpmn2faas::{
    Bpmn2FaasError, FunctionBuilder,
    emit::{Emitter, JsonEmitter},
    model::{Definitions, Lane, Process},
};

use config::ConfigError;

/// Run the bpmn2faas CLI application
///
/// This function parses the input document, compiles each selected lane and
/// writes the result to `<output>/<lane>.<extension>`. Lanes are processed in
/// document order and independently: a lane that fails is reported and the
/// remaining lanes are still compiled and written.
///
/// # Errors
///
/// Returns `Bpmn2FaasError` for:
/// - File I/O errors
/// - Configuration or endpoint map loading errors
/// - Parsing errors
/// - Lanes that failed to compile, render or write; several failures come
///   back together as [`Bpmn2FaasError::Lanes`]
pub fn run(args: &Args) -> Result<(), Bpmn2FaasError> {
    info!(
        input_path = args.input,
        output_dir = args.output;
        "Processing BPMN document"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let endpoints = config::load_endpoints(args.endpoints.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let builder = FunctionBuilder::new(app_config);
    let definitions = builder.parse(&source)?;
    let lanes = select_lanes(&definitions, &args.lanes)?;

    let (emitter, extension): (Box<dyn Emitter>, &str) = match args.format {
        OutputFormat::Code => (
            Box::new(builder.emitter()?),
            builder.config().emit().extension(),
        ),
        OutputFormat::Json => (Box::new(JsonEmitter), "json"),
    };

    let output_dir = Path::new(&args.output);
    fs::create_dir_all(output_dir)?;

    let mut stems = FileStems::default();
    let mut failures = Vec::new();
    for (process, lane) in lanes {
        let written = builder
            .compile_lane(process, lane, &endpoints)
            .and_then(|function| Ok(emitter.emit(&function)?))
            .and_then(|code| {
                let path = output_dir.join(format!("{}.{extension}", stems.claim(lane)));
                fs::write(&path, code)?;
                Ok(path)
            });

        match written {
            Ok(path) => {
                info!(lane = lane.name(), output_file = path.display().to_string(); "Function written");
            }
            Err(err) => {
                warn!(lane = lane.name(), error:% = err; "Lane failed, continuing with the remaining lanes");
                failures.push(err);
            }
        }
    }

    match Bpmn2FaasError::from_lane_errors(failures) {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// File name stems handed out so far in one run.
///
/// Every lane gets a stem no earlier lane has: its sanitized name, else the
/// name plus its sanitized id, else that plus a counter.
#[derive(Debug, Default)]
struct FileStems {
    used: HashSet<String>,
}

impl FileStems {
    fn claim(&mut self, lane: &Lane) -> String {
        let stem = file_stem(&lane.name());
        if self.used.insert(stem.clone()) {
            return stem;
        }

        let with_id = format!("{stem}_{}", file_stem(&lane.id().to_string()));
        let mut candidate = with_id.clone();
        let mut counter = 2;
        while !self.used.insert(candidate.clone()) {
            candidate = format!("{with_id}_{counter}");
            counter += 1;
        }

        warn!(lane = lane.name(), file_stem = candidate; "Lane file name already used");
        candidate
    }
}

/// Pick the lanes to compile, keeping document order.
///
/// An empty selection means every lane. A requested name that matches no
/// lane name or id is an error.
fn select_lanes<'a>(
    definitions: &'a Definitions,
    requested: &[String],
) -> Result<Vec<(&'a Process, &'a Lane)>, ConfigError> {
    if requested.is_empty() {
        return Ok(definitions.lanes().collect());
    }

    for name in requested {
        if !definitions.lanes().any(|(_, lane)| matches(lane, name)) {
            return Err(ConfigError::Validation(format!(
                "no lane named `{name}` in the document"
            )));
        }
    }

    let selected: Vec<_> = definitions
        .lanes()
        .filter(|(_, lane)| requested.iter().any(|name| matches(lane, name)))
        .collect();
    debug!(selected_count = selected.len(); "Lanes selected");
    Ok(selected)
}

fn matches(lane: &Lane, name: &str) -> bool {
    lane.name() == name || lane.id().to_string() == name
}

/// Turn a lane name into a file name stem.
///
/// Lower-cases the name and replaces every character that is not ASCII
/// alphanumeric with `_`.
fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();

    if stem.is_empty() {
        "lane".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use bpmn2faas::identifier::Id;

    use super::*;

    fn lane(id: &str, name: &str) -> Lane {
        Lane::new(Id::new(id), Some(name.to_string()), Vec::new())
    }

    #[test]
    fn test_stems_are_never_handed_out_twice() {
        let mut stems = FileStems::default();

        assert_eq!(stems.claim(&lane("A", "order_b")), "order_b");
        assert_eq!(stems.claim(&lane("X", "Order")), "order");
        // `order` + id `B` would be `order_b`, which the first lane already has
        assert_eq!(stems.claim(&lane("B", "order")), "order_b_2");
        assert_eq!(stems.claim(&lane("B", "ORDER")), "order_b_3");
    }

    #[test]
    fn test_colliding_name_takes_lane_id() {
        let mut stems = FileStems::default();

        assert_eq!(stems.claim(&lane("Lane_1", "Order API")), "order_api");
        assert_eq!(stems.claim(&lane("Lane_2", "order api")), "order_api_lane_2");
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("Order API"), "order_api");
        assert_eq!(file_stem("Lane_1"), "lane_1");
        assert_eq!(file_stem("Prüfung/Export"), "pr_fung_export");
        assert_eq!(file_stem(""), "lane");
    }
}
