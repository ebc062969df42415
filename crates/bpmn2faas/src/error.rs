//! Error types for bpmn2faas operations.
//!
//! [`Bpmn2FaasError`] wraps everything that can go wrong between reading a
//! BPMN document and writing rendered functions.

use std::io;

use thiserror::Error;

use bpmn2faas_parser::error::ParseError;

use crate::{compile::CompileError, emit::EmitError};

/// The main error type for bpmn2faas operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the document source next to the diagnostics so
/// that reporters can show the offending XML.
#[derive(Debug, Error)]
pub enum Bpmn2FaasError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    /// Several lanes failed independently; each keeps its own error.
    #[error("{} lanes failed: {}", .0.len(), join_messages(.0))]
    Lanes(Vec<Bpmn2FaasError>),
}

fn join_messages(errors: &[Bpmn2FaasError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl Bpmn2FaasError {
    /// Create a new `Parse` error with the associated source document.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }

    /// Combine the errors of lanes compiled independently.
    ///
    /// Returns `None` when nothing failed, and the error itself when exactly
    /// one lane failed.
    pub fn from_lane_errors(mut errors: Vec<Bpmn2FaasError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Lanes(errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing_start(lane: &str) -> Bpmn2FaasError {
        Bpmn2FaasError::Compile(CompileError::MissingStartEvent {
            lane: lane.to_string(),
        })
    }

    #[test]
    fn test_no_lane_errors() {
        assert!(Bpmn2FaasError::from_lane_errors(Vec::new()).is_none());
    }

    #[test]
    fn test_single_lane_error_is_unwrapped() {
        let err = Bpmn2FaasError::from_lane_errors(vec![missing_start("Api")]).unwrap();
        assert!(matches!(err, Bpmn2FaasError::Compile(_)));
    }

    #[test]
    fn test_several_lane_errors_are_kept() {
        let err =
            Bpmn2FaasError::from_lane_errors(vec![missing_start("Api"), missing_start("Worker")])
                .unwrap();

        assert_eq!(
            err.to_string(),
            "2 lanes failed: lane `Api` has no start event; lane `Worker` has no start event"
        );
        assert!(matches!(&err, Bpmn2FaasError::Lanes(errors) if errors.len() == 2));
    }
}
