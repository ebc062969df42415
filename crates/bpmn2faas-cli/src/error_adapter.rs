//! Error adapter for converting [`Bpmn2FaasError`] to miette diagnostics.
//!
//! This module bridges the library's error types and miette's report
//! formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! When a [`bpmn2faas_parser::error::ParseError`] contains multiple diagnostics,
//! each diagnostic is rendered independently against the BPMN source.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use bpmn2faas::{Bpmn2FaasError, compile::CompileError};
use bpmn2faas_parser::error::Diagnostic;

/// Adapter for a single parser diagnostic.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
    /// Source document for displaying snippets
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for [`Bpmn2FaasError`] variants without source locations.
///
/// Compile errors refer to lanes and element ids rather than byte ranges, so
/// they are reported with a code and a hint only.
pub struct ErrorAdapter<'a>(pub &'a Bpmn2FaasError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            Bpmn2FaasError::Io(_) => "bpmn2faas::io",
            Bpmn2FaasError::Parse { .. } => return None,
            Bpmn2FaasError::Compile(_) => "bpmn2faas::compile",
            Bpmn2FaasError::Emit(_) => "bpmn2faas::emit",
            Bpmn2FaasError::Lanes(_) => "bpmn2faas::lanes",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let Bpmn2FaasError::Compile(err) = &self.0 else {
            return None;
        };
        let help = match err {
            CompileError::MissingStartEvent { .. } => {
                "add a start event with a `trigger` attribute to the lane"
            }
            CompileError::MultipleStartEvents { .. } => {
                "move all but one start event into a lane of its own"
            }
            CompileError::MissingNode { .. } => {
                "check the lane's `flowNodeRef` entries against the process elements"
            }
            CompileError::UnresolvedLink { .. } => {
                "connect the lane's operations into a single path from its start event"
            }
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A parser diagnostic with source location information.
    Diagnostic(DiagnosticAdapter<'a>),
    /// An error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

fn span_to_miette(span: bpmn2faas_parser::Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Convert a [`Bpmn2FaasError`] into a list of reportable errors.
///
/// [`Bpmn2FaasError::Parse`] yields one [`Reportable`] per diagnostic and
/// [`Bpmn2FaasError::Lanes`] one per failed lane; every other variant yields
/// a single one.
pub fn to_reportables(err: &Bpmn2FaasError) -> Vec<Reportable<'_>> {
    match err {
        Bpmn2FaasError::Parse {
            err: parse_err,
            src,
        } => parse_err
            .diagnostics()
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, src)))
            .collect(),
        Bpmn2FaasError::Lanes(errors) => errors.iter().flat_map(to_reportables).collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

#[cfg(test)]
mod tests {
    use bpmn2faas_parser::{
        Span,
        error::{ErrorCode, ParseError},
    };

    use super::*;

    #[test]
    fn test_single_diagnostic() {
        let diag = Diagnostic::error("start event `Start_1` has no `trigger` attribute")
            .with_code(ErrorCode::E200)
            .with_label(Span::new(0..5), "missing trigger")
            .with_help("add `trigger=\"http\"`");
        let parse_err = ParseError::from(diag);
        let err = Bpmn2FaasError::new_parse_error(parse_err, "<definitions/>");

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        match &reportables[0] {
            Reportable::Diagnostic(d) => {
                assert_eq!(
                    d.to_string(),
                    "start event `Start_1` has no `trigger` attribute"
                );
                assert_eq!(d.code().unwrap().to_string(), "E200");
            }
            Reportable::Error(_) => panic!("Expected Diagnostic"),
        }
    }

    #[test]
    fn test_multiple_diagnostics() {
        let diags = vec![
            Diagnostic::error("first error")
                .with_code(ErrorCode::E101)
                .with_label(Span::new(0..5), "first"),
            Diagnostic::error("second error")
                .with_code(ErrorCode::E102)
                .with_label(Span::new(10..15), "second")
                .with_help("help for second"),
            Diagnostic::error("third error").with_label(Span::new(20..25), "third"),
        ];
        let parse_err = ParseError::from(diags);
        let err = Bpmn2FaasError::new_parse_error(parse_err, "source document here...");

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 3);
        assert_eq!(reportables[0].to_string(), "first error");
        assert_eq!(reportables[1].to_string(), "second error");
        assert_eq!(reportables[2].to_string(), "third error");
    }

    #[test]
    fn test_compile_error_has_code_and_help() {
        let err = Bpmn2FaasError::Compile(CompileError::MissingStartEvent {
            lane: "Worker".to_string(),
        });

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "lane `Worker` has no start event");
                assert_eq!(e.code().unwrap().to_string(), "bpmn2faas::compile");
                assert!(e.help().is_some());
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_failed_lanes_are_reported_one_by_one() {
        let err = Bpmn2FaasError::Lanes(vec![
            Bpmn2FaasError::Compile(CompileError::MissingStartEvent {
                lane: "Api".to_string(),
            }),
            Bpmn2FaasError::Compile(CompileError::MissingStartEvent {
                lane: "Worker".to_string(),
            }),
        ]);

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 2);
        assert_eq!(reportables[0].to_string(), "lane `Api` has no start event");
        assert_eq!(reportables[1].to_string(), "lane `Worker` has no start event");
    }

    #[test]
    fn test_io_error_has_no_help() {
        let err = Bpmn2FaasError::Io(std::io::Error::other("disk full"));

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        assert_eq!(reportables[0].to_string(), "I/O error: disk full");
        assert_eq!(reportables[0].code().unwrap().to_string(), "bpmn2faas::io");
        assert!(reportables[0].help().is_none());
    }

    #[test]
    fn test_primary_flag_on_labels() {
        let diag = Diagnostic::error("element id `Task_1` is defined multiple times")
            .with_label(Span::new(0..5), "duplicate definition")
            .with_secondary_label(Span::new(10..15), "first defined here");

        let adapter = DiagnosticAdapter::new(&diag, "some source document");

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].label(), Some("duplicate definition"));
        assert!(labels[0].primary());
        assert_eq!(labels[1].label(), Some("first defined here"));
        assert!(!labels[1].primary());
    }
}
