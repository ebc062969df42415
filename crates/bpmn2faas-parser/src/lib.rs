//! BPMN 2.0 XML front end for bpmn2faas.
//!
//! Reads a BPMN document and produces the [`Definitions`] model the compiler
//! works on. Parsing runs in two phases:
//!
//! 1. **Scanning** streams the XML and collects processes, flow nodes,
//!    sequence flows and lanes as raw, still unresolved elements.
//! 2. **Elaboration** resolves references, reads the `trigger`, `module` and
//!    `service` extension attributes and builds one graph per process.
//!
//! Failures are reported as [`ParseError`], which carries every diagnostic
//! found in the document with the byte spans they refer to.
//!
//! # Example
//!
//! ```
//! let source = r#"
//! <definitions xmlns:bpmn2faas="http://bpmn2faas">
//!   <process id="Orders">
//!     <laneSet><lane id="api"><flowNodeRef>start</flowNodeRef><flowNodeRef>done</flowNodeRef></lane></laneSet>
//!     <startEvent id="start" bpmn2faas:trigger="http"/>
//!     <endEvent id="done"/>
//!     <sequenceFlow id="f1" sourceRef="start" targetRef="done"/>
//!   </process>
//! </definitions>"#;
//!
//! let definitions = bpmn2faas_parser::parse(source).unwrap();
//! assert_eq!(definitions.lanes().count(), 1);
//! ```

pub mod error;

mod document_types;
mod elaborate;
mod scanner;
mod span;


pub use span::Span;

use log::{debug, trace};

use bpmn2faas_core::model::Definitions;

use error::ParseError;

/// Parse a BPMN 2.0 XML document.
///
/// # Errors
///
/// Returns [`ParseError`] when the document is not well-formed XML, holds no
/// process, or has elements that cannot be resolved.
pub fn parse(source: &str) -> Result<Definitions, ParseError> {
    let document = scanner::scan(source)?;
    trace!(processes_count = document.processes.len(); "Scanning complete");

    let definitions = elaborate::elaborate(document)?;
    debug!(lanes_count = definitions.lanes().count(); "Parsing complete");

    Ok(definitions)
}
