//! Diagnostics reported against a BPMN document.
//!
//! Besides the generic [`Diagnostic::error`] / [`Diagnostic::warning`]
//! builders, this module owns the wording of the problems every BPMN
//! document can have (broken XML, missing or duplicate ids, missing
//! `bpmn2faas:` extension attributes), so each code always reads the same.

use std::fmt;

use crate::{
    error::{Severity, error_code::ErrorCode, label::Label},
    span::Span,
};

const TRIGGER_HELP: &str = "use one of `http`, `queue`, `pubsub`, `storage`, `schedule`";

/// A problem in a BPMN document, pointing at the offending elements.
///
/// ```text
/// error[E201]: invalid trigger kind `carrier-pigeon`
///   --> orders.bpmn:12:5
///    |
/// 12 |     <bpmn2:startEvent id="Start_1" bpmn2faas:trigger="carrier-pigeon">
///    |     ^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^^ unknown trigger
///    |
///    = help: use one of `http`, `queue`, `pubsub`, `storage`, `schedule`
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// ```
    /// # use bpmn2faas_parser::error::{Diagnostic, ErrorCode};
    /// # use bpmn2faas_parser::Span;
    /// let diag = Diagnostic::error("sequence flow `Flow_1` target `Task_9` is not a flow node")
    ///     .with_code(ErrorCode::E102)
    ///     .with_label(Span::new(0..10), "unknown target");
    ///
    /// assert_eq!(diag.code(), Some(ErrorCode::E102));
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }

    /// Create a warning. Warnings are logged and never fail a parse.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(message)
        }
    }

    /// `E001`: the reader rejected the XML at `span`.
    pub fn malformed_xml(reason: impl fmt::Display, span: Span) -> Self {
        Self::error(format!("malformed XML: {reason}"))
            .with_code(ErrorCode::E001)
            .with_label(span, "here")
    }

    /// `E100`: a BPMN element lacks an attribute it cannot do without.
    pub fn missing_attribute(element: &str, attribute: &str, span: Span) -> Self {
        Self::error(format!("`{element}` has no `{attribute}` attribute"))
            .with_code(ErrorCode::E100)
            .with_label(span, format!("`{attribute}` missing"))
    }

    /// `E101`: `id` was already used by the element at `first`.
    pub fn duplicate_id(id: &str, span: Span, first: Span) -> Self {
        Self::error(format!("element id `{id}` is defined multiple times"))
            .with_code(ErrorCode::E101)
            .with_label(span, "duplicate definition")
            .with_secondary_label(first, "first defined here")
            .with_help("every flow node and sequence flow needs a unique id")
    }

    /// `E200`: flow node `id` lacks the `bpmn2faas:<attribute>` extension.
    pub fn missing_extension(element: &str, id: &str, attribute: &str, span: Span) -> Self {
        Self::error(format!("`{element}` `{id}` has no `{attribute}` attribute"))
            .with_code(ErrorCode::E200)
            .with_label(span, format!("`{attribute}` missing"))
            .with_help(format!("add `bpmn2faas:{attribute}=\"...\"` to the element"))
    }

    /// `E201`: a start event names a trigger kind nobody knows.
    pub fn invalid_trigger(trigger: &str, span: Span) -> Self {
        Self::error(format!("invalid trigger kind `{trigger}`"))
            .with_code(ErrorCode::E201)
            .with_label(span, "unknown trigger")
            .with_help(TRIGGER_HELP)
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Labels in the order they were added; the primary one comes first.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub(crate) fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Point at the element that is wrong.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Point at a related element, such as an earlier definition.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}
