//! Error codes for the BPMN front end.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Document errors (XML syntax, overall shape)
//! - `E1xx` - Structure errors (ids and references between elements)
//! - `E2xx` - Extension attribute errors (`trigger`, `service`, `module`)

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Document Errors (E0xx)
    // =========================================================================
    /// Malformed XML.
    ///
    /// The document is not well-formed: a tag is unclosed, mismatched, or an
    /// attribute cannot be read.
    E001,

    /// No process.
    ///
    /// The document does not contain a `process` element, so there is
    /// nothing to compile.
    E002,

    // =========================================================================
    // Structure Errors (E1xx)
    // =========================================================================
    /// Missing required attribute.
    ///
    /// A BPMN element lacks an attribute the standard requires, such as
    /// `id`, `sourceRef` or `targetRef`.
    E100,

    /// Duplicate element id.
    ///
    /// Two flow nodes or sequence flows in one process share an id.
    E101,

    /// Unknown flow endpoint.
    ///
    /// A sequence flow's `sourceRef` or `targetRef` names no flow node of
    /// its process.
    E102,

    /// Unknown outgoing flow.
    ///
    /// An `outgoing` child names no sequence flow of its process.
    E103,

    // =========================================================================
    // Extension Attribute Errors (E2xx)
    // =========================================================================
    /// Missing extension attribute.
    ///
    /// Start events need `trigger`, tasks need `module` and service tasks
    /// need `service`.
    E200,

    /// Invalid trigger kind.
    ///
    /// A start event's `trigger` is not one of `http`, `queue`, `pubsub`,
    /// `storage` or `schedule`.
    E201,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "malformed XML",
            ErrorCode::E002 => "no process",
            ErrorCode::E100 => "missing required attribute",
            ErrorCode::E101 => "duplicate element id",
            ErrorCode::E102 => "unknown flow endpoint",
            ErrorCode::E103 => "unknown outgoing flow",
            ErrorCode::E200 => "missing extension attribute",
            ErrorCode::E201 => "invalid trigger kind",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E101.to_string(), "E101");
        assert_eq!(ErrorCode::E201.to_string(), "E201");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E002.description(), "no process");
        assert_eq!(ErrorCode::E103.description(), "unknown outgoing flow");
        assert_eq!(ErrorCode::E200.description(), "missing extension attribute");
    }
}
