//! Raw element types produced by the scanner.
//!
//! These mirror the XML closely: attribute values are still strings and
//! references are still unresolved. Every value keeps the span of the element
//! it came from so elaboration can point at it.

use crate::span::{Span, Spanned};

/// Attributes of one element, keyed by local name (namespace prefix dropped).
#[derive(Debug, Clone, Default)]
pub(crate) struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub(crate) fn push(&mut self, name: String, value: String) {
        self.entries.push((name, value));
    }

    /// Returns the value of the attribute with the given local name.
    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// A flow node: any event, activity or gateway directly inside a process.
#[derive(Debug, Clone)]
pub(crate) struct RawNode {
    pub(crate) tag: String,
    pub(crate) span: Span,
    pub(crate) attributes: Attributes,
    pub(crate) outgoing: Vec<Spanned<String>>,
}

/// A `sequenceFlow` element.
#[derive(Debug, Clone)]
pub(crate) struct RawFlow {
    pub(crate) span: Span,
    pub(crate) attributes: Attributes,
    pub(crate) condition: Option<String>,
}

/// A `lane` element and its `flowNodeRef` children.
#[derive(Debug, Clone)]
pub(crate) struct RawLane {
    pub(crate) span: Span,
    pub(crate) attributes: Attributes,
    pub(crate) refs: Vec<Spanned<String>>,
}

/// A `process` element and everything scanned inside it.
#[derive(Debug, Clone, Default)]
pub(crate) struct RawProcess {
    pub(crate) span: Span,
    pub(crate) attributes: Attributes,
    pub(crate) nodes: Vec<RawNode>,
    pub(crate) flows: Vec<RawFlow>,
    pub(crate) lanes: Vec<RawLane>,
}

/// The scanned document.
#[derive(Debug, Clone, Default)]
pub(crate) struct RawDocument {
    pub(crate) processes: Vec<RawProcess>,
}
