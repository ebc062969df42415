//! Deployment references for service calls.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::identifier::Id;

/// Maps service-call node ids to deployment references (ARNs, URLs).
///
/// Lookups never fail: a missing entry yields an empty reference, and the
/// emitted call becomes a placeholder.
///
/// Deserializes from a document with an `endpoints` table:
///
/// ```
/// use bpmn2faas_core::{endpoint::EndpointMap, identifier::Id};
///
/// let mut endpoints = EndpointMap::new();
/// endpoints.insert(Id::new("ServiceTask_1"), "arn:aws:s3:::orders");
///
/// assert_eq!(endpoints.get(Id::new("ServiceTask_1")), "arn:aws:s3:::orders");
/// assert_eq!(endpoints.get(Id::new("ServiceTask_2")), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EndpointMap {
    #[serde(default)]
    endpoints: IndexMap<Id, String>,
}

impl EndpointMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reference for `id`, replacing any previous one.
    pub fn insert(&mut self, id: Id, reference: impl Into<String>) {
        self.endpoints.insert(id, reference.into());
    }

    /// Returns the reference for `id`, or `""` when none is known.
    pub fn get(&self, id: Id) -> &str {
        self.endpoints.get(&id).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(Id, S)> for EndpointMap {
    fn from_iter<I: IntoIterator<Item = (Id, S)>>(iter: I) -> Self {
        Self {
            endpoints: iter
                .into_iter()
                .map(|(id, reference)| (id, reference.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_entry_is_empty() {
        let endpoints = EndpointMap::new();
        assert!(endpoints.is_empty());
        assert_eq!(endpoints.get(Id::new("absent")), "");
    }

    #[test]
    fn test_deserialize_from_toml() {
        let source = r#"
            [endpoints]
            ServiceTask_store = "arn:aws:s3:::invoices"
            ServiceTask_notify = "arn:aws:sns:eu-west-1:123456789012:done"
        "#;

        let endpoints: EndpointMap = toml::from_str(source).unwrap();

        assert_eq!(endpoints.len(), 2);
        assert_eq!(
            endpoints.get(Id::new("ServiceTask_store")),
            "arn:aws:s3:::invoices"
        );
        assert_eq!(
            endpoints.get(Id::new("ServiceTask_notify")),
            "arn:aws:sns:eu-west-1:123456789012:done"
        );
    }

    #[test]
    fn test_empty_document_deserializes() {
        let endpoints: EndpointMap = toml::from_str("").unwrap();
        assert!(endpoints.is_empty());
    }

    #[test]
    fn test_from_iterator() {
        let endpoints: EndpointMap = [(Id::new("a_ep"), "x"), (Id::new("b_ep"), "y")]
            .into_iter()
            .collect();
        assert_eq!(endpoints.get(Id::new("b_ep")), "y");
    }
}
