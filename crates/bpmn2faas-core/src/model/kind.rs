//! Node kinds and the typed attributes attached to them.

use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::identifier::Id;

/// What starts a lane's function.
///
/// Queue and publish/subscribe triggers deliver records in batches, which
/// wraps the function body in a per-record loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    Http,
    Queue,
    PubSub,
    Storage,
    Schedule,
}

impl TriggerKind {
    /// Returns `true` for triggers that deliver a batch of records.
    pub fn is_batch(self) -> bool {
        matches!(self, TriggerKind::Queue | TriggerKind::PubSub)
    }

    /// Returns the canonical spelling of this trigger kind.
    pub fn as_str(self) -> &'static str {
        match self {
            TriggerKind::Http => "http",
            TriggerKind::Queue => "queue",
            TriggerKind::PubSub => "pub_sub",
            TriggerKind::Storage => "storage",
            TriggerKind::Schedule => "schedule",
        }
    }
}

impl FromStr for TriggerKind {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "http" => Ok(TriggerKind::Http),
            "queue" => Ok(TriggerKind::Queue),
            "pubsub" => Ok(TriggerKind::PubSub),
            "storage" | "objectstorage" => Ok(TriggerKind::Storage),
            "schedule" => Ok(TriggerKind::Schedule),
            _ => Err("Invalid trigger kind"),
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The abstract kind of backing service a service task talks to.
///
/// Unknown categories are kept verbatim so that new services flow through
/// the compiler untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServiceCategory {
    ObjectStorage,
    Queue,
    FifoQueue,
    PubSub,
    Other(String),
}

impl ServiceCategory {
    /// Returns the canonical spelling of this category.
    pub fn as_str(&self) -> &str {
        match self {
            ServiceCategory::ObjectStorage => "object_storage",
            ServiceCategory::Queue => "queue",
            ServiceCategory::FifoQueue => "fifo_queue",
            ServiceCategory::PubSub => "pub_sub",
            ServiceCategory::Other(name) => name,
        }
    }
}

impl From<&str> for ServiceCategory {
    fn from(s: &str) -> Self {
        match normalize(s).as_str() {
            "objectstorage" | "storage" => ServiceCategory::ObjectStorage,
            "queue" => ServiceCategory::Queue,
            "fifoqueue" => ServiceCategory::FifoQueue,
            "pubsub" => ServiceCategory::PubSub,
            _ => ServiceCategory::Other(s.to_string()),
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ServiceCategory {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The kind of a flow node together with its typed attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    StartEvent { trigger: TriggerKind },
    Task { module: String },
    ServiceTask { service: ServiceCategory },
    ExclusiveGateway { default_flow: Option<Id> },
    EndEvent,
    /// Any other flow node (user tasks, parallel gateways, intermediate events).
    /// Holds the element's local tag name.
    Other(String),
}

impl NodeKind {
    /// Returns `true` for exclusive gateways, splitting or joining.
    pub fn is_exclusive_gateway(&self) -> bool {
        matches!(self, NodeKind::ExclusiveGateway { .. })
    }
}

/// Lower-cases and strips separators so `PUBSUB`, `pub_sub` and `Pub-Sub`
/// all compare equal.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
