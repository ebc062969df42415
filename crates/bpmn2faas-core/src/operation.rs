//! Typed lane operations.
//!
//! Classification turns each flow node of a lane into an [`Operation`];
//! linearization then orders them into the path the function executes.
//! The set of variants is closed: every consumer matches [`OperationKind`]
//! exhaustively.

use std::fmt;

use serde::Serialize;

use crate::{
    identifier::Id,
    model::{ServiceCategory, TriggerKind},
};

/// A single step of a compiled lane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Operation {
    id: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    outgoing: Vec<Id>,
    indentation: u32,
    #[serde(flatten)]
    kind: OperationKind,
}

impl Operation {
    /// Create an operation with no indentation.
    pub fn new(id: Id, outgoing: Vec<Id>, kind: OperationKind) -> Self {
        Self {
            id,
            name: None,
            outgoing,
            indentation: 0,
            kind,
        }
    }

    /// Set the display name carried over from the model.
    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Ids of the nodes this operation flows into, in model order.
    pub fn outgoing(&self) -> &[Id] {
        &self.outgoing
    }

    /// The first outgoing target: the link linearization follows.
    pub fn next(&self) -> Option<Id> {
        self.outgoing.first().copied()
    }

    pub fn indentation(&self) -> u32 {
        self.indentation
    }

    /// Increase the indentation by one level. Indentation never decreases.
    pub fn indent(&mut self) {
        self.indentation += 1;
    }

    pub fn kind(&self) -> &OperationKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut OperationKind {
        &mut self.kind
    }

    /// Returns the gateway payload when this operation is a splitting gateway.
    pub fn as_splitting_gateway(&self) -> Option<&Gateway> {
        match &self.kind {
            OperationKind::Gateway(gateway) if gateway.is_splitting() => Some(gateway),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind.label(), self.id)
    }
}

/// The variant-specific part of an [`Operation`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationKind {
    StartEvent(StartEvent),
    Task(Task),
    ServiceCall(ServiceCall),
    Gateway(Gateway),
    EndEvent,
}

impl OperationKind {
    /// A short lowercase name for the variant, used in logs and errors.
    pub fn label(&self) -> &'static str {
        match self {
            OperationKind::StartEvent(_) => "start_event",
            OperationKind::Task(_) => "task",
            OperationKind::ServiceCall(_) => "service_call",
            OperationKind::Gateway(_) => "gateway",
            OperationKind::EndEvent => "end_event",
        }
    }
}

/// The event that triggers the function.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartEvent {
    trigger: TriggerKind,
}

impl StartEvent {
    pub fn new(trigger: TriggerKind) -> Self {
        Self { trigger }
    }

    pub fn trigger(&self) -> TriggerKind {
        self.trigger
    }
}

/// A call into user code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    module: String,
}

impl Task {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }
}

/// A call to a managed cloud service.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceCall {
    service: ServiceCategory,
    endpoint: String,
}

impl ServiceCall {
    /// Create a service call. An empty `endpoint` means no deployment
    /// reference was resolved for it.
    pub fn new(service: ServiceCategory, endpoint: impl Into<String>) -> Self {
        Self {
            service,
            endpoint: endpoint.into(),
        }
    }

    pub fn service(&self) -> &ServiceCategory {
        &self.service
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// The join of a splitting gateway, reduced to what linearization needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoiningGateway {
    id: Id,
    outgoing: Vec<Id>,
}

impl JoiningGateway {
    pub fn new(id: Id, outgoing: Vec<Id>) -> Self {
        Self { id, outgoing }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    /// Where execution continues once the branches converge.
    pub fn next(&self) -> Option<Id> {
        self.outgoing.first().copied()
    }
}

/// An exclusive gateway and, once linearized, the bodies of its branches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Gateway {
    is_splitting: bool,
    joining_gateway: Option<JoiningGateway>,
    branches: Vec<Branch>,
}

impl Gateway {
    pub fn new(is_splitting: bool, joining_gateway: Option<JoiningGateway>) -> Self {
        Self {
            is_splitting,
            joining_gateway,
            branches: Vec::new(),
        }
    }

    pub fn is_splitting(&self) -> bool {
        self.is_splitting
    }

    pub fn joining_gateway(&self) -> Option<&JoiningGateway> {
        self.joining_gateway.as_ref()
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn push_branch(&mut self, branch: Branch) {
        self.branches.push(branch);
    }
}

/// One outgoing path of a splitting gateway.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Branch {
    flow: Id,
    target: Id,
    #[serde(skip_serializing_if = "Option::is_none")]
    condition: Option<String>,
    is_default: bool,
    operations: Vec<Operation>,
}

impl Branch {
    pub fn new(flow: Id, target: Id, condition: Option<String>, is_default: bool) -> Self {
        Self {
            flow,
            target,
            condition,
            is_default,
            operations: Vec::new(),
        }
    }

    /// The sequence flow this branch leaves the gateway through.
    pub fn flow(&self) -> Id {
        self.flow
    }

    /// The first node of the branch.
    pub fn target(&self) -> Id {
        self.target
    }

    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    /// Returns `true` when the branch is taken if no other condition holds:
    /// either the gateway's default flow or a flow without a condition.
    pub fn is_default(&self) -> bool {
        self.is_default || self.condition.is_none()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn push(&mut self, operation: Operation) {
        self.operations.push(operation);
    }
}
