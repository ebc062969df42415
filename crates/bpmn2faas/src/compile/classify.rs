//! Node classification: lane node ids to typed operations.

use indexmap::{IndexMap, IndexSet};
use log::trace;

use bpmn2faas_core::{
    endpoint::EndpointMap,
    identifier::Id,
    model::{Lane, NodeKind, ProcessGraph, ServiceCategory, TriggerKind},
    operation::{Gateway, JoiningGateway, Operation, OperationKind, ServiceCall, StartEvent, Task},
};

use super::CompileError;

/// A lane's operations before ordering.
#[derive(Debug)]
pub(super) struct Classified {
    pub(super) start: Operation,
    pub(super) trigger: TriggerKind,
    /// Every operation except the start event, keyed by node id.
    pub(super) pool: IndexMap<Id, Operation>,
    /// Distinct service categories, in lane order.
    pub(super) services: IndexSet<ServiceCategory>,
}

pub(super) fn classify(
    lane: &Lane,
    graph: &ProcessGraph,
    endpoints: &EndpointMap,
) -> Result<Classified, CompileError> {
    let mut start: Option<(Operation, TriggerKind)> = None;
    let mut pool = IndexMap::new();
    let mut services = IndexSet::new();

    for &id in lane.element_ids() {
        let node = graph.node(id).ok_or_else(|| CompileError::MissingNode {
            lane: lane.name(),
            id,
        })?;
        let outgoing: Vec<Id> = node.outgoing_targets().collect();
        let name = node.name().map(str::to_string);

        let kind = match node.kind() {
            NodeKind::StartEvent { trigger } => {
                if let Some((first, _)) = &start {
                    if first.id() == id {
                        continue;
                    }
                    return Err(CompileError::MultipleStartEvents {
                        lane: lane.name(),
                        first: first.id(),
                        second: id,
                    });
                }
                let operation = Operation::new(id, outgoing, OperationKind::StartEvent(StartEvent::new(*trigger)))
                    .with_name(name);
                start = Some((operation, *trigger));
                continue;
            }
            NodeKind::Task { module } => OperationKind::Task(Task::new(module.as_str())),
            NodeKind::ServiceTask { service } => {
                services.insert(service.clone());
                OperationKind::ServiceCall(ServiceCall::new(service.clone(), endpoints.get(id)))
            }
            NodeKind::ExclusiveGateway { .. } if node.is_splitting() => {
                let joining = graph
                    .joining_gateway(id)
                    .map(|join| JoiningGateway::new(join.id(), join.outgoing_targets().collect()));
                OperationKind::Gateway(Gateway::new(true, joining))
            }
            NodeKind::ExclusiveGateway { .. } => {
                trace!(id:%; "Skipping non-splitting gateway");
                continue;
            }
            NodeKind::EndEvent => OperationKind::EndEvent,
            NodeKind::Other(tag) => {
                trace!(id:%, tag:%; "Ignoring unsupported flow node");
                continue;
            }
        };

        pool.insert(id, Operation::new(id, outgoing, kind).with_name(name));
    }

    let Some((start, trigger)) = start else {
        return Err(CompileError::MissingStartEvent { lane: lane.name() });
    };

    Ok(Classified {
        start,
        trigger,
        pool,
        services,
    })
}
