//! Elaboration phase: raw elements to the process model.
//!
//! Resolves ids, orders each node's outgoing flows, reads the extension
//! attributes into typed [`NodeKind`]s and builds one [`ProcessGraph`] per
//! process. Problems are collected rather than returned one at a time, so a
//! single run reports every broken element.

use indexmap::IndexMap;
use log::debug;

use bpmn2faas_core::{
    identifier::Id,
    model::{
        Definitions, Flow, Lane, Node, NodeKind, Process, ProcessGraph, ServiceCategory,
        TriggerKind,
    },
};

use crate::{
    document_types::{Attributes, RawDocument, RawFlow, RawNode, RawProcess},
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
};

/// Elaborate a scanned document.
pub(crate) fn elaborate(document: RawDocument) -> Result<Definitions, ParseError> {
    if document.processes.is_empty() {
        return Err(Diagnostic::error("document contains no `process` element")
            .with_code(ErrorCode::E002)
            .with_help("lanes are compiled from the flow nodes of a BPMN process")
            .into());
    }

    let mut collector = DiagnosticCollector::new();
    let processes: Vec<Process> = document
        .processes
        .iter()
        .filter_map(|process| ProcessElaborator::new(&mut collector).elaborate(process))
        .collect();
    collector.finish()?;

    debug!(processes_count = processes.len(); "Document elaborated");
    Ok(Definitions::new(processes))
}

/// A sequence flow whose id and endpoints have been read.
struct ResolvedFlow<'a> {
    raw: &'a RawFlow,
    flow: Flow,
}

struct ProcessElaborator<'c> {
    collector: &'c mut DiagnosticCollector,
    /// Every element id of the process and where it was first defined.
    seen: IndexMap<String, Span>,
}

impl<'c> ProcessElaborator<'c> {
    fn new(collector: &'c mut DiagnosticCollector) -> Self {
        Self {
            collector,
            seen: IndexMap::new(),
        }
    }

    fn elaborate(mut self, raw: &RawProcess) -> Option<Process> {
        let id = self.required(&raw.attributes, "id", "process", raw.span);

        let nodes: Vec<(&RawNode, Node)> = raw
            .nodes
            .iter()
            .filter_map(|node| self.node(node).map(|resolved| (node, resolved)))
            .collect();
        let node_ids: IndexMap<Id, ()> = nodes.iter().map(|(_, node)| (node.id(), ())).collect();

        let flows: Vec<ResolvedFlow<'_>> = raw
            .flows
            .iter()
            .filter_map(|flow| self.flow(flow, &node_ids))
            .collect();

        let lanes: Vec<Lane> = raw
            .lanes
            .iter()
            .filter_map(|lane| {
                let id = self.required(&lane.attributes, "id", "lane", lane.span)?;
                let name = lane.attributes.get("name").map(str::to_string);
                let refs = lane.refs.iter().map(|r| Id::new(r.inner())).collect();
                Some(Lane::new(Id::new(&id), name, refs))
            })
            .collect();

        let mut builder = ProcessGraph::builder();
        for (raw_node, node) in &nodes {
            for flow in self.ordered_outgoing(raw_node, node.id(), &flows) {
                builder.add_flow(flow);
            }
        }
        for (_, node) in nodes {
            builder.add_node(node);
        }

        let id = id?;
        if self.collector.has_errors() {
            return None;
        }

        match builder.build() {
            Ok(graph) => {
                debug!(
                    process:% = id,
                    nodes_count = graph.len(),
                    lanes_count = lanes.len();
                    "Process elaborated"
                );
                Some(Process::new(Id::new(&id), graph, lanes))
            }
            Err(err) => {
                self.collector.emit(
                    Diagnostic::error(err.to_string())
                        .with_code(ErrorCode::E102)
                        .with_label(raw.span, "in this process"),
                );
                None
            }
        }
    }

    fn node(&mut self, raw: &RawNode) -> Option<Node> {
        let id = self.required(&raw.attributes, "id", &raw.tag, raw.span)?;
        self.register(&id, raw.span);

        let kind = match raw.tag.as_str() {
            "startEvent" => {
                let trigger = self.extension(raw, &id, "trigger")?;
                match trigger.parse::<TriggerKind>() {
                    Ok(trigger) => NodeKind::StartEvent { trigger },
                    Err(_) => {
                        self.collector
                            .emit(Diagnostic::invalid_trigger(&trigger, raw.span));
                        return None;
                    }
                }
            }
            "task" => NodeKind::Task {
                module: self.extension(raw, &id, "module")?,
            },
            "serviceTask" => NodeKind::ServiceTask {
                service: ServiceCategory::from(self.extension(raw, &id, "service")?.as_str()),
            },
            "exclusiveGateway" => NodeKind::ExclusiveGateway {
                default_flow: raw.attributes.get("default").map(Id::new),
            },
            "endEvent" => NodeKind::EndEvent,
            other => NodeKind::Other(other.to_string()),
        };

        let node = Node::new(Id::new(&id), kind);
        Some(match raw.attributes.get("name") {
            Some(name) => node.with_name(name),
            None => node,
        })
    }

    fn flow<'r>(&mut self, raw: &'r RawFlow, node_ids: &IndexMap<Id, ()>) -> Option<ResolvedFlow<'r>> {
        let id = self.required(&raw.attributes, "id", "sequenceFlow", raw.span);
        let source = self.required(&raw.attributes, "sourceRef", "sequenceFlow", raw.span);
        let target = self.required(&raw.attributes, "targetRef", "sequenceFlow", raw.span);
        let (id, source, target) = (id?, source?, target?);
        self.register(&id, raw.span);

        let mut known = true;
        for (role, endpoint) in [("source", &source), ("target", &target)] {
            if !node_ids.contains_key(&Id::new(endpoint)) {
                self.collector.emit(
                    Diagnostic::error(format!(
                        "sequence flow `{id}` {role} `{endpoint}` is not a flow node of this process"
                    ))
                    .with_code(ErrorCode::E102)
                    .with_label(raw.span, format!("unknown {role}")),
                );
                known = false;
            }
        }
        if !known {
            return None;
        }

        let mut flow = Flow::new(Id::new(&id), Id::new(&source), Id::new(&target));
        if let Some(name) = raw.attributes.get("name") {
            flow = flow.with_name(name);
        }
        if let Some(condition) = &raw.condition {
            flow = flow.with_condition(condition);
        }
        Some(ResolvedFlow { raw, flow })
    }

    /// The node's outgoing flows: those listed in its `outgoing` children
    /// first, in listed order, then any other flow leaving it in document order.
    fn ordered_outgoing(&mut self, raw: &RawNode, id: Id, flows: &[ResolvedFlow<'_>]) -> Vec<Flow> {
        let mut ordered: Vec<Flow> = Vec::new();

        for reference in &raw.outgoing {
            let flow_id = Id::new(reference.inner());
            match flows.iter().find(|resolved| resolved.flow.id() == flow_id) {
                Some(resolved) if resolved.flow.source() == id => {
                    if !ordered.iter().any(|flow| flow.id() == flow_id) {
                        ordered.push(resolved.flow.clone());
                    }
                }
                Some(resolved) => {
                    self.collector.emit(
                        Diagnostic::warning(format!(
                            "`{id}` lists `{flow_id}` as outgoing, but the flow starts at `{}`",
                            resolved.flow.source()
                        ))
                        .with_label(reference.span(), "listed here")
                        .with_secondary_label(resolved.raw.span, "flow defined here"),
                    );
                }
                None if self.seen.contains_key(reference.inner()) => {
                    // The flow exists but was rejected; its own diagnostic covers it.
                }
                None => {
                    self.collector.emit(
                        Diagnostic::error(format!("unknown outgoing flow `{flow_id}`"))
                            .with_code(ErrorCode::E103)
                            .with_label(reference.span(), "no sequence flow with this id"),
                    );
                }
            }
        }

        for resolved in flows {
            if resolved.flow.source() == id && !ordered.iter().any(|flow| flow.id() == resolved.flow.id()) {
                ordered.push(resolved.flow.clone());
            }
        }

        ordered
    }

    /// Read a BPMN attribute the element cannot do without.
    fn required(&mut self, attributes: &Attributes, name: &str, element: &str, span: Span) -> Option<String> {
        match attributes.get(name) {
            Some(value) => Some(value.to_string()),
            None => {
                self.collector
                    .emit(Diagnostic::missing_attribute(element, name, span));
                None
            }
        }
    }

    /// Read one of the bpmn2faas extension attributes.
    fn extension(&mut self, raw: &RawNode, id: &str, name: &str) -> Option<String> {
        match raw.attributes.get(name) {
            Some(value) => Some(value.to_string()),
            None => {
                self.collector
                    .emit(Diagnostic::missing_extension(&raw.tag, id, name, raw.span));
                None
            }
        }
    }

    /// Record an element id, reporting it if it was already taken.
    fn register(&mut self, id: &str, span: Span) {
        if let Some(first) = self.seen.get(id) {
            self.collector
                .emit(Diagnostic::duplicate_id(id, span, *first));
        } else {
            self.seen.insert(id.to_string(), span);
        }
    }
}
