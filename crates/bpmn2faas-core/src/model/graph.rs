//! The process graph: flow nodes, the sequence flows between them, and the
//! split/join pairing of exclusive gateways.
//!
//! A [`ProcessGraph`] is assembled once through [`ProcessGraphBuilder`] and is
//! read-only afterwards, so every lane of a process can borrow it.
//!
//! # Join detection
//!
//! A splitting exclusive gateway is paired with the gateway where its
//! branches converge. That gateway is the splitting gateway's immediate
//! post-dominator: the first node every path from the split to an exit must
//! pass through. Post-dominators are computed once in [`ProcessGraphBuilder::build`]
//! by running [`petgraph`]'s dominator algorithm on the reversed graph, rooted
//! at a virtual sink that every exit node flows into.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::{debug, trace};
use petgraph::{
    algo::dominators,
    graph::{DiGraph, NodeIndex},
};
use thiserror::Error;

use crate::{identifier::Id, model::kind::NodeKind};

/// Errors raised while assembling a [`ProcessGraph`].
#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("sequence flow `{flow}` references unknown node `{node}`")]
    UnknownNode { flow: Id, node: Id },

    #[error("node `{0}` is defined more than once")]
    DuplicateNode(Id),
}

/// A directed sequence flow between two flow nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Flow {
    id: Id,
    source: Id,
    target: Id,
    name: Option<String>,
    condition: Option<String>,
}

impl Flow {
    /// Create a new unconditional flow.
    pub fn new(id: Id, source: Id, target: Id) -> Self {
        Self {
            id,
            source,
            target,
            name: None,
            condition: None,
        }
    }

    /// Set the flow's display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the flow's condition expression.
    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }
}

/// A flow node with its kind, attributes and resolved links.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: Id,
    name: Option<String>,
    kind: NodeKind,
    outgoing: Vec<Flow>,
    incoming: Vec<Id>,
}

impl Node {
    /// Create a node without links. Links are attached by [`ProcessGraphBuilder`].
    pub fn new(id: Id, kind: NodeKind) -> Self {
        Self {
            id,
            name: None,
            kind,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        }
    }

    /// Set the node's display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Outgoing flows, in model order.
    pub fn outgoing(&self) -> &[Flow] {
        &self.outgoing
    }

    /// Ids of the nodes this node flows into, in model order.
    pub fn outgoing_targets(&self) -> impl Iterator<Item = Id> + '_ {
        self.outgoing.iter().map(Flow::target)
    }

    /// Ids of the nodes flowing into this node.
    pub fn incoming(&self) -> &[Id] {
        &self.incoming
    }

    /// Returns `true` for an exclusive gateway that branches.
    pub fn is_splitting(&self) -> bool {
        self.kind.is_exclusive_gateway() && self.outgoing.len() > 1
    }

    /// Returns `true` for an exclusive gateway where branches converge.
    pub fn is_joining(&self) -> bool {
        self.kind.is_exclusive_gateway() && self.incoming.len() > 1
    }
}

/// The full set of flow nodes of one process and their links.
#[derive(Debug, Clone, Default)]
pub struct ProcessGraph {
    nodes: IndexMap<Id, Node>,
    joins: HashMap<Id, Id>,
}

impl ProcessGraph {
    /// Start assembling a graph.
    pub fn builder() -> ProcessGraphBuilder {
        ProcessGraphBuilder::default()
    }

    /// Returns the node with the given id, if it exists.
    pub fn node(&self, id: Id) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Checks if a node with the given id exists.
    pub fn contains(&self, id: Id) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Returns an iterator over all nodes in definition order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the gateway where the branches of `split` converge.
    ///
    /// `None` when `split` is not a splitting gateway or when its branches
    /// never meet at an exclusive gateway (for example, each ends in its own
    /// end event).
    pub fn joining_gateway(&self, split: Id) -> Option<&Node> {
        self.joins.get(&split).and_then(|join| self.nodes.get(join))
    }
}

/// Builder for [`ProcessGraph`].
///
/// Nodes and flows may be added in any order; a node's outgoing flows keep
/// the order in which they were added.
#[derive(Debug, Default)]
pub struct ProcessGraphBuilder {
    nodes: Vec<Node>,
    flows: Vec<Flow>,
}

impl ProcessGraphBuilder {
    /// Add a node.
    pub fn node(mut self, node: Node) -> Self {
        self.add_node(node);
        self
    }

    /// Add a flow.
    pub fn flow(mut self, flow: Flow) -> Self {
        self.add_flow(flow);
        self
    }

    pub fn add_node(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn add_flow(&mut self, flow: Flow) {
        self.flows.push(flow);
    }

    /// Resolve links and pair splitting gateways with their joins.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError`] when a node id is defined twice or a flow
    /// references a node that was never added.
    pub fn build(self) -> Result<ProcessGraph, GraphError> {
        let mut nodes = IndexMap::with_capacity(self.nodes.len());
        for node in self.nodes {
            let id = node.id;
            if nodes.insert(id, node).is_some() {
                return Err(GraphError::DuplicateNode(id));
            }
        }

        for flow in self.flows {
            for endpoint in [flow.source, flow.target] {
                if !nodes.contains_key(&endpoint) {
                    return Err(GraphError::UnknownNode {
                        flow: flow.id,
                        node: endpoint,
                    });
                }
            }
            if let Some(target) = nodes.get_mut(&flow.target) {
                target.incoming.push(flow.source);
            }
            if let Some(source) = nodes.get_mut(&flow.source) {
                source.outgoing.push(flow);
            }
        }

        let joins = pair_joins(&nodes);
        debug!(nodes_count = nodes.len(), joins_count = joins.len(); "Process graph built");

        Ok(ProcessGraph { nodes, joins })
    }
}

/// Map every splitting exclusive gateway to its immediate post-dominator,
/// when that post-dominator is an exclusive gateway.
fn pair_joins(nodes: &IndexMap<Id, Node>) -> HashMap<Id, Id> {
    // Reversed graph; `None` weights the virtual sink.
    let mut reversed: DiGraph<Option<Id>, ()> = DiGraph::with_capacity(nodes.len() + 1, 0);
    let indices: HashMap<Id, NodeIndex> = nodes
        .keys()
        .map(|id| (*id, reversed.add_node(Some(*id))))
        .collect();
    let sink = reversed.add_node(None);

    for node in nodes.values() {
        let index = indices[&node.id];
        if node.outgoing.is_empty() {
            reversed.add_edge(sink, index, ());
        }
        for target in node.outgoing_targets() {
            reversed.add_edge(indices[&target], index, ());
        }
    }

    let post_dominators = dominators::simple_fast(&reversed, sink);

    nodes
        .values()
        .filter(|node| node.is_splitting())
        .filter_map(|split| {
            let idom = post_dominators.immediate_dominator(indices[&split.id])?;
            let join = reversed[idom]?;
            if nodes[&join].kind.is_exclusive_gateway() {
                trace!(split:% = split.id, join:% = join; "Paired exclusive gateways");
                Some((split.id, join))
            } else {
                None
            }
        })
        .collect()
}
