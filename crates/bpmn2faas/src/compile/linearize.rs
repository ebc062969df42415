//! Linearization: order a lane's operations into the executed path.
//!
//! Starting after the start event, the path follows each operation's first
//! outgoing link. A splitting gateway resumes at the first link out of its
//! joining gateway; the joining gateway itself never becomes an operation.
//! Operations met while walking a gateway's branches are moved into that
//! branch instead of the top-level path.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::trace;

use bpmn2faas_core::{
    identifier::Id,
    model::{Lane, NodeKind, ProcessGraph},
    operation::{Branch, JoiningGateway, Operation, OperationKind},
};

use super::CompileError;

pub(super) fn linearize(
    lane: &Lane,
    graph: &ProcessGraph,
    start: &Operation,
    pool: IndexMap<Id, Operation>,
    is_batch: bool,
) -> Result<Vec<Operation>, CompileError> {
    Linearizer {
        lane,
        graph,
        pool,
        is_batch,
    }
    .run(start)
}

struct Linearizer<'a> {
    lane: &'a Lane,
    graph: &'a ProcessGraph,
    pool: IndexMap<Id, Operation>,
    is_batch: bool,
}

impl Linearizer<'_> {
    fn run(mut self, start: &Operation) -> Result<Vec<Operation>, CompileError> {
        let mut sequence = Vec::with_capacity(self.pool.len());
        let mut tail = start.id();
        let mut next = start.next();

        while !self.pool.is_empty() {
            let Some(target) = next else {
                return Err(self.unresolved(tail, None));
            };
            let Some(operation) = self.take(target) else {
                return Err(self.unresolved(tail, Some(target)));
            };

            tail = operation.id();
            next = match operation.as_splitting_gateway() {
                Some(gateway) => gateway.joining_gateway().and_then(JoiningGateway::next),
                None => operation.next(),
            };
            sequence.push(operation);
        }

        Ok(sequence)
    }

    /// Remove `id` from the pool and prepare it for appending.
    fn take(&mut self, id: Id) -> Option<Operation> {
        let mut operation = self.pool.shift_remove(&id)?;
        if self.is_batch {
            operation.indent();
        }
        trace!(operation:%, indentation = operation.indentation(); "Operation appended");

        if operation.as_splitting_gateway().is_some() {
            self.fill_branches(&mut operation);
        }
        Some(operation)
    }

    fn fill_branches(&mut self, operation: &mut Operation) {
        let graph = self.graph;
        let Some(node) = graph.node(operation.id()) else {
            return;
        };
        let default_flow = match node.kind() {
            NodeKind::ExclusiveGateway { default_flow } => *default_flow,
            _ => None,
        };
        let join = operation
            .as_splitting_gateway()
            .and_then(|gateway| gateway.joining_gateway())
            .map(JoiningGateway::id);

        let mut branches = Vec::with_capacity(node.outgoing().len());
        for flow in node.outgoing() {
            let mut branch = Branch::new(
                flow.id(),
                flow.target(),
                flow.condition().map(str::to_string),
                default_flow == Some(flow.id()),
            );
            self.walk_branch(&mut branch, join);
            branches.push(branch);
        }

        if let OperationKind::Gateway(gateway) = operation.kind_mut() {
            for branch in branches {
                gateway.push_branch(branch);
            }
        }
    }

    /// Walk a branch until it reaches `join` or runs out of links, moving the
    /// lane's operations into it. Nodes outside the lane are stepped over.
    fn walk_branch(&mut self, branch: &mut Branch, join: Option<Id>) {
        let mut visited = HashSet::new();
        let mut cursor = Some(branch.target());

        while let Some(id) = cursor {
            if Some(id) == join || !visited.insert(id) {
                break;
            }

            match self.take(id) {
                Some(operation) => {
                    // A nested split continues from its own join node, which
                    // may also be the join of this branch.
                    cursor = match operation.as_splitting_gateway() {
                        Some(gateway) => gateway.joining_gateway().map(JoiningGateway::id),
                        None => operation.next(),
                    };
                    branch.push(operation);
                }
                None => {
                    trace!(node:% = id, branch:% = branch.flow(); "Stepping over node outside the lane");
                    cursor = self
                        .graph
                        .node(id)
                        .and_then(|node| node.outgoing_targets().next());
                }
            }
        }
    }

    fn unresolved(&self, tail: Id, target: Option<Id>) -> CompileError {
        CompileError::UnresolvedLink {
            lane: self.lane.name(),
            tail,
            target,
        }
    }
}
