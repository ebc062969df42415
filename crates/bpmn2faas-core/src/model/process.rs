//! Lanes and the processes and documents that contain them.

use std::fmt;

use crate::{identifier::Id, model::graph::ProcessGraph};

/// A named partition of a process, compiled into one function.
#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    id: Id,
    name: Option<String>,
    element_ids: Vec<Id>,
}

impl Lane {
    /// Create a new lane referencing `element_ids` in its process graph.
    pub fn new(id: Id, name: Option<String>, element_ids: Vec<Id>) -> Self {
        Self {
            id,
            name,
            element_ids,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    /// Returns the lane name, falling back to its id when the lane is unnamed.
    pub fn name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }

    /// Ids of the flow nodes in this lane, in document order.
    pub fn element_ids(&self) -> &[Id] {
        &self.element_ids
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One BPMN process: its graph and the lanes partitioning it.
#[derive(Debug, Clone)]
pub struct Process {
    id: Id,
    graph: ProcessGraph,
    lanes: Vec<Lane>,
}

impl Process {
    pub fn new(id: Id, graph: ProcessGraph, lanes: Vec<Lane>) -> Self {
        Self { id, graph, lanes }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn graph(&self) -> &ProcessGraph {
        &self.graph
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }
}

/// A parsed BPMN document.
#[derive(Debug, Clone, Default)]
pub struct Definitions {
    processes: Vec<Process>,
}

impl Definitions {
    pub fn new(processes: Vec<Process>) -> Self {
        Self { processes }
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// Iterate every lane of every process together with its process.
    pub fn lanes(&self) -> impl Iterator<Item = (&Process, &Lane)> {
        self.processes
            .iter()
            .flat_map(|process| process.lanes.iter().map(move |lane| (process, lane)))
    }
}
