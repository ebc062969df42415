//! The compiled form of one lane.

use indexmap::IndexSet;
use serde::Serialize;

use crate::operation::Operation;

/// Everything an emitter needs to render one lane's function.
///
/// Built once by the lane compiler and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDescriptor {
    name: String,
    is_batch: bool,
    modules: IndexSet<String>,
    services: IndexSet<String>,
    operations: Vec<Operation>,
    start_event: Operation,
}

impl FunctionDescriptor {
    /// Create a descriptor.
    ///
    /// # Arguments
    ///
    /// * `name` - The lane name.
    /// * `is_batch` - Whether the trigger delivers batches of records.
    /// * `modules` - Code modules referenced by tasks, in sequence order.
    /// * `services` - Client ids of the services called, in classification order.
    /// * `operations` - The linearized sequence, start event excluded.
    /// * `start_event` - The lane's start event.
    pub fn new(
        name: String,
        is_batch: bool,
        modules: IndexSet<String>,
        services: IndexSet<String>,
        operations: Vec<Operation>,
        start_event: Operation,
    ) -> Self {
        Self {
            name,
            is_batch,
            modules,
            services,
            operations,
            start_event,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_batch(&self) -> bool {
        self.is_batch
    }

    pub fn modules(&self) -> &IndexSet<String> {
        &self.modules
    }

    pub fn services(&self) -> &IndexSet<String> {
        &self.services
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn start_event(&self) -> &Operation {
        &self.start_event
    }
}
