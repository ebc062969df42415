//! The lane compiler.
//!
//! Turns one lane of a process into a [`FunctionDescriptor`] in three steps:
//!
//! 1. [`classify`] resolves the lane's node ids into typed operations and
//!    collects the service categories they call.
//! 2. [`linearize`] orders the operations into the path the function
//!    executes, moving the contents of exclusive branches into their gateway
//!    and indenting everything by one level for batch triggers.
//! 3. [`aggregate`] translates service categories into client names and
//!    gathers the task modules to import.
//!
//! Compiling a lane only reads the process graph and endpoint map, so lanes
//! can be compiled independently and in any order.

mod aggregate;
mod classify;
mod linearize;

pub use aggregate::client_for;

use log::{debug, trace};
use thiserror::Error;

use bpmn2faas_core::{
    descriptor::FunctionDescriptor, endpoint::EndpointMap, identifier::Id, model::Lane,
    model::ProcessGraph,
};

/// Reasons a lane cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("lane `{lane}` has no start event")]
    MissingStartEvent { lane: String },

    #[error("lane `{lane}` has more than one start event (`{first}` and `{second}`)")]
    MultipleStartEvents { lane: String, first: Id, second: Id },

    #[error("lane `{lane}` references `{id}`, which is not a node of the process")]
    MissingNode { lane: String, id: Id },

    #[error("{}", unresolved_message(.lane, .tail, .target))]
    UnresolvedLink {
        lane: String,
        tail: Id,
        target: Option<Id>,
    },
}

fn unresolved_message(lane: &str, tail: &Id, target: &Option<Id>) -> String {
    match target {
        Some(target) => format!(
            "lane `{lane}` cannot continue after `{tail}`: `{target}` is not a remaining operation of the lane"
        ),
        None => format!(
            "lane `{lane}` cannot continue after `{tail}`: it leads nowhere but operations remain"
        ),
    }
}

/// Compile one lane of a process into a function descriptor.
///
/// # Errors
///
/// Returns [`CompileError`] when the lane has no (or more than one) start
/// event, references a node missing from `graph`, or its operations do not
/// form a single path.
pub fn compile_lane(
    lane: &Lane,
    graph: &ProcessGraph,
    endpoints: &EndpointMap,
) -> Result<FunctionDescriptor, CompileError> {
    let classified = classify::classify(lane, graph, endpoints)?;
    trace!(lane:% = lane, pool_size = classified.pool.len(); "Lane classified");

    let is_batch = classified.trigger.is_batch();
    let operations = linearize::linearize(lane, graph, &classified.start, classified.pool, is_batch)?;

    let services = aggregate::translate_services(&classified.services);
    let modules = aggregate::collect_modules(&operations);

    debug!(
        lane:% = lane,
        is_batch,
        operations_count = operations.len(),
        services_count = services.len(),
        modules_count = modules.len();
        "Lane compiled"
    );

    Ok(FunctionDescriptor::new(
        lane.name(),
        is_batch,
        modules,
        services,
        operations,
        classified.start,
    ))
}
