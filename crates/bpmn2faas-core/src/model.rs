//! Process model types.
//!
//! This module contains the read-only representation of a BPMN document after
//! the XML front end has resolved it. These are the inputs of the lane
//! compiler.
//!
//! # Pipeline Position
//!
//! ```text
//! BPMN XML
//!     ↓ scan + elaborate (bpmn2faas-parser)
//! Process Model (these types) - nodes, flows, lanes, joins
//!     ↓ classify + linearize + aggregate (bpmn2faas)
//! Function Descriptor
//!     ↓ emit
//! Function Source
//! ```
//!
//! # Organization
//!
//! - [`kind`] - Node kinds and their typed attributes: [`NodeKind`], [`TriggerKind`], [`ServiceCategory`]
//! - [`graph`] - The process graph: [`Node`], [`Flow`], [`ProcessGraph`]
//! - [`process`] - Lanes and the documents that hold them: [`Lane`], [`Process`], [`Definitions`]

pub mod graph;
pub mod kind;
pub mod process;

pub use graph::*;
pub use kind::*;
pub use process::*;
