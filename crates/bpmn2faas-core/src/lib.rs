//! bpmn2faas Core Types and Definitions
//!
//! This crate provides the foundational types shared by the bpmn2faas
//! front end, lane compiler and emitters. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Model**: The process graph, lanes and node kinds ([`model`] module)
//! - **Operations**: Typed lane operations produced by classification ([`operation`] module)
//! - **Descriptor**: The compiled per-lane result ([`descriptor::FunctionDescriptor`])
//! - **Endpoints**: Deployment references for service calls ([`endpoint::EndpointMap`])

pub mod descriptor;
pub mod endpoint;
pub mod identifier;
pub mod model;
pub mod operation;
