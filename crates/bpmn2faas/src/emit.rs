//! Code emission.
//!
//! An [`Emitter`] turns a compiled [`FunctionDescriptor`] into source text.
//! [`TemplateEmitter`] renders handlebars templates (Python AWS Lambda
//! handlers out of the box); [`JsonEmitter`] dumps the descriptor itself,
//! which is handy when writing new templates.

mod json;
mod template;

pub use json::JsonEmitter;
pub use template::TemplateEmitter;

use std::{io, path::PathBuf};

use thiserror::Error;

use bpmn2faas_core::descriptor::FunctionDescriptor;

/// Renders compiled lanes into source text.
pub trait Emitter {
    /// Render one function.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError`] when the descriptor cannot be rendered.
    fn emit(&self, descriptor: &FunctionDescriptor) -> Result<String, EmitError>;
}

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to read template `{}`: {source}", path.display())]
    TemplateIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid template `{name}`: {message}")]
    Template { name: String, message: String },

    #[error("failed to render function `{function}`: {message}")]
    Render { function: String, message: String },

    #[error("failed to serialize function: {0}")]
    Json(#[from] serde_json::Error),
}
