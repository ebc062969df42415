use log::trace;

use bpmn2faas_core::descriptor::FunctionDescriptor;

use super::{EmitError, Emitter};

/// Emits the descriptor as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEmitter;

impl Emitter for JsonEmitter {
    fn emit(&self, descriptor: &FunctionDescriptor) -> Result<String, EmitError> {
        trace!(function = descriptor.name(); "Serializing descriptor");
        let mut json = serde_json::to_string_pretty(descriptor)?;
        json.push('\n');
        Ok(json)
    }
}
