//! bpmn2faas - compile BPMN lanes into serverless functions.
//!
//! Each lane of a BPMN process becomes one function: its flow nodes are
//! classified into operations, ordered into the single path the function
//! executes, and rendered through templates into source code.

pub mod compile;
pub mod config;
pub mod emit;

mod error;

pub use bpmn2faas_core::{descriptor, endpoint, identifier, model, operation};

pub use error::Bpmn2FaasError;

use log::{debug, info, trace};

use descriptor::FunctionDescriptor;
use endpoint::EndpointMap;
use model::{Definitions, Lane, Process};

use config::AppConfig;
use emit::{Emitter, TemplateEmitter};

/// Builder for parsing, compiling and rendering BPMN lanes.
///
/// # Examples
///
/// ```rust,no_run
/// use bpmn2faas::{FunctionBuilder, config::AppConfig, endpoint::EndpointMap};
///
/// let source = std::fs::read_to_string("orders.bpmn").expect("Failed to read");
///
/// let builder = FunctionBuilder::new(AppConfig::default());
///
/// // Parse the document into processes and lanes
/// let definitions = builder.parse(&source).expect("Failed to parse");
///
/// // Compile every lane
/// let functions = builder
///     .compile(&definitions, &EndpointMap::new())
///     .expect("Failed to compile");
///
/// // Render each function with the configured templates
/// for function in &functions {
///     let code = builder.render(function).expect("Failed to render");
///     println!("{code}");
/// }
/// ```
#[derive(Debug, Default)]
pub struct FunctionBuilder {
    config: AppConfig,
}

impl FunctionBuilder {
    /// Create a new function builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration this builder was created with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a BPMN 2.0 XML document.
    ///
    /// # Errors
    ///
    /// Returns [`Bpmn2FaasError::Parse`] with every diagnostic found in the
    /// document.
    pub fn parse(&self, source: &str) -> Result<Definitions, Bpmn2FaasError> {
        info!("Parsing BPMN document");

        let definitions = bpmn2faas_parser::parse(source)
            .map_err(|err| Bpmn2FaasError::new_parse_error(err, source))?;

        debug!(
            processes_count = definitions.processes().len();
            "Document parsed successfully"
        );
        trace!(definitions:?; "Parsed definitions");

        Ok(definitions)
    }

    /// Compile every lane of every process, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`Bpmn2FaasError::Compile`] for the first lane that fails.
    pub fn compile(
        &self,
        definitions: &Definitions,
        endpoints: &EndpointMap,
    ) -> Result<Vec<FunctionDescriptor>, Bpmn2FaasError> {
        info!(endpoints_count = endpoints.len(); "Compiling lanes");

        let functions = definitions
            .lanes()
            .map(|(process, lane)| self.compile_lane(process, lane, endpoints))
            .collect::<Result<Vec<_>, _>>()?;

        info!(functions_count = functions.len(); "Lanes compiled");
        Ok(functions)
    }

    /// Compile a single lane of `process`.
    ///
    /// # Errors
    ///
    /// Returns [`Bpmn2FaasError::Compile`] if the lane cannot be linearized.
    pub fn compile_lane(
        &self,
        process: &Process,
        lane: &Lane,
        endpoints: &EndpointMap,
    ) -> Result<FunctionDescriptor, Bpmn2FaasError> {
        debug!(process:% = process.id(), lane:% = lane; "Compiling lane");
        let function = compile::compile_lane(lane, process.graph(), endpoints)?;
        trace!(function:?; "Compiled function");
        Ok(function)
    }

    /// Build the template emitter described by the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Bpmn2FaasError::Emit`] if the template directory cannot be
    /// read or a template fails to compile.
    pub fn emitter(&self) -> Result<TemplateEmitter, Bpmn2FaasError> {
        let emitter = match self.config.emit().template_dir() {
            Some(dir) => TemplateEmitter::from_dir(dir)?,
            None => TemplateEmitter::new()?,
        };
        Ok(emitter)
    }

    /// Render one compiled function with the configured templates.
    ///
    /// # Errors
    ///
    /// Returns [`Bpmn2FaasError::Emit`] for template or rendering errors.
    pub fn render(&self, function: &FunctionDescriptor) -> Result<String, Bpmn2FaasError> {
        info!(function = function.name(); "Rendering function");
        let code = self.emitter()?.emit(function)?;
        debug!(bytes = code.len(); "Function rendered");
        Ok(code)
    }
}
