//! Handlebars template emitter.
//!
//! The built-in templates render a Python AWS Lambda handler. A template
//! directory may replace either of them:
//!
//! - `function.hbs`: the whole file. Receives a function view with `name`,
//!   `docstring`, `trigger`, `is_batch`, `modules`, `clients` (each with a
//!   Python `var` and the `service` name) and `operations`.
//! - `operation.hbs`: the partial rendered for each operation (recursively
//!   for branch contents). Receives `id`, `name`, `kind`, `level`,
//!   `is_batch` plus the kind's fields: `module` for tasks, `client`,
//!   `client_var` and `endpoint` for service calls, `branches` for gateways.
//!
//! Values that land inside Python string literals (`docstring`, `service`,
//! `endpoint`) arrive escaped, and client variables are valid identifiers.
//!
//! Every operation carries its absolute nesting `level`; templates turn it
//! into padding with the `indent` helper.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use handlebars::{Context, Handlebars, Helper, HelperResult, Output, RenderContext, no_escape};
use indexmap::IndexMap;
use log::{debug, trace};
use serde::Serialize;

use bpmn2faas_core::{
    descriptor::FunctionDescriptor,
    operation::{Branch, Gateway, Operation, OperationKind},
};

use super::{EmitError, Emitter};
use crate::compile::client_for;

const FUNCTION_TEMPLATE: &str = "function";
const OPERATION_PARTIAL: &str = "operation";

const BUILTIN_FUNCTION: &str = include_str!("../../templates/function.hbs");
const BUILTIN_OPERATION: &str = include_str!("../../templates/operation.hbs");

/// Spaces per nesting level.
const INDENT_WIDTH: usize = 4;

/// Level of statements directly inside the handler function.
const BODY_LEVEL: u32 = 1;

/// Emits source through handlebars templates.
///
/// # Examples
///
/// ```rust,no_run
/// use bpmn2faas::emit::{Emitter, TemplateEmitter};
/// use bpmn2faas::FunctionBuilder;
/// # let source = "";
///
/// let builder = FunctionBuilder::default();
/// let definitions = builder.parse(source).expect("Failed to parse");
/// let functions = builder
///     .compile(&definitions, &Default::default())
///     .expect("Failed to compile");
///
/// let emitter = TemplateEmitter::new().expect("Built-in templates are valid");
/// for function in &functions {
///     println!("{}", emitter.emit(function).expect("Failed to render"));
/// }
/// ```
#[derive(Debug)]
pub struct TemplateEmitter {
    registry: Handlebars<'static>,
}

impl TemplateEmitter {
    /// Create an emitter with the built-in Python templates.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError::Template`] if a built-in template fails to compile.
    pub fn new() -> Result<Self, EmitError> {
        Self::with_templates(BUILTIN_FUNCTION, BUILTIN_OPERATION)
    }

    /// Create an emitter whose templates are read from `dir`, falling back
    /// to the built-in template for any file the directory lacks.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError::TemplateIo`] if `dir` is not a directory or a
    /// template cannot be read, and [`EmitError::Template`] if a template
    /// fails to compile.
    pub fn from_dir(dir: &Path) -> Result<Self, EmitError> {
        if !dir.is_dir() {
            return Err(EmitError::TemplateIo {
                path: dir.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "template directory not found"),
            });
        }

        let function = read_override(dir, FUNCTION_TEMPLATE)?;
        let operation = read_override(dir, OPERATION_PARTIAL)?;
        debug!(
            dir:? = dir,
            function_overridden = function.is_some(),
            operation_overridden = operation.is_some();
            "Loaded template overrides"
        );

        Self::with_templates(
            function.as_deref().unwrap_or(BUILTIN_FUNCTION),
            operation.as_deref().unwrap_or(BUILTIN_OPERATION),
        )
    }

    /// Create an emitter from template source text.
    ///
    /// # Errors
    ///
    /// Returns [`EmitError::Template`] if either template fails to compile.
    pub fn with_templates(function: &str, operation: &str) -> Result<Self, EmitError> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(no_escape);
        registry.register_helper("indent", Box::new(indent_helper));

        registry
            .register_template_string(FUNCTION_TEMPLATE, function)
            .map_err(|err| template_error(FUNCTION_TEMPLATE, err))?;
        registry
            .register_partial(OPERATION_PARTIAL, operation)
            .map_err(|err| template_error(OPERATION_PARTIAL, err))?;

        Ok(Self { registry })
    }
}

impl Emitter for TemplateEmitter {
    fn emit(&self, descriptor: &FunctionDescriptor) -> Result<String, EmitError> {
        let view = FunctionView::new(descriptor);
        trace!(view:?; "Function view");

        self.registry
            .render(FUNCTION_TEMPLATE, &view)
            .map_err(|err| EmitError::Render {
                function: descriptor.name().to_string(),
                message: err.to_string(),
            })
    }
}

fn read_override(dir: &Path, name: &str) -> Result<Option<String>, EmitError> {
    let path: PathBuf = dir.join(format!("{name}.hbs"));
    if !path.is_file() {
        return Ok(None);
    }
    fs::read_to_string(&path)
        .map(Some)
        .map_err(|source| EmitError::TemplateIo { path, source })
}

fn template_error(name: &str, err: impl ToString) -> EmitError {
    EmitError::Template {
        name: name.to_string(),
        message: err.to_string(),
    }
}

fn indent_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let level = h.param(0).and_then(|v| v.value().as_u64()).unwrap_or(0) as usize;
    out.write(&" ".repeat(level * INDENT_WIDTH))?;
    Ok(())
}

/// Names the handler already binds; clients get a different variable.
const HANDLER_NAMES: &[&str] = &[
    "json", "boto3", "handler", "event", "context", "payload", "results", "record",
];

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// Client name to the Python variable holding that client.
type ClientVars<'a> = IndexMap<&'a str, String>;

#[derive(Debug, Serialize)]
struct FunctionView<'a> {
    name: &'a str,
    /// `name` on one line, escaped for a triple-quoted docstring.
    docstring: String,
    trigger: &'static str,
    is_batch: bool,
    modules: Vec<&'a str>,
    clients: Vec<ClientView>,
    operations: Vec<OperationView<'a>>,
}

impl<'a> FunctionView<'a> {
    fn new(descriptor: &'a FunctionDescriptor) -> Self {
        let trigger = match descriptor.start_event().kind() {
            OperationKind::StartEvent(start) => start.trigger().as_str(),
            _ => "unknown",
        };
        let is_batch = descriptor.is_batch();
        let modules: Vec<&str> = descriptor.modules().iter().map(String::as_str).collect();
        let vars = client_vars(descriptor.services().iter().map(String::as_str), &modules);

        Self {
            name: descriptor.name(),
            docstring: python_string_body(&one_line(descriptor.name())),
            trigger,
            is_batch,
            modules,
            clients: vars
                .iter()
                .map(|(name, var)| ClientView {
                    var: var.clone(),
                    service: python_string_body(name),
                })
                .collect(),
            operations: descriptor
                .operations()
                .iter()
                .map(|operation| OperationView::new(operation, BODY_LEVEL, is_batch, &vars))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ClientView {
    /// Python variable holding the client.
    var: String,
    /// Service name for `boto3.client`, escaped for a string literal.
    service: String,
}

#[derive(Debug, Serialize)]
struct OperationView<'a> {
    id: String,
    name: Option<String>,
    kind: &'static str,
    level: u32,
    is_batch: bool,
    module: Option<&'a str>,
    client: Option<String>,
    client_var: Option<String>,
    /// Escaped for a string literal; empty when no endpoint is mapped.
    endpoint: Option<String>,
    branches: Vec<BranchView<'a>>,
}

impl<'a> OperationView<'a> {
    /// `base` is the level the operation sits at before batch indentation.
    fn new(operation: &'a Operation, base: u32, is_batch: bool, vars: &ClientVars<'_>) -> Self {
        let level = base + operation.indentation();
        let mut view = Self {
            id: operation.id().to_string(),
            // Names become comments, so keep them on one line.
            name: operation.name().map(one_line),
            kind: operation.kind().label(),
            level,
            is_batch,
            module: None,
            client: None,
            client_var: None,
            endpoint: None,
            branches: Vec::new(),
        };

        match operation.kind() {
            OperationKind::Task(task) => view.module = Some(task.module()),
            OperationKind::ServiceCall(call) => {
                let client = client_for(call.service());
                view.client_var = Some(
                    vars.get(client)
                        .cloned()
                        .unwrap_or_else(|| python_identifier(client)),
                );
                view.client = Some(one_line(client));
                view.endpoint = Some(python_string_body(call.endpoint()));
            }
            OperationKind::Gateway(gateway) => {
                view.branches = BranchView::for_gateway(gateway, base, level, is_batch, vars);
            }
            OperationKind::StartEvent(_) | OperationKind::EndEvent => {}
        }
        view
    }
}

#[derive(Debug, Serialize)]
struct BranchView<'a> {
    keyword: &'static str,
    condition: Option<&'a str>,
    level: u32,
    body_level: u32,
    operations: Vec<OperationView<'a>>,
}

impl<'a> BranchView<'a> {
    /// Conditional branches come first as `if`/`elif`; a trailing default
    /// branch becomes `else`. Branches that cannot be `else` but have no
    /// condition are rendered as always true.
    fn for_gateway(
        gateway: &'a Gateway,
        base: u32,
        level: u32,
        is_batch: bool,
        vars: &ClientVars<'_>,
    ) -> Vec<Self> {
        let mut ordered: Vec<&Branch> = gateway.branches().iter().collect();
        ordered.sort_by_key(|branch| branch.is_default());
        let last = ordered.len().saturating_sub(1);

        ordered
            .into_iter()
            .enumerate()
            .map(|(index, branch)| {
                let keyword = match index {
                    0 => "if",
                    i if i == last && branch.is_default() => "else",
                    _ => "elif",
                };
                let condition = (keyword != "else").then(|| branch.condition().unwrap_or("True"));

                Self {
                    keyword,
                    condition,
                    level,
                    body_level: level + 1,
                    operations: branch
                        .operations()
                        .iter()
                        .map(|operation| OperationView::new(operation, base + 1, is_batch, vars))
                        .collect(),
                }
            })
            .collect()
    }
}

/// Give every client a distinct variable that shadows neither a handler
/// name nor an imported module.
fn client_vars<'a>(clients: impl Iterator<Item = &'a str>, modules: &[&str]) -> ClientVars<'a> {
    let mut vars = ClientVars::new();
    for client in clients {
        let base = python_identifier(client);
        let mut var = base.clone();
        let mut counter = 1;
        while is_taken(&var, &vars, modules) {
            var = if counter == 1 {
                format!("{base}_client")
            } else {
                format!("{base}_client_{counter}")
            };
            counter += 1;
        }
        vars.insert(client, var);
    }
    vars
}

fn is_taken(var: &str, vars: &ClientVars<'_>, modules: &[&str]) -> bool {
    HANDLER_NAMES.contains(&var)
        || modules.iter().any(|module| module.split('.').next() == Some(var))
        || vars.values().any(|used| used == var)
}

/// Replace everything but ASCII alphanumerics with `_` and keep clear of
/// leading digits and keywords.
fn python_identifier(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if PYTHON_KEYWORDS.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}

/// Escape `value` for use between quotes of a Python string literal.
fn python_string_body(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
