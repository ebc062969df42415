//! Configuration types for bpmn2faas code generation.
//!
//! All types implement [`serde::Deserialize`] with every field defaulted, so
//! an empty document is a valid configuration.
//!
//! # Example
//!
//! ```
//! # use bpmn2faas::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.emit().extension(), "py");
//! assert!(config.emit().template_dir().is_none());
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Code emission section.
    #[serde(default)]
    emit: EmitConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the given emission settings.
    pub fn new(emit: EmitConfig) -> Self {
        Self { emit }
    }

    /// Returns the emission configuration.
    pub fn emit(&self) -> &EmitConfig {
        &self.emit
    }
}

/// Where templates come from and how emitted files are named.
#[derive(Debug, Clone, Deserialize)]
pub struct EmitConfig {
    /// Directory holding `function.hbs` and/or `operation.hbs` overrides.
    #[serde(default)]
    template_dir: Option<PathBuf>,

    /// Extension of emitted files, without the leading dot.
    #[serde(default = "default_extension")]
    extension: String,
}

fn default_extension() -> String {
    "py".to_string()
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            template_dir: None,
            extension: default_extension(),
        }
    }
}

impl EmitConfig {
    /// Creates a new [`EmitConfig`].
    ///
    /// # Arguments
    ///
    /// * `template_dir` - Optional template override directory.
    /// * `extension` - Extension of emitted files, without the leading dot.
    pub fn new(template_dir: Option<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            template_dir,
            extension: extension.into(),
        }
    }

    /// Returns the template override directory, if any.
    pub fn template_dir(&self) -> Option<&Path> {
        self.template_dir.as_deref()
    }

    /// Returns the extension of emitted files.
    pub fn extension(&self) -> &str {
        &self.extension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.emit().extension(), "py");
        assert!(config.emit().template_dir().is_none());
    }

    #[test]
    fn test_emit_section() {
        let config: AppConfig = toml::from_str(
            r#"
            [emit]
            template_dir = "templates/lambda"
            extension = "py3"
            "#,
        )
        .unwrap();

        assert_eq!(config.emit().extension(), "py3");
        assert_eq!(
            config.emit().template_dir(),
            Some(Path::new("templates/lambda"))
        );
    }

    #[test]
    fn test_partial_emit_section_keeps_default_extension() {
        let config: AppConfig = toml::from_str("[emit]\ntemplate_dir = \"t\"\n").unwrap();
        assert_eq!(config.emit().extension(), "py");
    }
}
