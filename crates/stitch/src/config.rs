//! Composer configuration.
//!
//! Settings live on each [`Composer`](crate::Composer) rather than in global
//! state, so two composers with different settings can render side by side.
//!
//! Configuration can be built in code or loaded from YAML or JSON:
//!
//! ```rust
//! use stitch::{ComposerConfig, OutputMode};
//!
//! let config = ComposerConfig::from_yaml(r#"
//! default_template: layout.html
//! mode: introspect
//! "#).unwrap();
//!
//! assert_eq!(config.default_template, "layout.html");
//! assert_eq!(config.mode, OutputMode::Introspect);
//! assert_eq!(config.max_passes, ComposerConfig::DEFAULT_MAX_PASSES);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::markup::DEFAULT_TEMPLATE;

/// What a render returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// The composed page markup.
    #[default]
    Markup,
    /// An [`Introspection`](crate::Introspection) record describing the render.
    Introspect,
}

/// Settings applied to every render of a composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Template file name used when a page has no `pogon-template` attribute.
    pub default_template: String,

    /// Result shape for [`Composer::render`](crate::Composer::render).
    pub mode: OutputMode,

    /// Upper bound on outlet resolution passes. `0` removes the bound.
    pub max_passes: usize,
}

/// Errors raised while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

impl ComposerConfig {
    /// Default for [`max_passes`](Self::max_passes).
    pub const DEFAULT_MAX_PASSES: usize = 64;

    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default template file name.
    pub fn with_default_template(mut self, name: impl Into<String>) -> Self {
        self.default_template = name.into();
        self
    }

    /// Sets the output mode.
    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the pass limit. `0` removes the bound.
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Parses configuration from YAML. Missing keys take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parses configuration from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads configuration from a file, choosing the format by extension.
    ///
    /// `.json` files are parsed as JSON; anything else as YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json(&text),
            _ => Self::from_yaml(&text),
        }
    }
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            default_template: DEFAULT_TEMPLATE.to_string(),
            mode: OutputMode::Markup,
            max_passes: Self::DEFAULT_MAX_PASSES,
        }
    }
}
