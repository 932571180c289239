//! Per-render paths and the introspection record.
//!
//! A [`RenderContext`] is fixed once the template has been chosen and stays
//! the same for the rest of the render. Its `dir` is the base for every
//! relative reference: the template, each `<pogon_component name>`, and each
//! component file returned by a custom-tag handler.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Paths describing one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    /// The content file being rendered, as given by the caller.
    pub file_path: PathBuf,

    /// Directory containing the content file.
    pub dir: PathBuf,

    /// The template the content was merged into.
    pub template_path: PathBuf,
}

impl RenderContext {
    /// Creates a render context.
    pub fn new(
        file_path: impl Into<PathBuf>,
        dir: impl Into<PathBuf>,
        template_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            dir: dir.into(),
            template_path: template_path.into(),
        }
    }

    /// The content file path relative to [`dir`](Self::dir).
    ///
    /// This is `file_path` with the directory prefix and its separator removed.
    pub fn file_name(&self) -> String {
        self.file_path
            .strip_prefix(&self.dir)
            .ok()
            .filter(|relative| !relative.as_os_str().is_empty())
            .or_else(|| self.file_path.file_name().map(Path::new))
            .unwrap_or(self.file_path.as_path())
            .to_string_lossy()
            .into_owned()
    }

    /// Builds the introspection record for a finished render.
    pub fn introspect(&self, markup: String, options: Value) -> Introspection {
        Introspection {
            markup,
            options,
            file_path: self.file_path.to_string_lossy().into_owned(),
            template_path: self.template_path.to_string_lossy().into_owned(),
            dir_name: self.dir.to_string_lossy().into_owned(),
            file_name: self.file_name(),
        }
    }
}

/// Returns the directory relative references in `file_path` resolve against.
///
/// A bare file name resolves against `.`.
pub fn content_dir(file_path: &Path) -> PathBuf {
    match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Structured description of a render, returned in introspection mode.
///
/// Serializes as `{markup, options, filePath, templatePath, dirName, fileName}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Introspection {
    /// The composed page, identical to what markup mode returns.
    pub markup: String,
    /// The options the render was called with.
    pub options: Value,
    /// The content file path.
    pub file_path: String,
    /// The template file path.
    pub template_path: String,
    /// The content file's directory.
    pub dir_name: String,
    /// The content file path relative to `dir_name`.
    pub file_name: String,
}
