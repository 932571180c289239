//! Reading and preparing fragment files.
//!
//! A [`SourceLoader`] turns a path into raw text. [`FsLoader`] reads from the
//! filesystem with `tokio::fs`; [`MemoryLoader`] serves a fixed set of files
//! and is handy for tests and embedded sites.
//!
//! [`Fragments`] combines a loader with a [`TemplateExpander`] to perform the
//! read, expand, parse sequence that every page, template, and component goes
//! through.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use stitch_dom::Document;
use tracing::trace;

use crate::error::ComposeError;
use crate::expand::TemplateExpander;

/// Provides the raw text of fragment files.
#[async_trait]
pub trait SourceLoader: Send + Sync {
    /// Reads the file at `path`.
    ///
    /// Must fail with [`ComposeError::NotFound`] naming `path` when the file
    /// does not exist.
    async fn read_text(&self, path: &Path) -> Result<String, ComposeError>;
}

/// Loader backed by the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLoader;

#[async_trait]
impl SourceLoader for FsLoader {
    async fn read_text(&self, path: &Path) -> Result<String, ComposeError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|err| ComposeError::from_io(path, err))
    }
}

/// Loader serving files from memory.
///
/// ```rust
/// use stitch::MemoryLoader;
///
/// let loader = MemoryLoader::new()
///     .with_file("site/template.html", "<body><pogon_outlet></pogon_outlet></body>")
///     .with_file("site/index.html", "<p>Home</p>");
/// assert!(loader.contains("site/index.html"));
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryLoader {
    files: HashMap<PathBuf, String>,
}

impl MemoryLoader {
    /// Creates an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file, returning the loader for chaining.
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    /// Adds or replaces a file.
    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into());
    }

    /// Whether a file is present at `path`.
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.files.contains_key(path.as_ref())
    }
}

#[async_trait]
impl SourceLoader for MemoryLoader {
    async fn read_text(&self, path: &Path) -> Result<String, ComposeError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| ComposeError::NotFound {
                path: path.to_path_buf(),
            })
    }
}

/// Reads, expands, and parses fragment files.
#[derive(Clone, Copy)]
pub struct Fragments<'a> {
    loader: &'a dyn SourceLoader,
    expander: &'a dyn TemplateExpander,
}

impl<'a> Fragments<'a> {
    /// Pairs a loader with an expander.
    pub fn new(loader: &'a dyn SourceLoader, expander: &'a dyn TemplateExpander) -> Self {
        Self { loader, expander }
    }

    /// Loads the file at `path`, expands it with `options`, and parses the result.
    pub async fn load(&self, path: &Path, options: &Value) -> Result<Document, ComposeError> {
        trace!(path = %path.display(), "loading fragment");
        let raw = self.loader.read_text(path).await?;
        let expanded =
            self.expander
                .expand(&raw, options)
                .map_err(|source| ComposeError::Expansion {
                    path: path.to_path_buf(),
                    source,
                })?;
        Ok(Document::parse(&expanded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::expand::MiniJinjaExpander;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_loader_missing_file() {
        let loader = MemoryLoader::new();
        let err = loader.read_text(Path::new("nope.html")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("nope.html"));
    }

    #[tokio::test]
    async fn test_fs_loader_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.html");
        let err = FsLoader.read_text(&path).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains(&path.display().to_string()));
    }

    #[tokio::test]
    async fn test_fs_loader_rejects_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.html");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
        let err = FsLoader.read_text(&path).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[tokio::test]
    async fn test_fragments_expand_then_parse() {
        let loader =
            MemoryLoader::new().with_file("card.html", "<div id=\"card\">{{ title }}</div>");
        let expander = MiniJinjaExpander::new();
        let fragments = Fragments::new(&loader, &expander);

        let doc = fragments
            .load(Path::new("card.html"), &json!({"title": "Hello"}))
            .await
            .unwrap();
        assert_eq!(doc.element_by_id("card").unwrap().text_content(), "Hello");
    }

    #[tokio::test]
    async fn test_fragments_expansion_error_names_file() {
        let loader = MemoryLoader::new().with_file("broken.html", "{% if %}");
        let expander = MiniJinjaExpander::new();
        let fragments = Fragments::new(&loader, &expander);

        let err = fragments
            .load(Path::new("broken.html"), &json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Expansion);
        assert!(err.to_string().contains("broken.html"));
    }
}
