//! Error types for page composition.
//!
//! Every failure aborts the render in progress. Nothing is recovered
//! internally and no partial markup is ever returned, so a caller sees exactly
//! one [`ComposeError`] per failed render.

use std::io;
use std::path::PathBuf;

use crate::expand::ExpandError;

/// Broad classification of a [`ComposeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A content, template, or component file does not exist.
    NotFound,
    /// The template expander rejected a file.
    Expansion,
    /// A file could not be turned into (or back out of) a document.
    Parse,
    /// A custom-tag handler failed.
    Handler,
    /// Any other I/O failure while reading a file.
    Io,
    /// Outlet resolution did not settle within the configured pass limit.
    Limit,
}

/// Error type for render operations.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    /// A referenced file does not exist.
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Reading a file failed for a reason other than it being missing.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The template expander rejected the contents of a file.
    #[error("failed to expand {}: {source}", path.display())]
    Expansion {
        path: PathBuf,
        #[source]
        source: ExpandError,
    },

    /// A file could not be parsed, or the composed tree could not be serialized.
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// The page template has no `<pogon_outlet>` element.
    #[error("template {} has no <pogon_outlet> element", path.display())]
    MissingOutlet { path: PathBuf },

    /// A `<pogon_component>` element has no `name` attribute.
    #[error("<pogon_component> element is missing its name attribute")]
    MissingComponentName,

    /// A custom-tag handler returned an error.
    #[error("handler for <{tag}> failed: {source}")]
    Handler {
        tag: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// Components kept producing further component outlets.
    #[error("component outlets were still present after {limit} resolution passes")]
    PassLimitExceeded { limit: usize },

    /// The introspection record could not be encoded as JSON.
    #[error("failed to encode introspection record: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ComposeError {
    /// Maps a read failure on `path` to [`NotFound`](Self::NotFound) or [`Io`](Self::Io).
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => ComposeError::NotFound { path },
            io::ErrorKind::InvalidData => ComposeError::Parse {
                path,
                message: source.to_string(),
            },
            _ => ComposeError::Io { path, source },
        }
    }

    /// Create a handler error for `tag`.
    pub fn handler(tag: impl Into<String>, source: anyhow::Error) -> Self {
        ComposeError::Handler {
            tag: tag.into(),
            source: source.into(),
        }
    }

    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ComposeError::NotFound { .. } => ErrorKind::NotFound,
            ComposeError::Io { .. } => ErrorKind::Io,
            ComposeError::Expansion { .. } => ErrorKind::Expansion,
            ComposeError::Parse { .. }
            | ComposeError::MissingOutlet { .. }
            | ComposeError::MissingComponentName
            | ComposeError::Serialization(_) => ErrorKind::Parse,
            ComposeError::Handler { .. } => ErrorKind::Handler,
            ComposeError::PassLimitExceeded { .. } => ErrorKind::Limit,
        }
    }

    /// The file path this error refers to, when there is one.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            ComposeError::NotFound { path }
            | ComposeError::Io { path, .. }
            | ComposeError::Expansion { path, .. }
            | ComposeError::Parse { path, .. }
            | ComposeError::MissingOutlet { path } => Some(path),
            _ => None,
        }
    }
}
