//! Error types for document operations.

use std::io;
use std::string::FromUtf8Error;

/// Errors produced while turning a document tree back into text.
///
/// Parsing never fails: the HTML tree builder recovers from malformed markup
/// the same way a browser does.
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    /// The serializer failed to write markup.
    #[error("failed to serialize markup: {0}")]
    Serialize(#[from] io::Error),

    /// The serializer produced bytes that are not valid UTF-8.
    #[error("serialized markup is not valid UTF-8: {0}")]
    Encoding(#[from] FromUtf8Error),
}
