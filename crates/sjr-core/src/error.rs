//! Error types for SJR loading, parsing, value access and saving.

use crate::node::Kind;
use thiserror::Error;

/// Errors that can occur while reading, converting or writing SJR documents.
#[derive(Error, Debug)]
pub enum SjrError {
    /// The byte source or sink could not be opened, read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input text is not a complete, well-formed SJR value.
    /// `offset` is the byte position where the problem was detected.
    #[error("SJR format error at byte {offset}: {message}")]
    Format { offset: usize, message: String },

    /// `Node::value::<T>()` could not represent the stored value as `T`.
    #[error("cannot read {found} node as {requested}: {reason}")]
    ValueType {
        requested: &'static str,
        found: Kind,
        reason: String,
    },

    /// The tree holds a value the text format cannot express (e.g. NaN).
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Conversion to or from `serde_json` failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SjrError {
    pub(crate) fn format(offset: usize, message: impl Into<String>) -> Self {
        SjrError::Format {
            offset,
            message: message.into(),
        }
    }

    /// Byte offset of a format error, `None` for every other variant.
    pub fn offset(&self) -> Option<usize> {
        match self {
            SjrError::Format { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}

/// Map a byte offset in `input` to a 1-based `(line, column)` pair.
///
/// Columns count bytes, matching the offsets carried by [`SjrError::Format`].
/// Offsets past the end clamp to the position just after the last byte.
pub fn line_col(input: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(input.len());
    let before = &input.as_bytes()[..offset];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map(|p| p + 1)
        .unwrap_or(0);
    (line, offset - line_start + 1)
}

/// Convenience alias used throughout sjr-core.
pub type Result<T> = std::result::Result<T, SjrError>;
