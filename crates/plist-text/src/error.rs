//! Error types for plist text generation.

use thiserror::Error;

/// Errors that can occur while writing a property list.
#[derive(Error, Debug)]
pub enum PlistError {
    /// The output sink rejected a write. Generation stops at the first failure;
    /// anything already written stays written.
    #[error("write error: {0}")]
    Write(#[from] std::io::Error),

    /// The input string was not valid JSON (JSON bridge only).
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A structural error during encoding (e.g., a value with no plist form).
    #[error("Encoding error: {0}")]
    Encode(String),
}

/// Convenience alias used throughout plist-text.
pub type Result<T> = std::result::Result<T, PlistError>;
