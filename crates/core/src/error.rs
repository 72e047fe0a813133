//! Error types returned across the document-store crate boundary.
//!
//! A single flat enum, in the style of a leaf crate's own `Error`/`Result`
//! pair rather than a larger multi-tenant error model: this store has no
//! entity references or run ids to carry, just paths, keys and types.

use thiserror::Error;

/// Result type alias used throughout the JsonDb crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the node codec, path evaluator, JSON literal parser,
/// transaction layer, and façade.
#[derive(Debug, Error)]
pub enum Error {
    /// A path expression did not match the grammar.
    #[error("invalid path syntax: {0}")]
    PathSyntax(String),

    /// Path resolution under `Policy::Throw` hit a missing object field.
    #[error("path not found: {0}")]
    PathNotFound(String),

    /// An array index was out of bounds. Never auto-extends, regardless of
    /// resolution policy.
    #[error("index out of bounds: {0}")]
    IndexOutOfBounds(String),

    /// An operation was attempted on a node of the wrong variant.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// A JSON literal did not parse.
    #[error("invalid JSON literal: {0}")]
    JsonSyntax(String),

    /// A node read back from storage failed to decode.
    #[error("corrupt node: {0}")]
    CorruptNode(String),

    /// The underlying KV engine reported a failure.
    #[error("storage error: {0}")]
    StorageError(String),

    /// The requested operation is not permitted (e.g. deleting the root).
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}
