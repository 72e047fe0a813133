//! Façade-level configuration for opening a database.

use std::path::PathBuf;

/// Configuration passed to [`crate::JsonDb::open`].
///
/// Deliberately small: the spec's KV engine interface only names
/// create-if-missing and writer-exclusive as open flags, and `redb`
/// already behaves that way unconditionally (`Database::create` creates
/// the file if absent, and only ever allows one writer). The struct
/// exists as a seam for the options a real deployment eventually wants —
/// an explicit storage codec, a read-only mode — without breaking
/// `JsonDb::open`'s signature when they're added.
#[derive(Debug, Clone)]
pub struct JsonDbConfig {
    /// Path to the backing `redb` file.
    pub path: PathBuf,
}

impl JsonDbConfig {
    /// Build a config pointing at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}
