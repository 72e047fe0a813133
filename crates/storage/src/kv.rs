//! The ordered KV store interface the document engine is built against.
//!
//! Keys are opaque fixed-width [`ValueKey`]s (`u32`); values are whatever
//! bytes the node codec produced. A transaction is single-writer: the
//! engine never has more than one open at a time, matching `redb`'s own
//! one-writer model.

use std::collections::BTreeSet;

use jsondb_core::{Result, ValueKey};

/// A KV backend capable of beginning transactions.
pub trait KvEngine: Send + Sync {
    /// Begin a new read/write transaction.
    fn begin(&self) -> Result<Box<dyn KvTransaction>>;
}

/// A single transaction against the KV backend.
///
/// `commit`/`abort` consume `self` (via `Box<Self>`) so a transaction can't
/// be used again after it ends, and so the backend's own transaction
/// handle (which is itself consumed on commit/abort) can be moved out.
pub trait KvTransaction {
    /// Write `bytes` under `key`, replacing any existing value.
    fn put(&mut self, key: ValueKey, bytes: &[u8]) -> Result<()>;

    /// Read the bytes stored under `key`, if any.
    fn get(&self, key: ValueKey) -> Result<Option<Vec<u8>>>;

    /// Remove `key`. A no-op if the key is absent.
    fn delete(&mut self, key: ValueKey) -> Result<()>;

    /// Every key currently present in the store.
    fn keys(&self) -> Result<BTreeSet<ValueKey>>;

    /// Make every `put`/`delete` in this transaction durable.
    fn commit(self: Box<Self>) -> Result<()>;

    /// Discard every `put`/`delete` in this transaction.
    fn abort(self: Box<Self>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Object-safety check, mirroring the codec trait's own.
    fn _accepts_box_dyn_engine(_engine: Box<dyn KvEngine>) {}
}
