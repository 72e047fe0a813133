//! Ordered key-value storage backing the document tree.
//!
//! The document engine talks to storage purely through the [`KvEngine`] /
//! [`KvTransaction`] traits, never through the concrete backend directly.
//! The shipped implementation, [`RedbEngine`], is backed by `redb`, an
//! embedded, single-writer/multi-reader, ACID B-tree store. Raw bytes
//! flow through the [`codec`] seam on their way in and out, which is an
//! identity pass-through today but leaves a hook for encryption-at-rest
//! or compression later.

#![warn(missing_docs)]

pub mod codec;
mod kv;
mod redb_engine;

pub use codec::{CodecError, IdentityCodec, StorageCodec};
pub use kv::{KvEngine, KvTransaction};
pub use redb_engine::RedbEngine;
