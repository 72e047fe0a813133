//! Core types shared by the storage, engine, and façade layers of JsonDb.
//!
//! This crate defines the foundational vocabulary of the document store:
//! - [`ValueKey`]: the opaque identifier every node is addressed by
//! - [`Node`]: the tagged-variant value model (the shredded JSON tree)
//! - node codec: binary encode/decode for a single [`Node`]
//! - [`Error`]: the unified error type returned across crate boundaries

#![warn(missing_docs)]

pub mod codec;
pub mod error;
pub mod key;
pub mod node;

pub use error::{Error, Result};
pub use key::{ValueKey, INITIAL_NEXT_ID, NEXT_ID_KEY, NULL_KEY, ROOT_KEY};
pub use node::Node;
