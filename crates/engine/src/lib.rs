//! Document engine: transactions, node mutation, path resolution, and the
//! JSON literal parser/grafter.
//!
//! This crate is the only place that understands how a [`jsondb_core::Node`]
//! tree is laid out over a [`jsondb_storage::KvEngine`]. Everything above it
//! (the façade) only ever calls [`Transaction`] methods and the path/JSON
//! entry points; everything below it only ever sees `put`/`get`/`delete` on
//! opaque keys.

#![warn(missing_docs)]

pub mod json_parser;
pub mod node_ops;
pub mod path;
pub mod policy;
pub mod transaction;

pub use node_ops::{
    append_child, delete_child, delete_subtree, get_child_by_index, get_child_by_name,
    replace_node, walk_tree,
};
pub use path::{resolve_path, PathSegment};
pub use policy::Policy;
pub use transaction::Transaction;
