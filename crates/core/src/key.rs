//! `ValueKey`: the opaque identifier every node is addressed by.
//!
//! Every node in the document tree, including the root, is stored under its
//! own key in the underlying KV engine. There is no in-memory pointer graph:
//! a key is the only thing that ties a parent to a child.

/// Opaque identifier for a stored [`crate::Node`].
///
/// Corresponds 1:1 to a key in the underlying KV engine.
pub type ValueKey = u32;

/// Sentinel key meaning "absent" / "no node here".
///
/// Never assigned to a real node; never round-tripped through the codec.
pub const NULL_KEY: ValueKey = 0;

/// The key the document root is always stored under.
///
/// The root is bootstrapped as an empty [`crate::Node::Object`] the first
/// time a database is opened and never moves to a different key.
pub const ROOT_KEY: ValueKey = 100;

/// The key under which the persisted key allocator high-water mark is stored.
pub const NEXT_ID_KEY: ValueKey = 101;

/// The first key handed out to user-created nodes.
///
/// Keys below this are reserved ([`NULL_KEY`], [`ROOT_KEY`], [`NEXT_ID_KEY`]).
pub const INITIAL_NEXT_ID: ValueKey = 1000;
