//! The tagged-variant value model.
//!
//! `Node` is the shredded in-memory representation of one entry in the
//! document tree. A container (`Array`/`Object`) holds its children by
//! [`ValueKey`] only, never by value — every retrieval from a
//! [`Transaction`](../../jsondb_engine/struct.Transaction.html) hands back a
//! fresh owned `Node`, so there is no shared-ownership graph to keep
//! consistent in memory.

use std::collections::BTreeMap;

use crate::key::ValueKey;

/// A single shredded node of the document tree.
///
/// Variants mirror the JSON data model plus the absence of a value
/// (`Null`). Operations that only make sense for one variant (looking a
/// name up in an `Object`, indexing into an `Array`, ...) live as free
/// functions in the engine crate and return [`crate::Error::TypeMismatch`]
/// when called on the wrong variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// The JSON `null` value.
    Null,
    /// A signed 32-bit integer.
    Integer(i32),
    /// A 64-bit IEEE-754 floating point number.
    Real(f64),
    /// A boolean.
    Boolean(bool),
    /// A UTF-8 string.
    String(String),
    /// An ordered list of child keys.
    Array(Vec<ValueKey>),
    /// A name-to-child-key map, iterated in ascending lexicographic order
    /// of name (hence `BTreeMap` rather than a hash map).
    Object(BTreeMap<String, ValueKey>),
}

impl Node {
    /// Human-readable name of this node's variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Integer(_) => "integer",
            Node::Real(_) => "real",
            Node::Boolean(_) => "boolean",
            Node::String(_) => "string",
            Node::Array(_) => "array",
            Node::Object(_) => "object",
        }
    }

    /// `true` for `Array` and `Object`.
    pub fn is_container(&self) -> bool {
        matches!(self, Node::Array(_) | Node::Object(_))
    }
}
