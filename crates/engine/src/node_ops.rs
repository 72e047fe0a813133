//! Variant-specific operations on nodes.
//!
//! `Node` itself is a plain enum with no transaction reference (see the
//! crate-level docs): these free functions are where "retrieve, mutate,
//! re-store" actually happens. Mutation ordering here is deliberate and
//! mirrors the original implementation exactly — get it wrong and a crash
//! between two stores can leave an orphaned or dangling node behind.

use std::collections::{BTreeMap, BTreeSet};

use jsondb_core::{Error, Node, Result, ValueKey, NULL_KEY};

use crate::policy::Policy;
use crate::transaction::Transaction;

/// Look up `name` in the `Object` stored at `parent_key`.
///
/// - `Policy::Throw`: missing field is `Error::PathNotFound`.
/// - `Policy::ReturnNull`: missing field returns `NULL_KEY` (not an error).
/// - `Policy::Create`: missing field is created as an empty `Object`; the
///   new child is stored before the parent is re-stored with the new
///   entry, so a crash between the two never leaves a referenced-but-absent
///   key.
pub fn get_child_by_name(
    txn: &mut Transaction,
    parent_key: ValueKey,
    name: &str,
    policy: Policy,
) -> Result<ValueKey> {
    let fields = match txn.retrieve(parent_key)? {
        Node::Object(fields) => fields,
        other => {
            return Err(Error::TypeMismatch(format!(
                "cannot look up field '{name}' on a {}",
                other.type_name()
            )))
        }
    };

    if let Some(key) = fields.get(name) {
        return Ok(*key);
    }

    match policy {
        Policy::Throw => Err(Error::PathNotFound(format!(
            "field '{name}' does not exist"
        ))),
        Policy::ReturnNull => Ok(NULL_KEY),
        Policy::Create => {
            let mut fields = fields;
            let new_key = txn.generate_key();
            txn.store(new_key, &Node::Object(BTreeMap::new()))?;
            fields.insert(name.to_string(), new_key);
            txn.store(parent_key, &Node::Object(fields))?;
            Ok(new_key)
        }
    }
}

/// Index into the `Array` stored at `parent_key`.
///
/// Always policy-independent: an out-of-range index is
/// `Error::IndexOutOfBounds`, never auto-extended, regardless of how the
/// caller would otherwise resolve a missing path.
pub fn get_child_by_index(txn: &Transaction, parent_key: ValueKey, index: usize) -> Result<ValueKey> {
    match txn.retrieve(parent_key)? {
        Node::Array(items) => items.get(index).copied().ok_or_else(|| {
            Error::IndexOutOfBounds(format!(
                "index {index} out of bounds for array of length {}",
                items.len()
            ))
        }),
        other => Err(Error::TypeMismatch(format!(
            "cannot index into a {}",
            other.type_name()
        ))),
    }
}

/// Append `child_key` to the `Array` stored at `parent_key`, re-storing the
/// array afterwards.
pub fn append_child(txn: &mut Transaction, parent_key: ValueKey, child_key: ValueKey) -> Result<()> {
    match txn.retrieve(parent_key)? {
        Node::Array(mut items) => {
            items.push(child_key);
            txn.store(parent_key, &Node::Array(items))
        }
        other => Err(Error::TypeMismatch(format!(
            "cannot append to a {}",
            other.type_name()
        ))),
    }
}

/// Remove the entry of `parent_key` (an `Object` field or an `Array`
/// element) whose value is `child_key`, deleting the child's whole
/// subtree first.
///
/// Only the first matching entry is removed; entry values are otherwise
/// guaranteed unique by construction. Removing an array element shifts
/// every later element down by one, same as `Vec::remove`.
pub fn delete_child(txn: &mut Transaction, parent_key: ValueKey, child_key: ValueKey) -> Result<()> {
    match txn.retrieve(parent_key)? {
        Node::Object(mut fields) => {
            let name = fields
                .iter()
                .find(|(_, key)| **key == child_key)
                .map(|(name, _)| name.clone())
                .ok_or_else(|| {
                    Error::PathNotFound(format!(
                        "no field of this object holds key {child_key}"
                    ))
                })?;
            delete_subtree(txn, child_key)?;
            fields.remove(&name);
            txn.store(parent_key, &Node::Object(fields))
        }
        Node::Array(mut items) => {
            let index = items.iter().position(|key| *key == child_key).ok_or_else(|| {
                Error::PathNotFound(format!(
                    "no element of this array holds key {child_key}"
                ))
            })?;
            delete_subtree(txn, child_key)?;
            items.remove(index);
            txn.store(parent_key, &Node::Array(items))
        }
        other => Err(Error::TypeMismatch(format!(
            "cannot delete a child of a {}",
            other.type_name()
        ))),
    }
}

/// Delete `key` and, recursively, everything it contains.
///
/// Deletes the node's own storage entry before recursing into its
/// children, matching the original implementation's ordering.
pub fn delete_subtree(txn: &mut Transaction, key: ValueKey) -> Result<()> {
    if key == NULL_KEY {
        return Ok(());
    }
    let node = txn.retrieve(key)?;
    txn.delete(key)?;
    match node {
        Node::Array(items) => {
            for child in items {
                delete_subtree(txn, child)?;
            }
        }
        Node::Object(fields) => {
            for (_, child) in fields {
                delete_subtree(txn, child)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// Replace the node stored at `key` with `new_node`, preserving `key`
/// itself (identity preservation for `set`).
///
/// Deletes every descendant of the *old* value at `key` first (not `key`
/// itself), then stores `new_node` under the same key. A parent pointing
/// at `key` never needs to be rewritten: its container entry (array slot
/// or object field) already names the right key.
pub fn replace_node(txn: &mut Transaction, key: ValueKey, new_node: Node) -> Result<()> {
    let old = txn.retrieve(key)?;
    match old {
        Node::Array(items) => {
            for child in items {
                delete_subtree(txn, child)?;
            }
        }
        Node::Object(fields) => {
            for (_, child) in fields {
                delete_subtree(txn, child)?;
            }
        }
        _ => {}
    }
    txn.store(key, &new_node)
}

/// Every key reachable from `root_key` by walking the live tree.
///
/// Used by `validate` to diff the logical tree against everything actually
/// present in the KV store.
pub fn walk_tree(txn: &Transaction, root_key: ValueKey) -> Result<BTreeSet<ValueKey>> {
    let mut keys = BTreeSet::new();
    walk_tree_into(txn, root_key, &mut keys)?;
    Ok(keys)
}

fn walk_tree_into(txn: &Transaction, key: ValueKey, keys: &mut BTreeSet<ValueKey>) -> Result<()> {
    if key == NULL_KEY {
        return Ok(());
    }
    keys.insert(key);
    match txn.retrieve(key)? {
        Node::Array(items) => {
            for child in items {
                walk_tree_into(txn, child, keys)?;
            }
        }
        Node::Object(fields) => {
            for (_, child) in fields {
                walk_tree_into(txn, child, keys)?;
            }
        }
        _ => {}
    }
    Ok(())
}
