//! Resolution policy for a missing `Object` field during path evaluation.

/// What to do when a path segment names an `Object` field that doesn't
/// exist yet.
///
/// Only applies to object-name lookups. Array indexing is always
/// policy-independent: an out-of-range index is
/// [`jsondb_core::Error::IndexOutOfBounds`] regardless of `Policy`, since
/// arrays never auto-extend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Fail the whole resolution with `Error::PathNotFound`.
    Throw,
    /// Stop descending and return the last resolved parent with an absent
    /// child, rather than erroring. Not itself an error.
    ReturnNull,
    /// Create an empty `Object` at the missing field (and store it) before
    /// continuing to resolve the rest of the path.
    Create,
}
