//! JSONPath-subset expression grammar and resolution.
//!
//! Grammar (informal):
//!
//! ```text
//! path       := "$" segment*
//! segment    := "." unquoted_name
//!             | "[" (index | "'" quoted_name "'" | '"' quoted_name '"') "]"
//! unquoted_name := alpha (alnum | "_")*
//! index      := digit+
//! ```
//!
//! Quoted names support the C-style escapes `\b \t \n \f \r \" \' \\`.
//! Resolution walks the live tree one segment at a time: each step moves
//! `parent` to the previous `child` and resolves the next `child` from it.
//! Once a `Policy::ReturnNull` resolution yields an absent child, further
//! segments are simply skipped rather than erroring — the final
//! `(parent, child)` pair reflects the last segment that was actually
//! resolved.

use jsondb_core::{Error, Result, ValueKey, NULL_KEY};

use crate::node_ops::{get_child_by_index, get_child_by_name};
use crate::policy::Policy;
use crate::transaction::Transaction;

/// One step of a parsed path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// `.name` or `['name']` / `["name"]`
    Name(String),
    /// `[123]`
    Index(usize),
}

/// Parse a path expression into its segments, without resolving it against
/// any tree.
pub fn parse_path(path: &str) -> Result<Vec<PathSegment>> {
    let chars: Vec<char> = path.chars().collect();
    let mut i = 0usize;

    if chars.first() != Some(&'$') {
        return Err(Error::PathSyntax(format!(
            "path must start with '$': {path}"
        )));
    }
    i += 1;

    let mut segments = Vec::new();
    while i < chars.len() {
        match chars[i] {
            '.' => {
                i += 1;
                let (name, next) = parse_unquoted_name(&chars, i, path)?;
                segments.push(PathSegment::Name(name));
                i = next;
            }
            '[' => {
                i += 1;
                let (segment, next) = parse_bracket_segment(&chars, i, path)?;
                segments.push(segment);
                i = next;
                if chars.get(i) != Some(&']') {
                    return Err(Error::PathSyntax(format!(
                        "expected ']' at position {i} in path: {path}"
                    )));
                }
                i += 1;
            }
            other => {
                return Err(Error::PathSyntax(format!(
                    "unexpected character '{other}' at position {i} in path: {path}"
                )))
            }
        }
    }

    Ok(segments)
}

fn parse_unquoted_name(chars: &[char], start: usize, path: &str) -> Result<(String, usize)> {
    let mut i = start;
    if i >= chars.len() || !chars[i].is_alphabetic() {
        return Err(Error::PathSyntax(format!(
            "expected a name starting with a letter at position {i} in path: {path}"
        )));
    }
    let mut name = String::new();
    name.push(chars[i]);
    i += 1;
    while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
        name.push(chars[i]);
        i += 1;
    }
    Ok((name, i))
}

fn parse_bracket_segment(chars: &[char], start: usize, path: &str) -> Result<(PathSegment, usize)> {
    match chars.get(start) {
        Some(c) if c.is_ascii_digit() => {
            let mut i = start;
            let mut digits = String::new();
            while i < chars.len() && chars[i].is_ascii_digit() {
                digits.push(chars[i]);
                i += 1;
            }
            let index: usize = digits.parse().map_err(|_| {
                Error::PathSyntax(format!("invalid array index in path: {path}"))
            })?;
            Ok((PathSegment::Index(index), i))
        }
        Some('\'') => parse_quoted_name(chars, start + 1, '\'', path),
        Some('"') => parse_quoted_name(chars, start + 1, '"', path),
        _ => Err(Error::PathSyntax(format!(
            "expected an index or quoted name at position {start} in path: {path}"
        ))),
    }
}

fn parse_quoted_name(
    chars: &[char],
    start: usize,
    quote: char,
    path: &str,
) -> Result<(PathSegment, usize)> {
    let mut i = start;
    let mut name = String::new();
    loop {
        match chars.get(i) {
            None => {
                return Err(Error::PathSyntax(format!(
                    "unterminated quoted name in path: {path}"
                )))
            }
            Some(&c) if c == quote => {
                i += 1;
                break;
            }
            Some('\\') => {
                let escaped = chars.get(i + 1).copied().ok_or_else(|| {
                    Error::PathSyntax(format!(
                        "dangling escape at position {i} in path: {path}"
                    ))
                })?;
                name.push(unescape(escaped));
                i += 2;
            }
            Some(&c) => {
                name.push(c);
                i += 1;
            }
        }
    }
    Ok((PathSegment::Name(name), i))
}

fn unescape(c: char) -> char {
    match c {
        'b' => '\u{8}',
        't' => '\t',
        'n' => '\n',
        'f' => '\u{C}',
        'r' => '\r',
        '"' => '"',
        '\'' => '\'',
        '\\' => '\\',
        other => other,
    }
}

/// Resolve `path` against the tree rooted at `root_key`, returning
/// `(parent, child)` — the key of the node one segment before the end, and
/// the key the whole path resolved to (or `NULL_KEY` if resolution stopped
/// early under `Policy::ReturnNull`).
///
/// For `path == "$"` (no segments), `parent == child == root_key`.
pub fn resolve_path(
    txn: &mut Transaction,
    root_key: ValueKey,
    path: &str,
    policy: Policy,
) -> Result<(ValueKey, ValueKey)> {
    let segments = parse_path(path)?;
    let mut parent = root_key;
    let mut child = root_key;

    for segment in segments {
        if child == NULL_KEY {
            break;
        }
        parent = child;
        child = match segment {
            PathSegment::Name(name) => get_child_by_name(txn, parent, &name, policy)?,
            PathSegment::Index(index) => get_child_by_index(txn, parent, index)?,
        };
    }

    Ok((parent, child))
}
