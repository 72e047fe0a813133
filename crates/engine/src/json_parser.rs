//! JSON literal parsing and grafting.
//!
//! Parsing is two-phase: [`parse_json_literal`] turns text into a
//! [`JsonLiteral`] tree with no transaction involved, then [`graft`] walks
//! that tree and writes it into storage. Grafting reuses the *target's*
//! existing key for the outermost value (so replacing `$.a.b` doesn't
//! require rewriting `$.a`'s map), but always allocates fresh keys for
//! everything nested underneath — a freshly-parsed array element or object
//! field never had a prior identity to preserve.

use std::collections::BTreeMap;

use jsondb_core::{Error, Node, Result, ValueKey};

use crate::node_ops::delete_subtree;
use crate::transaction::Transaction;

/// A parsed JSON literal, prior to being grafted into storage.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonLiteral {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// An integer literal (no decimal point or exponent).
    Int(i32),
    /// A literal with a decimal point and/or exponent.
    Real(f64),
    /// A single- or double-quoted string literal.
    Str(String),
    /// `[ ... ]`
    Array(Vec<JsonLiteral>),
    /// `{ ... }`, fields kept in source order (duplicates resolved
    /// last-value-wins when grafted, matching `BTreeMap::insert`).
    Object(Vec<(String, JsonLiteral)>),
}

/// Parse a JSON literal. The entire string must be consumed (aside from
/// leading/trailing whitespace).
pub fn parse_json_literal(text: &str) -> Result<JsonLiteral> {
    let chars: Vec<char> = text.chars().collect();
    let mut i = skip_whitespace(&chars, 0);
    let (value, next) = parse_value(&chars, i, text)?;
    i = skip_whitespace(&chars, next);
    if i != chars.len() {
        return Err(Error::JsonSyntax(format!(
            "unexpected trailing input at position {i} in: {text}"
        )));
    }
    Ok(value)
}

fn skip_whitespace(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    i
}

fn parse_value(chars: &[char], start: usize, text: &str) -> Result<(JsonLiteral, usize)> {
    let i = skip_whitespace(chars, start);
    match chars.get(i) {
        Some('{') => parse_object(chars, i, text),
        Some('[') => parse_array(chars, i, text),
        Some('"') => {
            let (s, next) = parse_quoted_string(chars, i + 1, '"', text)?;
            Ok((JsonLiteral::Str(s), next))
        }
        Some('\'') => {
            let (s, next) = parse_quoted_string(chars, i + 1, '\'', text)?;
            Ok((JsonLiteral::Str(s), next))
        }
        Some('t') if matches_keyword(chars, i, "true") => {
            Ok((JsonLiteral::Bool(true), i + 4))
        }
        Some('f') if matches_keyword(chars, i, "false") => {
            Ok((JsonLiteral::Bool(false), i + 5))
        }
        Some('n') if matches_keyword(chars, i, "null") => Ok((JsonLiteral::Null, i + 4)),
        Some(c) if c.is_ascii_digit() || *c == '-' => parse_number(chars, i, text),
        other => Err(Error::JsonSyntax(format!(
            "unexpected {} at position {i} in: {text}",
            other.map(|c| c.to_string()).unwrap_or_else(|| "end of input".to_string())
        ))),
    }
}

fn matches_keyword(chars: &[char], start: usize, keyword: &str) -> bool {
    let kw: Vec<char> = keyword.chars().collect();
    if start + kw.len() > chars.len() {
        return false;
    }
    chars[start..start + kw.len()] == kw[..]
}

fn parse_object(chars: &[char], start: usize, text: &str) -> Result<(JsonLiteral, usize)> {
    let mut i = start + 1; // consume '{'
    let mut fields = Vec::new();
    i = skip_whitespace(chars, i);
    if chars.get(i) == Some(&'}') {
        return Ok((JsonLiteral::Object(fields), i + 1));
    }
    loop {
        i = skip_whitespace(chars, i);
        let name = match chars.get(i) {
            Some('"') => parse_quoted_string(chars, i + 1, '"', text)?,
            Some('\'') => parse_quoted_string(chars, i + 1, '\'', text)?,
            _ => {
                return Err(Error::JsonSyntax(format!(
                    "expected a quoted field name at position {i} in: {text}"
                )))
            }
        };
        let (name, next) = name;
        i = skip_whitespace(chars, next);
        if chars.get(i) != Some(&':') {
            return Err(Error::JsonSyntax(format!(
                "expected ':' at position {i} in: {text}"
            )));
        }
        i += 1;
        let (value, next) = parse_value(chars, i, text)?;
        fields.push((name, value));
        i = skip_whitespace(chars, next);
        match chars.get(i) {
            Some(',') => {
                i += 1;
            }
            Some('}') => {
                return Ok((JsonLiteral::Object(fields), i + 1));
            }
            _ => {
                return Err(Error::JsonSyntax(format!(
                    "expected ',' or '}}' at position {i} in: {text}"
                )))
            }
        }
    }
}

fn parse_array(chars: &[char], start: usize, text: &str) -> Result<(JsonLiteral, usize)> {
    let mut i = start + 1; // consume '['
    let mut items = Vec::new();
    i = skip_whitespace(chars, i);
    if chars.get(i) == Some(&']') {
        return Ok((JsonLiteral::Array(items), i + 1));
    }
    loop {
        let (value, next) = parse_value(chars, i, text)?;
        items.push(value);
        i = skip_whitespace(chars, next);
        match chars.get(i) {
            Some(',') => {
                i += 1;
            }
            Some(']') => {
                return Ok((JsonLiteral::Array(items), i + 1));
            }
            _ => {
                return Err(Error::JsonSyntax(format!(
                    "expected ',' or ']' at position {i} in: {text}"
                )))
            }
        }
    }
}

fn parse_quoted_string(
    chars: &[char],
    start: usize,
    quote: char,
    text: &str,
) -> Result<(String, usize)> {
    let mut i = start;
    let mut s = String::new();
    loop {
        match chars.get(i) {
            None => {
                return Err(Error::JsonSyntax(format!(
                    "unterminated string literal in: {text}"
                )))
            }
            Some(&c) if c == quote => {
                return Ok((s, i + 1));
            }
            Some('\\') => {
                let escaped = chars.get(i + 1).ok_or_else(|| {
                    Error::JsonSyntax(format!("dangling escape at position {i} in: {text}"))
                })?;
                s.push(match escaped {
                    'b' => '\u{8}',
                    't' => '\t',
                    'n' => '\n',
                    'f' => '\u{C}',
                    'r' => '\r',
                    '"' => '"',
                    '\'' => '\'',
                    '\\' => '\\',
                    other => *other,
                });
                i += 2;
            }
            Some(&c) => {
                s.push(c);
                i += 1;
            }
        }
    }
}

fn parse_number(chars: &[char], start: usize, text: &str) -> Result<(JsonLiteral, usize)> {
    let mut i = start;
    if chars.get(i) == Some(&'-') {
        i += 1;
    }
    let digits_start = i;
    while chars.get(i).is_some_and(|c| c.is_ascii_digit()) {
        i += 1;
    }
    if i == digits_start {
        return Err(Error::JsonSyntax(format!(
            "expected digits at position {i} in: {text}"
        )));
    }
    let mut is_real = false;
    if chars.get(i) == Some(&'.') {
        is_real = true;
        i += 1;
        let frac_start = i;
        while chars.get(i).is_some_and(|c| c.is_ascii_digit()) {
            i += 1;
        }
        if i == frac_start {
            return Err(Error::JsonSyntax(format!(
                "expected digits after decimal point at position {i} in: {text}"
            )));
        }
    }
    if matches!(chars.get(i), Some('e') | Some('E')) {
        is_real = true;
        i += 1;
        if matches!(chars.get(i), Some('+') | Some('-')) {
            i += 1;
        }
        let exp_start = i;
        while chars.get(i).is_some_and(|c| c.is_ascii_digit()) {
            i += 1;
        }
        if i == exp_start {
            return Err(Error::JsonSyntax(format!(
                "expected digits in exponent at position {i} in: {text}"
            )));
        }
    }
    let literal_text: String = chars[start..i].iter().collect();
    if is_real {
        let value: f64 = literal_text
            .parse()
            .map_err(|_| Error::JsonSyntax(format!("invalid number literal: {literal_text}")))?;
        Ok((JsonLiteral::Real(value), i))
    } else {
        let value: i32 = literal_text
            .parse()
            .map_err(|_| Error::JsonSyntax(format!("invalid integer literal: {literal_text}")))?;
        Ok((JsonLiteral::Int(value), i))
    }
}

/// Build `literal` as a brand-new subtree, allocating a fresh key for every
/// node (including the outermost one). Used for everything nested inside a
/// grafted container.
fn build_new(txn: &mut Transaction, literal: &JsonLiteral) -> Result<ValueKey> {
    let node = match literal {
        JsonLiteral::Null => Node::Null,
        JsonLiteral::Bool(b) => Node::Boolean(*b),
        JsonLiteral::Int(v) => Node::Integer(*v),
        JsonLiteral::Real(v) => Node::Real(*v),
        JsonLiteral::Str(s) => Node::String(s.clone()),
        JsonLiteral::Array(items) => {
            let mut keys = Vec::with_capacity(items.len());
            for item in items {
                keys.push(build_new(txn, item)?);
            }
            Node::Array(keys)
        }
        JsonLiteral::Object(fields) => {
            let mut map = BTreeMap::new();
            for (name, value) in fields {
                let key = build_new(txn, value)?;
                map.insert(name.clone(), key);
            }
            Node::Object(map)
        }
    };
    let key = txn.generate_key();
    txn.store(key, &node)?;
    Ok(key)
}

/// Graft `literal` onto `target_key`, replacing whatever is stored there.
///
/// The outermost value reuses `target_key` (after deleting the old
/// subtree there, so no grandchild is ever orphaned); every nested value
/// gets a fresh key via [`build_new`].
pub fn graft(txn: &mut Transaction, target_key: ValueKey, literal: &JsonLiteral) -> Result<()> {
    let new_node = match literal {
        JsonLiteral::Null => Node::Null,
        JsonLiteral::Bool(b) => Node::Boolean(*b),
        JsonLiteral::Int(v) => Node::Integer(*v),
        JsonLiteral::Real(v) => Node::Real(*v),
        JsonLiteral::Str(s) => Node::String(s.clone()),
        JsonLiteral::Array(items) => {
            let mut keys = Vec::with_capacity(items.len());
            for item in items {
                keys.push(build_new(txn, item)?);
            }
            Node::Array(keys)
        }
        JsonLiteral::Object(fields) => {
            let mut map = BTreeMap::new();
            for (name, value) in fields {
                let key = build_new(txn, value)?;
                map.insert(name.clone(), key);
            }
            Node::Object(map)
        }
    };
    delete_subtree(txn, target_key)?;
    txn.store(target_key, &new_node)
}
