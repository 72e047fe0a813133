//! Binary encode/decode for a single [`Node`].
//!
//! One type-tag byte followed by a variant-specific payload. These tag
//! values are part of the on-disk format and MUST NOT change:
//!
//! | Variant | Tag |
//! |---|---|
//! | Integer | `0x10` |
//! | Real | `0x20` |
//! | Boolean | `0x30` |
//! | String | `0x40` |
//! | Array | `0x50` |
//! | Object | `0x60` |
//! | Null | `0x70` |
//!
//! Integers and reals are little-endian. Strings are a `u64` byte-length
//! prefix (fixed at 64 bits so the format is the same on 32- and 64-bit
//! hosts) followed by raw UTF-8 bytes. Arrays are a `u32` entry count
//! followed by that many 4-byte keys. Objects are a `u32` entry count
//! followed by, per entry, a `u32` name-length, the name bytes, and a
//! 4-byte key — entries are written in the same ascending order the
//! `BTreeMap` already iterates in.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Cursor, Read, Write};

use crate::error::{Error, Result};
use crate::key::ValueKey;
use crate::node::Node;

const TAG_INTEGER: u8 = 0x10;
const TAG_REAL: u8 = 0x20;
const TAG_BOOLEAN: u8 = 0x30;
const TAG_STRING: u8 = 0x40;
const TAG_ARRAY: u8 = 0x50;
const TAG_OBJECT: u8 = 0x60;
const TAG_NULL: u8 = 0x70;

/// Encode `node` to its on-disk byte representation.
pub fn encode(node: &Node) -> Vec<u8> {
    let mut buf = Vec::new();
    write_node(&mut buf, node).expect("writing to a Vec<u8> never fails");
    buf
}

fn write_node<W: Write>(w: &mut W, node: &Node) -> io::Result<()> {
    match node {
        Node::Null => w.write_u8(TAG_NULL),
        Node::Integer(v) => {
            w.write_u8(TAG_INTEGER)?;
            w.write_i32::<LittleEndian>(*v)
        }
        Node::Real(v) => {
            w.write_u8(TAG_REAL)?;
            w.write_f64::<LittleEndian>(*v)
        }
        Node::Boolean(v) => {
            w.write_u8(TAG_BOOLEAN)?;
            w.write_u8(if *v { 1 } else { 0 })
        }
        Node::String(v) => {
            w.write_u8(TAG_STRING)?;
            w.write_u64::<LittleEndian>(v.len() as u64)?;
            w.write_all(v.as_bytes())
        }
        Node::Array(items) => {
            w.write_u8(TAG_ARRAY)?;
            w.write_u32::<LittleEndian>(items.len() as u32)?;
            for key in items {
                w.write_u32::<LittleEndian>(*key)?;
            }
            Ok(())
        }
        Node::Object(fields) => {
            w.write_u8(TAG_OBJECT)?;
            w.write_u32::<LittleEndian>(fields.len() as u32)?;
            for (name, key) in fields {
                w.write_u32::<LittleEndian>(name.len() as u32)?;
                w.write_all(name.as_bytes())?;
                w.write_u32::<LittleEndian>(*key)?;
            }
            Ok(())
        }
    }
}

/// Decode a [`Node`] from its on-disk byte representation.
///
/// Any truncation, unknown tag, or invalid UTF-8 raises
/// [`Error::CorruptNode`].
pub fn decode(bytes: &[u8]) -> Result<Node> {
    let mut cursor = Cursor::new(bytes);
    let node = read_node(&mut cursor).map_err(|e| Error::CorruptNode(e.to_string()))?;
    Ok(node)
}

fn read_node<R: Read>(r: &mut R) -> io::Result<Node> {
    let tag = r.read_u8()?;
    match tag {
        TAG_NULL => Ok(Node::Null),
        TAG_INTEGER => Ok(Node::Integer(r.read_i32::<LittleEndian>()?)),
        TAG_REAL => Ok(Node::Real(r.read_f64::<LittleEndian>()?)),
        TAG_BOOLEAN => Ok(Node::Boolean(r.read_u8()? != 0)),
        TAG_STRING => {
            let len = r.read_u64::<LittleEndian>()? as usize;
            let mut buf = vec![0u8; len];
            r.read_exact(&mut buf)?;
            let s = String::from_utf8(buf)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            Ok(Node::String(s))
        }
        TAG_ARRAY => {
            let count = r.read_u32::<LittleEndian>()? as usize;
            let mut items: Vec<ValueKey> = Vec::with_capacity(count);
            for _ in 0..count {
                items.push(r.read_u32::<LittleEndian>()?);
            }
            Ok(Node::Array(items))
        }
        TAG_OBJECT => {
            let count = r.read_u32::<LittleEndian>()? as usize;
            let mut fields = std::collections::BTreeMap::new();
            for _ in 0..count {
                let name_len = r.read_u32::<LittleEndian>()? as usize;
                let mut name_buf = vec![0u8; name_len];
                r.read_exact(&mut name_buf)?;
                let name = String::from_utf8(name_buf)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
                let key = r.read_u32::<LittleEndian>()?;
                fields.insert(name, key);
            }
            Ok(Node::Object(fields))
        }
        other => Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unknown node tag: 0x{other:02x}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(node: Node) {
        let bytes = encode(&node);
        let decoded = decode(&bytes).expect("decode should succeed");
        assert_eq!(node, decoded);
    }

    #[test]
    fn roundtrips_every_variant() {
        roundtrip(Node::Null);
        roundtrip(Node::Integer(-42));
        roundtrip(Node::Real(3.5));
        roundtrip(Node::Boolean(true));
        roundtrip(Node::String("hello world".to_string()));
        roundtrip(Node::Array(vec![1000, 1001, 1002]));
        let mut fields = std::collections::BTreeMap::new();
        fields.insert("a".to_string(), 1000);
        fields.insert("b".to_string(), 1001);
        roundtrip(Node::Object(fields));
    }

    #[test]
    fn object_entries_are_written_in_lexicographic_order() {
        let mut fields = std::collections::BTreeMap::new();
        fields.insert("zebra".to_string(), 1002);
        fields.insert("apple".to_string(), 1000);
        fields.insert("mango".to_string(), 1001);
        let bytes = encode(&Node::Object(fields));
        // tag(1) + count(4), then first entry's name length(4) + "apple"
        let first_name_len = u32::from_le_bytes(bytes[5..9].try_into().unwrap()) as usize;
        let first_name = &bytes[9..9 + first_name_len];
        assert_eq!(first_name, b"apple");
    }

    #[test]
    fn truncated_bytes_are_corrupt_node() {
        let bytes = encode(&Node::Integer(7));
        let err = decode(&bytes[..2]).unwrap_err();
        assert!(matches!(err, Error::CorruptNode(_)));
    }

    #[test]
    fn unknown_tag_is_corrupt_node() {
        let err = decode(&[0xFF]).unwrap_err();
        assert!(matches!(err, Error::CorruptNode(_)));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_node() -> impl Strategy<Value = Node> {
        prop_oneof![
            Just(Node::Null),
            any::<i32>().prop_map(Node::Integer),
            any::<f64>()
                .prop_filter("reals must round-trip bit-for-bit", |v| !v.is_nan())
                .prop_map(Node::Real),
            any::<bool>().prop_map(Node::Boolean),
            ".*".prop_map(Node::String),
            proptest::collection::vec(any::<ValueKey>(), 0..8).prop_map(Node::Array),
            proptest::collection::btree_map(".*", any::<ValueKey>(), 0..8).prop_map(Node::Object),
        ]
    }

    proptest! {
        #[test]
        fn encode_decode_roundtrips(node in arb_node()) {
            let bytes = encode(&node);
            let decoded = decode(&bytes).expect("encoded bytes must decode");
            prop_assert_eq!(node, decoded);
        }
    }
}
