//! Storage codec abstraction.
//!
//! The codec seam provides a hook point for future encryption-at-rest and
//! compression. All bytes passing through the storage layer go through the
//! codec for encode/decode operations.
//!
//! Only `IdentityCodec` ships today, which performs no transformation.
//! This establishes the seam without adding complexity. Candidates for
//! later: an AES-GCM codec for encryption at rest, an LZ4 codec for
//! compression, a chained codec composing both.
//!
//! # Usage
//!
//! ```ignore
//! use jsondb_storage::codec::{StorageCodec, IdentityCodec};
//!
//! let codec = IdentityCodec;
//! let data = b"hello world";
//!
//! let encoded = codec.encode(data);
//! let decoded = codec.decode(&encoded)?;
//!
//! assert_eq!(data.as_slice(), decoded.as_slice());
//! ```

mod identity;
mod traits;

pub use identity::IdentityCodec;
pub use traits::{CodecError, StorageCodec};

/// Get a codec by its identifier.
///
/// Returns the codec if recognized, or an error for unknown codec IDs.
///
/// # Known Codecs
///
/// - `"identity"`: No-op codec (pass-through)
///
/// # Future Codecs
///
/// - `"aes-gcm-256"`: AES-256-GCM encryption
/// - `"lz4"`: LZ4 compression
pub fn get_codec(codec_id: &str) -> Result<Box<dyn StorageCodec>, CodecError> {
    match codec_id {
        "identity" => Ok(Box::new(IdentityCodec)),
        _ => Err(CodecError::UnknownCodec(codec_id.to_string())),
    }
}
