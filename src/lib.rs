//! # JsonDb
//!
//! A persistent, transactional, hierarchical JSON document store. Every
//! value in the document tree is shredded into a node-per-key record over
//! an ordered key/value store, navigated with JSONPath-style expressions.
//!
//! # Quick Start
//!
//! ```no_run
//! use jsondb::{JsonDb, JsonDbConfig};
//!
//! fn main() -> jsondb::Result<()> {
//!     let db = JsonDb::open(JsonDbConfig::new("./my-data.redb"))?;
//!     let mut tx = db.start_transaction()?;
//!
//!     db.set_json(&mut tx, "$.a.b.c.d", "{ 'e': 'Hello world', 'f': 10 }", true)?;
//!     assert_eq!(db.get_int(&mut tx, "$.a.b.c.d.f")?, 10);
//!
//!     tx.commit()?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! The [`JsonDb`] façade is the main entry point. Internal crates
//! (`jsondb-core`, `jsondb-storage`, `jsondb-engine`) implement the node
//! codec, the `redb`-backed storage seam, and the path/JSON evaluation
//! engine respectively; only the façade surface in this crate is stable.

pub use jsondb_api::*;
pub use jsondb_core::Result;
