//! Typed convenience façade over the JsonDb document engine.
//!
//! [`JsonDb`] is the public entry point: open a database, start a
//! [`jsondb_engine::Transaction`], call typed `set_*`/`get_*`/`append_*`
//! methods against it, then commit. The façade itself holds no document
//! state — every operation is a thin wrapper around
//! [`jsondb_engine::resolve_path`] plus a node mutation.

#![warn(missing_docs)]

mod config;
mod facade;

pub use config::JsonDbConfig;
pub use facade::JsonDb;

pub use jsondb_engine::{Policy, Transaction};
