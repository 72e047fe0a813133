//! `JsonDb`: the typed convenience façade over the document engine.
//!
//! Every method here desugars to a handful of calls against
//! [`jsondb_engine`]'s path evaluator, node operations, and JSON literal
//! parser — the façade adds no state and no storage format of its own.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use jsondb_core::{Error, Node, Result, ROOT_KEY};
use jsondb_engine::json_parser::{graft, parse_json_literal};
use jsondb_engine::{append_child, delete_child, replace_node, resolve_path, walk_tree, Policy, Transaction};
use jsondb_storage::{KvEngine, RedbEngine};

use crate::config::JsonDbConfig;

/// The document store's public entry point.
///
/// Holds the storage engine handle only; every operation takes an
/// explicit [`Transaction`] obtained from [`JsonDb::start_transaction`],
/// matching the spec's "clients mutate an explicit transaction" model —
/// there is no implicit auto-commit hidden inside these methods.
pub struct JsonDb {
    engine: Arc<dyn KvEngine>,
    path: PathBuf,
}

fn policy_for(create_if_missing: bool) -> Policy {
    if create_if_missing {
        Policy::Create
    } else {
        Policy::Throw
    }
}

impl JsonDb {
    /// Open (creating if absent) the database described by `config`.
    #[tracing::instrument(skip(config), fields(path = %config.path.display()))]
    pub fn open(config: JsonDbConfig) -> Result<Self> {
        let engine = RedbEngine::open(&config.path)?;
        Ok(Self {
            engine: Arc::new(engine),
            path: config.path,
        })
    }

    /// Begin a new transaction against this database.
    #[tracing::instrument(skip(self))]
    pub fn start_transaction(&self) -> Result<Transaction> {
        Transaction::begin(self.engine.as_ref())
    }

    /// Remove the backing storage file entirely. Consumes `self`: nothing
    /// can be done with a `JsonDb` whose storage has been deleted out from
    /// under it.
    #[tracing::instrument(skip(self))]
    pub fn delete_all(self) -> Result<()> {
        drop(self.engine);
        std::fs::remove_file(&self.path).map_err(|e| Error::StorageError(e.to_string()))
    }

    // ------------------------------------------------------------------
    // set
    // ------------------------------------------------------------------

    fn set_node(
        &self,
        tx: &mut Transaction,
        path: &str,
        node: Node,
        create_if_missing: bool,
    ) -> Result<()> {
        let (_, child) = resolve_path(tx, ROOT_KEY, path, policy_for(create_if_missing))?;
        replace_node(tx, child, node)
    }

    /// Set the integer at `path`, preserving its existing key if present.
    #[tracing::instrument(skip(self, tx))]
    pub fn set_int(
        &self,
        tx: &mut Transaction,
        path: &str,
        value: i32,
        create_if_missing: bool,
    ) -> Result<()> {
        self.set_node(tx, path, Node::Integer(value), create_if_missing)
    }

    /// Set the real number at `path`.
    #[tracing::instrument(skip(self, tx))]
    pub fn set_real(
        &self,
        tx: &mut Transaction,
        path: &str,
        value: f64,
        create_if_missing: bool,
    ) -> Result<()> {
        self.set_node(tx, path, Node::Real(value), create_if_missing)
    }

    /// Set the boolean at `path`.
    #[tracing::instrument(skip(self, tx))]
    pub fn set_bool(
        &self,
        tx: &mut Transaction,
        path: &str,
        value: bool,
        create_if_missing: bool,
    ) -> Result<()> {
        self.set_node(tx, path, Node::Boolean(value), create_if_missing)
    }

    /// Set the string at `path`.
    #[tracing::instrument(skip(self, tx, value))]
    pub fn set_string(
        &self,
        tx: &mut Transaction,
        path: &str,
        value: impl Into<String>,
        create_if_missing: bool,
    ) -> Result<()> {
        self.set_node(tx, path, Node::String(value.into()), create_if_missing)
    }

    /// Replace `path` with a freshly built array of `n` `Null` entries.
    #[tracing::instrument(skip(self, tx))]
    pub fn set_array(
        &self,
        tx: &mut Transaction,
        path: &str,
        n: usize,
        create_if_missing: bool,
    ) -> Result<()> {
        let (_, child) = resolve_path(tx, ROOT_KEY, path, policy_for(create_if_missing))?;
        let mut entries = Vec::with_capacity(n);
        for _ in 0..n {
            let key = tx.generate_key();
            tx.store(key, &Node::Null)?;
            entries.push(key);
        }
        replace_node(tx, child, Node::Array(entries))
    }

    /// Resolve `path` and graft the parsed JSON literal `json_text` onto
    /// it, reusing `path`'s existing key for the outermost value.
    ///
    /// Path resolution always runs before parsing: a call on a missing
    /// path with `create_if_missing = false` fails with
    /// `Error::PathNotFound` regardless of whether `json_text` itself
    /// parses.
    #[tracing::instrument(skip(self, tx, json_text))]
    pub fn set_json(
        &self,
        tx: &mut Transaction,
        path: &str,
        json_text: &str,
        create_if_missing: bool,
    ) -> Result<()> {
        let (_, child) = resolve_path(tx, ROOT_KEY, path, policy_for(create_if_missing))?;
        let literal = parse_json_literal(json_text)?;
        graft(tx, child, &literal)
    }

    // ------------------------------------------------------------------
    // append
    // ------------------------------------------------------------------

    fn append_scalar(&self, tx: &mut Transaction, path: &str, node: Node) -> Result<()> {
        let (_, array_key) = resolve_path(tx, ROOT_KEY, path, Policy::Throw)?;
        let key = tx.generate_key();
        tx.store(key, &node)?;
        append_child(tx, array_key, key)
    }

    /// Append an integer to the array at `path`.
    #[tracing::instrument(skip(self, tx))]
    pub fn append_array_int(&self, tx: &mut Transaction, path: &str, value: i32) -> Result<()> {
        self.append_scalar(tx, path, Node::Integer(value))
    }

    /// Append a real number to the array at `path`.
    #[tracing::instrument(skip(self, tx))]
    pub fn append_array_real(&self, tx: &mut Transaction, path: &str, value: f64) -> Result<()> {
        self.append_scalar(tx, path, Node::Real(value))
    }

    /// Append a boolean to the array at `path`.
    #[tracing::instrument(skip(self, tx))]
    pub fn append_array_bool(&self, tx: &mut Transaction, path: &str, value: bool) -> Result<()> {
        self.append_scalar(tx, path, Node::Boolean(value))
    }

    /// Append a string to the array at `path`.
    #[tracing::instrument(skip(self, tx, value))]
    pub fn append_array_string(
        &self,
        tx: &mut Transaction,
        path: &str,
        value: impl Into<String>,
    ) -> Result<()> {
        self.append_scalar(tx, path, Node::String(value.into()))
    }

    /// Append a freshly parsed JSON literal to the array at `path`.
    ///
    /// A `Null` placeholder is appended first so the array grows by
    /// exactly one entry even if grafting a large literal fails partway
    /// through; the placeholder's key is then reused as the graft target.
    #[tracing::instrument(skip(self, tx, json_text))]
    pub fn append_array_json(&self, tx: &mut Transaction, path: &str, json_text: &str) -> Result<()> {
        let (_, array_key) = resolve_path(tx, ROOT_KEY, path, Policy::Throw)?;
        let placeholder = tx.generate_key();
        tx.store(placeholder, &Node::Null)?;
        append_child(tx, array_key, placeholder)?;
        let literal = parse_json_literal(json_text)?;
        graft(tx, placeholder, &literal)
    }

    // ------------------------------------------------------------------
    // get / exists / delete
    // ------------------------------------------------------------------

    /// Resolve `path` and return its integer value.
    #[tracing::instrument(skip(self, tx))]
    pub fn get_int(&self, tx: &mut Transaction, path: &str) -> Result<i32> {
        let (_, child) = resolve_path(tx, ROOT_KEY, path, Policy::Throw)?;
        match tx.retrieve(child)? {
            Node::Integer(v) => Ok(v),
            other => Err(Error::TypeMismatch(format!(
                "'{path}' is a {}, not an integer",
                other.type_name()
            ))),
        }
    }

    /// Resolve `path` and return its real-number value.
    #[tracing::instrument(skip(self, tx))]
    pub fn get_real(&self, tx: &mut Transaction, path: &str) -> Result<f64> {
        let (_, child) = resolve_path(tx, ROOT_KEY, path, Policy::Throw)?;
        match tx.retrieve(child)? {
            Node::Real(v) => Ok(v),
            other => Err(Error::TypeMismatch(format!(
                "'{path}' is a {}, not a real",
                other.type_name()
            ))),
        }
    }

    /// Resolve `path` and return its boolean value.
    #[tracing::instrument(skip(self, tx))]
    pub fn get_bool(&self, tx: &mut Transaction, path: &str) -> Result<bool> {
        let (_, child) = resolve_path(tx, ROOT_KEY, path, Policy::Throw)?;
        match tx.retrieve(child)? {
            Node::Boolean(v) => Ok(v),
            other => Err(Error::TypeMismatch(format!(
                "'{path}' is a {}, not a boolean",
                other.type_name()
            ))),
        }
    }

    /// Resolve `path` and return its string value.
    #[tracing::instrument(skip(self, tx))]
    pub fn get_string(&self, tx: &mut Transaction, path: &str) -> Result<String> {
        let (_, child) = resolve_path(tx, ROOT_KEY, path, Policy::Throw)?;
        match tx.retrieve(child)? {
            Node::String(v) => Ok(v),
            other => Err(Error::TypeMismatch(format!(
                "'{path}' is a {}, not a string",
                other.type_name()
            ))),
        }
    }

    /// `true` iff `path` resolves to a live node.
    #[tracing::instrument(skip(self, tx))]
    pub fn exists(&self, tx: &mut Transaction, path: &str) -> Result<bool> {
        let (_, child) = resolve_path(tx, ROOT_KEY, path, Policy::ReturnNull)?;
        Ok(child != jsondb_core::NULL_KEY)
    }

    /// Delete the node at `path` and its whole subtree.
    ///
    /// Deleting the document root (`path == "$"`) is not a supported
    /// operation: the root has no parent to unlink it from, so this
    /// fails with `Error::InvalidOperation` rather than silently
    /// orphaning the entire tree.
    #[tracing::instrument(skip(self, tx))]
    pub fn delete(&self, tx: &mut Transaction, path: &str) -> Result<()> {
        let (parent, child) = resolve_path(tx, ROOT_KEY, path, Policy::ReturnNull)?;
        if child == jsondb_core::NULL_KEY {
            return Ok(());
        }
        if child == ROOT_KEY {
            return Err(Error::InvalidOperation(
                "deleting the document root is not permitted".to_string(),
            ));
        }
        delete_child(tx, parent, child)
    }

    // ------------------------------------------------------------------
    // print / validate
    // ------------------------------------------------------------------

    /// Pretty-print the node at `path` (or the whole document if `path`
    /// is `None`) as JSON-adjacent text into `sink`.
    #[tracing::instrument(skip(self, tx, sink))]
    pub fn print(
        &self,
        tx: &mut Transaction,
        path: Option<&str>,
        sink: &mut impl std::fmt::Write,
    ) -> Result<()> {
        let (_, child) = resolve_path(tx, ROOT_KEY, path.unwrap_or("$"), Policy::Throw)?;
        print_node(tx, child, sink, 0).map_err(|e| Error::StorageError(e.to_string()))
    }

    /// Render the node at `path` (or the whole document) to an owned
    /// `String`. Convenience wrapper around [`JsonDb::print`].
    pub fn print_to_string(&self, tx: &mut Transaction, path: Option<&str>) -> Result<String> {
        let mut out = String::new();
        self.print(tx, path, &mut out)?;
        Ok(out)
    }

    /// Walk the live tree from the root and compare it against every key
    /// actually present in the KV store. Returns `true` iff neither set
    /// has an entry the other lacks (`NEXT_ID_KEY` is exempt from the
    /// "stale" check — it is metadata, not a node).
    #[tracing::instrument(skip(self, tx))]
    pub fn validate(&self, tx: &mut Transaction) -> Result<bool> {
        let live = walk_tree(tx, ROOT_KEY)?;
        let mut stored = tx.walk_storage()?;
        stored.remove(&jsondb_core::NEXT_ID_KEY);

        let missing: Vec<_> = live.difference(&stored).copied().collect();
        let stale: Vec<_> = stored.difference(&live).copied().collect();

        if !missing.is_empty() || !stale.is_empty() {
            tracing::warn!(?missing, ?stale, "validate found inconsistent key set");
        }

        Ok(missing.is_empty() && stale.is_empty())
    }
}

fn print_node(
    tx: &mut Transaction,
    key: jsondb_core::ValueKey,
    sink: &mut impl std::fmt::Write,
    indent: usize,
) -> std::fmt::Result {
    let pad = "  ".repeat(indent);
    let inner_pad = "  ".repeat(indent + 1);
    match tx.retrieve(key).map_err(|_| std::fmt::Error)? {
        Node::Null => write!(sink, "null"),
        Node::Integer(v) => write!(sink, "{v}"),
        Node::Real(v) => write!(sink, "{v}"),
        Node::Boolean(v) => write!(sink, "{v}"),
        Node::String(s) => write!(sink, "{:?}", s),
        Node::Array(items) => {
            if items.is_empty() {
                return write!(sink, "[]");
            }
            let len = items.len();
            writeln!(sink, "[")?;
            for (i, item) in items.into_iter().enumerate() {
                write!(sink, "{inner_pad}")?;
                print_node(tx, item, sink, indent + 1)?;
                if i + 1 < len {
                    write!(sink, ",")?;
                }
                writeln!(sink)?;
            }
            write!(sink, "{pad}]")
        }
        Node::Object(fields) => {
            if fields.is_empty() {
                return write!(sink, "{{}}");
            }
            let len = fields.len();
            writeln!(sink, "{{")?;
            for (i, (name, child)) in fields.into_iter().enumerate() {
                write!(sink, "{inner_pad}{:?}: ", name)?;
                print_node(tx, child, sink, indent + 1)?;
                if i + 1 < len {
                    write!(sink, ",")?;
                }
                writeln!(sink)?;
            }
            write!(sink, "{pad}}}")
        }
    }
}
