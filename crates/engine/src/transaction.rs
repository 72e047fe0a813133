//! Transaction: the single seam between the node model and raw KV bytes.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use jsondb_core::{
    codec, Error, Node, Result, ValueKey, INITIAL_NEXT_ID, NEXT_ID_KEY, NULL_KEY, ROOT_KEY,
};
use jsondb_storage::{IdentityCodec, KvEngine, KvTransaction, StorageCodec};

/// A single transaction against the document tree.
///
/// Wraps one underlying KV transaction plus the persisted key allocator.
/// Dropping a `Transaction` without calling [`Transaction::commit`] aborts
/// it: nothing written through [`Transaction::store`]/[`Transaction::delete`]
/// during its lifetime is ever silently persisted.
pub struct Transaction {
    kv: Option<Box<dyn KvTransaction>>,
    codec: Arc<dyn StorageCodec>,
    next_id: ValueKey,
    start_next_id: ValueKey,
}

impl Transaction {
    /// Begin a transaction against `engine`, bootstrapping the root object
    /// and key allocator the first time the database is opened.
    pub fn begin(engine: &dyn KvEngine) -> Result<Self> {
        Self::begin_with_codec(engine, Arc::new(IdentityCodec))
    }

    /// Begin a transaction using an explicit byte codec (identity by
    /// default via [`Transaction::begin`]).
    pub fn begin_with_codec(engine: &dyn KvEngine, codec: Arc<dyn StorageCodec>) -> Result<Self> {
        let kv = engine.begin()?;
        let mut txn = Transaction {
            kv: Some(kv),
            codec,
            next_id: INITIAL_NEXT_ID,
            start_next_id: INITIAL_NEXT_ID,
        };
        txn.bootstrap()?;
        Ok(txn)
    }

    fn bootstrap(&mut self) -> Result<()> {
        if self.raw_get(ROOT_KEY)?.is_none() {
            self.store(ROOT_KEY, &Node::Object(BTreeMap::new()))?;
        }
        match self.raw_get(NEXT_ID_KEY)? {
            Some(Node::Integer(v)) => {
                self.next_id = v as ValueKey;
                self.start_next_id = self.next_id;
            }
            Some(other) => {
                return Err(Error::CorruptNode(format!(
                    "next id key holds a {}, expected integer",
                    other.type_name()
                )))
            }
            None => {
                self.next_id = INITIAL_NEXT_ID;
                self.start_next_id = INITIAL_NEXT_ID;
            }
        }
        Ok(())
    }

    fn kv(&self) -> &dyn KvTransaction {
        self.kv.as_deref().expect("transaction already finished")
    }

    fn kv_mut(&mut self) -> &mut dyn KvTransaction {
        self.kv
            .as_deref_mut()
            .expect("transaction already finished")
    }

    /// Allocate a fresh key. Monotonic, never reused, persisted on commit.
    pub fn generate_key(&mut self) -> ValueKey {
        let key = self.next_id;
        self.next_id += 1;
        key
    }

    /// Store `node` under `key`. A no-op if `key` is [`NULL_KEY`].
    pub fn store(&mut self, key: ValueKey, node: &Node) -> Result<()> {
        if key == NULL_KEY {
            return Ok(());
        }
        let bytes = codec::encode(node);
        let encoded = self.codec.encode(&bytes);
        self.kv_mut().put(key, &encoded)
    }

    fn raw_get(&self, key: ValueKey) -> Result<Option<Node>> {
        if key == NULL_KEY {
            return Ok(None);
        }
        match self.kv().get(key)? {
            None => Ok(None),
            Some(bytes) => {
                let decoded = self
                    .codec
                    .decode(&bytes)
                    .map_err(|e| Error::CorruptNode(e.to_string()))?;
                let node = codec::decode(&decoded)?;
                Ok(Some(node))
            }
        }
    }

    /// Retrieve a fresh owned copy of the node stored under `key`.
    ///
    /// `NULL_KEY` always resolves to `Node::Null`. A key that is absent
    /// from storage is [`Error::CorruptNode`]: every live key in the tree
    /// must resolve to *something*.
    pub fn retrieve(&self, key: ValueKey) -> Result<Node> {
        if key == NULL_KEY {
            return Ok(Node::Null);
        }
        self.raw_get(key)?.ok_or_else(|| {
            Error::CorruptNode(format!("key {key} is referenced but has no stored node"))
        })
    }

    /// Delete the node stored under `key`. No cascade: callers recurse
    /// into children themselves before calling this.
    pub fn delete(&mut self, key: ValueKey) -> Result<()> {
        if key == NULL_KEY {
            return Ok(());
        }
        self.kv_mut().delete(key)
    }

    /// Every key currently present in the underlying KV store.
    pub fn walk_storage(&self) -> Result<BTreeSet<ValueKey>> {
        self.kv().keys()
    }

    /// Commit every `store`/`delete` performed so far, persisting the key
    /// allocator high-water mark first if it advanced.
    pub fn commit(mut self) -> Result<()> {
        if self.next_id != self.start_next_id {
            self.store(NEXT_ID_KEY, &Node::Integer(self.next_id as i32))?;
        }
        let kv = self.kv.take().expect("transaction already finished");
        kv.commit()
    }

    /// Explicitly discard every `store`/`delete` performed so far.
    ///
    /// Equivalent to simply dropping the transaction; provided for callers
    /// that want to abort without waiting for scope exit.
    pub fn abort(mut self) -> Result<()> {
        let kv = self.kv.take().expect("transaction already finished");
        kv.abort()
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if let Some(kv) = self.kv.take() {
            if let Err(e) = kv.abort() {
                tracing::warn!(error = %e, "failed to abort transaction on drop");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsondb_storage::RedbEngine;

    fn open_engine() -> (tempfile::TempDir, RedbEngine) {
        let dir = tempfile::tempdir().unwrap();
        let engine = RedbEngine::open(dir.path().join("db.redb")).unwrap();
        (dir, engine)
    }

    #[test]
    fn bootstraps_root_as_empty_object() {
        let (_dir, engine) = open_engine();
        let txn = Transaction::begin(&engine).unwrap();
        assert_eq!(txn.retrieve(ROOT_KEY).unwrap(), Node::Object(BTreeMap::new()));
    }

    #[test]
    fn generate_key_is_monotonic_and_persists_across_reopen() {
        let (_dir, engine) = open_engine();
        let mut txn = Transaction::begin(&engine).unwrap();
        let a = txn.generate_key();
        let b = txn.generate_key();
        assert!(b > a);
        txn.commit().unwrap();

        let txn2 = Transaction::begin(&engine).unwrap();
        assert_eq!(txn2.retrieve(NEXT_ID_KEY).unwrap(), Node::Integer((b + 1) as i32));
    }

    #[test]
    fn dropped_transaction_aborts() {
        let (_dir, engine) = open_engine();
        {
            let mut txn = Transaction::begin(&engine).unwrap();
            txn.store(1000, &Node::String("ghost".into())).unwrap();
            // dropped without commit
        }
        let txn = Transaction::begin(&engine).unwrap();
        assert!(txn.retrieve(1000).is_err());
    }

    #[test]
    fn null_key_store_is_noop_and_retrieves_as_null() {
        let (_dir, engine) = open_engine();
        let mut txn = Transaction::begin(&engine).unwrap();
        txn.store(NULL_KEY, &Node::Integer(7)).unwrap();
        assert_eq!(txn.retrieve(NULL_KEY).unwrap(), Node::Null);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use jsondb_storage::RedbEngine;
    use proptest::prelude::*;

    proptest! {
        // Invariant: after storing a value under a freshly allocated key,
        // retrieving that key yields the same value back.
        #[test]
        fn store_then_retrieve_roundtrips(value in any::<i32>()) {
            let dir = tempfile::tempdir().unwrap();
            let engine = RedbEngine::open(dir.path().join("db.redb")).unwrap();
            let mut txn = Transaction::begin(&engine).unwrap();

            let key = txn.generate_key();
            txn.store(key, &Node::Integer(value)).unwrap();
            prop_assert_eq!(txn.retrieve(key).unwrap(), Node::Integer(value));

            txn.delete(key).unwrap();
            prop_assert!(txn.retrieve(key).is_err());
        }
    }
}
