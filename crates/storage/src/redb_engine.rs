//! [`KvEngine`] implementation backed by the `redb` embedded database.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use jsondb_core::{Error, Result, ValueKey};
use redb::{Database, ReadableTable, TableDefinition};

use crate::kv::{KvEngine, KvTransaction};

const NODES_TABLE: TableDefinition<u32, &[u8]> = TableDefinition::new("nodes");

fn storage_err<E: std::fmt::Display>(e: E) -> Error {
    Error::StorageError(e.to_string())
}

/// An embedded, single-writer/multi-reader KV store on top of `redb`.
pub struct RedbEngine {
    db: Arc<Database>,
}

impl RedbEngine {
    /// Open (creating if absent) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Database::create(path.as_ref()).map_err(storage_err)?;
        // Touch the table once so a brand-new file always has it, even if
        // the very first transaction is aborted rather than committed.
        {
            let txn = db.begin_write().map_err(storage_err)?;
            {
                let _ = txn.open_table(NODES_TABLE).map_err(storage_err)?;
            }
            txn.commit().map_err(storage_err)?;
        }
        Ok(Self { db: Arc::new(db) })
    }
}

impl KvEngine for RedbEngine {
    fn begin(&self) -> Result<Box<dyn KvTransaction>> {
        let txn = self.db.begin_write().map_err(storage_err)?;
        Ok(Box::new(RedbTransaction { txn: Some(txn) }))
    }
}

struct RedbTransaction {
    txn: Option<redb::WriteTransaction>,
}

impl RedbTransaction {
    fn txn(&self) -> &redb::WriteTransaction {
        self.txn.as_ref().expect("transaction already consumed")
    }
}

impl KvTransaction for RedbTransaction {
    fn put(&mut self, key: ValueKey, bytes: &[u8]) -> Result<()> {
        let mut table = self.txn().open_table(NODES_TABLE).map_err(storage_err)?;
        table.insert(key, bytes).map_err(storage_err)?;
        Ok(())
    }

    fn get(&self, key: ValueKey) -> Result<Option<Vec<u8>>> {
        let table = self.txn().open_table(NODES_TABLE).map_err(storage_err)?;
        let value = table.get(key).map_err(storage_err)?;
        Ok(value.map(|guard| guard.value().to_vec()))
    }

    fn delete(&mut self, key: ValueKey) -> Result<()> {
        let mut table = self.txn().open_table(NODES_TABLE).map_err(storage_err)?;
        table.remove(key).map_err(storage_err)?;
        Ok(())
    }

    fn keys(&self) -> Result<BTreeSet<ValueKey>> {
        let table = self.txn().open_table(NODES_TABLE).map_err(storage_err)?;
        let mut out = BTreeSet::new();
        for entry in table.iter().map_err(storage_err)? {
            let (k, _v) = entry.map_err(storage_err)?;
            out.insert(k.value());
        }
        Ok(out)
    }

    fn commit(mut self: Box<Self>) -> Result<()> {
        let txn = self.txn.take().expect("transaction already consumed");
        txn.commit().map_err(storage_err)
    }

    fn abort(mut self: Box<Self>) -> Result<()> {
        let txn = self.txn.take().expect("transaction already consumed");
        txn.abort().map_err(storage_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_delete_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let engine = RedbEngine::open(dir.path().join("db.redb")).unwrap();

        let mut txn = engine.begin().unwrap();
        txn.put(1000, b"hello").unwrap();
        assert_eq!(txn.get(1000).unwrap(), Some(b"hello".to_vec()));
        txn.delete(1000).unwrap();
        assert_eq!(txn.get(1000).unwrap(), None);
        txn.commit().unwrap();
    }

    #[test]
    fn aborted_writes_do_not_persist() {
        let dir = tempfile::tempdir().unwrap();
        let engine = RedbEngine::open(dir.path().join("db.redb")).unwrap();

        let mut txn = engine.begin().unwrap();
        txn.put(1000, b"hello").unwrap();
        txn.abort().unwrap();

        let txn = engine.begin().unwrap();
        assert_eq!(txn.get(1000).unwrap(), None);
        txn.commit().unwrap();
    }

    #[test]
    fn keys_reflects_committed_writes() {
        let dir = tempfile::tempdir().unwrap();
        let engine = RedbEngine::open(dir.path().join("db.redb")).unwrap();

        let mut txn = engine.begin().unwrap();
        txn.put(1000, b"a").unwrap();
        txn.put(1001, b"b").unwrap();
        assert_eq!(
            txn.keys().unwrap(),
            BTreeSet::from([1000, 1001])
        );
        txn.commit().unwrap();
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Invariant: whatever bytes are put under a key come back unchanged
        // on get, and vanish after delete, regardless of key or payload.
        #[test]
        fn put_get_delete_roundtrips(key in any::<ValueKey>(), bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            let dir = tempfile::tempdir().unwrap();
            let engine = RedbEngine::open(dir.path().join("db.redb")).unwrap();

            let mut txn = engine.begin().unwrap();
            txn.put(key, &bytes).unwrap();
            prop_assert_eq!(txn.get(key).unwrap(), Some(bytes));

            txn.delete(key).unwrap();
            prop_assert_eq!(txn.get(key).unwrap(), None);
            txn.commit().unwrap();
        }
    }
}
