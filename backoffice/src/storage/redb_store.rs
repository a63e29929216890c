//! redb-backed key-value store
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `kv` | `&str` | `&[u8]` | Whole-value blobs (e.g. `customRoles`) |
//!
//! # Durability
//!
//! Every `put` is its own write transaction. redb commits with
//! `Durability::Immediate` by default, so the value is persistent as soon as
//! `put` returns and the file is never left half-written.

use super::{KvStore, StorageResult};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;

/// Blob table: key = store key, value = raw bytes
const KV_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");

/// Key-value store backed by redb
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        // Create the table up front so read transactions never miss it
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(KV_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl KvStore for RedbStore {
    fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(KV_TABLE)?;
        Ok(table.get(key)?.map(|guard| guard.value().to_vec()))
    }

    fn put(&self, key: &str, value: &[u8]) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(KV_TABLE)?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let store = RedbStore::open_in_memory().unwrap();
        assert_eq!(store.get("customRoles").unwrap(), None);
    }

    #[test]
    fn test_put_replaces_value() {
        let store = RedbStore::open_in_memory().unwrap();
        store.put("customRoles", b"{\"a\":1}").unwrap();
        store.put("customRoles", b"{}").unwrap();
        assert_eq!(store.get("customRoles").unwrap(), Some(b"{}".to_vec()));
    }

    #[test]
    fn test_file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backoffice.redb");

        {
            let store = RedbStore::open(&path).unwrap();
            store.put("customRoles", b"{\"host\":{}}").unwrap();
        }

        let store = RedbStore::open(&path).unwrap();
        assert_eq!(
            store.get("customRoles").unwrap(),
            Some(b"{\"host\":{}}".to_vec())
        );
    }
}
