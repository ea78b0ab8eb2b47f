//! redb-based world state
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `world_state` | `&str` | `&[u8]` | Canonical records, composite-key index copies, counters |
//!
//! Canonical records live under their plain ID (`order_A1_1700000000`).
//! Composite keys start with U+0000 and therefore sort before every plain
//! key; a prefix scan is a range scan starting at the prefix.
//!
//! # Durability
//!
//! redb commits are persistent as soon as `commit()` returns (copy-on-write
//! with an atomic root swap), and only one write transaction can be open at
//! a time, so every operation is serialized against concurrent writers.
//! Readers work on MVCC snapshots and never block the writer.

use super::{LedgerResult, ScanIter, StateReader, StateStore};
use redb::{
    Database, ReadTransaction, ReadableDatabase, ReadableTable, ReadableTableMetadata,
    TableDefinition, WriteTransaction,
};
use shared::message::ChainNotification;
use std::path::Path;
use std::sync::Arc;

/// World state: key = plain ID or composite key, value = JSON-serialized record
const WORLD_STATE_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("world_state");

/// Ledger storage backed by redb
#[derive(Clone)]
pub struct LedgerStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for LedgerStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerStorage").finish_non_exhaustive()
    }
}

impl LedgerStorage {
    /// Open or create the ledger database at the given path
    pub fn open(path: impl AsRef<Path>) -> LedgerResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory ledger (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> LedgerResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> LedgerResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(WORLD_STATE_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Begin a write transaction
    pub fn begin(&self) -> LedgerResult<LedgerTxn> {
        Ok(LedgerTxn {
            txn: self.db.begin_write()?,
            pending: Vec::new(),
        })
    }

    /// Open a consistent read-only view of the current state
    pub fn snapshot(&self) -> LedgerResult<LedgerSnapshot> {
        Ok(LedgerSnapshot {
            txn: self.db.begin_read()?,
        })
    }

    /// Number of keys in world state (canonical records and index entries)
    pub fn key_count(&self) -> LedgerResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(WORLD_STATE_TABLE)?;
        Ok(table.len()?)
    }
}

/// Write transaction over world state
///
/// Reads observe the transaction's own writes. Notifications queued with
/// [`StateStore::emit`] are handed back by [`LedgerTxn::commit`] so the
/// caller can broadcast them once the writes are durable.
pub struct LedgerTxn {
    txn: WriteTransaction,
    pending: Vec<ChainNotification>,
}

impl LedgerTxn {
    /// Commit all writes atomically and release the queued notifications
    pub fn commit(self) -> LedgerResult<Vec<ChainNotification>> {
        self.txn.commit()?;
        Ok(self.pending)
    }

    /// Discard all writes and queued notifications
    pub fn abort(self) -> LedgerResult<()> {
        self.txn.abort()?;
        Ok(())
    }

    /// Notifications queued so far
    pub fn pending_notifications(&self) -> &[ChainNotification] {
        &self.pending
    }
}

impl StateReader for LedgerTxn {
    fn get_state(&self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        let table = self.txn.open_table(WORLD_STATE_TABLE)?;
        get_from(&table, key)
    }

    fn scan_raw(&self, prefix: &str) -> LedgerResult<ScanIter> {
        let table = self.txn.open_table(WORLD_STATE_TABLE)?;
        scan_from(&table, prefix)
    }
}

impl StateStore for LedgerTxn {
    fn put_state(&mut self, key: &str, value: &[u8]) -> LedgerResult<()> {
        let mut table = self.txn.open_table(WORLD_STATE_TABLE)?;
        table.insert(key, value)?;
        Ok(())
    }

    fn delete_state(&mut self, key: &str) -> LedgerResult<()> {
        let mut table = self.txn.open_table(WORLD_STATE_TABLE)?;
        table.remove(key)?;
        Ok(())
    }

    fn emit(&mut self, topic: &str, payload: Vec<u8>) {
        self.pending.push(ChainNotification::new(topic, payload));
    }
}

/// Read-only snapshot of world state
pub struct LedgerSnapshot {
    txn: ReadTransaction,
}

impl StateReader for LedgerSnapshot {
    fn get_state(&self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        let table = self.txn.open_table(WORLD_STATE_TABLE)?;
        get_from(&table, key)
    }

    fn scan_raw(&self, prefix: &str) -> LedgerResult<ScanIter> {
        let table = self.txn.open_table(WORLD_STATE_TABLE)?;
        scan_from(&table, prefix)
    }
}

fn get_from(
    table: &impl ReadableTable<&'static str, &'static [u8]>,
    key: &str,
) -> LedgerResult<Option<Vec<u8>>> {
    Ok(table.get(key)?.map(|guard| guard.value().to_vec()))
}

fn scan_from(
    table: &impl ReadableTable<&'static str, &'static [u8]>,
    prefix: &str,
) -> LedgerResult<ScanIter> {
    let mut entries = Vec::new();
    for result in table.range(prefix..)? {
        let (key, value) = result?;
        let key = key.value();
        if !key.starts_with(prefix) {
            break;
        }
        entries.push((key.to_string(), value.value().to_vec()));
    }
    Ok(ScanIter::new(entries))
}
