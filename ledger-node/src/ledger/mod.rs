//! Ledger layer: the world-state key-value store the contracts run on
//!
//! - **composite**: composite-key encoding for secondary indexes
//! - **storage**: redb-backed world state, write transactions, read snapshots
//! - **records**: typed record persistence (canonical key + index copies)
//! - **ids**: collision-free ID generation
//!
//! # Contract surface
//!
//! ```text
//! StateReader  get_state / scan_prefix          (LedgerSnapshot, LedgerTxn)
//! StateStore   put_state / delete_state / emit  (LedgerTxn)
//! ```
//!
//! All writes of one operation go through a single `LedgerTxn` and become
//! visible atomically on `commit()`. Dropping a transaction without
//! committing discards every write and every queued notification.

pub mod composite;
pub mod ids;
pub mod records;
pub mod storage;

pub use composite::composite_key;
pub use records::{IndexEntry, LedgerRecord, RecordIter};
pub use storage::{LedgerSnapshot, LedgerStorage, LedgerTxn};

use thiserror::Error;

/// Ledger errors
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid composite key part: {0}")]
    InvalidKeyPart(String),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Read access to world state
pub trait StateReader {
    /// Point lookup; `None` when the key was never written or was deleted
    fn get_state(&self, key: &str) -> LedgerResult<Option<Vec<u8>>>;

    /// All entries whose key starts with `prefix`, in key byte order
    fn scan_raw(&self, prefix: &str) -> LedgerResult<ScanIter>;

    /// Entries of `index` whose leading key parts equal `parts`
    fn scan_prefix(&self, index: &str, parts: &[&str]) -> LedgerResult<ScanIter> {
        let prefix = composite_key(index, parts)?;
        self.scan_raw(&prefix)
    }
}

/// Write access to world state within one transaction
pub trait StateStore: StateReader {
    /// Upsert
    fn put_state(&mut self, key: &str, value: &[u8]) -> LedgerResult<()>;

    /// Remove a key (no-op if absent)
    fn delete_state(&mut self, key: &str) -> LedgerResult<()>;

    /// Queue a notification; delivered only if the transaction commits
    fn emit(&mut self, topic: &str, payload: Vec<u8>);
}

/// Single-pass sequence of `(key, value)` pairs from one consistent view
///
/// The matching range is read eagerly when the scan is issued, so the
/// iterator holds no table borrow and can outlive the write transaction's
/// table handle; later writes are not observed. Decoding stays lazy in
/// [`RecordIter`]. Issue a new scan for a fresh view.
#[derive(Debug)]
pub struct ScanIter {
    entries: std::vec::IntoIter<(String, Vec<u8>)>,
}

impl ScanIter {
    pub(crate) fn new(entries: Vec<(String, Vec<u8>)>) -> Self {
        Self {
            entries: entries.into_iter(),
        }
    }
}

impl Iterator for ScanIter {
    type Item = (String, Vec<u8>);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl ExactSizeIterator for ScanIter {}
