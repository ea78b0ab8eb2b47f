//! Typed record persistence
//!
//! A record is stored once under its canonical key and once more under
//! each of its composite index keys, every copy holding the same JSON
//! bytes. [`put_record`] keeps the copies in step: index keys the previous
//! version had and the new version no longer has are deleted in the same
//! transaction.

use super::{LedgerResult, ScanIter, StateReader, StateStore, composite_key};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::message::Notification;
use std::collections::HashSet;
use std::marker::PhantomData;

/// One composite index entry of a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub index: &'static str,
    pub parts: Vec<String>,
}

impl IndexEntry {
    pub fn new(index: &'static str, parts: Vec<String>) -> Self {
        Self { index, parts }
    }

    /// Encoded composite key of this entry
    pub fn key(&self) -> LedgerResult<String> {
        composite_key(self.index, &self.parts)
    }
}

/// Entity persisted on the ledger
pub trait LedgerRecord: Serialize + DeserializeOwned {
    /// Entity kind, used as ID prefix and in not-found errors
    const KIND: &'static str;

    /// Canonical key
    fn key(&self) -> &str;

    /// Secondary index entries holding a copy of this record
    fn index_entries(&self) -> Vec<IndexEntry> {
        Vec::new()
    }
}

impl LedgerRecord for shared::order::Order {
    const KIND: &'static str = "order";

    fn key(&self) -> &str {
        &self.id
    }

    fn index_entries(&self) -> Vec<IndexEntry> {
        vec![IndexEntry::new(
            "order",
            vec![
                self.user_id.clone(),
                self.status.as_str().to_string(),
                self.id.clone(),
            ],
        )]
    }
}

impl LedgerRecord for shared::order::OrderEvent {
    const KIND: &'static str = "event";

    fn key(&self) -> &str {
        &self.id
    }

    fn index_entries(&self) -> Vec<IndexEntry> {
        vec![IndexEntry::new(
            "event",
            vec![self.order_id.clone(), self.id.clone()],
        )]
    }
}

impl LedgerRecord for shared::order::RefundPolicy {
    const KIND: &'static str = "refund";

    fn key(&self) -> &str {
        &self.id
    }
}

impl LedgerRecord for shared::product::Product {
    const KIND: &'static str = "product";

    fn key(&self) -> &str {
        &self.id
    }

    fn index_entries(&self) -> Vec<IndexEntry> {
        vec![IndexEntry::new(
            "product",
            vec![self.sku.clone(), self.id.clone()],
        )]
    }
}

impl LedgerRecord for shared::product::TraceRecord {
    const KIND: &'static str = "trace";

    fn key(&self) -> &str {
        &self.id
    }

    fn index_entries(&self) -> Vec<IndexEntry> {
        vec![IndexEntry::new(
            "trace",
            vec![
                self.product_id.clone(),
                self.stage.clone(),
                self.id.clone(),
            ],
        )]
    }
}

/// Load and decode the record stored under `key`
pub fn find_record<R: LedgerRecord>(
    store: &impl StateReader,
    key: &str,
) -> LedgerResult<Option<R>> {
    match store.get_state(key)? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

/// Write `record` under its canonical key and every index key
///
/// Index keys of the currently stored version that the new version does
/// not carry are removed, so prefix scans never return an outdated copy.
pub fn put_record<R: LedgerRecord>(store: &mut impl StateStore, record: &R) -> LedgerResult<()> {
    let bytes = serde_json::to_vec(record)?;

    let new_keys = record
        .index_entries()
        .iter()
        .map(IndexEntry::key)
        .collect::<LedgerResult<Vec<_>>>()?;

    if let Some(previous) = find_record::<R>(store, record.key())? {
        let keep: HashSet<&str> = new_keys.iter().map(String::as_str).collect();
        for entry in previous.index_entries() {
            let old_key = entry.key()?;
            if !keep.contains(old_key.as_str()) {
                store.delete_state(&old_key)?;
            }
        }
    }

    store.put_state(record.key(), &bytes)?;
    for key in &new_keys {
        store.put_state(key, &bytes)?;
    }
    Ok(())
}

/// Lazily decoded index scan
///
/// Raw entries come from one consistent view; each item is decoded only
/// when the iterator reaches it.
#[derive(Debug)]
pub struct RecordIter<R> {
    inner: ScanIter,
    _marker: PhantomData<fn() -> R>,
}

impl<R> RecordIter<R> {
    pub fn new(inner: ScanIter) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }
}

impl<R: DeserializeOwned> Iterator for RecordIter<R> {
    type Item = LedgerResult<R>;

    fn next(&mut self) -> Option<Self::Item> {
        let (_, bytes) = self.inner.next()?;
        Some(serde_json::from_slice(&bytes).map_err(Into::into))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Records of `index` whose leading key parts equal `parts`
pub fn query_index<R: LedgerRecord>(
    store: &impl StateReader,
    index: &str,
    parts: &[&str],
) -> LedgerResult<RecordIter<R>> {
    Ok(RecordIter::new(store.scan_prefix(index, parts)?))
}

/// SHA-256 hex digest of the record's serialized bytes
pub fn record_hash<R: Serialize>(record: &R) -> LedgerResult<String> {
    Ok(shared::util::sha256_hex(&serde_json::to_vec(record)?))
}

/// Encode a notification and queue it on the transaction
pub fn emit_notification(
    store: &mut impl StateStore,
    notification: &Notification,
) -> LedgerResult<()> {
    let (topic, payload) = notification.encode()?;
    store.emit(&topic, payload);
    Ok(())
}
