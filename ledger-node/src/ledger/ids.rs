//! Record ID generation
//!
//! Orders and products: `<kind>_<naturalKey>_<unixSeconds>`, with a
//! `_NNNN` suffix when that key is already taken.
//!
//! Events and traces: `<kind>_<ownerId>_<seq:010>_<unixSeconds>`, where
//! `seq` is a per-kind, per-owner counter kept in world state. The counter
//! comes before the timestamp, so IDs of one owner sort in creation order
//! even when two records share a second or the clock steps backwards.

use super::{LedgerResult, StateReader, StateStore, composite_key};
use chrono::{DateTime, Utc};

/// Composite namespace of the per-owner sequence counters
const SEQUENCE_INDEX: &str = "seq";

/// First free `<kind>_<naturalKey>_<unixSeconds>[_NNNN]` key
pub fn generate_id(
    store: &impl StateReader,
    kind: &str,
    natural_key: &str,
    at: DateTime<Utc>,
) -> LedgerResult<String> {
    let base = format!("{}_{}_{}", kind, natural_key, at.timestamp());
    if store.get_state(&base)?.is_none() {
        return Ok(base);
    }

    let mut suffix: u32 = 1;
    loop {
        let candidate = format!("{}_{:04}", base, suffix);
        if store.get_state(&candidate)?.is_none() {
            tracing::debug!(id = %candidate, "ID collision resolved with suffix");
            return Ok(candidate);
        }
        suffix += 1;
    }
}

/// Increment and return the `kind` counter of `owner` (first value is 1)
pub fn next_sequence(store: &mut impl StateStore, kind: &str, owner: &str) -> LedgerResult<u64> {
    let key = composite_key(SEQUENCE_INDEX, &[kind, owner])?;
    let current: u64 = match store.get_state(&key)? {
        Some(bytes) => serde_json::from_slice(&bytes)?,
        None => 0,
    };
    let next = current + 1;
    store.put_state(&key, &serde_json::to_vec(&next)?)?;
    Ok(next)
}

/// `<kind>_<owner>_<seq:010>_<unixSeconds>` using the owner's counter
pub fn sequenced_id(
    store: &mut impl StateStore,
    kind: &str,
    owner: &str,
    at: DateTime<Utc>,
) -> LedgerResult<String> {
    let seq = next_sequence(store, kind, owner)?;
    Ok(format!("{}_{}_{:010}_{}", kind, owner, seq, at.timestamp()))
}
