//! Order event trail
//!
//! Append-only: events are written once under their canonical key and
//! under `event(orderId, id)`, and never rewritten. Per-order sequence
//! numbers in the IDs make the index return events in append order.

use crate::core::ContractResult;
use crate::ledger::ids::sequenced_id;
use crate::ledger::records::{put_record, query_index};
use crate::ledger::{RecordIter, StateReader, StateStore};
use chrono::{DateTime, Utc};
use shared::order::OrderEvent;

const EVENT_INDEX: &str = "event";

/// Append an event to the trail of `order_id`
pub fn append_event(
    store: &mut impl StateStore,
    order_id: &str,
    event_type: &str,
    description: &str,
    payload_hash: String,
    now: DateTime<Utc>,
) -> ContractResult<OrderEvent> {
    let id = sequenced_id(store, EVENT_INDEX, order_id, now)?;
    let event = OrderEvent {
        id,
        order_id: order_id.to_string(),
        event_type: event_type.to_string(),
        payload_hash,
        timestamp: now,
        description: description.to_string(),
        metadata: String::new(),
    };
    put_record(store, &event)?;
    tracing::debug!(order_id = %order_id, event_id = %event.id, event_type = %event_type, "Event appended");
    Ok(event)
}

/// Events of `order_id` in append order
pub fn order_events(store: &impl StateReader, order_id: &str) -> ContractResult<RecordIter<OrderEvent>> {
    Ok(query_index(store, EVENT_INDEX, &[order_id])?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LedgerStorage;
    use crate::ledger::LedgerResult;
    use shared::util::from_unix;

    #[test]
    fn test_same_second_events_keep_append_order() {
        let storage = LedgerStorage::open_in_memory().unwrap();
        let mut txn = storage.begin().unwrap();
        let now = from_unix(1_700_000_000);
        let first = append_event(&mut txn, "o1", "CREATED", "Order created", "h1".into(), now).unwrap();
        let second = append_event(&mut txn, "o1", "paid", "paid", "h2".into(), now).unwrap();
        append_event(&mut txn, "o10", "CREATED", "other", "h3".into(), now).unwrap();
        txn.commit().unwrap();

        assert_ne!(first.id, second.id);

        let snapshot = storage.snapshot().unwrap();
        let events: Vec<OrderEvent> = order_events(&snapshot, "o1")
            .unwrap()
            .collect::<LedgerResult<_>>()
            .unwrap();
        let types: Vec<&str> = events.iter().map(|e| e.event_type.as_str()).collect();
        assert_eq!(types, vec!["CREATED", "paid"]);
        assert_eq!(events[0], first);
    }

    #[test]
    fn test_clock_step_back_keeps_append_order() {
        let storage = LedgerStorage::open_in_memory().unwrap();
        let mut txn = storage.begin().unwrap();
        let later = from_unix(1_700_003_600);
        let earlier = from_unix(1_700_000_000);
        append_event(&mut txn, "o1", "CREATED", "Order created", "h1".into(), later).unwrap();
        append_event(&mut txn, "o1", "paid", "paid", "h2".into(), earlier).unwrap();
        txn.commit().unwrap();

        let snapshot = storage.snapshot().unwrap();
        let types: Vec<String> = order_events(&snapshot, "o1")
            .unwrap()
            .map(|e| e.map(|e| e.event_type))
            .collect::<LedgerResult<_>>()
            .unwrap();
        assert_eq!(types, vec!["CREATED", "paid"]);
    }

    #[test]
    fn test_unknown_order_has_empty_trail() {
        let storage = LedgerStorage::open_in_memory().unwrap();
        let snapshot = storage.snapshot().unwrap();
        assert_eq!(order_events(&snapshot, "missing").unwrap().count(), 0);
    }
}
