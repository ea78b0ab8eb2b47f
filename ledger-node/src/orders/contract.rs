//! Order contract operations
//!
//! Each mutating function runs inside the caller's write transaction and
//! performs every write the operation needs (canonical record, index
//! copies, refund policy, event, notification). The caller commits or
//! drops the transaction as a whole.

use super::events::append_event;
use super::lifecycle::TransitionTable;
use super::refund::{RefundQuote, evaluate};
use crate::core::{ContractResult, require_record};
use crate::ledger::ids::generate_id;
use crate::ledger::records::{emit_notification, put_record, query_index, record_hash};
use crate::ledger::{LedgerRecord, RecordIter, StateReader, StateStore};
use crate::utils::validation::{
    MAX_KEY_LEN, MAX_NOTE_LEN, validate_key_part, validate_optional_text, validate_percentage,
    validate_positive_amount,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::message::Notification;
use shared::order::{
    EVENT_CREATED, EVENT_REFUND_PROCESSED, NewOrder, Order, OrderStatus, RefundPolicy, RefundTerms,
};
use shared::util::fingerprint;

const ORDER_INDEX: &str = "order";

/// Result of a granted refund
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundReceipt {
    pub order: Order,
    pub refund_amount: Decimal,
    pub refund_hash: String,
    pub deadline: DateTime<Utc>,
}

/// Create a pending order together with its refund policy and CREATED event
pub fn create_order(
    store: &mut impl StateStore,
    input: NewOrder,
    terms: &RefundTerms,
    now: DateTime<Utc>,
) -> ContractResult<Order> {
    validate_key_part(&input.order_number, "orderNumber")?;
    validate_key_part(&input.user_id, "userId")?;
    validate_positive_amount(input.amount, "amount")?;
    validate_optional_text(&input.currency, "currency", MAX_KEY_LEN)?;

    let id = generate_id(store, Order::KIND, &input.order_number, now)?;
    let order = Order::from_input(id, input, now);
    put_record(store, &order)?;

    let policy = RefundPolicy::for_order(&order.id, terms, now);
    put_record(store, &policy)?;

    append_event(
        store,
        &order.id,
        EVENT_CREATED,
        "Order created",
        record_hash(&order)?,
        now,
    )?;

    emit_notification(
        store,
        &Notification::OrderCreated {
            order_id: order.id.clone(),
            order_number: order.order_number.clone(),
            user_id: order.user_id.clone(),
            amount: order.amount,
            timestamp: now,
        },
    )?;

    Ok(order)
}

/// Move an order along one edge of the lifecycle
///
/// Entering `delivered` stamps `actual_delivery` (once); the refund window
/// is measured from it.
pub fn update_order_status(
    store: &mut impl StateStore,
    transitions: &TransitionTable,
    order_id: &str,
    new_status: OrderStatus,
    description: &str,
    now: DateTime<Utc>,
) -> ContractResult<Order> {
    validate_optional_text(description, "description", MAX_NOTE_LEN)?;

    let mut order: Order = require_record(store, order_id)?;
    let old_status = order.status;
    transitions.check(old_status, new_status)?;

    order.status = new_status;
    order.updated_at = now;
    if new_status == OrderStatus::Delivered && order.actual_delivery.is_none() {
        order.actual_delivery = Some(now);
    }
    put_record(store, &order)?;

    append_event(
        store,
        &order.id,
        new_status.as_str(),
        description,
        record_hash(&order)?,
        now,
    )?;

    emit_notification(
        store,
        &Notification::OrderStatusUpdated {
            order_id: order.id.clone(),
            old_status: old_status.to_string(),
            new_status: new_status.to_string(),
            description: description.to_string(),
            timestamp: now,
        },
    )?;

    Ok(order)
}

/// Grant a refund for a delivered order within its refund window
pub fn process_refund(
    store: &mut impl StateStore,
    transitions: &TransitionTable,
    order_id: &str,
    reason: &str,
    now: DateTime<Utc>,
) -> ContractResult<RefundReceipt> {
    validate_optional_text(reason, "reason", MAX_NOTE_LEN)?;

    let mut order: Order = require_record(store, order_id)?;
    let policy: RefundPolicy = require_record(store, &RefundPolicy::id_for(order_id))?;

    let RefundQuote {
        refund_amount,
        deadline,
        ..
    } = evaluate(&order, &policy, now)?;
    transitions.check(order.status, OrderStatus::Refunded)?;

    let refund_hash = fingerprint(&[
        order.id.as_bytes(),
        reason.as_bytes(),
        refund_amount.to_string().as_bytes(),
        now.to_rfc3339().as_bytes(),
    ]);

    order.status = OrderStatus::Refunded;
    order.refund_reason = reason.to_string();
    order.refund_hash = refund_hash.clone();
    order.updated_at = now;
    put_record(store, &order)?;

    append_event(
        store,
        &order.id,
        EVENT_REFUND_PROCESSED,
        &format!("Refund processed: {}", reason),
        refund_hash.clone(),
        now,
    )?;

    emit_notification(
        store,
        &Notification::RefundProcessed {
            order_id: order.id.clone(),
            refund_hash: refund_hash.clone(),
            refund_reason: reason.to_string(),
            amount: refund_amount,
            timestamp: now,
        },
    )?;

    Ok(RefundReceipt {
        order,
        refund_amount,
        refund_hash,
        deadline,
    })
}

pub fn get_order(store: &impl StateReader, order_id: &str) -> ContractResult<Order> {
    require_record(store, order_id)
}

/// Orders of a user, optionally narrowed to one status
pub fn orders_by_user(
    store: &impl StateReader,
    user_id: &str,
    status: Option<OrderStatus>,
) -> ContractResult<RecordIter<Order>> {
    let iter = match status {
        Some(status) => query_index(store, ORDER_INDEX, &[user_id, status.as_str()])?,
        None => query_index(store, ORDER_INDEX, &[user_id])?,
    };
    Ok(iter)
}

pub fn get_refund_policy(store: &impl StateReader, order_id: &str) -> ContractResult<RefundPolicy> {
    require_record(store, &RefundPolicy::id_for(order_id))
}

/// Replace the terms of an order's refund policy
pub fn update_refund_policy(
    store: &mut impl StateStore,
    order_id: &str,
    terms: &RefundTerms,
    now: DateTime<Utc>,
) -> ContractResult<RefundPolicy> {
    validate_percentage(terms.percentage, "refundPercentage")?;
    validate_optional_text(&terms.conditions, "conditions", MAX_NOTE_LEN)?;

    let mut policy: RefundPolicy = require_record(store, &RefundPolicy::id_for(order_id))?;
    policy.refund_window = terms.window_days;
    policy.refund_percentage = terms.percentage;
    policy.conditions = terms.conditions.clone();
    policy.is_active = terms.is_active;
    policy.updated_at = now;
    put_record(store, &policy)?;
    Ok(policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ContractError;
    use crate::ledger::{LedgerError, LedgerResult, LedgerStorage, ScanIter};
    use shared::util::from_unix;

    /// Store that fails every write to keys with the given prefix
    struct FailingStore<'a> {
        inner: &'a mut crate::ledger::LedgerTxn,
        fail_prefix: &'static str,
    }

    impl StateReader for FailingStore<'_> {
        fn get_state(&self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
            self.inner.get_state(key)
        }

        fn scan_raw(&self, prefix: &str) -> LedgerResult<ScanIter> {
            self.inner.scan_raw(prefix)
        }
    }

    impl StateStore for FailingStore<'_> {
        fn put_state(&mut self, key: &str, value: &[u8]) -> LedgerResult<()> {
            if key.starts_with(self.fail_prefix) {
                return Err(LedgerError::InvalidKeyPart(format!("injected failure at {key}")));
            }
            self.inner.put_state(key, value)
        }

        fn delete_state(&mut self, key: &str) -> LedgerResult<()> {
            self.inner.delete_state(key)
        }

        fn emit(&mut self, topic: &str, payload: Vec<u8>) {
            self.inner.emit(topic, payload)
        }
    }

    #[test]
    fn test_failing_policy_write_aborts_creation() {
        let storage = LedgerStorage::open_in_memory().unwrap();
        let mut txn = storage.begin().unwrap();
        let now = from_unix(1_700_000_000);

        let result = {
            let mut failing = FailingStore {
                inner: &mut txn,
                fail_prefix: "refund_",
            };
            create_order(
                &mut failing,
                NewOrder::new("A1", "u1", Decimal::new(50, 0)),
                &RefundTerms::default(),
                now,
            )
        };
        assert!(matches!(result, Err(ContractError::Ledger(_))));
        // nothing was queued before the failure
        assert!(txn.pending_notifications().is_empty());
        drop(txn);

        let snapshot = storage.snapshot().unwrap();
        assert!(snapshot.get_state("order_A1_1700000000").unwrap().is_none());
        assert_eq!(storage.key_count().unwrap(), 0);
    }

    #[test]
    fn test_create_order_writes_policy_and_event() {
        let storage = LedgerStorage::open_in_memory().unwrap();
        let mut txn = storage.begin().unwrap();
        let now = from_unix(1_700_000_000);

        let order = create_order(
            &mut txn,
            NewOrder::new("A1", "u1", Decimal::new(50, 0)),
            &RefundTerms::default(),
            now,
        )
        .unwrap();
        assert_eq!(order.id, "order_A1_1700000000");
        assert_eq!(txn.pending_notifications().len(), 1);
        assert_eq!(txn.pending_notifications()[0].topic, "OrderCreated");
        txn.commit().unwrap();

        let snapshot = storage.snapshot().unwrap();
        let policy = get_refund_policy(&snapshot, &order.id).unwrap();
        assert_eq!(policy.refund_window, 90);
        let events = super::super::events::order_events(&snapshot, &order.id)
            .unwrap()
            .collect::<LedgerResult<Vec<_>>>()
            .unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, EVENT_CREATED);
        assert_eq!(events[0].payload_hash, record_hash(&order).unwrap());
    }

    #[test]
    fn test_create_order_rejects_bad_input() {
        let storage = LedgerStorage::open_in_memory().unwrap();
        let mut txn = storage.begin().unwrap();
        let now = from_unix(1_700_000_000);
        let terms = RefundTerms::default();

        for input in [
            NewOrder::new("", "u1", Decimal::new(50, 0)),
            NewOrder::new("A1", "  ", Decimal::new(50, 0)),
            NewOrder::new("A1", "u1", Decimal::ZERO),
            NewOrder::new("A1", "u1", Decimal::new(-1, 0)),
            NewOrder::new("A\u{0}1", "u1", Decimal::new(50, 0)),
        ] {
            let err = create_order(&mut txn, input, &terms, now).unwrap_err();
            assert!(matches!(err, ContractError::Validation(_)), "{err}");
        }
        assert!(txn.pending_notifications().is_empty());
    }

    #[test]
    fn test_update_refund_policy() {
        let storage = LedgerStorage::open_in_memory().unwrap();
        let mut txn = storage.begin().unwrap();
        let created = from_unix(1_700_000_000);
        let order = create_order(
            &mut txn,
            NewOrder::new("A1", "u1", Decimal::new(50, 0)),
            &RefundTerms::default(),
            created,
        )
        .unwrap();

        let terms = RefundTerms {
            window_days: 30,
            percentage: Decimal::new(80, 0),
            conditions: "Unused".to_string(),
            is_active: true,
        };
        let later = from_unix(1_700_000_100);
        let policy = update_refund_policy(&mut txn, &order.id, &terms, later).unwrap();
        assert_eq!(policy.terms(), terms);
        assert_eq!(policy.created_at, created);
        assert_eq!(policy.updated_at, later);

        let bad = RefundTerms {
            percentage: Decimal::new(101, 0),
            ..terms
        };
        assert!(update_refund_policy(&mut txn, &order.id, &bad, later).is_err());

        let err = update_refund_policy(&mut txn, "order_X_1", &RefundTerms::default(), later)
            .unwrap_err();
        assert!(matches!(err, ContractError::NotFound { kind: "refund", .. }));
    }
}
