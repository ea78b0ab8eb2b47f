use super::*;
use crate::utils::validation::MAX_AMOUNT;
use shared::order::EVENT_REFUND_PROCESSED;

fn delivered_order(manager: &OrdersManager, order_number: &str) -> Order {
    order_in(manager, order_number, OrderStatus::Delivered)
}

#[test]
fn test_refund_within_window() {
    let (manager, clock) = create_test_manager();
    let order = delivered_order(&manager, "A1");

    clock.advance(TimeDelta::days(10));
    let mut rx = manager.context().bus().subscribe();
    let receipt = manager.process_refund(&order.id, "damaged").unwrap();

    assert_eq!(receipt.refund_amount, Decimal::new(50, 0));
    assert_eq!(receipt.deadline, from_unix(T0) + TimeDelta::days(90));
    assert_eq!(receipt.refund_hash.len(), 64);

    let stored = manager.get_order(&order.id).unwrap();
    assert_eq!(stored.status, OrderStatus::Refunded);
    assert_eq!(stored.refund_reason, "damaged");
    assert_eq!(stored.refund_hash, receipt.refund_hash);
    assert_eq!(stored, receipt.order);

    let events = manager.get_order_events(&order.id).unwrap();
    let last = events.last().unwrap();
    assert_eq!(last.event_type, EVENT_REFUND_PROCESSED);
    assert_eq!(last.description, "Refund processed: damaged");
    assert_eq!(last.payload_hash, receipt.refund_hash);
    // CREATED, paid, shipped, delivered, REFUND_PROCESSED
    assert_eq!(events.len(), 5);

    let notifications = drain(&mut rx);
    assert_eq!(notifications.len(), 1);
    match &notifications[0] {
        Notification::RefundProcessed {
            order_id,
            refund_reason,
            amount,
            ..
        } => {
            assert_eq!(order_id, &order.id);
            assert_eq!(refund_reason, "damaged");
            assert_eq!(*amount, Decimal::new(50, 0));
        }
        other => panic!("unexpected notification: {other:?}"),
    }
}

#[test]
fn test_refund_after_window_expired() {
    let (manager, clock) = create_test_manager();
    let order = delivered_order(&manager, "A1");
    let events_before = manager.get_order_events(&order.id).unwrap();

    clock.advance(TimeDelta::days(91));
    let mut rx = manager.context().bus().subscribe();
    let err = manager.process_refund(&order.id, "late").unwrap_err();

    match err {
        ContractError::WindowExpired { deadline } => {
            assert_eq!(deadline, from_unix(T0) + TimeDelta::days(90));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let stored = manager.get_order(&order.id).unwrap();
    assert_eq!(stored.status, OrderStatus::Delivered);
    assert_eq!(stored, order);
    assert_eq!(manager.get_order_events(&order.id).unwrap(), events_before);
    assert!(drain(&mut rx).is_empty());
}

#[test]
fn test_refund_window_is_measured_from_delivery() {
    let (manager, clock) = create_test_manager();
    let order = order_in(&manager, "A1", OrderStatus::Shipped);

    // a long shipment does not eat into the window
    clock.advance(TimeDelta::days(60));
    manager
        .update_order_status(&order.id, OrderStatus::Delivered, "")
        .unwrap();
    clock.advance(TimeDelta::days(80));

    assert!(manager.process_refund(&order.id, "changed mind").is_ok());
}

#[test]
fn test_refund_requires_delivered() {
    let (manager, _clock) = create_test_manager();
    for (i, status) in [
        OrderStatus::Pending,
        OrderStatus::Paid,
        OrderStatus::Shipped,
        OrderStatus::Cancelled,
    ]
    .into_iter()
    .enumerate()
    {
        let order = order_in(&manager, &format!("R{i}"), status);
        let err = manager.process_refund(&order.id, "why").unwrap_err();
        assert!(
            matches!(err, ContractError::InvalidState { status: s, .. } if s == status),
            "{err}"
        );
        assert_eq!(manager.get_order(&order.id).unwrap().status, status);
    }
}

#[test]
fn test_refund_twice_fails() {
    let (manager, _clock) = create_test_manager();
    let order = delivered_order(&manager, "A1");
    manager.process_refund(&order.id, "first").unwrap();

    let err = manager.process_refund(&order.id, "second").unwrap_err();
    assert!(matches!(
        err,
        ContractError::InvalidState {
            status: OrderStatus::Refunded,
            ..
        }
    ));
    assert_eq!(manager.get_order(&order.id).unwrap().refund_reason, "first");
}

#[test]
fn test_partial_refund_percentage() {
    let terms = RefundTerms {
        percentage: Decimal::new(50, 0),
        ..RefundTerms::default()
    };
    let (manager, _clock) = create_test_manager_with_terms(terms);
    let mut order = manager
        .create_order(NewOrder::new("A1", "u1", Decimal::new(1005, 2)))
        .unwrap();
    for status in path_to(OrderStatus::Delivered) {
        order = manager.update_order_status(&order.id, status, "").unwrap();
    }

    let receipt = manager.process_refund(&order.id, "half").unwrap();
    assert_eq!(receipt.refund_amount, Decimal::new(503, 2));
}

#[test]
fn test_inactive_policy_blocks_refund() {
    let (manager, _clock) = create_test_manager();
    let order = delivered_order(&manager, "A1");
    let terms = RefundTerms {
        is_active: false,
        ..RefundTerms::default()
    };
    let policy = manager.update_refund_policy(&order.id, terms).unwrap();
    assert!(!policy.is_active);

    let err = manager.process_refund(&order.id, "no").unwrap_err();
    assert!(matches!(err, ContractError::InvalidState { .. }));
}

#[test]
fn test_refund_unknown_order() {
    let (manager, _clock) = create_test_manager();
    let err = manager.process_refund("order_missing_1", "x").unwrap_err();
    assert!(matches!(err, ContractError::NotFound { kind: "order", .. }));
}

#[test]
fn test_quote_refund_has_no_side_effects() {
    let (manager, clock) = create_test_manager();
    let order = delivered_order(&manager, "A1");
    clock.advance(TimeDelta::days(1));

    let quote = manager.quote_refund(&order.id).unwrap();
    assert!(quote.eligible);
    assert_eq!(quote.refund_amount, Decimal::new(50, 0));
    assert_eq!(manager.get_order(&order.id).unwrap().status, OrderStatus::Delivered);
}

#[test]
fn test_oversized_amount_rejected_at_creation() {
    let (manager, _clock) = create_test_manager();
    let huge: Decimal = "1000000000000000000000000000".parse().unwrap();

    let err = manager
        .create_order(NewOrder::new("BIG", "u1", huge))
        .unwrap_err();
    assert!(matches!(err, ContractError::Validation(_)), "{err}");
    assert_eq!(manager.context().storage().key_count().unwrap(), 0);
}

#[test]
fn test_refund_at_amount_limit() {
    let (manager, _clock) = create_test_manager();
    let mut order = manager
        .create_order(NewOrder::new("BIG", "u1", MAX_AMOUNT))
        .unwrap();
    for status in path_to(OrderStatus::Delivered) {
        order = manager.update_order_status(&order.id, status, "step").unwrap();
    }

    let receipt = manager.process_refund(&order.id, "changed mind").unwrap();
    assert_eq!(receipt.refund_amount, MAX_AMOUNT);
    assert_eq!(receipt.order.status, OrderStatus::Refunded);
}
