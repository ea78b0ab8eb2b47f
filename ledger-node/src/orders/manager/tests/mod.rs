use super::*;
use crate::core::ManualClock;
use crate::ledger::LedgerStorage;
use crate::notify::NotificationBus;
use chrono::TimeDelta;
use rust_decimal::Decimal;
use shared::message::{ChainNotification, Notification};
use shared::util::from_unix;
use std::sync::Arc;
use tokio::sync::broadcast;

mod test_props;
mod test_refund;

const T0: i64 = 1_700_000_000;

fn create_test_manager() -> (OrdersManager, Arc<ManualClock>) {
    create_test_manager_with_terms(RefundTerms::default())
}

fn create_test_manager_with_terms(terms: RefundTerms) -> (OrdersManager, Arc<ManualClock>) {
    let storage = LedgerStorage::open_in_memory().unwrap();
    let clock = Arc::new(ManualClock::new(from_unix(T0)));
    let ctx = LedgerContext::new(storage, NotificationBus::new(64)).with_clock(clock.clone());
    (OrdersManager::new(ctx, terms), clock)
}

fn new_order(order_number: &str, user_id: &str) -> NewOrder {
    NewOrder::new(order_number, user_id, Decimal::new(50, 0))
}

/// Statuses to pass through to reach `target` from pending
fn path_to(target: OrderStatus) -> Vec<OrderStatus> {
    use OrderStatus::*;
    match target {
        Pending => vec![],
        Paid => vec![Paid],
        Shipped => vec![Paid, Shipped],
        Delivered => vec![Paid, Shipped, Delivered],
        Cancelled => vec![Cancelled],
        Refunded => vec![Paid, Shipped, Delivered, Refunded],
    }
}

/// Create an order and walk it to `target`
fn order_in(manager: &OrdersManager, order_number: &str, target: OrderStatus) -> Order {
    let mut order = manager.create_order(new_order(order_number, "u1")).unwrap();
    for status in path_to(target) {
        order = manager
            .update_order_status(&order.id, status, &format!("to {status}"))
            .unwrap();
    }
    order
}

fn drain(rx: &mut broadcast::Receiver<ChainNotification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n.decode().unwrap());
    }
    out
}
