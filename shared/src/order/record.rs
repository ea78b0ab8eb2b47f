//! Canonical order record

use super::OrderStatus;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Purchase order as stored on the ledger
///
/// The same serialized bytes are written under the canonical key (`id`)
/// and under the `order(userId, status, id)` composite key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Generated ID: `order_<orderNumber>_<unixSeconds>`
    pub id: String,
    pub order_number: String,
    pub user_id: String,
    pub status: OrderStatus,
    /// Always > 0
    pub amount: Decimal,
    #[serde(default)]
    pub currency: String,

    // === Payment ===
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub payment_id: String,
    #[serde(default)]
    pub payment_status: String,

    /// Opaque serialized line items
    #[serde(default)]
    pub items: String,
    #[serde(default)]
    pub shipping_address: String,
    #[serde(default)]
    pub billing_address: String,

    // === Fulfilment ===
    #[serde(default)]
    pub tracking_number: String,
    #[serde(default)]
    pub shipping_method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_delivery: Option<DateTime<Utc>>,
    /// Stamped when the order enters `delivered`; start of the refund window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_delivery: Option<DateTime<Utc>>,

    #[serde(default)]
    pub chain_event_hash: String,
    #[serde(default)]
    pub refund_hash: String,
    #[serde(default)]
    pub refund_reason: String,
    #[serde(default)]
    pub metadata: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Build a pending order from caller input (ID assigned by the caller)
    pub fn from_input(id: String, input: NewOrder, now: DateTime<Utc>) -> Self {
        Self {
            id,
            order_number: input.order_number,
            user_id: input.user_id,
            status: OrderStatus::Pending,
            amount: input.amount,
            currency: input.currency,
            payment_method: input.payment_method,
            payment_id: input.payment_id,
            payment_status: input.payment_status,
            items: input.items,
            shipping_address: input.shipping_address,
            billing_address: input.billing_address,
            tracking_number: input.tracking_number,
            shipping_method: input.shipping_method,
            estimated_delivery: input.estimated_delivery,
            actual_delivery: None,
            chain_event_hash: input.chain_event_hash,
            refund_hash: String::new(),
            refund_reason: String::new(),
            metadata: input.metadata,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Caller-supplied fields for order creation
///
/// Identity, status, refund fields and timestamps are always assigned by
/// the ledger node and therefore are not part of the input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub order_number: String,
    pub user_id: String,
    pub amount: Decimal,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub payment_id: String,
    #[serde(default)]
    pub payment_status: String,
    #[serde(default)]
    pub items: String,
    #[serde(default)]
    pub shipping_address: String,
    #[serde(default)]
    pub billing_address: String,
    #[serde(default)]
    pub tracking_number: String,
    #[serde(default)]
    pub shipping_method: String,
    #[serde(default)]
    pub estimated_delivery: Option<DateTime<Utc>>,
    #[serde(default)]
    pub chain_event_hash: String,
    #[serde(default)]
    pub metadata: String,
}

impl NewOrder {
    /// Minimal input: natural key, owner and amount
    pub fn new(order_number: impl Into<String>, user_id: impl Into<String>, amount: Decimal) -> Self {
        Self {
            order_number: order_number.into(),
            user_id: user_id.into(),
            amount,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::from_unix;

    #[test]
    fn test_input_accepts_original_json_shape() {
        let json = r#"{
            "orderNumber": "A1",
            "userId": "u1",
            "amount": 50.0,
            "currency": "USD",
            "status": "shipped",
            "shippingAddress": "1 Main St"
        }"#;
        let input: NewOrder = serde_json::from_str(json).unwrap();
        assert_eq!(input.order_number, "A1");
        assert_eq!(input.amount, Decimal::new(50, 0));
        assert_eq!(input.shipping_address, "1 Main St");
        assert_eq!(input.payment_method, "");
    }

    #[test]
    fn test_order_json_roundtrip_keeps_every_field() {
        let created = from_unix(1_700_000_000);
        let mut order = Order::from_input(
            "order_A1_1700000000".to_string(),
            NewOrder::new("A1", "u1", Decimal::new(5025, 2)),
            created,
        );
        order.status = OrderStatus::Delivered;
        order.actual_delivery = Some(from_unix(1_700_100_000));
        order.refund_reason = "damaged".to_string();

        let bytes = serde_json::to_vec(&order).unwrap();
        let decoded: Order = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, order);

        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["orderNumber"], "A1");
        assert_eq!(value["status"], "delivered");
        assert!(value.get("estimatedDelivery").is_none());
    }
}
