//! Ledger notification types
//!
//! Every externally significant mutation queues one [`Notification`] in its
//! write transaction. After the commit succeeds the node broadcasts it as a
//! [`ChainNotification`] (topic + JSON payload) to all subscribers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Structured notification payload
///
/// Serialized with a `type` tag equal to the topic name, e.g.
/// `{"type":"OrderCreated","orderId":...}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum Notification {
    OrderCreated {
        order_id: String,
        order_number: String,
        user_id: String,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    },
    OrderStatusUpdated {
        order_id: String,
        old_status: String,
        new_status: String,
        description: String,
        timestamp: DateTime<Utc>,
    },
    RefundProcessed {
        order_id: String,
        refund_hash: String,
        refund_reason: String,
        amount: Decimal,
        timestamp: DateTime<Utc>,
    },
    ProductCreated {
        product_id: String,
        sku: String,
        name: String,
        timestamp: DateTime<Utc>,
    },
    ProductVerified {
        product_id: String,
        sku: String,
        timestamp: DateTime<Utc>,
    },
    TraceCreated {
        trace_id: String,
        product_id: String,
        stage: String,
        issuer: String,
        timestamp: DateTime<Utc>,
    },
    TraceVerified {
        trace_id: String,
        product_id: String,
        verification_method: String,
        timestamp: DateTime<Utc>,
    },
}

impl Notification {
    /// Broadcast topic (identical to the serialized `type` tag)
    pub fn topic(&self) -> &'static str {
        match self {
            Notification::OrderCreated { .. } => "OrderCreated",
            Notification::OrderStatusUpdated { .. } => "OrderStatusUpdated",
            Notification::RefundProcessed { .. } => "RefundProcessed",
            Notification::ProductCreated { .. } => "ProductCreated",
            Notification::ProductVerified { .. } => "ProductVerified",
            Notification::TraceCreated { .. } => "TraceCreated",
            Notification::TraceVerified { .. } => "TraceVerified",
        }
    }

    /// Encode as a raw `(topic, payload)` pair
    pub fn encode(&self) -> Result<(String, Vec<u8>), serde_json::Error> {
        Ok((self.topic().to_string(), serde_json::to_vec(self)?))
    }
}

/// Committed notification as delivered to subscribers
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChainNotification {
    pub topic: String,
    pub payload: Vec<u8>,
}

impl ChainNotification {
    pub fn new(topic: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            topic: topic.into(),
            payload,
        }
    }

    /// Decode the payload back into a typed notification
    pub fn decode(&self) -> Result<Notification, serde_json::Error> {
        serde_json::from_slice(&self.payload)
    }
}
