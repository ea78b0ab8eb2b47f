//! Order events - immutable facts appended to the event trail

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event type recorded when an order is created
pub const EVENT_CREATED: &str = "CREATED";

/// Event type recorded when a refund is granted
pub const EVENT_REFUND_PROCESSED: &str = "REFUND_PROCESSED";

/// Order event - immutable audit record
///
/// `event_type` is a free-form tag: the new status name for status
/// transitions (`"paid"`, `"shipped"`, ...) or one of the markers above.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderEvent {
    /// `event_<orderId>_<sequence>_<unixSeconds>`
    pub id: String,
    pub order_id: String,
    pub event_type: String,
    /// SHA-256 fingerprint of the content the event describes
    pub payload_hash: String,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    #[serde(default)]
    pub metadata: String,
}
