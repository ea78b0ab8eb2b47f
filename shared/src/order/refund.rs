//! Refund policy attached to every order

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Default refund window (days after actual delivery)
pub const DEFAULT_REFUND_WINDOW_DAYS: u32 = 90;

/// Default refunded share of the order amount (percent)
pub const DEFAULT_REFUND_PERCENTAGE: Decimal = Decimal::ONE_HUNDRED;

/// Default policy condition text
pub const DEFAULT_REFUND_CONDITIONS: &str = "Product must be unopened and in original condition";

/// Refund policy record, one per order (`refund_<orderId>`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RefundPolicy {
    pub id: String,
    pub order_id: String,
    /// Days after actual delivery during which a refund is honored
    pub refund_window: u32,
    /// 0-100
    pub refund_percentage: Decimal,
    pub conditions: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RefundPolicy {
    /// Canonical policy ID for an order
    pub fn id_for(order_id: &str) -> String {
        format!("refund_{}", order_id)
    }

    /// Create the policy for a freshly created order
    pub fn for_order(order_id: &str, terms: &RefundTerms, now: DateTime<Utc>) -> Self {
        Self {
            id: Self::id_for(order_id),
            order_id: order_id.to_string(),
            refund_window: terms.window_days,
            refund_percentage: terms.percentage,
            conditions: terms.conditions.clone(),
            is_active: terms.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Current terms of this policy
    pub fn terms(&self) -> RefundTerms {
        RefundTerms {
            window_days: self.refund_window,
            percentage: self.refund_percentage,
            conditions: self.conditions.clone(),
            is_active: self.is_active,
        }
    }
}

/// Refund terms applied to new orders (and used to update a policy)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RefundTerms {
    pub window_days: u32,
    pub percentage: Decimal,
    pub conditions: String,
    pub is_active: bool,
}

impl Default for RefundTerms {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_REFUND_WINDOW_DAYS,
            percentage: DEFAULT_REFUND_PERCENTAGE,
            conditions: DEFAULT_REFUND_CONDITIONS.to_string(),
            is_active: true,
        }
    }
}
