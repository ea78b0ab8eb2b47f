//! Refund policy evaluation
//!
//! A delivered order is refundable until `actual_delivery + refund_window`
//! days (inclusive). The refunded amount is
//! `amount × refund_percentage / 100`, rounded to cents with midpoint away
//! from zero.

use crate::core::{ContractError, ContractResult};
use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use shared::order::{Order, OrderStatus, RefundPolicy};

/// Outcome of a successful evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefundQuote {
    pub eligible: bool,
    pub refund_amount: Decimal,
    pub deadline: DateTime<Utc>,
}

/// Last instant at which a refund is still honored
///
/// Measured from `actual_delivery`; an order without one is treated as
/// delivered at the epoch.
pub fn refund_deadline(order: &Order, policy: &RefundPolicy) -> DateTime<Utc> {
    let delivered_at = order.actual_delivery.unwrap_or(DateTime::UNIX_EPOCH);
    TimeDelta::try_days(i64::from(policy.refund_window))
        .and_then(|window| delivered_at.checked_add_signed(window))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Refund share of `amount`, rounded to 2 decimal places
///
/// Fails instead of overflowing when the product leaves the `Decimal` range.
pub fn refund_amount(amount: Decimal, percentage: Decimal) -> ContractResult<Decimal> {
    amount
        .checked_mul(percentage)
        .and_then(|share| share.checked_div(Decimal::ONE_HUNDRED))
        .map(|share| share.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .ok_or_else(|| {
            ContractError::validation(format!(
                "refund of {percentage}% of {amount} is out of range"
            ))
        })
}

/// Decide whether `order` can be refunded at `now` under `policy`
pub fn evaluate(order: &Order, policy: &RefundPolicy, now: DateTime<Utc>) -> ContractResult<RefundQuote> {
    if order.status != OrderStatus::Delivered {
        return Err(ContractError::InvalidState {
            status: order.status,
            reason: "only delivered orders can be refunded".to_string(),
        });
    }
    if !policy.is_active {
        return Err(ContractError::InvalidState {
            status: order.status,
            reason: "refund policy is not active".to_string(),
        });
    }

    let deadline = refund_deadline(order, policy);
    if now > deadline {
        return Err(ContractError::WindowExpired { deadline });
    }

    Ok(RefundQuote {
        eligible: true,
        refund_amount: refund_amount(order.amount, policy.refund_percentage)?,
        deadline,
    })
}
