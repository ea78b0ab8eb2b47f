//! OrdersManager - order operations on the shared ledger context
//!
//! # Operation Flow
//!
//! ```text
//! update_order_status(id, status, description)
//!     ├─ 1. Begin write transaction
//!     ├─ 2. Load canonical order (NotFound)
//!     ├─ 3. Lifecycle guard (InvalidTransition)
//!     ├─ 4. Write canonical record + index copy, drop stale index key
//!     ├─ 5. Append event
//!     ├─ 6. Queue OrderStatusUpdated
//!     ├─ 7. Commit
//!     └─ 8. Broadcast
//! ```

use super::contract::{self, RefundReceipt};
use super::events::order_events;
use super::lifecycle::TransitionTable;
use super::refund::{RefundQuote, evaluate};
use crate::core::{ContractError, ContractResult, LedgerContext};
use shared::order::{NewOrder, Order, OrderEvent, OrderStatus, RefundPolicy, RefundTerms};

/// Order operations: creation, lifecycle, refunds and queries
#[derive(Debug, Clone)]
pub struct OrdersManager {
    ctx: LedgerContext,
    transitions: TransitionTable,
    /// Terms attached to every new order
    refund_terms: RefundTerms,
}

impl OrdersManager {
    pub fn new(ctx: LedgerContext, refund_terms: RefundTerms) -> Self {
        Self {
            ctx,
            transitions: TransitionTable::default(),
            refund_terms,
        }
    }

    /// Replace the lifecycle transition table
    pub fn with_transitions(mut self, transitions: TransitionTable) -> Self {
        self.transitions = transitions;
        self
    }

    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    pub fn context(&self) -> &LedgerContext {
        &self.ctx
    }

    // ==================== Mutations ====================

    pub fn create_order(&self, input: NewOrder) -> ContractResult<Order> {
        let order = self
            .ctx
            .execute(|txn, now| contract::create_order(txn, input, &self.refund_terms, now))?;
        tracing::info!(
            order_id = %order.id,
            order_number = %order.order_number,
            user_id = %order.user_id,
            amount = %order.amount,
            "Order created"
        );
        Ok(order)
    }

    pub fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
        description: &str,
    ) -> ContractResult<Order> {
        let result = self.ctx.execute(|txn, now| {
            contract::update_order_status(txn, &self.transitions, order_id, status, description, now)
        });
        match &result {
            Ok(order) => {
                tracing::info!(order_id = %order_id, status = %order.status, "Order status updated");
            }
            Err(ContractError::InvalidTransition { from, to }) => {
                tracing::warn!(order_id = %order_id, from = %from, to = %to, "Status transition rejected");
            }
            Err(e) => {
                tracing::debug!(order_id = %order_id, error = %e, "Status update failed");
            }
        }
        result
    }

    pub fn process_refund(&self, order_id: &str, reason: &str) -> ContractResult<RefundReceipt> {
        let result = self
            .ctx
            .execute(|txn, now| contract::process_refund(txn, &self.transitions, order_id, reason, now));
        match &result {
            Ok(receipt) => {
                tracing::info!(
                    order_id = %order_id,
                    refund_amount = %receipt.refund_amount,
                    refund_hash = %receipt.refund_hash,
                    "Refund processed"
                );
            }
            Err(e @ (ContractError::WindowExpired { .. } | ContractError::InvalidState { .. })) => {
                tracing::warn!(order_id = %order_id, error = %e, "Refund rejected");
            }
            Err(e) => {
                tracing::debug!(order_id = %order_id, error = %e, "Refund failed");
            }
        }
        result
    }

    pub fn update_refund_policy(&self, order_id: &str, terms: RefundTerms) -> ContractResult<RefundPolicy> {
        let policy = self
            .ctx
            .execute(|txn, now| contract::update_refund_policy(txn, order_id, &terms, now))?;
        tracing::info!(
            order_id = %order_id,
            refund_window = policy.refund_window,
            refund_percentage = %policy.refund_percentage,
            is_active = policy.is_active,
            "Refund policy updated"
        );
        Ok(policy)
    }

    // ==================== Queries ====================

    pub fn get_order(&self, order_id: &str) -> ContractResult<Order> {
        tracing::debug!(order_id = %order_id, "Get order");
        self.ctx.read(|snap| contract::get_order(snap, order_id))
    }

    /// All orders of a user, ordered by status then ID
    pub fn get_orders_by_user(&self, user_id: &str) -> ContractResult<Vec<Order>> {
        self.ctx.read(|snap| {
            Ok(contract::orders_by_user(snap, user_id, None)?.collect::<Result<_, _>>()?)
        })
    }

    pub fn get_orders_by_user_and_status(
        &self,
        user_id: &str,
        status: OrderStatus,
    ) -> ContractResult<Vec<Order>> {
        self.ctx.read(|snap| {
            Ok(contract::orders_by_user(snap, user_id, Some(status))?.collect::<Result<_, _>>()?)
        })
    }

    /// Event trail of an order in append order
    pub fn get_order_events(&self, order_id: &str) -> ContractResult<Vec<OrderEvent>> {
        self.ctx
            .read(|snap| Ok(order_events(snap, order_id)?.collect::<Result<_, _>>()?))
    }

    pub fn get_refund_policy(&self, order_id: &str) -> ContractResult<RefundPolicy> {
        self.ctx.read(|snap| contract::get_refund_policy(snap, order_id))
    }

    /// Evaluate refund eligibility now without changing anything
    pub fn quote_refund(&self, order_id: &str) -> ContractResult<RefundQuote> {
        let now = self.ctx.now();
        self.ctx.read(|snap| {
            let order = contract::get_order(snap, order_id)?;
            let policy = contract::get_refund_policy(snap, order_id)?;
            evaluate(&order, &policy, now)
        })
    }
}

#[cfg(test)]
mod tests;
