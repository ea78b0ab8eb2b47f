//! Order lifecycle guard
//!
//! ```text
//! pending ──► paid ──► shipped ──► delivered ──► refunded
//!    │          │         │
//!    └──────────┴─────────┴──► cancelled
//! ```
//!
//! `cancelled` and `refunded` are terminal. Self-loops and skips are
//! rejected.

use crate::core::{ContractError, ContractResult};
use shared::order::OrderStatus;
use std::collections::{HashMap, HashSet};

/// Legal status transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    edges: HashMap<OrderStatus, HashSet<OrderStatus>>,
}

impl TransitionTable {
    /// Table with exactly the given edges
    pub fn from_edges(edges: impl IntoIterator<Item = (OrderStatus, OrderStatus)>) -> Self {
        let mut table: HashMap<OrderStatus, HashSet<OrderStatus>> = HashMap::new();
        for (from, to) in edges {
            table.entry(from).or_default().insert(to);
        }
        Self { edges: table }
    }

    pub fn allows(&self, from: OrderStatus, to: OrderStatus) -> bool {
        self.edges.get(&from).is_some_and(|targets| targets.contains(&to))
    }

    /// Statuses reachable from `from` in one step
    pub fn targets(&self, from: OrderStatus) -> Vec<OrderStatus> {
        OrderStatus::ALL
            .into_iter()
            .filter(|to| self.allows(from, *to))
            .collect()
    }

    /// No outgoing edges
    pub fn is_terminal(&self, status: OrderStatus) -> bool {
        self.edges.get(&status).is_none_or(HashSet::is_empty)
    }

    pub fn check(&self, from: OrderStatus, to: OrderStatus) -> ContractResult<()> {
        if self.allows(from, to) {
            Ok(())
        } else {
            Err(ContractError::InvalidTransition { from, to })
        }
    }
}

/// Parse a caller-supplied status name (case-sensitive)
pub fn parse_status(value: &str) -> ContractResult<OrderStatus> {
    value
        .parse()
        .map_err(|e: shared::order::UnknownStatus| ContractError::validation(e.to_string()))
}

impl Default for TransitionTable {
    fn default() -> Self {
        use OrderStatus::*;
        Self::from_edges([
            (Pending, Paid),
            (Pending, Cancelled),
            (Paid, Shipped),
            (Paid, Cancelled),
            (Shipped, Delivered),
            (Shipped, Cancelled),
            (Delivered, Refunded),
        ])
    }
}
