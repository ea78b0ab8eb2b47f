//! Orders - lifecycle, refunds and the event trail
//!
//! - **lifecycle**: transition table guarding status changes
//! - **refund**: refund eligibility and amount
//! - **events**: append-only order event trail
//! - **contract**: order operations inside one ledger transaction
//! - **manager**: [`OrdersManager`], transaction + broadcast around the operations

pub mod contract;
pub mod events;
pub mod lifecycle;
pub mod manager;
pub mod refund;

pub use contract::RefundReceipt;
pub use lifecycle::{TransitionTable, parse_status};
pub use manager::OrdersManager;
pub use refund::RefundQuote;
