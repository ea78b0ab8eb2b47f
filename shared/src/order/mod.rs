//! Order records: canonical order, lifecycle status, event trail, refund policy

pub mod event;
pub mod record;
pub mod refund;
pub mod status;

pub use event::{EVENT_CREATED, EVENT_REFUND_PROCESSED, OrderEvent};
pub use record::{NewOrder, Order};
pub use refund::{RefundPolicy, RefundTerms};
pub use status::{OrderStatus, UnknownStatus};
