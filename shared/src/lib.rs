//! Shared types for the ledger node
//!
//! Wire/domain records stored on the ledger, notification payloads,
//! error codes and small utilities used by every crate in the workspace.

pub mod error;
pub mod message;
pub mod order;
pub mod product;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, ErrorCode};
pub use message::{ChainNotification, Notification};
