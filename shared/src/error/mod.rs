//! Unified error system for the ledger node
//!
//! - [`ErrorCode`]: Standardized numeric error codes
//! - [`AppError`]: Error with code, message and details as seen by callers
//! - [`ApiResponse`]: Response envelope of the invocation surface
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 6xxx: Product / traceability errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{ApiResponse, AppError, ErrorCode};
//!
//! let err = AppError::with_message(ErrorCode::InvalidTransition, "shipped -> paid")
//!     .with_detail("from", "shipped")
//!     .with_detail("to", "paid");
//!
//! let response = ApiResponse::<()>::error(&err);
//! assert_eq!(response.code, Some(4002));
//! ```

mod codes;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
