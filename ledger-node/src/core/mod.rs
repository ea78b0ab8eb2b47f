//! Core module - configuration, clock, execution context and errors
//!
//! - [`Config`] - node configuration
//! - [`LedgerContext`] - storage + notification bus + clock shared by the managers
//! - [`ContractError`] - contract operation errors

pub mod clock;
pub mod config;
pub mod context;
pub mod error;
pub mod lookup;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use context::LedgerContext;
pub use error::{ContractError, ContractResult};
pub use lookup::require_record;
