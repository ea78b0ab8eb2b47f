//! Ledger Node - order lifecycle and product traceability on a key-value ledger
//!
//! # Architecture
//!
//! - **Ledger** (`ledger`): redb world state, composite-key indexes, record IDs
//! - **Core** (`core`): configuration, clock, contract errors, transaction context
//! - **Orders** (`orders`): status machine, refund policies, event trail
//! - **Products** (`products`): product registry and supply-chain traces
//! - **Notifications** (`notify`): post-commit broadcast of ledger notifications
//! - **Invocation** (`invoke`): function-name dispatch returning [`ApiResponse`]
//!
//! # Module Layout
//!
//! ```text
//! ledger-node/src/
//! ├── core/          # config, clock, errors, execution context
//! ├── ledger/        # storage, composite keys, records, IDs
//! ├── orders/        # lifecycle, refunds, events, manager
//! ├── products/      # products, traces, manager
//! ├── utils/         # logging, validation
//! ├── notify.rs      # notification bus
//! └── invoke.rs      # invocation dispatcher
//! ```

pub mod core;
pub mod invoke;
pub mod ledger;
pub mod notify;
pub mod orders;
pub mod products;
pub mod utils;

pub use core::{Clock, Config, ContractError, ContractResult, LedgerContext, ManualClock, SystemClock};
pub use invoke::{Invocation, LedgerNode};
pub use ledger::{LedgerError, LedgerStorage};
pub use notify::NotificationBus;
pub use orders::{OrdersManager, TransitionTable};
pub use products::ProductsManager;

pub use shared::error::{ApiResponse, AppError, ErrorCode};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Prepare the working directory and install logging
pub fn setup_environment(config: &Config) -> anyhow::Result<()> {
    use anyhow::Context;

    std::fs::create_dir_all(&config.work_dir)
        .with_context(|| format!("failed to create work directory {}", config.work_dir))?;
    if let Some(dir) = &config.log_dir {
        std::fs::create_dir_all(dir).with_context(|| format!("failed to create log directory {dir}"))?;
    }

    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    Ok(())
}
