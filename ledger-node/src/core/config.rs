use rust_decimal::Decimal;
use shared::order::RefundTerms;
use std::path::PathBuf;

/// Ledger node configuration
///
/// # Environment variables
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | WORK_DIR | /var/lib/ledger-node | Working directory (ledger file, logs) |
/// | LEDGER_FILE | ledger.redb | Ledger database file, relative to WORK_DIR |
/// | LOG_LEVEL | info | Log level |
/// | LOG_DIR | (unset) | Daily rolling log directory; stdout only when unset |
/// | NOTIFY_CHANNEL_CAPACITY | 1024 | Notification broadcast buffer per subscriber |
/// | REFUND_WINDOW_DAYS | 90 | Refund window for new orders |
/// | REFUND_PERCENTAGE | 100 | Refunded share of the amount for new orders |
/// | ENVIRONMENT | development | Runtime environment |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/data/ledger REFUND_WINDOW_DAYS=30 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory
    pub work_dir: String,
    /// Ledger database file name
    pub ledger_file: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// Broadcast buffer size (lagging subscribers lose the oldest entries)
    pub notify_channel_capacity: usize,
    /// Refund terms attached to every new order
    pub refund_terms: RefundTerms,
    /// development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from the environment
    ///
    /// Unset or unparsable variables fall back to their defaults.
    pub fn from_env() -> Self {
        let defaults = RefundTerms::default();
        let refund_terms = RefundTerms {
            window_days: std::env::var("REFUND_WINDOW_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.window_days),
            percentage: std::env::var("REFUND_PERCENTAGE")
                .ok()
                .and_then(|v| v.parse::<Decimal>().ok())
                .filter(|p| *p >= Decimal::ZERO && *p <= Decimal::ONE_HUNDRED)
                .unwrap_or(defaults.percentage),
            ..defaults
        };

        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/ledger-node".into()),
            ledger_file: std::env::var("LEDGER_FILE").unwrap_or_else(|_| "ledger.redb".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            notify_channel_capacity: std::env::var("NOTIFY_CHANNEL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|c| *c > 0)
                .unwrap_or(1024),
            refund_terms,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Override the working directory (tests)
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    /// Full path of the ledger database
    pub fn ledger_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(&self.ledger_file)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
