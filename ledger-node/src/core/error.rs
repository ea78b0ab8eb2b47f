use crate::ledger::LedgerError;
use chrono::{DateTime, Utc};
use shared::error::{AppError, ErrorCode};
use shared::order::OrderStatus;
use thiserror::Error;

/// Errors of contract operations (orders, refunds, products, traces)
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} already exists for {key}: {existing}")]
    AlreadyExists {
        kind: &'static str,
        key: String,
        existing: String,
    },

    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("order is {status}: {reason}")]
    InvalidState { status: OrderStatus, reason: String },

    #[error("refund window has expired (deadline {deadline})")]
    WindowExpired { deadline: DateTime<Utc> },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

pub type ContractResult<T> = Result<T, ContractError>;

impl ContractError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Stable error code for callers
    pub fn code(&self) -> ErrorCode {
        match self {
            ContractError::Validation(_) => ErrorCode::ValidationFailed,
            ContractError::NotFound { kind, .. } => match *kind {
                "order" => ErrorCode::OrderNotFound,
                "refund" => ErrorCode::RefundPolicyNotFound,
                "product" => ErrorCode::ProductNotFound,
                "trace" => ErrorCode::TraceNotFound,
                _ => ErrorCode::NotFound,
            },
            ContractError::AlreadyExists { kind, .. } => match *kind {
                "product" => ErrorCode::ProductAlreadyExists,
                _ => ErrorCode::ValidationFailed,
            },
            ContractError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
            ContractError::InvalidState { .. } => ErrorCode::InvalidOrderState,
            ContractError::WindowExpired { .. } => ErrorCode::RefundWindowExpired,
            ContractError::Ledger(e) => classify_ledger_error(e),
        }
    }
}

fn classify_ledger_error(e: &LedgerError) -> ErrorCode {
    match e {
        // a key part only reaches the ledger unchecked if validation missed it
        LedgerError::InvalidKeyPart(_) => ErrorCode::ValidationFailed,
        LedgerError::Serialization(_) => ErrorCode::InternalError,
        _ => ErrorCode::StorageError,
    }
}

impl From<ContractError> for AppError {
    fn from(err: ContractError) -> Self {
        let code = err.code();
        let message = err.to_string();
        match err {
            ContractError::Ledger(LedgerError::InvalidKeyPart(_)) => AppError::with_message(code, message),
            ContractError::Ledger(e) => {
                // storage internals stay in the log
                tracing::error!(error = %e, error_code = ?code, "Ledger error occurred");
                AppError::with_message(code, code.message())
            }
            ContractError::NotFound { kind, id } => AppError::with_message(code, message)
                .with_detail("kind", kind)
                .with_detail("id", id),
            ContractError::AlreadyExists { kind, key, existing } => AppError::with_message(code, message)
                .with_detail("kind", kind)
                .with_detail("key", key)
                .with_detail("existing", existing),
            ContractError::InvalidTransition { from, to } => AppError::with_message(code, message)
                .with_detail("from", from.as_str())
                .with_detail("to", to.as_str()),
            ContractError::InvalidState { status, .. } => {
                AppError::with_message(code, message).with_detail("status", status.as_str())
            }
            ContractError::WindowExpired { deadline } => AppError::with_message(code, message)
                .with_detail("deadline", deadline.to_rfc3339()),
            ContractError::Validation(_) => AppError::with_message(code, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::util::from_unix;

    #[test]
    fn test_codes() {
        assert_eq!(
            ContractError::not_found("order", "o1").code(),
            ErrorCode::OrderNotFound
        );
        assert_eq!(
            ContractError::not_found("event", "e1").code(),
            ErrorCode::NotFound
        );
        assert_eq!(
            ContractError::validation("x").code(),
            ErrorCode::ValidationFailed
        );
        assert_eq!(
            ContractError::from(LedgerError::InvalidKeyPart("a\\0b".into())).code(),
            ErrorCode::ValidationFailed
        );
    }

    #[test]
    fn test_already_exists_details() {
        let err = ContractError::AlreadyExists {
            kind: "product",
            key: "SKU-1".into(),
            existing: "product_SKU-1_1".into(),
        };
        assert_eq!(err.to_string(), "product already exists for SKU-1: product_SKU-1_1");

        let err: AppError = err.into();
        assert_eq!(err.code, ErrorCode::ProductAlreadyExists);
        let details = err.details.unwrap();
        assert_eq!(details["key"], "SKU-1");
        assert_eq!(details["existing"], "product_SKU-1_1");
    }

    #[test]
    fn test_ledger_error_message_is_generic() {
        let cause = serde_json::from_str::<u8>("not json").unwrap_err();
        let err: AppError = ContractError::from(LedgerError::Serialization(cause)).into();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(err.message, "Internal server error");

        let err: AppError = ContractError::from(LedgerError::InvalidKeyPart("u\\0".into())).into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.message.contains("Invalid composite key part"));
    }

    #[test]
    fn test_not_found_message() {
        let err = ContractError::not_found("order", "order_A1_1");
        assert_eq!(err.to_string(), "order not found: order_A1_1");
    }

    #[test]
    fn test_app_error_details() {
        let err: AppError = ContractError::InvalidTransition {
            from: OrderStatus::Shipped,
            to: OrderStatus::Paid,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InvalidTransition);
        assert_eq!(err.message, "invalid status transition from shipped to paid");
        let details = err.details.unwrap();
        assert_eq!(details["from"], "shipped");
        assert_eq!(details["to"], "paid");

        let err: AppError = ContractError::WindowExpired {
            deadline: from_unix(0),
        }
        .into();
        assert_eq!(err.code, ErrorCode::RefundWindowExpired);
        assert!(err.details.unwrap().contains_key("deadline"));
    }
}
