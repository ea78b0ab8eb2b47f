//! Input validation helpers
//!
//! Mandatory fields must be non-blank. Fields that become part of a record
//! ID or a composite key must not contain U+0000 (the key separator) or
//! U+10FFFF (reserved as the open end of range scans).

use crate::core::{ContractError, ContractResult};
use rust_decimal::Decimal;

// ── Text length limits ──────────────────────────────────────────────

/// Natural keys and identifiers: order number, SKU, user/product/issuer IDs, stage
pub const MAX_KEY_LEN: usize = 256;

/// Descriptions, reasons, conditions, verification methods
pub const MAX_NOTE_LEN: usize = 2000;

/// Document and certificate hashes
pub const MAX_HASH_LEN: usize = 512;

// ── Amount limits ───────────────────────────────────────────────────

/// Largest accepted order amount or product price
// 1_000_000_000_000 (Decimal::new is not const; this is the same value).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> ContractResult<()> {
    if value.trim().is_empty() {
        return Err(ContractError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(ContractError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate a required string that ends up in a record ID or composite key.
pub fn validate_key_part(value: &str, field: &str) -> ContractResult<()> {
    validate_required_text(value, field, MAX_KEY_LEN)?;
    if value.contains('\u{0}') || value.contains(char::MAX) {
        return Err(ContractError::validation(format!(
            "{field} contains a reserved character"
        )));
    }
    Ok(())
}

/// Validate that an optional note is within the length limit.
pub fn validate_optional_text(value: &str, field: &str, max_len: usize) -> ContractResult<()> {
    if value.len() > max_len {
        return Err(ContractError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate a strictly positive amount no larger than [`MAX_AMOUNT`].
pub fn validate_positive_amount(value: Decimal, field: &str) -> ContractResult<()> {
    if value <= Decimal::ZERO {
        return Err(ContractError::validation(format!(
            "{field} must be positive, got {value}"
        )));
    }
    validate_amount_limit(value, field)
}

/// Validate that an amount does not exceed [`MAX_AMOUNT`].
pub fn validate_amount_limit(value: Decimal, field: &str) -> ContractResult<()> {
    if value > MAX_AMOUNT {
        return Err(ContractError::validation(format!(
            "{field} exceeds maximum allowed ({MAX_AMOUNT}), got {value}"
        )));
    }
    Ok(())
}

/// Validate a percentage in [0, 100].
pub fn validate_percentage(value: Decimal, field: &str) -> ContractResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(ContractError::validation(format!(
            "{field} must be between 0 and 100, got {value}"
        )));
    }
    Ok(())
}
