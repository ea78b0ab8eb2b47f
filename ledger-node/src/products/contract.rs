//! Product and trace contract operations

use crate::core::{ContractError, ContractResult, require_record};
use crate::ledger::ids::{generate_id, sequenced_id};
use crate::ledger::records::{emit_notification, put_record, query_index};
use crate::ledger::{LedgerRecord, RecordIter, StateReader, StateStore};
use crate::utils::validation::{
    MAX_HASH_LEN, MAX_KEY_LEN, MAX_NOTE_LEN, validate_amount_limit, validate_key_part,
    validate_optional_text, validate_required_text,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use shared::message::Notification;
use shared::product::{NewProduct, NewTrace, Product, TraceRecord};

const PRODUCT_INDEX: &str = "product";
const TRACE_INDEX: &str = "trace";

// ==================== Products ====================

pub fn create_product(
    store: &mut impl StateStore,
    input: NewProduct,
    now: DateTime<Utc>,
) -> ContractResult<Product> {
    validate_key_part(&input.sku, "sku")?;
    validate_required_text(&input.name, "name", MAX_NOTE_LEN)?;
    validate_required_text(&input.manufacturer_id, "manufacturerId", MAX_KEY_LEN)?;
    if input.price < Decimal::ZERO {
        return Err(ContractError::validation(format!(
            "price must not be negative, got {}",
            input.price
        )));
    }
    validate_amount_limit(input.price, "price")?;

    // a SKU resolves to at most one product
    let mut registered: RecordIter<Product> =
        query_index(store, PRODUCT_INDEX, &[input.sku.as_str()])?;
    if let Some(existing) = registered.next() {
        return Err(ContractError::AlreadyExists {
            kind: Product::KIND,
            key: input.sku,
            existing: existing?.id,
        });
    }

    let id = generate_id(store, Product::KIND, &input.sku, now)?;
    let product = Product::from_input(id, input, now);
    put_record(store, &product)?;

    emit_notification(
        store,
        &Notification::ProductCreated {
            product_id: product.id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            timestamp: now,
        },
    )?;

    Ok(product)
}

pub fn get_product(store: &impl StateReader, product_id: &str) -> ContractResult<Product> {
    require_record(store, product_id)
}

/// First product registered under `sku`
pub fn product_by_sku(store: &impl StateReader, sku: &str) -> ContractResult<Product> {
    let mut iter: RecordIter<Product> = query_index(store, PRODUCT_INDEX, &[sku])?;
    match iter.next() {
        Some(product) => Ok(product?),
        None => Err(ContractError::not_found(Product::KIND, sku)),
    }
}

/// Mark a product verified (repeat calls only bump `updated_at`)
pub fn verify_product(
    store: &mut impl StateStore,
    product_id: &str,
    now: DateTime<Utc>,
) -> ContractResult<Product> {
    let mut product: Product = require_record(store, product_id)?;
    product.is_verified = true;
    product.updated_at = now;
    put_record(store, &product)?;

    emit_notification(
        store,
        &Notification::ProductVerified {
            product_id: product.id.clone(),
            sku: product.sku.clone(),
            timestamp: now,
        },
    )?;

    Ok(product)
}

// ==================== Traces ====================

pub fn create_trace(
    store: &mut impl StateStore,
    input: NewTrace,
    now: DateTime<Utc>,
) -> ContractResult<TraceRecord> {
    validate_key_part(&input.product_id, "productId")?;
    validate_key_part(&input.stage, "stage")?;
    validate_required_text(&input.document_hash, "documentHash", MAX_HASH_LEN)?;
    validate_required_text(&input.issuer, "issuer", MAX_KEY_LEN)?;

    let id = sequenced_id(store, TraceRecord::KIND, &input.product_id, now)?;
    let trace = TraceRecord::from_input(id, input, now);
    put_record(store, &trace)?;

    emit_notification(
        store,
        &Notification::TraceCreated {
            trace_id: trace.id.clone(),
            product_id: trace.product_id.clone(),
            stage: trace.stage.clone(),
            issuer: trace.issuer.clone(),
            timestamp: now,
        },
    )?;

    Ok(trace)
}

pub fn get_trace(store: &impl StateReader, trace_id: &str) -> ContractResult<TraceRecord> {
    require_record(store, trace_id)
}

/// Traces of a product in creation order within each stage
pub fn traces_by_product(
    store: &impl StateReader,
    product_id: &str,
    stage: Option<&str>,
) -> ContractResult<RecordIter<TraceRecord>> {
    let iter = match stage {
        Some(stage) => query_index(store, TRACE_INDEX, &[product_id, stage])?,
        None => query_index(store, TRACE_INDEX, &[product_id])?,
    };
    Ok(iter)
}

pub fn verify_trace(
    store: &mut impl StateStore,
    trace_id: &str,
    verification_method: &str,
    now: DateTime<Utc>,
) -> ContractResult<TraceRecord> {
    validate_optional_text(verification_method, "verificationMethod", MAX_NOTE_LEN)?;

    let mut trace: TraceRecord = require_record(store, trace_id)?;
    trace.is_verified = true;
    trace.verification_method = verification_method.to_string();
    put_record(store, &trace)?;

    emit_notification(
        store,
        &Notification::TraceVerified {
            trace_id: trace.id.clone(),
            product_id: trace.product_id.clone(),
            verification_method: trace.verification_method.clone(),
            timestamp: now,
        },
    )?;

    Ok(trace)
}
