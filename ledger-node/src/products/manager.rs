//! ProductsManager - product registry and supply-chain traces

use super::contract;
use crate::core::{ContractResult, LedgerContext};
use shared::product::{NewProduct, NewTrace, Product, TraceRecord};

#[derive(Debug, Clone)]
pub struct ProductsManager {
    ctx: LedgerContext,
}

impl ProductsManager {
    pub fn new(ctx: LedgerContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &LedgerContext {
        &self.ctx
    }

    pub fn create_product(&self, input: NewProduct) -> ContractResult<Product> {
        let product = self
            .ctx
            .execute(|txn, now| contract::create_product(txn, input, now))?;
        tracing::info!(product_id = %product.id, sku = %product.sku, "Product created");
        Ok(product)
    }

    pub fn get_product(&self, product_id: &str) -> ContractResult<Product> {
        tracing::debug!(product_id = %product_id, "Get product");
        self.ctx.read(|snap| contract::get_product(snap, product_id))
    }

    pub fn get_product_by_sku(&self, sku: &str) -> ContractResult<Product> {
        tracing::debug!(sku = %sku, "Get product by SKU");
        self.ctx.read(|snap| contract::product_by_sku(snap, sku))
    }

    pub fn verify_product(&self, product_id: &str) -> ContractResult<Product> {
        let product = self
            .ctx
            .execute(|txn, now| contract::verify_product(txn, product_id, now))?;
        tracing::info!(product_id = %product.id, "Product verified");
        Ok(product)
    }

    pub fn create_trace(&self, input: NewTrace) -> ContractResult<TraceRecord> {
        let trace = self
            .ctx
            .execute(|txn, now| contract::create_trace(txn, input, now))?;
        tracing::info!(
            trace_id = %trace.id,
            product_id = %trace.product_id,
            stage = %trace.stage,
            "Trace created"
        );
        Ok(trace)
    }

    pub fn get_trace(&self, trace_id: &str) -> ContractResult<TraceRecord> {
        self.ctx.read(|snap| contract::get_trace(snap, trace_id))
    }

    pub fn get_traces_by_product(&self, product_id: &str) -> ContractResult<Vec<TraceRecord>> {
        self.ctx.read(|snap| {
            Ok(contract::traces_by_product(snap, product_id, None)?.collect::<Result<_, _>>()?)
        })
    }

    pub fn get_traces_by_product_and_stage(
        &self,
        product_id: &str,
        stage: &str,
    ) -> ContractResult<Vec<TraceRecord>> {
        self.ctx.read(|snap| {
            Ok(contract::traces_by_product(snap, product_id, Some(stage))?
                .collect::<Result<_, _>>()?)
        })
    }

    pub fn verify_trace(&self, trace_id: &str, verification_method: &str) -> ContractResult<TraceRecord> {
        let trace = self
            .ctx
            .execute(|txn, now| contract::verify_trace(txn, trace_id, verification_method, now))?;
        tracing::info!(trace_id = %trace.id, method = %verification_method, "Trace verified");
        Ok(trace)
    }
}
