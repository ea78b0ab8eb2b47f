//! Function-name invocation surface
//!
//! Calls arrive as `{"function": "<Name>", "args": ["...", ...]}` with
//! string arguments; structured inputs (new orders, products, traces,
//! refund terms) are passed as one JSON-encoded argument. Every call
//! produces one [`ApiResponse`].

use crate::core::LedgerContext;
use crate::orders::{OrdersManager, parse_status};
use crate::products::ProductsManager;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
use shared::order::RefundTerms;

/// One invocation request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Invocation {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<S: Into<String>>(function: impl Into<String>, args: impl IntoIterator<Item = S>) -> Self {
        Self {
            function: function.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

/// Both managers behind a single dispatch entry point
#[derive(Debug, Clone)]
pub struct LedgerNode {
    orders: OrdersManager,
    products: ProductsManager,
}

impl LedgerNode {
    pub fn new(ctx: LedgerContext, refund_terms: RefundTerms) -> Self {
        Self {
            orders: OrdersManager::new(ctx.clone(), refund_terms),
            products: ProductsManager::new(ctx),
        }
    }

    pub fn orders(&self) -> &OrdersManager {
        &self.orders
    }

    pub fn products(&self) -> &ProductsManager {
        &self.products
    }

    /// Dispatch and wrap the outcome in a response envelope
    pub fn invoke(&self, invocation: &Invocation) -> ApiResponse<Value> {
        match self.dispatch(&invocation.function, &invocation.args) {
            Ok(data) => ApiResponse::success(data),
            Err(err) => {
                tracing::debug!(function = %invocation.function, code = ?err.code, error = %err, "Invocation failed");
                err.into()
            }
        }
    }

    fn dispatch(&self, function: &str, args: &[String]) -> AppResult<Value> {
        match function {
            // ==================== Orders ====================
            "CreateOrder" => {
                let [input] = expect_args(args)?;
                to_value(self.orders.create_order(parse_json(input, "order")?)?)
            }
            "GetOrder" => {
                let [order_id] = expect_args(args)?;
                to_value(self.orders.get_order(order_id)?)
            }
            "UpdateOrderStatus" => {
                let [order_id, status, description] = expect_args(args)?;
                let status = parse_status(status)?;
                to_value(self.orders.update_order_status(order_id, status, description)?)
            }
            "ProcessRefund" => {
                let [order_id, reason] = expect_args(args)?;
                to_value(self.orders.process_refund(order_id, reason)?)
            }
            "GetOrderEvents" => {
                let [order_id] = expect_args(args)?;
                to_value(self.orders.get_order_events(order_id)?)
            }
            "GetOrdersByUser" => match args {
                [user_id] => to_value(self.orders.get_orders_by_user(user_id)?),
                [user_id, status] => {
                    let status = parse_status(status)?;
                    to_value(self.orders.get_orders_by_user_and_status(user_id, status)?)
                }
                _ => Err(arg_count_error(1, args.len())),
            },
            "GetRefundPolicy" => {
                let [order_id] = expect_args(args)?;
                to_value(self.orders.get_refund_policy(order_id)?)
            }
            "UpdateRefundPolicy" => {
                let [order_id, terms] = expect_args(args)?;
                to_value(
                    self.orders
                        .update_refund_policy(order_id, parse_json(terms, "refund terms")?)?,
                )
            }
            "QuoteRefund" => {
                let [order_id] = expect_args(args)?;
                to_value(self.orders.quote_refund(order_id)?)
            }

            // ==================== Products ====================
            "CreateProduct" => {
                let [input] = expect_args(args)?;
                to_value(self.products.create_product(parse_json(input, "product")?)?)
            }
            "GetProduct" => {
                let [product_id] = expect_args(args)?;
                to_value(self.products.get_product(product_id)?)
            }
            "GetProductBySKU" => {
                let [sku] = expect_args(args)?;
                to_value(self.products.get_product_by_sku(sku)?)
            }
            "VerifyProduct" => {
                let [product_id] = expect_args(args)?;
                to_value(self.products.verify_product(product_id)?)
            }
            "CreateTrace" => {
                let [input] = expect_args(args)?;
                to_value(self.products.create_trace(parse_json(input, "trace")?)?)
            }
            "GetTrace" => {
                let [trace_id] = expect_args(args)?;
                to_value(self.products.get_trace(trace_id)?)
            }
            "GetTracesByProduct" => match args {
                [product_id] => to_value(self.products.get_traces_by_product(product_id)?),
                [product_id, stage] => {
                    to_value(self.products.get_traces_by_product_and_stage(product_id, stage)?)
                }
                _ => Err(arg_count_error(1, args.len())),
            },
            "VerifyTrace" => {
                let [trace_id, method] = expect_args(args)?;
                to_value(self.products.verify_trace(trace_id, method)?)
            }

            _ => Err(AppError::invalid_request(format!(
                "Invalid function name: {function}"
            ))),
        }
    }
}

fn expect_args<const N: usize>(args: &[String]) -> AppResult<[&str; N]> {
    if args.len() != N {
        return Err(arg_count_error(N, args.len()));
    }
    Ok(std::array::from_fn(|i| args[i].as_str()))
}

fn arg_count_error(expected: usize, got: usize) -> AppError {
    AppError::invalid_request(format!(
        "Incorrect number of arguments. Expecting {expected}, got {got}"
    ))
}

fn parse_json<T: DeserializeOwned>(raw: &str, what: &str) -> AppResult<T> {
    serde_json::from_str(raw).map_err(|e| {
        AppError::with_message(ErrorCode::InvalidFormat, format!("Failed to parse {what} JSON: {e}"))
    })
}

fn to_value<T: Serialize>(value: T) -> AppResult<Value> {
    serde_json::to_value(value).map_err(|e| AppError::internal(format!("Failed to encode response: {e}")))
}
