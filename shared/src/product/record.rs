use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product as stored on the ledger (canonical key `id`, index `product(sku, id)`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Generated ID: `product_<sku>_<unixSeconds>`
    pub id: String,
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub manufacturer_id: String,
    #[serde(default)]
    pub manufacturer_name: String,

    // === Identification codes ===
    #[serde(default)]
    pub qr_code: String,
    #[serde(default)]
    pub barcode: String,
    #[serde(default)]
    pub batch_number: String,
    #[serde(default)]
    pub serial_number: String,

    // === Commercial ===
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub currency: String,

    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub subcategory: String,
    #[serde(default)]
    pub specifications: String,
    #[serde(default)]
    pub ingredients: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,

    pub is_active: bool,
    /// Flips once from false to true via verification
    pub is_verified: bool,
    #[serde(default)]
    pub metadata: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Build an active, unverified product from caller input
    pub fn from_input(id: String, input: NewProduct, now: DateTime<Utc>) -> Self {
        Self {
            id,
            sku: input.sku,
            name: input.name,
            description: input.description,
            manufacturer_id: input.manufacturer_id,
            manufacturer_name: input.manufacturer_name,
            qr_code: input.qr_code,
            barcode: input.barcode,
            batch_number: input.batch_number,
            serial_number: input.serial_number,
            price: input.price,
            currency: input.currency,
            category: input.category,
            subcategory: input.subcategory,
            specifications: input.specifications,
            ingredients: input.ingredients,
            expiry_date: input.expiry_date,
            is_active: true,
            is_verified: false,
            metadata: input.metadata,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Caller-supplied fields for product creation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub description: String,
    pub manufacturer_id: String,
    pub manufacturer_name: String,
    pub qr_code: String,
    pub barcode: String,
    pub batch_number: String,
    pub serial_number: String,
    pub price: Decimal,
    pub currency: String,
    pub category: String,
    pub subcategory: String,
    pub specifications: String,
    pub ingredients: String,
    pub expiry_date: Option<DateTime<Utc>>,
    pub metadata: String,
}

impl NewProduct {
    /// Minimal input: SKU, name and manufacturer
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        manufacturer_id: impl Into<String>,
    ) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
            manufacturer_id: manufacturer_id.into(),
            ..Default::default()
        }
    }
}
