use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Supply-chain trace record (canonical key `id`, index `trace(productId, stage, id)`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TraceRecord {
    /// Generated ID: `trace_<productId>_<sequence>_<unixSeconds>`
    pub id: String,
    pub product_id: String,
    /// Free-form supply-chain stage tag (`"harvest"`, `"packaging"`, ...)
    pub stage: String,
    pub document_hash: String,
    pub issuer: String,
    #[serde(default)]
    pub issuer_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub coordinates: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub temperature: f64,
    #[serde(default)]
    pub humidity: f64,
    #[serde(default)]
    pub metadata: String,
    #[serde(default)]
    pub certificate_url: String,
    #[serde(default)]
    pub certificate_hash: String,
    pub is_verified: bool,
    #[serde(default)]
    pub verification_method: String,
}

impl TraceRecord {
    /// Build an unverified trace stamped at `now`
    pub fn from_input(id: String, input: NewTrace, now: DateTime<Utc>) -> Self {
        Self {
            id,
            product_id: input.product_id,
            stage: input.stage,
            document_hash: input.document_hash,
            issuer: input.issuer,
            issuer_name: input.issuer_name,
            location: input.location,
            coordinates: input.coordinates,
            timestamp: now,
            temperature: input.temperature,
            humidity: input.humidity,
            metadata: input.metadata,
            certificate_url: input.certificate_url,
            certificate_hash: input.certificate_hash,
            is_verified: false,
            verification_method: String::new(),
        }
    }
}

/// Caller-supplied fields for trace creation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTrace {
    pub product_id: String,
    pub stage: String,
    pub document_hash: String,
    pub issuer: String,
    pub issuer_name: String,
    pub location: String,
    pub coordinates: String,
    pub temperature: f64,
    pub humidity: f64,
    pub metadata: String,
    pub certificate_url: String,
    pub certificate_hash: String,
}

impl NewTrace {
    /// Minimal input: the four mandatory fields
    pub fn new(
        product_id: impl Into<String>,
        stage: impl Into<String>,
        document_hash: impl Into<String>,
        issuer: impl Into<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            stage: stage.into(),
            document_hash: document_hash.into(),
            issuer: issuer.into(),
            ..Default::default()
        }
    }
}
