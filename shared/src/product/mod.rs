//! Product and traceability records

pub mod record;
pub mod trace;

pub use record::{NewProduct, Product};
pub use trace::{NewTrace, TraceRecord};
