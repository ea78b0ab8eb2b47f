//! Products - product registry and traceability records

pub mod contract;
pub mod manager;

pub use manager::ProductsManager;
