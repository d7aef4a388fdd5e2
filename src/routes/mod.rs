//! HTTP route modules for the insight dashboard service.
//!
//! - `dashboard`: combined per-user dashboard view
//! - `metrics`: ingestion of products, sales and generic metrics
//! - `products`: product listing with derived financials
//! - `sales`: sale listing with revenue totals
//! - `health`: liveness and store state

pub mod dashboard;
pub mod health;
pub mod metrics;
pub mod products;
pub mod sales;
