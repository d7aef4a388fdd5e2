//! Derivation logic from raw records to dashboard views.
//!
//! - `ingest`: validates and routes incoming entries to a collection
//! - `aggregation`: summary counters and top-category ranking
//! - `insights`: normalizes ai_insight records into insights
//! - `recommendations`: timeframe bucketing of recommendations
//! - `financials`: profit margin, inventory valuation, stock status
//! - `dashboard`: combines the above into one response
//!
//! Everything here except `ingest::ingest` is pure and does no I/O.

pub mod aggregation;
pub mod dashboard;
pub mod financials;
pub mod ingest;
pub mod insights;
pub mod recommendations;
