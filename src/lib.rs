//! Read-only HTTP views over the directory published by the collector.
//!
//! Each request fetches the collector document, narrows it with the caller's
//! filter expression, keeps the entries that normalize, applies the `valid`
//! selection and renders one of the projections in [`projection`].

pub mod collector;
pub mod config;
pub mod directory;
pub mod filter;
pub mod projection;
pub mod query;
pub mod routes;
pub mod telemetry;
pub mod types;
