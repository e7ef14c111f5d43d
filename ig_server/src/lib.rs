//! HTTP server for the igaming wagering and settlement engine.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
