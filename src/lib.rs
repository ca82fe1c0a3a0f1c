//! Moving-average crossover detection and traded-volume aggregation for a
//! single asset, with a Yahoo Finance backed data source and an HTTP API.

pub mod common;
pub mod config;
pub mod core;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
