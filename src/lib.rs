/*
 * Yield Lens - APR aggregation service
 * Core library exports and module declarations
 */

pub mod aggregator;
pub mod analytics;
pub mod api;
pub mod config;
pub mod dex;
pub mod lending;
pub mod metrics;
pub mod models;
pub mod prices;
pub mod service;
pub mod source;
pub mod utils;

pub use config::Config;
pub use models::*;
pub use service::YieldService;
pub use source::YieldSource;
