//! Pure domain logic. No I/O in this layer; adapters feed it data
//! through the port traits.

pub mod backtest;
pub mod config_validation;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod portfolio;
pub mod price_series;
pub mod selector;
