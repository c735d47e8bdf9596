//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod timeseries;
pub mod run_config;
pub mod trade_log;
pub mod daily_balance;
pub mod engine;
pub mod stats;
pub mod summary;
pub mod config_validation;
pub mod error;
