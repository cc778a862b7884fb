pub mod benchmarking;
pub mod config;
pub mod market_data;
pub mod reporting;
