//! Core domain types and computations. Nothing in here performs I/O.

pub mod ohlcv;
pub mod position;
pub mod portfolio;
pub mod indicator;
pub mod indicator_helpers;
pub mod metrics;
pub mod financial_metrics;
pub mod fundamentals;
pub mod signal;
pub mod sentiment;
pub mod news;
pub mod regression;
pub mod earnings;
pub mod currency;
pub mod settings;
pub mod analysis;
pub mod error;
