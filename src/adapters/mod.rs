//! Concrete adapter implementations for ports.

pub mod alpha_vantage;
pub mod csv_adapter;
pub mod currency_api;
pub mod file_config_adapter;
pub mod http;
pub mod iex_earnings;
pub mod news_api;
#[cfg(feature = "web")]
pub mod web;
