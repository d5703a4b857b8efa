//! Port traits for external data sources and configuration.

pub mod config_port;
pub mod data_port;
pub mod earnings_port;
pub mod fx_port;
pub mod news_port;
