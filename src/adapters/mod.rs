//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod csv_bar_store;
pub mod csv_bars;
pub mod file_config_adapter;
pub mod journal_order_adapter;
pub mod static_position_adapter;
