pub mod api;
pub mod config;
pub mod cors;
pub mod error;
pub mod lifecycle;
pub mod media_factory;
pub mod store_factory;
pub mod telemetry;
