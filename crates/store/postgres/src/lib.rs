mod config;
mod connection;
mod migrations;
mod store;

pub use config::PostgresConfig;
pub use connection::ConnectionManager;
pub use migrations::run_migrations;
pub use store::PostgresBlogStore;
