/// Database connection and table creation
pub mod database;

/// HTTP server settings from config.toml and environment variables
pub mod server;
