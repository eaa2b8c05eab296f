//! Error types shared by every layer of the cookbook server.

use thiserror::Error;

/// Unified error type for configuration, persistence, storage and rotation failures.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Any failure reported by the database layer
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem or socket failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted recipe-of-the-day record could not be encoded
    #[error("Rotation state error: {message}")]
    Rotation {
        /// What went wrong
        message: String,
    },

    /// Malformed multipart upload
    #[error("Upload error: {message}")]
    Upload {
        /// What went wrong
        message: String,
    },

    /// A client-supplied path that escapes the public directory
    #[error("Invalid path: {path}")]
    InvalidPath {
        /// The rejected path
        path: String,
    },
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
