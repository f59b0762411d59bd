//! Error types for the DeFi advisor system.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("insufficient trade history: found {found} directional records, need {required}")]
    InsufficientData { found: usize, required: usize },

    #[error("malformed trade record for {market}: {message}")]
    MalformedRecord { market: String, message: String },
}

impl Error {
    /// Whether the caller can recover by widening the window or waiting
    /// for more trade history.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Error::InsufficientData { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
