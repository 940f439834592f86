//! Error types for the guess-duel server
//!
//! One root error with a sub-enum per concern. Game errors are always the
//! caller's fault; storage errors never abort gameplay.

use thiserror::Error;

/// Root error type for all guess-duel operations
#[derive(Debug, Error)]
pub enum DuelError {
    /// Session state machine errors
    #[error("Game error: {0}")]
    Game(#[from] GameError),

    /// Match history persistence errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// Errors raised by the session engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("Both player names are required")]
    MissingPlayerName,

    #[error("Guess must be a whole number between {min} and {max} (got '{raw}')")]
    InvalidGuess { raw: String, min: u32, max: u32 },

    #[error("No active game")]
    NoActiveGame,

    #[error("The game is not in progress")]
    NotPlaying,
}

/// Storage system errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Corrupted data: {0}")]
    CorruptedData(String),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Configuration and validation errors
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),
}

impl From<std::io::Error> for DuelError {
    fn from(e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => DuelError::Storage(StorageError::ReadFailed(e.to_string())),
            std::io::ErrorKind::PermissionDenied => {
                DuelError::Storage(StorageError::Unavailable(e.to_string()))
            }
            _ => DuelError::Storage(StorageError::WriteFailed(e.to_string())),
        }
    }
}

#[cfg(feature = "rocksdb")]
impl From<rocksdb::Error> for DuelError {
    fn from(e: rocksdb::Error) -> Self {
        DuelError::Storage(StorageError::WriteFailed(e.to_string()))
    }
}

// Convenience type alias for Results
pub type DuelResult<T> = Result<T, DuelError>;

impl DuelError {
    /// True for errors caused by the request rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(self, DuelError::Game(_))
    }
}
