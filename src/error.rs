//! Error types for the rating engine
//!
//! Every fallible library operation returns [`Result`]. Callers that need to
//! map failures onto client-facing responses use [`EngineError::kind`].

use crate::types::{GameId, SeriesId, TournamentId};

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, EngineError>;

/// Coarse classification of an [`EngineError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed caller input; nothing was mutated
    Validation,
    /// A referenced game, series or tournament does not exist; nothing was mutated
    NotFound,
    /// Persistence or other implementation failure; partial writes may remain
    Internal,
}

/// Custom error types for specific engine scenarios
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid identifier: {value}")]
    InvalidIdentifier { value: String },

    #[error("Invalid limit: {value}")]
    InvalidLimit { value: String },

    #[error("Invalid rating input: {reason}")]
    InvalidRatingInput { reason: String },

    #[error("Game not found: {game_id}")]
    GameNotFound { game_id: GameId },

    #[error("Tournament not found: {tournament_id}")]
    TournamentNotFound { tournament_id: TournamentId },

    #[error("Series not found: {series_id}")]
    SeriesNotFound { series_id: SeriesId },

    #[error("Persistence failure: {message}")]
    Persistence { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

impl EngineError {
    /// Shorthand for building a persistence failure
    pub fn persistence(message: impl Into<String>) -> Self {
        EngineError::Persistence {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::InvalidIdentifier { .. }
            | EngineError::InvalidLimit { .. }
            | EngineError::InvalidRatingInput { .. } => ErrorKind::Validation,
            EngineError::GameNotFound { .. }
            | EngineError::TournamentNotFound { .. }
            | EngineError::SeriesNotFound { .. } => ErrorKind::NotFound,
            EngineError::Persistence { .. } | EngineError::ConfigurationError { .. } => {
                ErrorKind::Internal
            }
        }
    }
}
