//! Tournament error types.

use super::models::{MatchId, ParticipantId, TournamentId, TournamentStatus};
use thiserror::Error;

/// Tournament errors
#[derive(Debug, Error)]
pub enum TournamentError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Tournament not found
    #[error("Tournament not found: {0}")]
    TournamentNotFound(TournamentId),

    /// Match not found
    #[error("Match not found: {0}")]
    MatchNotFound(MatchId),

    /// Tournament is not accepting registrations
    #[error("Tournament {0} is not accepting registrations")]
    RegistrationClosed(TournamentId),

    /// Tournament has reached its player capacity
    #[error("Tournament is full: capacity {capacity}")]
    TournamentFull { capacity: i32 },

    /// Alias already taken within this tournament
    #[error("Alias already taken in this tournament: {0}")]
    DuplicateAlias(String),

    /// Not enough registered players to start
    #[error("Insufficient players: need {needed}, have {current}")]
    InsufficientPlayers { needed: usize, current: usize },

    /// Scores are tied or negative
    #[error("Invalid score: {player1}-{player2}")]
    InvalidScore { player1: i32, player2: i32 },

    /// Declared winner disagrees with the recorded scores or pairing
    #[error("Declared winner {declared} disagrees with scores {player1}-{player2}")]
    WinnerMismatch {
        declared: ParticipantId,
        player1: i32,
        player2: i32,
    },

    /// Match result already recorded
    #[error("Match already finished: {0}")]
    MatchAlreadyFinished(MatchId),

    /// Player capacity must allow at least one pairing
    #[error("Invalid capacity: {0}")]
    InvalidCapacity(i32),

    /// Tournament name is empty
    #[error("Tournament name must not be empty")]
    InvalidName,

    /// Participant alias is empty
    #[error("Participant alias must not be empty")]
    InvalidAlias,

    /// Tournament is in the wrong lifecycle state for this operation
    #[error("Tournament not in correct state: expected {expected:?}, got {actual:?}")]
    InvalidStatus {
        expected: TournamentStatus,
        actual: TournamentStatus,
    },
}

impl TournamentError {
    /// Get a client-safe error message that doesn't leak sensitive information
    ///
    /// Database errors are sanitized to prevent information disclosure about
    /// the internal system structure, and row identifiers are redacted.
    pub fn client_message(&self) -> String {
        match self {
            // Sanitize database errors - don't expose SQL details
            TournamentError::Database(_) => "Internal server error".to_string(),
            // Sanitize not-found errors - don't expose row identifiers
            TournamentError::TournamentNotFound(_) => "Tournament not found".to_string(),
            TournamentError::MatchNotFound(_) => "Match not found".to_string(),
            // All other errors are safe to expose
            _ => self.to_string(),
        }
    }
}

/// Result type for tournament operations
pub type TournamentResult<T> = Result<T, TournamentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_sanitizes_database_errors() {
        let err = TournamentError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.client_message(), "Internal server error");
    }

    #[test]
    fn test_client_message_redacts_identifiers() {
        let err = TournamentError::TournamentNotFound(42);
        assert_eq!(err.client_message(), "Tournament not found");
        let err = TournamentError::MatchNotFound(7);
        assert_eq!(err.client_message(), "Match not found");
    }

    #[test]
    fn test_client_message_passes_validation_errors_through() {
        let err = TournamentError::DuplicateAlias("neo".to_string());
        assert_eq!(
            err.client_message(),
            "Alias already taken in this tournament: neo"
        );

        let err = TournamentError::InsufficientPlayers {
            needed: 2,
            current: 1,
        };
        assert_eq!(err.client_message(), "Insufficient players: need 2, have 1");
    }
}
