//! Error types for turn orchestration.

use database::DatabaseError;
use thiserror::Error;

/// Errors that can terminate a chat turn.
///
/// Every remote-call failure is caught at the orchestrator boundary and
/// mapped to one of these; nothing propagates as a raw transport error.
#[derive(Debug, Error)]
pub enum TurnError {
    /// Missing or invalid credential; no side effects occurred.
    #[error("unauthorized")]
    Unauthorized,

    /// The wallet balance does not cover the per-message cost.
    #[error("insufficient credits: required {required}, balance {balance}")]
    InsufficientFunds { required: i64, balance: i64 },

    /// Unknown character id.
    #[error("character not found: {0}")]
    CharacterNotFound(String),

    /// The LLM or identity provider failed; funds were not spent.
    #[error("upstream failure: {0}")]
    Upstream(String),

    /// Database failure.
    #[error("database error: {0}")]
    Database(DatabaseError),

    /// Invariant violation inside the orchestrator.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DatabaseError> for TurnError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::InsufficientFunds { required, balance } => {
                TurnError::InsufficientFunds { required, balance }
            }
            DatabaseError::NotFound { entity: "Character", id } => {
                TurnError::CharacterNotFound(id)
            }
            other => TurnError::Database(other),
        }
    }
}
