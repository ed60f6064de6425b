use thiserror::Error;

use crate::results::RecordKey;

/// Errors surfaced by the scoring engine and its collaborators.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Duplicate entry: {0} is already recorded")]
    Duplicate(RecordKey),

    #[error("Competitor '{0}' has no record set")]
    CompetitorNotFound(String),

    #[error("No result recorded for {0}")]
    RecordNotFound(RecordKey),

    #[error("{collaborator} unavailable: {reason}")]
    Unavailable {
        collaborator: &'static str,
        reason: String,
    },
}

impl EngineError {
    pub fn store_unavailable(reason: impl ToString) -> Self {
        EngineError::Unavailable {
            collaborator: "Result store",
            reason: reason.to_string(),
        }
    }

    pub fn calendar_unavailable(reason: impl ToString) -> Self {
        EngineError::Unavailable {
            collaborator: "Tournament calendar",
            reason: reason.to_string(),
        }
    }
}
