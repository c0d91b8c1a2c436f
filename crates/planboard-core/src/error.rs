use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanboardError {
    /// Referenced card or board does not exist (or was hard-deleted).
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request is well-formed but does not apply to the current state,
    /// e.g. restoring a card that is not deleted.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Network or timeout style failure; callers may retry.
    #[error("Transient failure: {0}")]
    Transient(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PlanboardError {
    pub fn card_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("Card {}", id))
    }

    pub fn board_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("Board {}", id))
    }

    /// Whether retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_) | Self::Io(_))
    }

    /// Whether the caller's local view is known to be out of date.
    pub fn requires_refresh(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
