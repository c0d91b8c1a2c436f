use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::PlanboardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A user-visible, non-fatal message raised by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    pub message: String,
    #[serde(default)]
    pub retryable: bool,
}

impl Notification {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            severity,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Build a notification for a failed operation. `InvalidState` errors are
    /// reported as warnings since they leave state untouched.
    pub fn from_error(context: &str, err: &PlanboardError) -> Self {
        let severity = match err {
            PlanboardError::InvalidState(_) => Severity::Warning,
            _ => Severity::Error,
        };
        Self {
            retryable: err.is_retryable(),
            ..Self::new(severity, format!("{}: {}", context, err))
        }
    }
}
