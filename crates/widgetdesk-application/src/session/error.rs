use std::collections::BTreeMap;
use thiserror::Error;
use widgetdesk_core::widget::{GatewayError, SessionOperation, ValidationErrors};

/// Why a session operation did not complete.
///
/// `LocalValidation` and `Busy` are decided before any network call;
/// every other variant means the gateway was contacted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// One or more fields fail local validation; nothing was sent
    #[error("Configuration has {} invalid field(s)", .fields.len())]
    LocalValidation { fields: ValidationErrors },

    /// The backend rejected the configuration; keys are backend field names
    #[error("Server rejected the configuration ({} field(s))", .fields.len())]
    ServerValidation { fields: BTreeMap<String, String> },

    /// Transport failure or timeout; the operation may be retried
    #[error("Network error: {0}")]
    Network(String),

    #[error("Widget not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Another gateway operation is still in flight
    #[error("A {operation} is already in progress")]
    Busy { operation: SessionOperation },

    /// Undo/redo attempted while a save or reset is in flight
    #[error("History is locked while a {operation} is in progress")]
    HistoryLocked { operation: SessionOperation },
}

impl SessionError {
    /// Returns true if the gateway was contacted before the failure.
    pub fn reached_network(&self) -> bool {
        !matches!(
            self,
            Self::LocalValidation { .. } | Self::Busy { .. } | Self::HistoryLocked { .. }
        )
    }

    /// Returns true if retrying the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Busy { .. })
    }
}

impl From<GatewayError> for SessionError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::NotFound(id) => Self::NotFound(id),
            GatewayError::Validation { fields } => Self::ServerValidation { fields },
            GatewayError::Network(message) => Self::Network(message),
            GatewayError::Timeout(after) => {
                Self::Network(format!("request timed out after {}s", after.as_secs_f32()))
            }
            GatewayError::Conflict(message) => Self::Conflict(message),
        }
    }
}
