use serde::{Deserialize, Serialize};
use strum::Display;

use super::model::ConfigField;
use super::validation::ValidationErrors;

/// Gateway-backed operations a session can have in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionOperation {
    Save,
    Reset,
    Test,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationOutcome {
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

/// Events a session publishes to whatever renders it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The live config changed (edit, undo, redo, reset).
    ConfigChanged { fields: Vec<ConfigField> },
    /// The error map changed.
    ValidationChanged { errors: ValidationErrors },
    /// The unsaved-changes flag flipped.
    DirtyChanged { is_dirty: bool },
    OperationStarted { operation: SessionOperation },
    OperationFinished {
        operation: SessionOperation,
        outcome: OperationOutcome,
    },
    /// User-facing message, typically shown as a toast.
    Notification {
        level: NotificationLevel,
        message: String,
    },
}

/// A published event with its session and timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct SessionEventEnvelope {
    pub session_id: String,
    /// RFC 3339
    pub timestamp: String,
    pub event: SessionEvent,
}

impl SessionEventEnvelope {
    pub fn new(session_id: impl Into<String>, event: SessionEvent) -> Self {
        Self {
            session_id: session_id.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            event,
        }
    }
}
