//! Persistence gateway trait.
//!
//! Defines the only seam between the configuration session and the backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

use super::model::WidgetConfig;
use crate::error::DeskError;

/// Failures a gateway call can report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The widget does not exist on the backend
    #[error("Widget not found: {0}")]
    NotFound(String),

    /// The backend rejected the payload; keys are backend field names
    #[error("Server rejected the configuration ({} field(s))", .fields.len())]
    Validation { fields: BTreeMap<String, String> },

    /// The request failed in transit or the backend is unavailable
    #[error("Network error: {0}")]
    Network(String),

    /// The request did not complete within the allotted time
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The widget was modified concurrently on the backend
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<DeskError> for GatewayError {
    fn from(err: DeskError) -> Self {
        match err {
            DeskError::NotFound { id, .. } => Self::NotFound(id),
            DeskError::Validation { fields, message } => {
                if fields.is_empty() {
                    Self::Network(message)
                } else {
                    Self::Validation { fields }
                }
            }
            DeskError::Api { status: 409, message } => Self::Conflict(message),
            other => Self::Network(other.to_string()),
        }
    }
}

/// A widget as acknowledged by the backend after a save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedConfig {
    pub id: String,
    pub config: WidgetConfig,
}

/// Outcome of a dry run of the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestReport {
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// An abstract gateway for loading and persisting widget configurations.
///
/// This trait decouples the configuration session from the transport
/// (REST backend, in-memory fake in tests).
#[async_trait]
pub trait WidgetGateway: Send + Sync {
    /// Loads the configuration of an existing widget.
    ///
    /// # Returns
    ///
    /// - `Ok(WidgetConfig)`: Widget found
    /// - `Err(GatewayError::NotFound)`: No widget with that ID
    async fn load(&self, widget_id: &str) -> Result<WidgetConfig, GatewayError>;

    /// Persists a configuration.
    ///
    /// # Arguments
    ///
    /// * `widget_id` - `None` creates a new widget, `Some` updates it
    /// * `config` - The configuration to store
    async fn save(
        &self,
        widget_id: Option<&str>,
        config: &WidgetConfig,
    ) -> Result<SavedConfig, GatewayError>;

    /// Restores the widget to the backend defaults and returns them.
    async fn reset(&self, widget_id: &str) -> Result<WidgetConfig, GatewayError>;

    /// Dry-runs the configuration without persisting it.
    async fn test(
        &self,
        widget_id: Option<&str>,
        config: &WidgetConfig,
    ) -> Result<TestReport, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desk_error_mapping() {
        assert_eq!(
            GatewayError::from(DeskError::not_found("widget", "7")),
            GatewayError::NotFound("7".to_string())
        );
        assert!(matches!(
            GatewayError::from(DeskError::api(409, "stale")),
            GatewayError::Conflict(_)
        ));
        assert!(matches!(
            GatewayError::from(DeskError::Http("refused".into())),
            GatewayError::Network(_)
        ));

        let mut fields = BTreeMap::new();
        fields.insert("widget_name".to_string(), "taken".to_string());
        assert!(matches!(
            GatewayError::from(DeskError::Validation {
                message: "invalid".into(),
                fields,
            }),
            GatewayError::Validation { .. }
        ));
    }
}
