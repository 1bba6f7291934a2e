//! Console configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer; every field has a
//! default so a missing or partial file still yields a usable config.

use serde::{Deserialize, Serialize};

use crate::widget::DEFAULT_HISTORY_DEPTH;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct DeskConfig {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub editor: EditorSettings,
}

/// Backend connection settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token sent with every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Host serving the widget loader referenced by embed snippets
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widget_host: Option<String>,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
            widget_host: None,
        }
    }
}

/// Widget builder settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct EditorSettings {
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            history_depth: default_history_depth(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_history_depth() -> usize {
    DEFAULT_HISTORY_DEPTH
}
