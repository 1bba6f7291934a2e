use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use widgetdesk_core::error::Result;
use widgetdesk_core::widget::WidgetConfig;

use super::id_string;

/// A widget as the backend stores it.
///
/// Newer backends nest the builder settings under `config`; older ones
/// return them flat next to `id`. [`WidgetRecord::into_config`] reads both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetRecord {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, alias = "isActive", skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<WidgetConfig>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WidgetRecord {
    pub fn into_config(self) -> Result<WidgetConfig> {
        match self.config {
            Some(config) => Ok(config),
            None => {
                let mut flat = self.extra;
                if let Some(name) = self.name {
                    flat.entry("widgetName").or_insert(Value::String(name));
                }
                Ok(serde_json::from_value(Value::Object(flat))?)
            }
        }
    }
}

/// Body of `POST /widgets` and `PUT /widgets/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct WidgetPayload<'a> {
    pub name: &'a str,
    pub config: &'a WidgetConfig,
}

impl<'a> From<&'a WidgetConfig> for WidgetPayload<'a> {
    fn from(config: &'a WidgetConfig) -> Self {
        Self {
            name: &config.widget_name,
            config,
        }
    }
}

/// Server-rendered embed code, keyed by format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedSnippets {
    #[serde(default, alias = "script_tag")]
    pub script: Option<String>,
    #[serde(default)]
    pub iframe: Option<String>,
    #[serde(default, alias = "react")]
    pub npm: Option<String>,
}

/// `data` of `POST /widgets/test`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WidgetTestResult {
    #[serde(default, alias = "success", alias = "valid")]
    pub passed: Option<bool>,
    #[serde(default, alias = "message")]
    pub details: Option<String>,
}
