use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum::{Display, EnumIter, EnumString};

/// Reporting window accepted by every analytics endpoint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
pub enum DateRange {
    #[serde(rename = "1d")]
    #[strum(serialize = "1d")]
    Day,
    #[default]
    #[serde(rename = "7d")]
    #[strum(serialize = "7d")]
    Week,
    #[serde(rename = "30d")]
    #[strum(serialize = "30d")]
    Month,
    #[serde(rename = "90d")]
    #[strum(serialize = "90d")]
    Quarter,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalyticsQuery {
    pub date_range: DateRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget_id: Option<String>,
}

impl AnalyticsQuery {
    pub fn new(date_range: DateRange) -> Self {
        Self {
            date_range,
            widget_id: None,
        }
    }

    pub fn for_widget(mut self, widget_id: impl Into<String>) -> Self {
        self.widget_id = Some(widget_id.into());
        self
    }
}

/// Headline numbers of `/analytics/dashboard`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DashboardMetrics {
    #[serde(default)]
    pub total_conversations: u64,
    #[serde(default)]
    pub total_messages: u64,
    #[serde(default)]
    pub active_users: u64,
    #[serde(default)]
    pub avg_response_time: Option<f64>,
    #[serde(default)]
    pub satisfaction_rate: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
