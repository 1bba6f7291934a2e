use serde_json::Value;
use widgetdesk_core::error::Result;
use widgetdesk_core::widget::{TestReport, WidgetConfig};

use super::client::{ApiClient, Page};
use crate::dto::{
    AnalyticsQuery, EmbedSnippets, ListQuery, WidgetPayload, WidgetRecord, WidgetTestResult,
};

/// `/widgets` endpoints.
#[derive(Debug, Clone)]
pub struct WidgetsApi {
    client: ApiClient,
}

impl WidgetsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<WidgetRecord>> {
        self.client.get_page("/widgets", query).await
    }

    pub async fn get(&self, id: &str) -> Result<WidgetRecord> {
        self.client.get(&format!("/widgets/{id}")).await
    }

    pub async fn create(&self, config: &WidgetConfig) -> Result<WidgetRecord> {
        self.client
            .post("/widgets", &WidgetPayload::from(config))
            .await
    }

    pub async fn update(&self, id: &str, config: &WidgetConfig) -> Result<WidgetRecord> {
        self.client
            .put(&format!("/widgets/{id}"), &WidgetPayload::from(config))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client.delete(&format!("/widgets/{id}")).await
    }

    /// Flips the widget between active and inactive.
    pub async fn toggle(&self, id: &str) -> Result<WidgetRecord> {
        self.client.patch(&format!("/widgets/{id}/toggle")).await
    }

    pub async fn embed(&self, id: &str) -> Result<EmbedSnippets> {
        self.client.get(&format!("/widgets/{id}/embed")).await
    }

    pub async fn analytics(&self, id: &str, query: &AnalyticsQuery) -> Result<Value> {
        self.client
            .get_with(&format!("/widgets/{id}/analytics"), query)
            .await
    }

    pub async fn duplicate(&self, id: &str) -> Result<WidgetRecord> {
        self.client
            .post(&format!("/widgets/{id}/duplicate"), &Value::Null)
            .await
    }

    pub async fn export(&self, id: &str) -> Result<Value> {
        self.client.get(&format!("/widgets/{id}/export")).await
    }

    pub async fn import(&self, exported: &Value) -> Result<WidgetRecord> {
        self.client.post("/widgets/import", exported).await
    }

    /// Server-side validation; field errors come back as `DeskError::Validation`.
    pub async fn validate(&self, config: &WidgetConfig) -> Result<()> {
        self.client
            .post_envelope("/widgets/validate", &WidgetPayload::from(config))
            .await?;
        Ok(())
    }

    pub async fn test(&self, id: Option<&str>, config: &WidgetConfig) -> Result<TestReport> {
        let mut body = serde_json::to_value(WidgetPayload::from(config))?;
        if let (Some(id), Some(object)) = (id, body.as_object_mut()) {
            object.insert("widget_id".to_string(), Value::String(id.to_string()));
        }

        let envelope = self.client.post_envelope("/widgets/test", &body).await?;
        let message = envelope.message.clone().filter(|m| !m.is_empty());
        let result: Option<WidgetTestResult> = envelope.into_data()?;
        let result = result.unwrap_or_default();

        Ok(TestReport {
            passed: result.passed.unwrap_or(true),
            details: result.details.or(message),
        })
    }
}
