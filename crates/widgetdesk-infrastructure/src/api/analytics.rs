use serde_json::Value;
use widgetdesk_core::error::Result;

use super::client::ApiClient;
use crate::dto::{AnalyticsQuery, DashboardMetrics};

/// `/analytics` endpoints. Every report takes a [`AnalyticsQuery`].
#[derive(Debug, Clone)]
pub struct AnalyticsApi {
    client: ApiClient,
}

impl AnalyticsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn dashboard(&self, query: &AnalyticsQuery) -> Result<DashboardMetrics> {
        self.client.get_with("/analytics/dashboard", query).await
    }

    pub async fn conversations(&self, query: &AnalyticsQuery) -> Result<Value> {
        self.client.get_with("/analytics/conversations", query).await
    }

    pub async fn users(&self, query: &AnalyticsQuery) -> Result<Value> {
        self.client.get_with("/analytics/users", query).await
    }

    pub async fn performance(&self, query: &AnalyticsQuery) -> Result<Value> {
        self.client.get_with("/analytics/performance", query).await
    }

    pub async fn export(&self, query: &AnalyticsQuery) -> Result<Value> {
        self.client.get_with("/analytics/export", query).await
    }

    pub async fn realtime(&self, query: &AnalyticsQuery) -> Result<Value> {
        self.client.get_with("/analytics/realtime", query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::DateRange;
    use crate::test_support::{CannedResponse, serve_once};

    #[tokio::test]
    async fn test_dashboard_passes_range_and_widget() {
        let server = serve_once(CannedResponse::ok(
            r#"{"success":true,"message":"","data":{"total_conversations":42,"active_users":7,"top_pages":[]}}"#,
        ))
        .await;
        let api = AnalyticsApi::new(ApiClient::new(server.base_url()));

        let metrics = api
            .dashboard(&AnalyticsQuery::new(DateRange::Month).for_widget("w9"))
            .await
            .unwrap();

        assert_eq!(metrics.total_conversations, 42);
        assert_eq!(metrics.active_users, 7);
        assert!(metrics.extra.contains_key("top_pages"));
        let request = server.request().await;
        assert_eq!(
            request.path,
            "/api/analytics/dashboard?date_range=30d&widget_id=w9"
        );
    }
}
