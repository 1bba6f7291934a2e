//! REST-backed [`WidgetGateway`].

use async_trait::async_trait;
use widgetdesk_core::widget::{
    GatewayError, SavedConfig, TestReport, WidgetConfig, WidgetGateway,
};

use crate::api::{ApiClient, WidgetsApi};

/// Loads and persists widget configurations through `/widgets`.
///
/// The backend has no dedicated reset route, so `reset` writes
/// [`WidgetConfig::default()`] and returns what the server stored.
#[derive(Debug, Clone)]
pub struct HttpWidgetGateway {
    widgets: WidgetsApi,
}

impl HttpWidgetGateway {
    pub fn new(client: ApiClient) -> Self {
        Self {
            widgets: WidgetsApi::new(client),
        }
    }
}

#[async_trait]
impl WidgetGateway for HttpWidgetGateway {
    async fn load(&self, widget_id: &str) -> Result<WidgetConfig, GatewayError> {
        tracing::debug!("[HttpWidgetGateway] Loading widget {}", widget_id);
        let record = self.widgets.get(widget_id).await.map_err(|e| match e {
            e if e.is_not_found() => GatewayError::NotFound(widget_id.to_string()),
            e => GatewayError::from(e),
        })?;
        Ok(record.into_config()?)
    }

    async fn save(
        &self,
        widget_id: Option<&str>,
        config: &WidgetConfig,
    ) -> Result<SavedConfig, GatewayError> {
        let record = match widget_id {
            Some(id) => self.widgets.update(id, config).await,
            None => self.widgets.create(config).await,
        }?;
        tracing::info!("[HttpWidgetGateway] Saved widget {}", record.id);

        let id = record.id.clone();
        // Echo without a config means the backend stored exactly what was sent
        let config = match record.config {
            Some(stored) => stored,
            None => config.clone(),
        };
        Ok(SavedConfig { id, config })
    }

    async fn reset(&self, widget_id: &str) -> Result<WidgetConfig, GatewayError> {
        let defaults = WidgetConfig::default();
        let record = self.widgets.update(widget_id, &defaults).await?;
        tracing::info!("[HttpWidgetGateway] Reset widget {}", widget_id);
        Ok(record.config.unwrap_or(defaults))
    }

    async fn test(
        &self,
        widget_id: Option<&str>,
        config: &WidgetConfig,
    ) -> Result<TestReport, GatewayError> {
        Ok(self.widgets.test(widget_id, config).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CannedResponse, serve_once};

    fn gateway_for(base_url: String) -> HttpWidgetGateway {
        HttpWidgetGateway::new(ApiClient::new(base_url))
    }

    #[tokio::test]
    async fn test_load_reads_nested_config() {
        let server = serve_once(CannedResponse::ok(
            r#"{"success":true,"message":"","data":{"id":3,"name":"Help","config":{"widgetName":"Help","botName":"Ava"}}}"#,
        ))
        .await;
        let gateway = gateway_for(server.base_url());

        let config = gateway.load("3").await.unwrap();

        assert_eq!(config.widget_name, "Help");
        assert_eq!(config.bot_name, "Ava");
        let request = server.request().await;
        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "/api/widgets/3");
    }

    #[tokio::test]
    async fn test_load_missing_widget() {
        let server = serve_once(CannedResponse::status(
            404,
            r#"{"success":false,"message":"Widget not found"}"#,
        ))
        .await;
        let gateway = gateway_for(server.base_url());

        let err = gateway.load("nope").await.unwrap_err();
        assert_eq!(err, GatewayError::NotFound("nope".to_string()));
    }

    #[tokio::test]
    async fn test_save_new_widget_posts_and_adopts_id() {
        let server = serve_once(CannedResponse::status(
            201,
            r#"{"success":true,"message":"Created","data":{"id":77,"name":"My Chat Widget"}}"#,
        ))
        .await;
        let gateway = gateway_for(server.base_url());
        let config = WidgetConfig::default();

        let saved = gateway.save(None, &config).await.unwrap();

        assert_eq!(saved.id, "77");
        assert_eq!(saved.config, config);
        let request = server.request().await;
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/api/widgets");
        assert_eq!(request.json()["config"]["primaryColor"], "#3B82F6");
    }

    #[tokio::test]
    async fn test_save_existing_widget_puts() {
        let server = serve_once(CannedResponse::ok(
            r#"{"success":true,"message":"Updated","data":{"id":"w1"}}"#,
        ))
        .await;
        let gateway = gateway_for(server.base_url());

        gateway
            .save(Some("w1"), &WidgetConfig::default())
            .await
            .unwrap();

        let request = server.request().await;
        assert_eq!(request.method, "PUT");
        assert_eq!(request.path, "/api/widgets/w1");
    }

    #[tokio::test]
    async fn test_save_validation_errors_carry_fields() {
        let server = serve_once(CannedResponse::status(
            422,
            r#"{"success":false,"message":"The given data was invalid.","errors":{"widget_name":["The widget name has already been taken."]}}"#,
        ))
        .await;
        let gateway = gateway_for(server.base_url());

        let err = gateway
            .save(Some("w1"), &WidgetConfig::default())
            .await
            .unwrap_err();

        match err {
            GatewayError::Validation { fields } => {
                assert_eq!(
                    fields["widget_name"],
                    "The widget name has already been taken."
                );
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_conflict_maps_to_conflict() {
        let server = serve_once(CannedResponse::status(
            409,
            r#"{"success":false,"message":"Widget was modified"}"#,
        ))
        .await;
        let gateway = gateway_for(server.base_url());

        let err = gateway.reset("w1").await.unwrap_err();
        assert_eq!(err, GatewayError::Conflict("Widget was modified".to_string()));
    }

    #[tokio::test]
    async fn test_reset_writes_defaults() {
        let server = serve_once(CannedResponse::ok(
            r#"{"success":true,"message":"Updated","data":{"id":"w1"}}"#,
        ))
        .await;
        let gateway = gateway_for(server.base_url());

        let config = gateway.reset("w1").await.unwrap();

        assert_eq!(config, WidgetConfig::default());
        let request = server.request().await;
        assert_eq!(request.method, "PUT");
        assert_eq!(request.json()["config"]["widgetName"], "My Chat Widget");
    }

    #[tokio::test]
    async fn test_test_uses_envelope_message_as_details() {
        let server = serve_once(CannedResponse::ok(
            r#"{"success":true,"message":"Widget responded in 120ms"}"#,
        ))
        .await;
        let gateway = gateway_for(server.base_url());

        let report = gateway
            .test(Some("w1"), &WidgetConfig::default())
            .await
            .unwrap();

        assert!(report.passed);
        assert_eq!(report.details.as_deref(), Some("Widget responded in 120ms"));
        let request = server.request().await;
        assert_eq!(request.path, "/api/widgets/test");
        assert_eq!(request.json()["widget_id"], "w1");
    }
}
