//! Shared HTTP client for the widget backend.
//!
//! Every endpoint answers with the same envelope:
//!
//! ```json
//! { "success": true, "message": "...", "data": { ... } }
//! { "success": false, "message": "...", "errors": { "field": ["..."] } }
//! { "success": true, "message": "...", "data": [ ... ], "pagination": { ... } }
//! ```
//!
//! [`interpret`] turns a raw status and body into either the envelope or a
//! [`DeskError`], so the mapping can be tested without a server.

use reqwest::{Client, Method, RequestBuilder, multipart::Form};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use widgetdesk_core::config::ApiSettings;
use widgetdesk_core::{DeskError, error::Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FieldMessages {
    One(String),
    Many(Vec<String>),
}

impl FieldMessages {
    fn first(self) -> String {
        match self {
            Self::One(message) => message,
            Self::Many(messages) => messages.into_iter().next().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default, alias = "currentPage")]
    pub current_page: u32,
    #[serde(default, alias = "perPage")]
    pub per_page: u32,
    #[serde(default)]
    pub total: u64,
    #[serde(default, alias = "lastPage")]
    pub last_page: u32,
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Option<Pagination>,
}

/// Decoded response envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    errors: Option<BTreeMap<String, FieldMessages>>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl ApiEnvelope {
    /// Field errors, one message per field.
    pub fn field_errors(&self) -> BTreeMap<String, String> {
        self.errors
            .clone()
            .unwrap_or_default()
            .into_iter()
            .map(|(field, messages)| (field, messages.first()))
            .collect()
    }

    /// Deserializes `data` into `T`; a missing `data` is read as `null`.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T> {
        Ok(serde_json::from_value(self.data.unwrap_or(Value::Null))?)
    }

    pub fn into_page<T: DeserializeOwned>(self) -> Result<Page<T>> {
        let pagination = self.pagination.clone();
        let items = match self.data {
            None | Some(Value::Null) => Vec::new(),
            Some(data) => serde_json::from_value(data)?,
        };
        Ok(Page { items, pagination })
    }
}

/// Maps an HTTP status and body onto the envelope or an error.
///
/// - 404 → `NotFound`
/// - 422, or any response carrying field `errors` → `Validation`
/// - other non-2xx, or `success: false` → `Api`
///
/// A 2xx body that is not an envelope is taken as the payload itself.
pub fn interpret(status: u16, body: &str) -> Result<ApiEnvelope> {
    let value: Value = if body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
    };

    let is_envelope = value.get("success").is_some();
    let envelope = if is_envelope {
        serde_json::from_value::<ApiEnvelope>(value)?
    } else {
        ApiEnvelope {
            success: (200..300).contains(&status),
            message: value.as_str().map(str::to_string),
            data: Some(value),
            ..ApiEnvelope::default()
        }
    };
    let message = envelope
        .message
        .clone()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("request failed with status {status}"));

    if status == 404 {
        return Err(DeskError::not_found("resource", message));
    }
    let fields = envelope.field_errors();
    if status == 422 || !fields.is_empty() {
        return Err(DeskError::Validation { message, fields });
    }
    if !(200..300).contains(&status) || (is_envelope && !envelope.success) {
        return Err(DeskError::api(status, message));
    }
    Ok(envelope)
}

/// Thin wrapper over `reqwest::Client` bound to one backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            timeout: Duration::from_secs(widgetdesk_core::config::DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_settings(settings: &ApiSettings) -> Self {
        let client = Self::new(&settings.base_url)
            .with_timeout(Duration::from_secs(settings.timeout_secs));
        match &settings.token {
            Some(token) => client.with_token(token),
            None => client,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, self.url(path))
            .timeout(self.timeout)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send(&self, builder: RequestBuilder) -> Result<ApiEnvelope> {
        let response = builder.send().await.map_err(|e| {
            tracing::warn!("[ApiClient] Request failed: {}", e);
            DeskError::from(e)
        })?;
        let status = response.status().as_u16();
        let url = response.url().path().to_string();
        let body = response.text().await?;
        tracing::debug!("[ApiClient] {} -> {}", url, status);
        interpret(status, &body)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.request(Method::GET, path)).await?.into_data()
    }

    pub async fn get_with<Q, T>(&self, path: &str, query: &Q) -> Result<T>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::GET, path).query(query))
            .await?
            .into_data()
    }

    pub async fn get_page<Q, T>(&self, path: &str, query: &Q) -> Result<Page<T>>
    where
        Q: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::GET, path).query(query))
            .await?
            .into_page()
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::POST, path).json(body))
            .await?
            .into_data()
    }

    /// Like [`Self::post`] but hands back the whole envelope, `message` included.
    pub async fn post_envelope<B>(&self, path: &str, body: &B) -> Result<ApiEnvelope>
    where
        B: Serialize + ?Sized,
    {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send(self.request(Method::PUT, path).json(body))
            .await?
            .into_data()
    }

    pub async fn patch<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.request(Method::PATCH, path)).await?.into_data()
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, path)).await?;
        Ok(())
    }

    pub async fn post_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T> {
        self.send(self.request(Method::POST, path).multipart(form))
            .await?
            .into_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CannedResponse, serve_once};

    #[test]
    fn test_success_envelope_yields_data() {
        let envelope =
            interpret(200, r#"{"success":true,"message":"ok","data":{"id":7}}"#).unwrap();
        let data: Value = envelope.into_data().unwrap();
        assert_eq!(data["id"], 7);
    }

    #[test]
    fn test_404_is_not_found() {
        let err = interpret(404, r#"{"success":false,"message":"Widget missing"}"#).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_422_collects_first_message_per_field() {
        let err = interpret(
            422,
            r#"{"success":false,"message":"Invalid","errors":{"widget_name":["Taken","Too long"],"primary_color":"Bad"}}"#,
        )
        .unwrap_err();

        match err {
            DeskError::Validation { message, fields } => {
                assert_eq!(message, "Invalid");
                assert_eq!(fields["widget_name"], "Taken");
                assert_eq!(fields["primary_color"], "Bad");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_unsuccessful_envelope_on_200_is_api_error() {
        let err = interpret(200, r#"{"success":false,"message":"Quota exceeded"}"#).unwrap_err();
        match err {
            DeskError::Api { status, message } => {
                assert_eq!(status, 200);
                assert_eq!(message, "Quota exceeded");
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn test_server_error_without_body() {
        let err = interpret(503, "").unwrap_err();
        assert!(err.is_transient());
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_paginated_envelope() {
        let envelope = interpret(
            200,
            r#"{"success":true,"message":"","data":[1,2,3],"pagination":{"current_page":2,"per_page":3,"total":9,"last_page":3}}"#,
        )
        .unwrap();
        let page: Page<u32> = envelope.into_page().unwrap();
        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.pagination.unwrap().current_page, 2);
    }

    #[tokio::test]
    async fn test_client_sends_bearer_token() {
        let server = serve_once(CannedResponse::ok(r#"{"success":true,"data":"pong"}"#)).await;
        let client = ApiClient::new(server.base_url()).with_token("secret");

        let reply: String = client.get("/ping").await.unwrap();

        assert_eq!(reply, "pong");
        let request = server.request().await;
        assert_eq!(request.method, "GET");
        assert_eq!(request.path, "/api/ping");
        assert_eq!(request.header("authorization").as_deref(), Some("Bearer secret"));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_http_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = ApiClient::new(format!("http://{addr}/api"))
            .with_timeout(Duration::from_secs(2));
        let err = client.get::<Value>("/widgets").await.unwrap_err();
        assert!(err.is_transient());
    }
}
