use reqwest::multipart::{Form, Part};
use serde_json::json;
use std::path::Path;
use widgetdesk_core::error::Result;

use super::client::{ApiClient, Page};
use crate::dto::{
    ApiConnectRequest, CrawlRequest, KnowledgeDocument, KnowledgeStatistics, KnowledgeTestResult,
    ListQuery,
};

/// MIME type sent for an uploaded document, guessed from its extension.
pub fn infer_mime_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// `/knowledge-base` endpoints.
#[derive(Debug, Clone)]
pub struct KnowledgeBaseApi {
    client: ApiClient,
}

impl KnowledgeBaseApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Uploads a local file as a knowledge document.
    pub async fn upload_document(&self, path: &Path) -> Result<KnowledgeDocument> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "document".to_string());
        let mime = infer_mime_type(path);
        tracing::debug!(
            "[KnowledgeBaseApi] Uploading {} ({}, {} bytes)",
            file_name,
            mime,
            bytes.len()
        );

        let part = Part::bytes(bytes).file_name(file_name).mime_str(&mime)?;
        let form = Form::new().part("file", part);
        self.client
            .post_multipart("/knowledge-base/documents/upload", form)
            .await
    }

    pub async fn documents(&self, query: &ListQuery) -> Result<Page<KnowledgeDocument>> {
        self.client
            .get_page("/knowledge-base/documents", query)
            .await
    }

    pub async fn delete_document(&self, id: &str) -> Result<()> {
        self.client
            .delete(&format!("/knowledge-base/documents/{id}"))
            .await
    }

    pub async fn crawl_website(&self, request: &CrawlRequest) -> Result<serde_json::Value> {
        self.client
            .post("/knowledge-base/websites/crawl", request)
            .await
    }

    pub async fn connect_api(&self, request: &ApiConnectRequest) -> Result<serde_json::Value> {
        self.client
            .post("/knowledge-base/apis/connect", request)
            .await
    }

    /// Asks the knowledge base a question and returns what it would answer.
    pub async fn test_query(&self, query: &str) -> Result<KnowledgeTestResult> {
        self.client
            .post("/knowledge-base/test", &json!({ "query": query }))
            .await
    }

    pub async fn statistics(&self) -> Result<KnowledgeStatistics> {
        self.client.get("/knowledge-base/statistics").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CannedResponse, serve_once};
    use tempfile::TempDir;

    #[test]
    fn test_infer_mime_type() {
        assert_eq!(infer_mime_type(Path::new("guide.pdf")), "application/pdf");
        assert_eq!(infer_mime_type(Path::new("notes.txt")), "text/plain");
        assert_eq!(
            infer_mime_type(Path::new("blob.unknownext")),
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("faq.txt");
        std::fs::write(&path, "Q: hours?\nA: 9-5").unwrap();

        let server = serve_once(CannedResponse::ok(
            r#"{"success":true,"message":"Uploaded","data":{"id":5,"filename":"faq.txt","status":"processing"}}"#,
        ))
        .await;
        let api = KnowledgeBaseApi::new(ApiClient::new(server.base_url()));

        let document = api.upload_document(&path).await.unwrap();

        assert_eq!(document.id, "5");
        assert_eq!(document.name, "faq.txt");
        let request = server.request().await;
        assert_eq!(request.path, "/api/knowledge-base/documents/upload");
        assert!(
            request
                .header("content-type")
                .unwrap()
                .starts_with("multipart/form-data")
        );
        assert!(request.body.contains("filename=\"faq.txt\""));
        assert!(request.body.to_lowercase().contains("content-type: text/plain"));
        assert!(request.body.contains("A: 9-5"));
    }
}
