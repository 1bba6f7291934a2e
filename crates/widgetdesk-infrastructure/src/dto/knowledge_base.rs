use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id_string;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(alias = "filename", alias = "title")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of `POST /knowledge-base/websites/crawl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlRequest {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,
}

impl CrawlRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_pages: None,
            max_depth: None,
        }
    }
}

/// Body of `POST /knowledge-base/apis/connect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiConnectRequest {
    pub name: String,
    pub url: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct KnowledgeTestResult {
    #[serde(default, alias = "response")]
    pub answer: Option<String>,
    #[serde(default)]
    pub sources: Vec<Value>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct KnowledgeStatistics {
    #[serde(default)]
    pub total_documents: u64,
    #[serde(default)]
    pub total_websites: u64,
    #[serde(default)]
    pub total_apis: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
