//! Typed wrappers over the backend REST endpoints.

mod access;
mod analytics;
mod client;
mod knowledge_base;
mod widgets;

pub use access::{AccessApi, ResourceApi};
pub use analytics::AnalyticsApi;
pub use client::{ApiClient, ApiEnvelope, Page, Pagination, interpret};
pub use knowledge_base::{KnowledgeBaseApi, infer_mime_type};
pub use widgets::WidgetsApi;
