//! Wire types for the widget backend.
//!
//! The backend is loose about shapes: ids arrive as numbers or strings and
//! records carry fields this console does not model. DTOs keep unknown
//! fields in an `extra` map so nothing is lost on a read-modify-write.

mod access;
mod analytics;
mod knowledge_base;
mod widget;

pub use access::{ListQuery, Permission, Role, User, UserActivity};
pub use analytics::{AnalyticsQuery, DashboardMetrics, DateRange};
pub use knowledge_base::{
    ApiConnectRequest, CrawlRequest, KnowledgeDocument, KnowledgeStatistics, KnowledgeTestResult,
};
pub use widget::{EmbedSnippets, WidgetPayload, WidgetRecord, WidgetTestResult};

use serde::{Deserialize, Deserializer};

/// Accepts `7` as well as `"7"` for record ids.
pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

/// Like [`id_string`] for ids that may be absent or null.
pub(crate) fn optional_id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "id_string")] String);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|Wrapper(id)| id))
}
