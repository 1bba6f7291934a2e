use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{id_string, optional_id_string};

/// Query for paginated listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListQuery {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.name == role)
    }
}

/// An entry of the audit trail behind `/user-activities`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserActivity {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "optional_id_string")]
    pub user_id: Option<String>,
    pub action: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_keeps_unknown_fields() {
        let user: User = serde_json::from_str(
            r#"{"id":3,"name":"Kim","email":"kim@example.com","roles":[{"id":1,"name":"admin"}],"last_login_at":"2024-01-01"}"#,
        )
        .unwrap();

        assert_eq!(user.id, "3");
        assert!(user.has_role("admin"));
        assert_eq!(user.extra["last_login_at"], "2024-01-01");
    }

    #[test]
    fn test_activity_without_user() {
        let activity: UserActivity =
            serde_json::from_str(r#"{"id":"a1","user_id":null,"action":"login"}"#).unwrap();
        assert_eq!(activity.user_id, None);

        let activity: UserActivity =
            serde_json::from_str(r#"{"id":"a2","user_id":9,"action":"logout"}"#).unwrap();
        assert_eq!(activity.user_id.as_deref(), Some("9"));
    }

    #[test]
    fn test_list_query_skips_unset_fields() {
        let query = serde_json::to_value(ListQuery::page(2)).unwrap();
        assert_eq!(query, serde_json::json!({ "page": 2 }));
    }
}
