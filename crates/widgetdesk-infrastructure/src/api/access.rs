use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::marker::PhantomData;
use widgetdesk_core::error::Result;

use super::client::{ApiClient, Page};
use crate::dto::{ListQuery, Permission, Role, User, UserActivity};

/// Plain REST CRUD over one collection (`/users`, `/roles`, `/permissions`).
#[derive(Debug, Clone)]
pub struct ResourceApi<T> {
    client: ApiClient,
    collection: &'static str,
    _record: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> ResourceApi<T> {
    fn new(client: ApiClient, collection: &'static str) -> Self {
        Self {
            client,
            collection,
            _record: PhantomData,
        }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<T>> {
        self.client
            .get_page(&format!("/{}", self.collection), query)
            .await
    }

    pub async fn get(&self, id: &str) -> Result<T> {
        self.client
            .get(&format!("/{}/{id}", self.collection))
            .await
    }

    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Result<T> {
        self.client
            .post(&format!("/{}", self.collection), body)
            .await
    }

    pub async fn update<B: Serialize + ?Sized>(&self, id: &str, body: &B) -> Result<T> {
        self.client
            .put(&format!("/{}/{id}", self.collection), body)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.client
            .delete(&format!("/{}/{id}", self.collection))
            .await
    }
}

/// Users, roles and permissions.
#[derive(Debug, Clone)]
pub struct AccessApi {
    client: ApiClient,
}

impl AccessApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn users(&self) -> ResourceApi<User> {
        ResourceApi::new(self.client.clone(), "users")
    }

    pub fn roles(&self) -> ResourceApi<Role> {
        ResourceApi::new(self.client.clone(), "roles")
    }

    pub fn permissions(&self) -> ResourceApi<Permission> {
        ResourceApi::new(self.client.clone(), "permissions")
    }

    pub async fn user_roles(&self, user_id: &str) -> Result<Vec<Role>> {
        self.client.get(&format!("/users/{user_id}/roles")).await
    }

    /// Replaces the roles of a user.
    pub async fn assign_roles(&self, user_id: &str, role_ids: &[String]) -> Result<User> {
        self.client
            .post(&format!("/users/{user_id}/roles"), &json!({ "roles": role_ids }))
            .await
    }

    /// Grants or revokes many permissions of a user in one call.
    pub async fn bulk_update_permissions(
        &self,
        user_id: &str,
        permission_ids: &[String],
    ) -> Result<User> {
        self.client
            .post(
                &format!("/users/{user_id}/permissions/bulk"),
                &json!({ "permissions": permission_ids }),
            )
            .await
    }

    pub async fn permission_users(&self, permission_id: &str) -> Result<Vec<User>> {
        self.client
            .get(&format!("/permissions/{permission_id}/users"))
            .await
    }

    pub async fn permission_roles(&self, permission_id: &str) -> Result<Vec<Role>> {
        self.client
            .get(&format!("/permissions/{permission_id}/roles"))
            .await
    }

    pub async fn user_activities(&self, query: &ListQuery) -> Result<Page<UserActivity>> {
        self.client.get_page("/user-activities", query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CannedResponse, serve_once};

    #[tokio::test]
    async fn test_users_list_is_paginated() {
        let server = serve_once(CannedResponse::ok(
            r#"{"success":true,"message":"","data":[{"id":1,"name":"Kim","email":"kim@example.com"}],"pagination":{"current_page":1,"per_page":15,"total":1,"last_page":1}}"#,
        ))
        .await;
        let api = AccessApi::new(ApiClient::new(server.base_url()));

        let page = api.users().list(&ListQuery::page(1)).await.unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].email, "kim@example.com");
        assert_eq!(page.pagination.unwrap().total, 1);
        let request = server.request().await;
        assert_eq!(request.path, "/api/users?page=1");
    }

    #[tokio::test]
    async fn test_bulk_permissions_posts_ids() {
        let server = serve_once(CannedResponse::ok(
            r#"{"success":true,"message":"Updated","data":{"id":"4","name":"Lee","email":"lee@example.com"}}"#,
        ))
        .await;
        let api = AccessApi::new(ApiClient::new(server.base_url()));

        let user = api
            .bulk_update_permissions("4", &["p1".to_string(), "p2".to_string()])
            .await
            .unwrap();

        assert_eq!(user.name, "Lee");
        let request = server.request().await;
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/api/users/4/permissions/bulk");
        assert_eq!(request.json()["permissions"], json!(["p1", "p2"]));
    }
}
