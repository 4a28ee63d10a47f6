// REST client for the hosted identity provider's admin API
// Used by the admin users surface; regular authentication never calls out,
// it only validates the provider's signed tokens locally

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::error::AuthError;
use crate::config::Config;

/// A user record as returned by the identity provider
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderUser {
    pub id: Uuid,
    pub email: String,
    pub created_at: Option<DateTime<Utc>>,
    pub last_sign_in_at: Option<DateTime<Utc>>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct ListUsersResponse {
    users: Vec<ProviderUser>,
}

#[derive(Debug, Serialize)]
struct CreateUserRequest<'a> {
    email: &'a str,
    password: &'a str,
    email_confirm: bool,
}

/// Client for identity provider admin operations, constructed once at startup
#[derive(Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl IdentityClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.identity_url.trim_end_matches('/').to_string(),
            service_key: config.identity_service_key.clone(),
        }
    }

    /// List all users registered with the provider
    pub async fn list_users(&self) -> Result<Vec<ProviderUser>, AuthError> {
        let url = format!("{}/admin/users", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.service_key)
            .send()
            .await
            .map_err(|e| AuthError::ProviderError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::ProviderError(format!(
                "list users failed with status {}",
                response.status()
            )));
        }

        let body: ListUsersResponse = response
            .json()
            .await
            .map_err(|e| AuthError::ProviderError(e.to_string()))?;

        Ok(body.users)
    }

    /// Create a user with a confirmed email address
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderUser, AuthError> {
        let url = format!("{}/admin/users", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.service_key)
            .json(&CreateUserRequest {
                email,
                password,
                email_confirm: true,
            })
            .send()
            .await
            .map_err(|e| AuthError::ProviderError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::ProviderError(format!(
                "create user failed with status {}: {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::ProviderError(e.to_string()))
    }

    /// Delete a user from the provider
    pub async fn delete_user(&self, user_id: Uuid) -> Result<(), AuthError> {
        let url = format!("{}/admin/users/{}", self.base_url, user_id);
        let response = self
            .http
            .delete(&url)
            .bearer_auth(&self.service_key)
            .send()
            .await
            .map_err(|e| AuthError::ProviderError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::ProviderError(format!(
                "delete user failed with status {}",
                response.status()
            )));
        }

        Ok(())
    }
}
