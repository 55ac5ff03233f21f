/// Client for the hosted auth service (`<service>/auth/v1`)
///
/// Covers sign-up, password sign-in, sign-out and resolving a bearer token to its user.

use crate::config::DatabaseConfig;
use crate::db::client::ServiceKey;
use crate::db::error::{DbError, DbResult};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

/// User as reported by the auth service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    /// Remaining fields (role, metadata, timestamps) passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Tokens issued by a successful password sign-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    key: ServiceKey,
}

impl AuthClient {
    pub fn new(config: &DatabaseConfig) -> DbResult<Self> {
        Self::with_http(reqwest::Client::new(), config)
    }

    pub fn with_http(http: reqwest::Client, config: &DatabaseConfig) -> DbResult<Self> {
        let base_url = config.url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|_| DbError::InvalidUrl(config.url.clone()))?;
        let key = ServiceKey::parse(&config.anon_key)?;

        Ok(Self {
            http,
            base_url,
            key,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// Register a new account; returns the service's JSON answer as-is
    pub async fn sign_up(&self, email: &str, password: &str) -> DbResult<Value> {
        tracing::debug!("📝 Auth sign-up request");
        let response = self
            .http
            .post(self.url("signup"))
            .header("apikey", self.key.apikey().clone())
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        read_json(response).await
    }

    /// Password sign-in
    pub async fn sign_in(&self, email: &str, password: &str) -> DbResult<Session> {
        tracing::debug!("🔑 Auth sign-in request");
        let response = self
            .http
            .post(self.url("token?grant_type=password"))
            .header("apikey", self.key.apikey().clone())
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        let value = read_json(response).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Revoke `token`; true when the service accepted the logout
    pub async fn sign_out(&self, token: &str) -> DbResult<bool> {
        let response = self
            .http
            .post(self.url("logout"))
            .header("apikey", self.key.apikey().clone())
            .bearer_auth(token)
            .send()
            .await?;
        Ok(response.status().is_success())
    }

    /// Resolve `token` to its user; any non-2xx answer means "no user"
    pub async fn get_user(&self, token: &str) -> DbResult<Option<AuthUser>> {
        let response = self
            .http
            .get(self.url("user"))
            .header("apikey", self.key.apikey().clone())
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::debug!("🚫 Token rejected by auth service: {}", response.status());
            return Ok(None);
        }

        let body = response.text().await?;
        Ok(Some(serde_json::from_str(&body)?))
    }
}

async fn read_json(response: reqwest::Response) -> DbResult<Value> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(DbError::Remote {
            status: status.as_u16(),
            body,
        });
    }
    if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_user_keeps_unknown_fields() {
        let user: AuthUser = serde_json::from_value(json!({
            "id": "00000000-0000-0000-0000-000000000000",
            "email": "guest@regtime.com",
            "role": "authenticated"
        }))
        .unwrap();
        assert_eq!(user.id, Uuid::nil());
        assert_eq!(user.email.as_deref(), Some("guest@regtime.com"));
        assert_eq!(user.extra["role"], "authenticated");
    }

    #[test]
    fn session_tolerates_missing_optional_fields() {
        let session: Session = serde_json::from_value(json!({ "access_token": "t" })).unwrap();
        assert_eq!(session.access_token, "t");
        assert!(session.user.is_none());
    }

    #[test]
    fn urls_live_under_auth_v1() {
        let client = AuthClient::new(&DatabaseConfig {
            url: "http://service.test/".to_string(),
            anon_key: "anon".to_string(),
        })
        .unwrap();
        assert_eq!(client.url("user"), "http://service.test/auth/v1/user");
    }

    #[test]
    fn key_with_newline_is_rejected() {
        let result = AuthClient::new(&DatabaseConfig {
            url: "http://service.test".to_string(),
            anon_key: "anon\n".to_string(),
        });
        assert!(matches!(result, Err(DbError::InvalidApiKey)));
    }
}
