//! HTTP client for the two remote collaborators: the Content Generator
//! (`/generate`) and the Session Store (auth + session CRUD). Both live
//! behind the same base URL.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::auth::AuthContext;
use crate::study::{Session, StudyContent};

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    AuthFailed(String),
    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

/// Body of `GET /last_session`. An empty object means no session yet.
#[derive(Debug, Deserialize)]
pub struct LastSessionResponse {
    #[serde(default)]
    pub content: Option<StudyContent>,
}

/// Token + username pair returned by `/login` and `/register`.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: String,
    pub username: String,
}

pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: String) -> Result<Self, BackendError> {
        let base_url = base_url.trim_end_matches('/').to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(BackendError::InvalidUrl(
                "URL must start with http:// or https://".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .connect_timeout(std::time::Duration::from_secs(15))
            .build()?;

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Pull the human-readable message out of an error body. The server
    /// uses `detail` (FastAPI-style) but `error` shows up too.
    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<Value>().await {
            Ok(body) => body
                .get("detail")
                .or_else(|| body.get("error"))
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("request failed with status {}", status)),
            Err(_) => format!("request failed with status {}", status),
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = Self::error_message(response).await;
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::BAD_REQUEST => {
                Err(BackendError::AuthFailed(message))
            }
            _ => Err(BackendError::Server {
                status: status.as_u16(),
                message,
            }),
        }
    }

    /// `POST /generate` — raw generator payload; parsing happens upstream.
    pub async fn generate(&self, text: &str) -> Result<Value, BackendError> {
        let response = self
            .client
            .post(self.url("generate"))
            .json(&json!({ "text": text }))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenResponse, BackendError> {
        let response = self
            .client
            .post(self.url("register"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<TokenResponse, BackendError> {
        let response = self
            .client
            .post(self.url("login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn save_session(
        &self,
        auth: &AuthContext,
        content: &StudyContent,
        title: &str,
    ) -> Result<(), BackendError> {
        let response = self
            .client
            .post(self.url("save_session"))
            .bearer_auth(&auth.token)
            .json(&json!({ "content": content, "title": title }))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    pub async fn last_session(
        &self,
        auth: &AuthContext,
    ) -> Result<Option<StudyContent>, BackendError> {
        let response = self
            .client
            .get(self.url("last_session"))
            .bearer_auth(&auth.token)
            .send()
            .await?;
        let body: LastSessionResponse = Self::check(response).await?.json().await?;
        Ok(body.content)
    }

    pub async fn all_sessions(&self, auth: &AuthContext) -> Result<Vec<Session>, BackendError> {
        let response = self
            .client
            .get(self.url("all_sessions"))
            .bearer_auth(&auth.token)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    pub async fn delete_session(&self, auth: &AuthContext, id: &str) -> Result<(), BackendError> {
        let response = self
            .client
            .delete(self.url(&format!("sessions/{}", id)))
            .bearer_auth(&auth.token)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
