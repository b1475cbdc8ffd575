//! HTTP transport for the backend endpoints.
//!
//! Each operation is a single request/response round-trip with no retry or
//! timeout policy beyond what reqwest provides. Non-success statuses and
//! bodies that fail to deserialize are errors; callers decide how to surface
//! them.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::api::{AuthRequest, AuthResponse, RagRequest, RagResponse};
use crate::utils::url::join_endpoint;

pub type BackendResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Seam between the conversation state machine and the network. The chat
/// loop talks to the real backend; tests substitute a scripted one.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn authenticate(&self, request: AuthRequest) -> BackendResult<AuthResponse>;

    async fn query_rag(&self, request: RagRequest) -> BackendResult<RagResponse>;

    /// Ask the backend to drop its stored conversation for a user.
    async fn reset_conversation(&self, user_id: String) -> BackendResult<()>;
}

pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        HttpBackend {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_json<B: Serialize + Sync>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> BackendResult<Value> {
        let url = join_endpoint(&self.base_url, endpoint);
        debug!(%url, "posting request");

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(format!("Backend request failed with status {status}: {error_text}").into());
        }

        let value = response.json::<Value>().await?;

        // The backend reports some failures as 200 bodies with an "error"
        // key (e.g. a /rag call without a user id). Fail closed on those.
        if let Some(message) = value.get("error").and_then(Value::as_str) {
            return Err(format!("Backend error: {message}").into());
        }

        Ok(value)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn authenticate(&self, request: AuthRequest) -> BackendResult<AuthResponse> {
        let value = self.post_json("auth", &request).await?;
        let response: AuthResponse = serde_json::from_value(value)?;
        debug!(authenticated = response.authenticated, "auth response");
        Ok(response)
    }

    async fn query_rag(&self, request: RagRequest) -> BackendResult<RagResponse> {
        let value = self.post_json("rag", &request).await?;
        let response: RagResponse = serde_json::from_value(value)?;
        Ok(response)
    }

    async fn reset_conversation(&self, user_id: String) -> BackendResult<()> {
        let body = serde_json::json!({ "user_id": &user_id });
        self.post_json("reset", &body).await?;
        debug!(%user_id, "remote conversation reset");
        Ok(())
    }
}
