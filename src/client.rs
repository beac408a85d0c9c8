//! Thin HTTP client for the intelligence agent service.
//!
//! All calls go to the base URL from [`CONFIG`](crate::config::CONFIG),
//! return typed bodies on 2xx and a [`ClientError`] carrying the status
//! line and response text on anything else.

use reqwest::Response;
use serde::de::DeserializeOwned;

use crate::config::CONFIG;
use crate::error::ClientError;
use crate::models::{SearchRequest, SearchResponse, StatusResponse};

#[derive(Debug, Clone)]
pub struct AgentClient {
    client: reqwest::Client,
    base_url: String,
}

impl AgentClient {
    /// Client pointed at the configured agent URL.
    pub fn new() -> AgentClient {
        AgentClient::with_base_url(&CONFIG.agent_api_url)
    }

    pub fn with_base_url(base_url: &str) -> AgentClient {
        AgentClient {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /search` with the full request body, waits for the ranked
    /// results and the generated analysis. Slow by design, the agent runs
    /// reranking and an LLM pass before answering.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, ClientError> {
        log::info!("searching agent for: {}", request.query);
        let response = self
            .client
            .post(format!("{}/search", self.base_url))
            .json(request)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// `GET /status`, the cheap health probe.
    pub async fn status(&self) -> Result<StatusResponse, ClientError> {
        let response = self
            .client
            .get(format!("{}/status", self.base_url))
            .send()
            .await?;
        Self::parse(response).await
    }

    /// `GET /demo`, canned queries the agent suggests for first-time users.
    pub async fn demo(&self) -> Result<serde_json::Value, ClientError> {
        let response = self
            .client
            .get(format!("{}/demo", self.base_url))
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::http(status, &body));
        }
        Ok(response.json::<T>().await?)
    }
}

impl Default for AgentClient {
    fn default() -> AgentClient {
        AgentClient::new()
    }
}
