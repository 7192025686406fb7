//! OpenAI-compatible chat-completions client.
//!
//! Talks to an Azure-style deployment endpoint
//! (`{endpoint}/openai/deployments/{deployment}/chat/completions`) over plain
//! HTTPS with reqwest. Every call is a single round trip — no streaming, no
//! retries; failures surface as [`ProviderError`] and propagate to whoever
//! drove the session.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use writersroom::clients::openai::OpenAIClient;
//! use writersroom::{ChatConfig, ClientWrapper};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ChatConfig::from_env()?;
//!     let client = Arc::new(OpenAIClient::from_config(&config));
//!     let reply = client
//!         .complete("You are terse.", "user: Say hello in four words.\n")
//!         .await?;
//!     println!("{}", reply);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::writersroom::client_wrapper::{ClientWrapper, ProviderError};
use crate::writersroom::config::ChatConfig;

const API_VERSION: &str = "2024-06-01";

/// Completion client for OpenAI-compatible deployment endpoints.
pub struct OpenAIClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    deployment: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: Vec<WireMessage<'a>>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: String,
}

impl OpenAIClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Self {
        OpenAIClient {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            deployment: deployment.into(),
        }
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(&config.endpoint, &config.api_key, &config.deployment)
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            API_VERSION
        )
    }
}

#[async_trait]
impl ClientWrapper for OpenAIClient {
    async fn complete(&self, instructions: &str, context: &str) -> Result<String, ProviderError> {
        let request = ChatRequest {
            messages: vec![
                WireMessage {
                    role: "system",
                    content: instructions,
                },
                WireMessage {
                    role: "user",
                    content: context,
                },
            ],
        };

        let response = self
            .http
            .post(self.completions_url())
            .header("api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                log::error!("completion request to {} failed: {}", self.deployment, err);
                ProviderError::Http(err.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_api_error(&body).unwrap_or(body);
            log::error!(
                "completion service answered HTTP {} for {}: {}",
                status,
                self.deployment,
                message
            );
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|err| ProviderError::Http(err.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(ProviderError::EmptyResponse)
    }
}

/// Pull the human-readable message out of an API error payload, when the body
/// is the usual `{"error": {"message": ...}}` JSON shape.
fn extract_api_error(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(|s| s.to_string())
}
