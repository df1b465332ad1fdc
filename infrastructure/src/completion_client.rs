//! Client for an OpenAI-style chat-completions endpoint.
//!
//! Exactly one POST per call: no retries, no streaming.

use crate::config::Config;
use domain::conversation::Turn;
use domain::error::CompletionError;
use domain::ports::CompletionBackend;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use shared::telemetry::Telemetry;
use shared::types::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const REQUEST_TIMEOUT_SECS: u64 = 120;

// Keep error bodies short enough for a single inline message.
const MAX_ERROR_BODY_CHARS: usize = 300;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Turn],
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Clone)]
pub struct HttpCompletionClient {
    client: Arc<Client>,
    config: Config,
    timeout: Duration,
}

impl HttpCompletionClient {
    pub fn new(config: Config) -> Result<Self> {
        Self::with_timeout(config, Duration::from_secs(REQUEST_TIMEOUT_SECS))
    }

    pub fn with_timeout(config: Config, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client: Arc::new(client),
            config,
            timeout,
        })
    }

    fn map_transport(&self, err: reqwest::Error) -> CompletionError {
        if err.is_timeout() {
            CompletionError::Timeout {
                secs: self.timeout.as_secs(),
            }
        } else {
            CompletionError::Transport(err.to_string())
        }
    }
}

impl CompletionBackend for HttpCompletionClient {
    async fn complete(&self, turns: &[Turn]) -> std::result::Result<String, CompletionError> {
        let settings = self.config.resolve()?;
        let request = ChatRequest {
            model: &settings.model,
            messages: turns,
        };
        debug!(model = %settings.model, turns = turns.len(), "Sending completion request");

        let timer = Telemetry::new();
        let response = self
            .client
            .post(&settings.api_url)
            .bearer_auth(&settings.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_transport(e))?;

        let reply = parse_reply(status, &body);
        match &reply {
            Ok(text) => info!(
                status = status.as_u16(),
                chars = text.len(),
                elapsed_ms = timer.elapsed_ms() as u64,
                "Completion received"
            ),
            Err(e) => warn!(status = status.as_u16(), error = %e, "Completion failed"),
        }
        reply
    }
}

/// Interprets a completion response; the first choice's content is the reply.
pub fn parse_reply(status: StatusCode, body: &str) -> std::result::Result<String, CompletionError> {
    if !status.is_success() {
        return Err(CompletionError::HttpStatus {
            status: status.as_u16(),
            body: body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect(),
        });
    }
    let parsed: ChatResponse = serde_json::from_str(body)
        .map_err(|e| CompletionError::ResponseShape(e.to_string()))?;
    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| CompletionError::ResponseShape("no choices in response".into()))?;
    match choice.message.content {
        Some(content) if !content.trim().is_empty() => Ok(content),
        _ => Err(CompletionError::ResponseShape(
            "first choice has no message content".into(),
        )),
    }
}
