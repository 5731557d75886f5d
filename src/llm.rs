// src/llm.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::{config::Config, error::TransportError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// The hosted model, seen as prompt text in and response text out.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn invoke(&self, prompt: &str) -> Result<String, TransportError>;
}

/// Client for Groq's OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct GroqClient {
    http: Client,
    api_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl GroqClient {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            api_url: config.groq_api_url.clone(),
            api_key: config.groq_api_key.clone(),
            model: config.model_name.clone(),
            temperature: config.temperature,
        }
    }
}

#[async_trait]
impl LlmClient for GroqClient {
    async fn invoke(&self, prompt: &str) -> Result<String, TransportError> {
        let payload = json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": [
                {"role": "user", "content": prompt}
            ]
        });

        let res = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(TransportError::Status { status, body });
        }

        let body: Value = res.json().await?;

        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(str::to_owned)
            .ok_or(TransportError::EmptyCompletion)
    }
}
