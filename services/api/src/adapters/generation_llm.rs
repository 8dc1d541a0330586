//! services/api/src/adapters/generation_llm.rs
//!
//! This module contains the adapter for the text-generation LLM. It implements
//! the `GenerationClient` port from the `core` crate against the DeepSeek
//! chat-completions endpoint (OpenAI-compatible wire format).

use async_trait::async_trait;
use reading_coach_core::ports::{GenerationClient, PortError, PortResult};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

const SYSTEM_INSTRUCTIONS: &str = "You are a professional English learning assistant specializing in advanced reading and academic English.";

/// Sampling temperature for passage generation.
const TEMPERATURE: f64 = 0.7;
/// Completion budget per request.
const MAX_TOKENS: u32 = 800;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `GenerationClient` against DeepSeek's API.
#[derive(Clone)]
pub struct DeepSeekClient {
    client: Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl DeepSeekClient {
    /// Creates a new `DeepSeekClient` with the given request timeout.
    ///
    /// The key is assumed non-empty; callers validate the credential via
    /// config before constructing the adapter.
    pub fn new(
        api_base: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base,
            api_key,
            model,
        })
    }
}

//=========================================================================================
// `GenerationClient` Trait Implementation
//=========================================================================================

#[async_trait]
impl GenerationClient for DeepSeekClient {
    /// Sends one chat-completion request and returns the generated text.
    ///
    /// Non-2xx responses and malformed bodies map to `Err`, never partial
    /// or garbled text.
    async fn generate(&self, prompt: &str) -> PortResult<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_INSTRUCTIONS },
                { "role": "user", "content": prompt }
            ],
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        debug!(model = %self.model, "sending generation request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PortError::Unexpected(format!(
                "generation API error {}: {}",
                status, error_text
            )));
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|e| PortError::Unexpected(format!("malformed response body: {}", e)))?;

        let content = raw["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                PortError::Unexpected("no content in generation response".to_string())
            })?
            .to_string();

        Ok(content)
    }
}
