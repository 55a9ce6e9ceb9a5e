//! Gemini API client module
//!
//! Encapsulates the `generateContent` REST calls for producing digests.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::info;

use super::TextGenerator;
use crate::errors::LlmError;

const GENERATE_CONTENT_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

static HTTP_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(300))
        .build()
        .unwrap_or_else(|_| Client::new())
});

/// Gemini API client for generating summaries
pub struct GeminiClient {
    api_key: String,
}

impl GeminiClient {
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self { api_key }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, LlmError> {
        #[cfg(feature = "debug-logs")]
        info!("Using Gemini prompt:\n{}", prompt);

        #[cfg(not(feature = "debug-logs"))]
        info!(
            "Generating summary with model {} ({} prompt chars)",
            model,
            prompt.len()
        );

        let url = format!("{GENERATE_CONTENT_BASE}/{model}:generateContent");
        let request_body = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        let response = HTTP_CLIENT
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Transport(format!("Gemini API request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|e| {
                format!("failed to read error response body (status {status}): {e}")
            });
            return Err(LlmError::Status {
                code: status.as_u16(),
                message,
            });
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| LlmError::Transport(format!("failed to parse Gemini response: {e}")))?;

        extract_text(&response_json).ok_or(LlmError::EmptyCompletion)
    }
}

/// Pull the generated text out of a `generateContent` response: the first
/// candidate's text parts, joined.
fn extract_text(response: &Value) -> Option<String> {
    let parts = response
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(|p| p.as_array())?;

    let collected: Vec<&str> = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect();

    if collected.is_empty() {
        None
    } else {
        Some(collected.join(""))
    }
}
