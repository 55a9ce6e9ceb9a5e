//! Language-model backend and the multi-model fallback loop.

pub mod client;
pub mod summarize;

pub use client::GeminiClient;

use async_trait::async_trait;

use crate::errors::LlmError;

/// Seam over the text-generation backend so the fallback loop can be
/// exercised without network access.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text from `prompt` using the named model.
    async fn generate(&self, model: &str, prompt: &str) -> Result<String, LlmError>;
}
