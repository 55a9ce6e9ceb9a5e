//! Fallback loop over candidate models, first success wins.

use tracing::{info, warn};

use super::TextGenerator;
use crate::errors::LlmError;
use crate::prompt::{EMPTY_CORPUS_PLACEHOLDER, build_summary_prompt};

/// Candidate model identifiers in priority order, most preferred first.
pub const MODEL_CANDIDATES: [&str; 5] = [
    "gemini-2.5-flash",
    "gemini-flash-latest",
    "gemini-2.5-flash-lite",
    "gemini-3-flash-preview",
    "gemini-2.0-flash-001",
];

/// Candidate list for a run: the configured preferred model (if any) ahead of
/// the built-in fallbacks, without duplicates.
#[must_use]
pub fn candidate_models(preferred: Option<&str>) -> Vec<String> {
    let mut models: Vec<String> = Vec::with_capacity(MODEL_CANDIDATES.len() + 1);
    if let Some(model) = preferred {
        models.push(model.to_string());
    }
    for candidate in MODEL_CANDIDATES {
        if models.iter().all(|m| m != candidate) {
            models.push(candidate.to_string());
        }
    }
    models
}

/// Summarize `corpus`, trying each candidate model in order until one
/// succeeds.
///
/// Retryable failures (model not found, rate limited, unavailable, internal
/// error) advance to the next candidate; anything else aborts immediately.
/// When every candidate fails the *last* error is surfaced; the most recent
/// failure reason is typically the most specific one.
///
/// An empty corpus short-circuits to a fixed placeholder without touching the
/// backend.
///
/// # Errors
///
/// Returns the final [`LlmError`] once all candidates are exhausted, or the
/// first non-retryable one.
pub async fn summarize<G: TextGenerator + ?Sized>(
    backend: &G,
    models: &[String],
    corpus: &str,
) -> Result<String, LlmError> {
    if corpus.trim().is_empty() {
        return Ok(EMPTY_CORPUS_PLACEHOLDER.to_string());
    }

    let prompt = build_summary_prompt(corpus);
    let mut last_error: Option<LlmError> = None;

    for model in models {
        info!("Attempting summarization with model {}", model);
        match backend.generate(model, &prompt).await {
            Ok(digest) => return Ok(digest),
            Err(e) if e.is_retryable() => {
                warn!("Model {} failed with retryable error: {}", model, e);
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error.unwrap_or_else(|| {
        LlmError::Transport("no candidate models configured".to_string())
    }))
}
