use slack_morphism::errors::SlackClientError;
use thiserror::Error;

/// Failure classes for a single digest run.
#[derive(Debug, Error)]
pub enum DigestError {
    #[error("Failed to access Slack API: {0}")]
    SlackApi(String),

    #[error("Failed to send HTTP request: {0}")]
    Http(String),

    #[error("Summarization failed: {0}")]
    Summarization(#[from] LlmError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<SlackClientError> for DigestError {
    fn from(error: SlackClientError) -> Self {
        DigestError::SlackApi(error.to_string())
    }
}

impl From<reqwest::Error> for DigestError {
    fn from(error: reqwest::Error) -> Self {
        DigestError::Http(error.to_string())
    }
}

/// Errors from the model backend, classified so the fallback loop can decide
/// whether to advance to the next candidate model or abort.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("model backend returned HTTP {code}: {message}")]
    Status { code: u16, message: String },

    #[error("model backend request failed: {0}")]
    Transport(String),

    #[error("model backend returned no text")]
    EmptyCompletion,
}

impl LlmError {
    /// Whether the fallback loop should try the next candidate model.
    ///
    /// Not-found, rate-limited, internal-error and unavailable responses are
    /// model-specific or transient; anything else (authentication, bad
    /// request, transport failure) aborts immediately.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::Status {
                code: 404 | 429 | 500 | 503,
                ..
            }
        )
    }
}
