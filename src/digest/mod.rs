//! The summary-generation pipeline: resolution, aggregation, orchestration.

pub mod aggregate;
pub mod resolve;
pub mod run;

pub use run::{RunOutcome, run_digest};

use async_trait::async_trait;

use crate::core::models::{ChannelInfo, ChannelMessage, UserDirectory};
use crate::errors::DigestError;

/// Everything the pipeline needs from the chat platform. One production
/// implementation (the Slack client); in-memory fakes in tests.
#[async_trait]
pub trait ChatWorkspace: Send + Sync {
    /// Full channel listing, cursor-paginated until exhausted.
    async fn list_channels(&self) -> Result<Vec<ChannelInfo>, DigestError>;

    /// First channel id whose name matches exactly (leading `#` stripped),
    /// or `None`.
    async fn find_channel_id_by_name(
        &self,
        name: &str,
    ) -> Result<Option<String>, DigestError>;

    /// User id -> display name mapping; degrades to empty on failure rather
    /// than failing the run.
    async fn build_user_directory(&self) -> UserDirectory;

    /// Channel history since `oldest` (Unix seconds, inclusive). Errors
    /// propagate to the caller.
    async fn fetch_history(
        &self,
        channel_id: &str,
        oldest: u64,
    ) -> Result<Vec<ChannelMessage>, DigestError>;

    /// Single best-effort post to a channel.
    async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), DigestError>;
}
