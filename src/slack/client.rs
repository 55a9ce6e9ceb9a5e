//! Slack API client module
//!
//! Encapsulates all Slack API interactions with retry logic and error handling.

use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use slack_morphism::hyper_tokio::{SlackClientHyperConnector, SlackHyperClient};
use slack_morphism::prelude::{
    SlackApiChatPostMessageRequest, SlackApiConversationsHistoryRequest,
};
use slack_morphism::{
    SlackApiToken, SlackApiTokenValue, SlackChannelId, SlackMessageContent, SlackTs,
};
use tokio_retry::strategy::jitter;
use tokio_retry::{Retry, strategy::ExponentialBackoff};
use tracing::warn;

use crate::core::models::{ChannelInfo, ChannelMessage, UserDirectory};
use crate::digest::ChatWorkspace;
use crate::errors::DigestError;

// Build the Slack client connector safely without panicking.
// If connector construction fails, store None and surface a DigestError at call sites.
static SLACK_CLIENT: LazyLock<Option<SlackHyperClient>> =
    LazyLock::new(|| match SlackClientHyperConnector::new() {
        Ok(connector) => Some(SlackHyperClient::new(connector)),
        Err(e) => {
            warn!("Failed to create Slack HTTP connector: {}", e);
            None
        }
    });

static HTTP_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new())
});

const CONVERSATIONS_LIST_URL: &str = "https://slack.com/api/conversations.list";
const USERS_LIST_URL: &str = "https://slack.com/api/users.list";
const PAGE_LIMIT: &str = "1000";

#[derive(Debug, Deserialize)]
struct ResponseMetadata {
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConversationsListResponse {
    ok: bool,
    error: Option<String>,
    #[serde(default)]
    channels: Vec<ChannelRecord>,
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct ChannelRecord {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    is_member: bool,
}

#[derive(Debug, Deserialize)]
struct UsersListResponse {
    ok: bool,
    error: Option<String>,
    #[serde(default)]
    members: Vec<UserRecord>,
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    id: String,
    name: Option<String>,
    real_name: Option<String>,
    profile: Option<UserProfile>,
}

#[derive(Debug, Deserialize)]
struct UserProfile {
    display_name: Option<String>,
}

impl UserRecord {
    /// Display name, else real name, else login name. Slack returns empty
    /// strings rather than omitting unset profile fields.
    fn best_name(&self) -> Option<String> {
        self.profile
            .as_ref()
            .and_then(|p| p.display_name.clone())
            .filter(|name| !name.is_empty())
            .or_else(|| self.real_name.clone().filter(|name| !name.is_empty()))
            .or_else(|| self.name.clone().filter(|name| !name.is_empty()))
    }
}

/// Slack API client with retry logic and error handling
pub struct SlackClient {
    token: SlackApiToken,
}

impl SlackClient {
    #[must_use]
    pub fn new(token: String) -> Self {
        Self {
            token: SlackApiToken::new(SlackApiTokenValue::new(token)),
        }
    }

    fn bearer(&self) -> &str {
        &self.token.token_value.0
    }

    async fn with_retry<F, Fut, T>(&self, operation: F) -> Result<T, DigestError>
    where
        F: FnMut() -> Fut + Send,
        Fut: std::future::Future<Output = Result<T, DigestError>> + Send,
        T: Send,
    {
        let strategy = ExponentialBackoff::from_millis(100).map(jitter).take(5);

        Retry::spawn(strategy, operation).await
    }

    async fn fetch_channel_page(
        &self,
        cursor: Option<&str>,
    ) -> Result<(Vec<ChannelRecord>, Option<String>), DigestError> {
        self.with_retry(|| async {
            let mut query: Vec<(&str, &str)> =
                vec![("types", "public_channel"), ("limit", PAGE_LIMIT)];
            if let Some(cursor) = cursor {
                query.push(("cursor", cursor));
            }

            let response: ConversationsListResponse = HTTP_CLIENT
                .get(CONVERSATIONS_LIST_URL)
                .bearer_auth(self.bearer())
                .query(&query)
                .send()
                .await?
                .json()
                .await?;

            if !response.ok {
                return Err(DigestError::SlackApi(format!(
                    "conversations.list error: {}",
                    response.error.unwrap_or_else(|| "unknown".to_string())
                )));
            }

            let next_cursor = response
                .response_metadata
                .and_then(|m| m.next_cursor)
                .filter(|c| !c.is_empty());

            Ok((response.channels, next_cursor))
        })
        .await
    }

    /// Fetch the full channel listing, walking the cursor until exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if any page fetch fails or Slack reports an API error.
    pub async fn list_channels(&self) -> Result<Vec<ChannelInfo>, DigestError> {
        let mut channels = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let (page, next_cursor) = self.fetch_channel_page(cursor.as_deref()).await?;
            channels.extend(page.into_iter().map(|record| ChannelInfo {
                id: record.id,
                name: record.name,
                is_member: record.is_member,
            }));

            match next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(channels)
    }

    /// Find a channel id by exact name match (case-sensitive, leading `#`
    /// stripped). Pages through the listing and returns the first match;
    /// duplicate names resolve to the first encountered.
    ///
    /// # Errors
    ///
    /// Returns an error if any page fetch fails or Slack reports an API error.
    pub async fn find_channel_id_by_name(
        &self,
        name: &str,
    ) -> Result<Option<String>, DigestError> {
        let clean_name = name.strip_prefix('#').unwrap_or(name);
        let mut cursor: Option<String> = None;

        loop {
            let (page, next_cursor) = self.fetch_channel_page(cursor.as_deref()).await?;
            if let Some(channel) = page.into_iter().find(|ch| ch.name == clean_name) {
                return Ok(Some(channel.id));
            }

            match next_cursor {
                Some(next) => cursor = Some(next),
                None => return Ok(None),
            }
        }
    }

    /// Build the user id -> display name directory by walking `users.list`
    /// until the cursor is exhausted.
    ///
    /// Any failure during the walk degrades to an empty directory instead of
    /// failing the run; annotation falls back to "Unknown" for every author.
    pub async fn build_user_directory(&self) -> UserDirectory {
        match self.try_build_user_directory().await {
            Ok(directory) => directory,
            Err(e) => {
                warn!("Failed to build user directory: {}", e);
                UserDirectory::degraded()
            }
        }
    }

    async fn try_build_user_directory(&self) -> Result<UserDirectory, DigestError> {
        let mut names: HashMap<String, String> = HashMap::new();
        let mut cursor: Option<String> = None;

        loop {
            let (members, next_cursor) = self.fetch_user_page(cursor.as_deref()).await?;

            for member in members {
                if let Some(name) = member.best_name() {
                    names.insert(member.id, name);
                }
            }

            match next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        Ok(UserDirectory::new(names))
    }

    async fn fetch_user_page(
        &self,
        cursor: Option<&str>,
    ) -> Result<(Vec<UserRecord>, Option<String>), DigestError> {
        self.with_retry(|| async {
            let mut query: Vec<(&str, &str)> = vec![("limit", PAGE_LIMIT)];
            if let Some(cursor) = cursor {
                query.push(("cursor", cursor));
            }

            let response: UsersListResponse = HTTP_CLIENT
                .get(USERS_LIST_URL)
                .bearer_auth(self.bearer())
                .query(&query)
                .send()
                .await?
                .json()
                .await?;

            if !response.ok {
                return Err(DigestError::SlackApi(format!(
                    "users.list error: {}",
                    response.error.unwrap_or_else(|| "unknown".to_string())
                )));
            }

            let next_cursor = response
                .response_metadata
                .and_then(|m| m.next_cursor)
                .filter(|c| !c.is_empty());

            Ok((response.members, next_cursor))
        })
        .await
    }

    /// Fetch channel history since `oldest` (inclusive lower bound, Unix
    /// seconds), in the order the platform returns it.
    ///
    /// # Errors
    ///
    /// Returns an error if the Slack API call fails. History errors are the
    /// caller's problem: a silently missing channel would produce an
    /// incomplete digest with no visible signal.
    pub async fn fetch_history(
        &self,
        channel_id: &str,
        oldest: u64,
    ) -> Result<Vec<ChannelMessage>, DigestError> {
        self.with_retry(|| async {
            let session = SLACK_CLIENT
                .as_ref()
                .ok_or_else(|| {
                    DigestError::SlackApi("Slack HTTP connector not initialized".to_string())
                })?
                .open_session(&self.token);

            let request = SlackApiConversationsHistoryRequest::new()
                .with_channel(SlackChannelId(channel_id.to_string()))
                .with_oldest(SlackTs(oldest.to_string()));

            let result = session.conversations_history(&request).await?;

            let messages = result
                .messages
                .into_iter()
                .map(|msg| ChannelMessage {
                    user: msg.sender.user.as_ref().map(|u| u.0.clone()),
                    text: msg.content.text.clone().unwrap_or_default(),
                    is_bot: msg.sender.bot_id.is_some(),
                })
                .collect();

            Ok(messages)
        })
        .await
    }

    /// Post a message to a channel. Single best-effort call: no retry, no
    /// chunking even when the text exceeds platform length limits.
    ///
    /// # Errors
    ///
    /// Returns an error if the Slack API call fails.
    pub async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), DigestError> {
        let session = SLACK_CLIENT
            .as_ref()
            .ok_or_else(|| {
                DigestError::SlackApi("Slack HTTP connector not initialized".to_string())
            })?
            .open_session(&self.token);

        let post_req = SlackApiChatPostMessageRequest::new(
            SlackChannelId(channel_id.to_string()),
            SlackMessageContent::new().with_text(text.to_string()),
        );

        session.chat_post_message(&post_req).await?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl ChatWorkspace for SlackClient {
    async fn list_channels(&self) -> Result<Vec<ChannelInfo>, DigestError> {
        SlackClient::list_channels(self).await
    }

    async fn find_channel_id_by_name(
        &self,
        name: &str,
    ) -> Result<Option<String>, DigestError> {
        SlackClient::find_channel_id_by_name(self, name).await
    }

    async fn build_user_directory(&self) -> UserDirectory {
        SlackClient::build_user_directory(self).await
    }

    async fn fetch_history(
        &self,
        channel_id: &str,
        oldest: u64,
    ) -> Result<Vec<ChannelMessage>, DigestError> {
        SlackClient::fetch_history(self, channel_id, oldest).await
    }

    async fn post_message(&self, channel_id: &str, text: &str) -> Result<(), DigestError> {
        SlackClient::post_message(self, channel_id, text).await
    }
}
