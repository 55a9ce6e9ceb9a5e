//! Orchestrates one digest run end to end.

use std::time::{SystemTime, UNIX_EPOCH};

use futures::StreamExt;
use tracing::{debug, info, warn};

use super::ChatWorkspace;
use super::aggregate::{build_corpus, strip_mention_annotations};
use super::resolve::{filter_eligible_channels, resolve_exclusions, resolve_target};
use crate::ai::TextGenerator;
use crate::ai::summarize::{candidate_models, summarize};
use crate::core::config::{AppConfig, HistoryFailurePolicy};
use crate::core::models::{ChannelInfo, ChannelMessage, ChannelTranscript};
use crate::errors::DigestError;
use crate::prompt::DIGEST_TITLE;

/// Trailing window over which messages are collected, shared by every channel
/// in a run.
pub const LOOKBACK_SECS: u64 = 7 * 24 * 3600;

/// How a run ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// A digest was generated and posted.
    Posted,
    /// Every eligible channel filtered down to nothing; no backend call, no
    /// post.
    NothingToSummarize,
}

/// Execute one digest run: resolve, collect, aggregate, summarize, publish.
///
/// # Errors
///
/// Surfaces the first run-level failure: channel listing, history collection
/// (under the abort policy), summarization once all candidate models are
/// exhausted, or the final post.
pub async fn run_digest<W, G>(
    workspace: &W,
    backend: &G,
    config: &AppConfig,
) -> Result<RunOutcome, DigestError>
where
    W: ChatWorkspace + ?Sized,
    G: TextGenerator + ?Sized,
{
    info!("Starting weekly digest run");

    let target_id = resolve_target(workspace, &config.summary_channel).await;

    // Independent fetches; the directory degrades on failure instead of
    // surfacing an error.
    let (channels, directory) =
        tokio::join!(workspace.list_channels(), workspace.build_user_directory());
    let channels = channels?;
    if directory.is_degraded() {
        warn!("User directory could not be built; every author will be labeled \"Unknown\"");
    }

    let exclusions = resolve_exclusions(workspace, &config.excluded_channels).await;
    let eligible = filter_eligible_channels(channels, &exclusions, &target_id);
    info!("Found {} channels to process", eligible.len());

    // One window boundary for the whole run, not one per channel.
    let oldest = now_epoch_secs() - LOOKBACK_SECS;

    let transcripts = collect_transcripts(workspace, &eligible, oldest, config).await?;

    let corpus = build_corpus(&transcripts, &directory);
    if corpus.is_empty() {
        info!("No new messages found to summarize");
        return Ok(RunOutcome::NothingToSummarize);
    }

    let models = candidate_models(config.gemini_model.as_deref());
    let digest = summarize(backend, &models, &corpus).await?;
    let digest = strip_mention_annotations(&digest);

    let message = format!("{DIGEST_TITLE}\n\n{digest}");
    info!("Posting summary to channel {}", target_id);
    workspace.post_message(&target_id, &message).await?;

    info!("Weekly digest completed");
    Ok(RunOutcome::Posted)
}

/// Collect history for every eligible channel through a bounded worker pool,
/// preserving channel order. Channels with no messages in the window are
/// dropped here; fully-empty-after-filtering channels are dropped later by
/// the aggregator.
async fn collect_transcripts<W: ChatWorkspace + ?Sized>(
    workspace: &W,
    channels: &[ChannelInfo],
    oldest: u64,
    config: &AppConfig,
) -> Result<Vec<ChannelTranscript>, DigestError> {
    let results: Vec<_> = futures::stream::iter(
        channels
            .iter()
            .cloned()
            .map(|channel| fetch_one(workspace, channel, oldest)),
    )
    .buffered(config.history_concurrency.max(1))
    .collect()
    .await;

    let mut transcripts = Vec::new();
    for (channel, result) in results {
        match result {
            Ok(messages) if messages.is_empty() => {}
            Ok(messages) => transcripts.push(ChannelTranscript {
                channel_name: channel.name.clone(),
                messages,
            }),
            Err(e) => match config.history_failure_policy {
                HistoryFailurePolicy::AbortRun => return Err(e),
                HistoryFailurePolicy::SkipChannel => {
                    warn!(
                        "Skipping #{} after history fetch failure: {}",
                        channel.name, e
                    );
                }
            },
        }
    }

    Ok(transcripts)
}

/// Fetch one channel's history, pairing the result back with its (owned)
/// channel. Written as an explicit `async fn` taking the channel by value —
/// rather than an inline `async move` closure borrowing `&ChannelInfo` — so the
/// per-channel future carries no higher-ranked borrow across the buffered
/// stream. That is what lets the enclosing generic run future satisfy the
/// `Send + 'static` bound when spawned.
async fn fetch_one<W: ChatWorkspace + ?Sized>(
    workspace: &W,
    channel: ChannelInfo,
    oldest: u64,
) -> (ChannelInfo, Result<Vec<ChannelMessage>, DigestError>) {
    debug!("Fetching messages for #{} ({})", channel.name, channel.id);
    let result = workspace.fetch_history(&channel.id, oldest).await;
    (channel, result)
}

fn now_epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
