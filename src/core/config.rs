use std::env;
use std::str::FromStr;

use crate::errors::DigestError;

/// What to do when a single channel's history fetch fails mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryFailurePolicy {
    /// Fail the whole run. One missing channel would otherwise produce an
    /// incomplete digest with no visible signal.
    #[default]
    AbortRun,
    /// Drop the channel with a warning and keep going.
    SkipChannel,
}

impl FromStr for HistoryFailurePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "abort" => Ok(HistoryFailurePolicy::AbortRun),
            "skip" => Ok(HistoryFailurePolicy::SkipChannel),
            other => Err(format!(
                "expected \"abort\" or \"skip\", got \"{other}\""
            )),
        }
    }
}

pub const DEFAULT_CRON_SCHEDULE: &str = "0 9 * * 1";
pub const DEFAULT_HISTORY_CONCURRENCY: usize = 4;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub slack_bot_token: String,
    pub gemini_api_key: String,
    /// Channel id or human name; resolved at the start of each run.
    pub summary_channel: String,
    /// Channel ids or names, never collected even when the bot is a member.
    pub excluded_channels: Vec<String>,
    pub cron_schedule: String,
    /// Preferred model tried ahead of the built-in fallback list.
    pub gemini_model: Option<String>,
    pub history_failure_policy: HistoryFailurePolicy,
    pub history_concurrency: usize,
}

impl AppConfig {
    /// Load configuration from the environment. Missing required values are
    /// collected and reported together; any of them is fatal at startup.
    pub fn from_env() -> Result<Self, DigestError> {
        let mut missing: Vec<&'static str> = Vec::new();

        let slack_bot_token = required("SLACK_BOT_TOKEN", &mut missing);
        let gemini_api_key = required("GEMINI_API_KEY", &mut missing);
        let summary_channel = required("SUMMARY_CHANNEL_ID", &mut missing);

        if !missing.is_empty() {
            return Err(DigestError::Config(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        }

        let excluded_channels = env::var("EXCLUDED_CHANNELS")
            .map(|raw| parse_exclusion_list(&raw))
            .unwrap_or_default();

        let cron_schedule = optional("CRON_SCHEDULE")
            .unwrap_or_else(|| DEFAULT_CRON_SCHEDULE.to_string());

        let gemini_model = optional("GEMINI_MODEL");

        let history_failure_policy = match optional("HISTORY_FAILURE_POLICY") {
            Some(raw) => raw.parse().map_err(|e| {
                DigestError::Config(format!("HISTORY_FAILURE_POLICY: {e}"))
            })?,
            None => HistoryFailurePolicy::default(),
        };

        let history_concurrency = match optional("HISTORY_CONCURRENCY") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|&n| n >= 1)
                .ok_or_else(|| {
                    DigestError::Config(format!(
                        "HISTORY_CONCURRENCY: expected a positive integer, got \"{raw}\""
                    ))
                })?,
            None => DEFAULT_HISTORY_CONCURRENCY,
        };

        Ok(Self {
            slack_bot_token,
            gemini_api_key,
            summary_channel,
            excluded_channels,
            cron_schedule,
            gemini_model,
            history_failure_policy,
            history_concurrency,
        })
    }
}

fn required(name: &'static str, missing: &mut Vec<&'static str>) -> String {
    match env::var(name) {
        Ok(raw) => {
            let value = clean_env_value(&raw);
            if value.is_empty() {
                missing.push(name);
            }
            value
        }
        Err(_) => {
            missing.push(name);
            String::new()
        }
    }
}

fn optional(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|raw| clean_env_value(&raw))
        .filter(|value| !value.is_empty())
}

/// Trim whitespace and strip one wrapping quote pair. Secret stores commonly
/// hand values over with quotes baked in, which would otherwise end up inside
/// HTTP headers.
#[must_use]
pub fn clean_env_value(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| {
            trimmed
                .strip_prefix('\'')
                .and_then(|s| s.strip_suffix('\''))
        })
        .unwrap_or(trimmed);
    unquoted.to_string()
}

/// Split a comma-separated exclusion list, cleaning each entry and dropping
/// empties.
#[must_use]
pub fn parse_exclusion_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(clean_env_value)
        .filter(|entry| !entry.is_empty())
        .collect()
}
