use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use recap::ai::GeminiClient;
use recap::core::config::AppConfig;
use recap::digest::run_digest;
use recap::schedule::{next_occurrence, parse_schedule};
use recap::slack::SlackClient;

#[tokio::main]
async fn main() -> Result<()> {
    recap::setup_logging();

    // Absence of any required value is fatal here, before any scheduling.
    let config = Arc::new(AppConfig::from_env().context("configuration error")?);

    let slack = Arc::new(SlackClient::new(config.slack_bot_token.clone()));
    let gemini = Arc::new(GeminiClient::new(config.gemini_api_key.clone()));

    if std::env::args().any(|arg| arg == "--run-now") {
        info!("Running summary immediately...");
        let outcome = run_digest(&*slack, &*gemini, &config)
            .await
            .context("immediate run failed")?;
        info!("Immediate run completed: {:?}", outcome);
        return Ok(());
    }

    let schedule = parse_schedule(&config.cron_schedule)?;
    info!(
        "Scheduling weekly summary with cron: {}",
        config.cron_schedule
    );

    // One run at a time: if a run is still in flight when the schedule fires
    // again, the tick is skipped rather than racing it to a double post.
    let run_lock = Arc::new(Mutex::new(()));

    loop {
        let Some(next) = next_occurrence(&schedule, Utc::now()) else {
            bail!("cron schedule \"{}\" has no future occurrences", config.cron_schedule);
        };

        let wait = (next - Utc::now()).to_std().unwrap_or_default();
        info!("Next digest run at {}", next);
        tokio::time::sleep(wait).await;

        let Ok(guard) = run_lock.clone().try_lock_owned() else {
            warn!("Previous digest run still in progress; skipping this trigger");
            continue;
        };

        let slack = Arc::clone(&slack);
        let gemini = Arc::clone(&gemini);
        let config = Arc::clone(&config);
        tokio::spawn(async move {
            let _guard = guard;
            match run_digest(&*slack, &*gemini, &config).await {
                Ok(outcome) => info!("Digest run finished: {:?}", outcome),
                Err(e) => error!("Digest run failed: {}", e),
            }
        });
    }
}
