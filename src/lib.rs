/// recap - a Slack bot that periodically condenses workspace activity into a
/// weekly digest and posts it to a summary channel.
///
/// One run of the pipeline:
/// 1. Resolve the target channel and the configured exclusion list
/// 2. Fetch the channel listing and the user directory (concurrently)
/// 3. Collect the last week of history from every eligible channel
/// 4. Aggregate the messages into a single annotated corpus
/// 5. Summarize the corpus with Gemini, falling back across candidate models
/// 6. Post the digest to the summary channel
///
/// # Architecture
///
/// The system uses:
/// - slack-morphism for Slack history and posting
/// - reqwest for the paginated Slack listing endpoints and the Gemini API
/// - Tokio for async runtime
/// - the `cron` crate for the schedule loop in the binary
// Module declarations
pub mod ai;
pub mod core;
pub mod digest;
pub mod errors;
pub mod prompt;
pub mod schedule;
pub mod slack;

/// Configure structured logging for the process.
///
/// Sets up tracing-subscriber with an env-filter (`RUST_LOG`) defaulting to
/// `info`. Call once at startup.
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
