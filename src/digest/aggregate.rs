//! Message filtering, mention annotation and corpus assembly.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::core::models::{ChannelMessage, ChannelTranscript, UserDirectory};

static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@([A-Z0-9]+)>").expect("mention regex"));

static ANNOTATED_MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(<@[A-Z0-9]+>)\s*\([^)]*\)").expect("annotated mention regex"));

/// Display name used when an author id is missing from the directory.
pub const UNKNOWN_USER: &str = "Unknown";

/// Rewrite every inline mention token so it carries the user's display name
/// in parentheses: `<@U1>` becomes `<@U1> (Ann)`. Ids the directory does not
/// know are left untouched.
///
/// This is a readability aid for the model only; the prompt instructs it to
/// emit bare tokens, and [`strip_mention_annotations`] removes anything it
/// failed to drop.
#[must_use]
pub fn annotate_mentions(text: &str, directory: &UserDirectory) -> String {
    MENTION_RE
        .replace_all(text, |caps: &Captures<'_>| {
            match directory.display_name(&caps[1]) {
                Some(name) => format!("{} ({})", &caps[0], name),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Remove `(Name)` annotations left after mention tokens, restoring bare
/// `<@ID>` form. Applied to the model's output before publishing.
#[must_use]
pub fn strip_mention_annotations(text: &str) -> String {
    ANNOTATED_MENTION_RE.replace_all(text, "$1").into_owned()
}

/// A message makes it into the corpus only when a human wrote it and it has
/// text.
fn qualifies(message: &ChannelMessage) -> bool {
    !message.is_bot && message.user.is_some() && !message.text.is_empty()
}

/// Serialize the collected transcripts into the single corpus handed to the
/// summarization backend.
///
/// One header line per channel, one `<@ID> (Name): text` line per qualifying
/// message, channel blocks separated by a blank line, channel order
/// preserved. Channels whose messages all get filtered out are omitted
/// entirely; the result is empty when nothing qualifies anywhere.
#[must_use]
pub fn build_corpus(transcripts: &[ChannelTranscript], directory: &UserDirectory) -> String {
    let mut blocks: Vec<String> = Vec::new();

    for transcript in transcripts {
        let lines: Vec<String> = transcript
            .messages
            .iter()
            .filter(|msg| qualifies(msg))
            .filter_map(|msg| {
                let user = msg.user.as_deref()?;
                let name = directory.display_name(user).unwrap_or(UNKNOWN_USER);
                let text = annotate_mentions(&msg.text, directory);
                Some(format!("<@{user}> ({name}): {text}"))
            })
            .collect();

        if lines.is_empty() {
            continue;
        }

        blocks.push(format!(
            "--- Channel: #{} ---\n{}",
            transcript.channel_name,
            lines.join("\n")
        ));
    }

    blocks.join("\n\n")
}
