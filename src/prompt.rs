//! The instruction template handed to the summarization backend.

/// Returned in place of a digest when there is nothing to summarize.
pub const EMPTY_CORPUS_PLACEHOLDER: &str = "No messages were found for this period.";

/// Title line prefixed to every published digest, naming the lookback window.
pub const DIGEST_TITLE: &str = "*Weekly Slack Summary (Previous 7 Days)*";

/// Embed the aggregated corpus in the fixed summarization instructions.
///
/// The user-linking rules are the soft half of the mention-annotation
/// contract: the aggregator appends `(Display Name)` after each mention token
/// so the model knows who is who, and the model is instructed to emit bare
/// `<@ID>` tokens so they stay clickable in Slack.
#[must_use]
pub fn build_summary_prompt(corpus: &str) -> String {
    format!(
        "You are a helpful Slack bot that summarizes weekly conversations.\n\
         \n\
         TASK:\n\
         Summarize the following Slack conversations.\n\
         Identify key topics, decisions made, and action items.\n\
         \n\
         USER LINKING RULES (CRITICAL):\n\
         1. You will see users formatted as `<@ID> (Real Name)`.\n\
         2. In your summary, when referring to a user, ALWAYS use the `<@ID>` format (e.g., <@U12345>).\n\
         3. This ensures they are clickable links in Slack.\n\
         4. DO NOT include the \"(Real Name)\" part in the summary output.\n\
         \n\
         FORMATTING RULES for Slack (CRITICAL):\n\
         1. Use Slack's \"mrkdwn\" syntax.\n\
         2. Use *bold* (single asterisk) for bolding, NOT **bold**.\n\
         3. Use > for blockquotes.\n\
         4. Use - or \u{2022} for bullet points.\n\
         5. Do NOT use # for headers. Use *Bold Headers* instead.\n\
         6. Use `code` for technical terms or small snippets.\n\
         7. Keep the tone professional but friendly.\n\
         8. Mention specific users by name where relevant.\n\
         \n\
         Conversations:\n\
         {corpus}\n"
    )
}
