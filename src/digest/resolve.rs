//! Channel and exclusion resolution, plus the eligibility filter.

use std::collections::HashSet;

use tracing::warn;

use super::ChatWorkspace;
use crate::core::models::ChannelInfo;

/// Whether a configured value already is a canonical channel id. Slack
/// reserves the uppercase `C` prefix for real channel identifiers.
#[must_use]
pub fn is_channel_id(value: &str) -> bool {
    value.starts_with('C')
}

/// Resolve the posting target to a canonical id.
///
/// A lookup miss or failure never aborts the run: the configured string is
/// used literally, with a warning, and the post call surfaces any real
/// problem later.
pub async fn resolve_target<W: ChatWorkspace + ?Sized>(
    workspace: &W,
    configured: &str,
) -> String {
    if is_channel_id(configured) {
        return configured.to_string();
    }

    match workspace.find_channel_id_by_name(configured).await {
        Ok(Some(id)) => id,
        Ok(None) => {
            warn!(
                "Could not resolve channel name \"{}\". Using it as-is.",
                configured
            );
            configured.to_string()
        }
        Err(e) => {
            warn!(
                "Failed to look up channel name \"{}\": {}. Using it as-is.",
                configured, e
            );
            configured.to_string()
        }
    }
}

/// Resolve the configured exclusion entries into a set of canonical ids plus
/// the original entries.
///
/// Already-canonical ids pass through untouched. Names that resolve
/// contribute their id *and* stay in the set, so literal name matching still
/// works; names that do not resolve are kept as-is.
pub async fn resolve_exclusions<W: ChatWorkspace + ?Sized>(
    workspace: &W,
    entries: &[String],
) -> HashSet<String> {
    let mut resolved: HashSet<String> = entries.iter().cloned().collect();

    for entry in entries {
        if is_channel_id(entry) {
            continue;
        }
        match workspace.find_channel_id_by_name(entry).await {
            Ok(Some(id)) => {
                resolved.insert(id);
            }
            Ok(None) => {
                warn!(
                    "Excluded channel \"{}\" did not resolve to an id; matching it by name only.",
                    entry
                );
            }
            Err(e) => {
                warn!(
                    "Failed to look up excluded channel \"{}\": {}. Matching it by name only.",
                    entry, e
                );
            }
        }
    }

    resolved
}

/// Channels the run will collect from: bot is a member, not excluded by id
/// or name, and never the target channel itself.
#[must_use]
pub fn filter_eligible_channels(
    channels: Vec<ChannelInfo>,
    exclusions: &HashSet<String>,
    target_id: &str,
) -> Vec<ChannelInfo> {
    channels
        .into_iter()
        .filter(|ch| {
            ch.is_member
                && !exclusions.contains(&ch.id)
                && !exclusions.contains(&ch.name)
                && ch.id != target_id
        })
        .collect()
}
