use std::collections::HashMap;

/// A channel as returned by the workspace listing. Identity is `id`; the
/// listing is fetched fresh each run and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    pub id: String,
    pub name: String,
    pub is_member: bool,
}

/// A single message collected from channel history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMessage {
    /// Author user id, absent for some system messages.
    pub user: Option<String>,
    pub text: String,
    /// Set when the platform marked the sender as a bot integration.
    pub is_bot: bool,
}

/// The collected history of one eligible channel, in the order the platform
/// returned it.
#[derive(Debug, Clone)]
pub struct ChannelTranscript {
    pub channel_name: String,
    pub messages: Vec<ChannelMessage>,
}

/// Workspace-wide user id -> display name mapping, built once per run and
/// read-only thereafter.
///
/// A failed directory build produces an empty mapping flagged `degraded`, so
/// the caller can warn loudly instead of silently labeling every author
/// "Unknown".
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    names: HashMap<String, String>,
    degraded: bool,
}

impl UserDirectory {
    #[must_use]
    pub fn new(names: HashMap<String, String>) -> Self {
        Self {
            names,
            degraded: false,
        }
    }

    /// An empty directory standing in for one that could not be built.
    #[must_use]
    pub fn degraded() -> Self {
        Self {
            names: HashMap::new(),
            degraded: true,
        }
    }

    #[must_use]
    pub fn display_name(&self, user_id: &str) -> Option<&str> {
        self.names.get(user_id).map(String::as_str)
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(String, String)> for UserDirectory {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
