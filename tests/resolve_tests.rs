use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use recap::core::models::{ChannelInfo, ChannelMessage, UserDirectory};
use recap::digest::ChatWorkspace;
use recap::digest::resolve::{
    filter_eligible_channels, is_channel_id, resolve_exclusions, resolve_target,
};
use recap::errors::DigestError;

/// Workspace stub that only answers name lookups, recording each one.
struct LookupStub {
    names: HashMap<&'static str, &'static str>,
    lookups: Mutex<Vec<String>>,
}

impl LookupStub {
    fn new(names: Vec<(&'static str, &'static str)>) -> Self {
        Self {
            names: names.into_iter().collect(),
            lookups: Mutex::new(Vec::new()),
        }
    }

    fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatWorkspace for LookupStub {
    async fn list_channels(&self) -> Result<Vec<ChannelInfo>, DigestError> {
        Ok(Vec::new())
    }

    async fn find_channel_id_by_name(
        &self,
        name: &str,
    ) -> Result<Option<String>, DigestError> {
        self.lookups.lock().unwrap().push(name.to_string());
        Ok(self.names.get(name).map(|id| (*id).to_string()))
    }

    async fn build_user_directory(&self) -> UserDirectory {
        UserDirectory::default()
    }

    async fn fetch_history(
        &self,
        _channel_id: &str,
        _oldest: u64,
    ) -> Result<Vec<ChannelMessage>, DigestError> {
        Ok(Vec::new())
    }

    async fn post_message(&self, _channel_id: &str, _text: &str) -> Result<(), DigestError> {
        Ok(())
    }
}

fn channel(id: &str, name: &str, is_member: bool) -> ChannelInfo {
    ChannelInfo {
        id: id.to_string(),
        name: name.to_string(),
        is_member,
    }
}

#[test]
fn test_is_channel_id() {
    assert!(is_channel_id("C12345678"));
    assert!(!is_channel_id("general"));
    assert!(!is_channel_id("#general"));
}

#[tokio::test]
async fn test_resolve_target_passes_canonical_id_through() {
    let stub = LookupStub::new(vec![]);
    let resolved = resolve_target(&stub, "C999").await;

    assert_eq!(resolved, "C999");
    assert!(
        stub.lookups().is_empty(),
        "an already-canonical id must not trigger a lookup"
    );
}

#[tokio::test]
async fn test_resolve_target_by_name() {
    let stub = LookupStub::new(vec![("eng", "C1")]);
    assert_eq!(resolve_target(&stub, "eng").await, "C1");
}

#[tokio::test]
async fn test_resolve_target_miss_degrades_to_literal() {
    let stub = LookupStub::new(vec![]);
    assert_eq!(
        resolve_target(&stub, "ghost").await,
        "ghost",
        "an unresolvable name must be used literally, never aborting the run"
    );
}

#[tokio::test]
async fn test_resolve_exclusions_canonical_ids_are_a_noop() {
    let stub = LookupStub::new(vec![]);
    let entries = vec!["C1".to_string(), "C2".to_string()];

    let resolved = resolve_exclusions(&stub, &entries).await;

    assert_eq!(resolved, HashSet::from(["C1".to_string(), "C2".to_string()]));
    assert!(
        stub.lookups().is_empty(),
        "canonical ids must resolve as the identity function"
    );
}

#[tokio::test]
async fn test_resolve_exclusions_names_contribute_ids_and_stay() {
    let stub = LookupStub::new(vec![("random", "C7")]);
    let entries = vec!["random".to_string(), "ghost".to_string()];

    let resolved = resolve_exclusions(&stub, &entries).await;

    assert!(resolved.contains("C7"), "resolved names must add their id");
    assert!(
        resolved.contains("random"),
        "resolved names must also remain for literal matching"
    );
    assert!(
        resolved.contains("ghost"),
        "unresolvable names must be kept as-is"
    );
    assert_eq!(stub.lookups(), vec!["random", "ghost"]);
}

#[test]
fn test_filter_excludes_target_even_when_not_in_exclusion_set() {
    let channels = vec![channel("C1", "eng", true), channel("C2", "random", true)];

    let eligible = filter_eligible_channels(channels, &HashSet::new(), "C2");

    assert_eq!(eligible.len(), 1);
    assert_eq!(eligible[0].id, "C1");
}

#[test]
fn test_filter_requires_membership() {
    let channels = vec![channel("C1", "eng", false), channel("C2", "ops", true)];

    let eligible = filter_eligible_channels(channels, &HashSet::new(), "C9");

    assert_eq!(eligible.len(), 1, "non-member channels are not eligible");
    assert_eq!(eligible[0].id, "C2");
}

#[test]
fn test_filter_excludes_by_id_and_by_name() {
    let channels = vec![
        channel("C1", "eng", true),
        channel("C2", "ops", true),
        channel("C3", "random", true),
    ];
    let exclusions = HashSet::from(["C1".to_string(), "random".to_string()]);

    let eligible = filter_eligible_channels(channels, &exclusions, "C9");

    assert_eq!(eligible.len(), 1);
    assert_eq!(eligible[0].id, "C2");
}

#[test]
fn test_filter_output_never_larger_than_input() {
    let channels = vec![channel("C1", "eng", true)];
    let eligible = filter_eligible_channels(channels.clone(), &HashSet::new(), "C9");
    assert!(eligible.len() <= channels.len());
}
