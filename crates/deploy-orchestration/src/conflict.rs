//! Conflict resolution seam
//!
//! A deploy that hits an existing process group suspends the whole batch
//! until a human picks a remediation. The coordinator only knows the
//! [`ConflictResolver`] trait; [`ChannelResolver`] bridges it to an
//! embedding UI over a channel, and [`FixedResolver`] answers every
//! conflict the same way for non-interactive runs.

use async_trait::async_trait;
use platform_client::ConflictInfo;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Remediation chosen for one deploy conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictAction {
    /// Leave the existing group alone; the config is recorded as failed.
    Skip,
    /// Delete the existing group, then retry the deploy exactly once.
    Delete,
    /// Move the existing group to the selected version; no redeploy.
    Update,
}

/// A conflict waiting for user input.
#[derive(Debug, Clone)]
pub struct PendingConflict {
    /// Key of the config whose deploy is blocked.
    pub config_key: String,
    /// Name the deploy tried to create.
    pub process_group_name: String,
    /// The group occupying the target location.
    pub existing: ConflictInfo,
}

/// Supplies remediation decisions for deploy conflicts.
///
/// `resolve` blocks the deployment loop for as long as it takes; there is
/// no timeout — the batch waits indefinitely for human input.
#[async_trait]
pub trait ConflictResolver: Send + Sync {
    /// Decide what to do about one blocked deploy.
    async fn resolve(&self, conflict: PendingConflict) -> ConflictAction;
}

/// Answers every conflict with the same action.
#[derive(Debug, Clone, Copy)]
pub struct FixedResolver {
    action: ConflictAction,
}

impl FixedResolver {
    /// Resolver that always answers with `action`.
    pub fn new(action: ConflictAction) -> Self {
        Self { action }
    }
}

#[async_trait]
impl ConflictResolver for FixedResolver {
    async fn resolve(&self, _conflict: PendingConflict) -> ConflictAction {
        self.action
    }
}

/// One conflict handed to the UI side of a [`ChannelResolver`].
#[derive(Debug)]
pub struct ConflictRequest {
    /// The blocked deploy.
    pub conflict: PendingConflict,
    reply: async_channel::Sender<ConflictAction>,
}

impl ConflictRequest {
    /// Answer the waiting coordinator.
    pub fn respond(self, action: ConflictAction) {
        // The coordinator holds the receiver open until it gets an answer;
        // a closed receiver means the batch is already gone.
        let _ = self.reply.try_send(action);
    }
}

/// Channel-backed resolver for embedding UIs.
///
/// The coordinator parks on [`ConflictResolver::resolve`] while the UI
/// receives [`ConflictRequest`]s from the paired receiver and responds at
/// its own pace. A dropped receiver resolves to [`ConflictAction::Skip`]
/// so an abandoned UI cannot wedge the batch forever.
#[derive(Debug, Clone)]
pub struct ChannelResolver {
    requests: async_channel::Sender<ConflictRequest>,
}

impl ChannelResolver {
    /// Create the resolver and the receiver the UI listens on.
    pub fn new() -> (Self, async_channel::Receiver<ConflictRequest>) {
        let (requests, receiver) = async_channel::unbounded();
        (Self { requests }, receiver)
    }
}

#[async_trait]
impl ConflictResolver for ChannelResolver {
    async fn resolve(&self, conflict: PendingConflict) -> ConflictAction {
        let key = conflict.config_key.clone();
        let (reply, answer) = async_channel::bounded(1);
        if self
            .requests
            .send(ConflictRequest { conflict, reply })
            .await
            .is_err()
        {
            warn!("conflict receiver dropped; skipping '{}'", key);
            return ConflictAction::Skip;
        }
        match answer.recv().await {
            Ok(action) => action,
            Err(_) => {
                warn!("conflict request for '{}' dropped unanswered; skipping", key);
                ConflictAction::Skip
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(key: &str) -> PendingConflict {
        PendingConflict {
            config_key: key.to_string(),
            process_group_name: "Alpha-east".to_string(),
            existing: ConflictInfo {
                id: "pg-1".to_string(),
                name: "Alpha-east".to_string(),
                running_count: 2,
                stopped_count: 0,
                has_version_control: true,
            },
        }
    }

    #[tokio::test]
    async fn fixed_resolver_always_answers_its_action() {
        let resolver = FixedResolver::new(ConflictAction::Delete);
        assert_eq!(resolver.resolve(pending("a")).await, ConflictAction::Delete);
        assert_eq!(resolver.resolve(pending("b")).await, ConflictAction::Delete);
    }

    #[tokio::test]
    async fn channel_resolver_round_trips_an_answer() {
        let (resolver, requests) = ChannelResolver::new();

        let waiting = tokio::spawn(async move { resolver.resolve(pending("flow-1-source")).await });

        let request = requests.recv().await.unwrap();
        assert_eq!(request.conflict.config_key, "flow-1-source");
        assert_eq!(request.conflict.existing.running_count, 2);
        request.respond(ConflictAction::Update);

        assert_eq!(waiting.await.unwrap(), ConflictAction::Update);
    }

    #[tokio::test]
    async fn dropped_receiver_degrades_to_skip() {
        let (resolver, requests) = ChannelResolver::new();
        drop(requests);

        assert_eq!(resolver.resolve(pending("a")).await, ConflictAction::Skip);
    }

    #[tokio::test]
    async fn dropped_request_degrades_to_skip() {
        let (resolver, requests) = ChannelResolver::new();

        let waiting = tokio::spawn(async move { resolver.resolve(pending("a")).await });
        drop(requests.recv().await.unwrap());

        assert_eq!(waiting.await.unwrap(), ConflictAction::Skip);
    }
}
