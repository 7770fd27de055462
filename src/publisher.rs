//! Fan-out publishing of signed replies.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use nostr::Event;
use nostr_sdk::Client;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::error::PublishError;

/// Publishes one event to one relay.
#[async_trait]
pub trait RelaySink: Send + Sync {
    async fn publish(&self, relay: &str, event: &Event) -> Result<(), PublishError>;
}

/// Opens a fresh client per publish: add relay, connect, send, disconnect.
#[derive(Debug, Clone, Default)]
pub struct NostrRelaySink;

impl NostrRelaySink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RelaySink for NostrRelaySink {
    async fn publish(&self, relay: &str, event: &Event) -> Result<(), PublishError> {
        let client = Client::default();
        client
            .add_relay(relay)
            .await
            .map_err(|e| PublishError::Connect {
                relay: relay.to_string(),
                reason: e.to_string(),
            })?;

        client.connect().await;
        let result = client.send_event(event.clone()).await;
        client.disconnect().await;

        match result {
            Ok(output) if !output.success.is_empty() => Ok(()),
            Ok(output) => {
                debug!("[PUBLISH] {} failures: {:?}", relay, output.failed);
                Err(PublishError::Rejected {
                    relay: relay.to_string(),
                    reason: "event was not acknowledged".to_string(),
                })
            }
            Err(e) => Err(PublishError::Rejected {
                relay: relay.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

/// Logs events instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct DryRunSink;

#[async_trait]
impl RelaySink for DryRunSink {
    async fn publish(&self, relay: &str, event: &Event) -> Result<(), PublishError> {
        info!(
            "[DRY-RUN] Would publish {} to {}:\n{}",
            event.id, relay, event.content
        );
        Ok(())
    }
}

/// Outcome of a fan-out where at least one relay accepted the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishReport {
    pub attempted: usize,
    pub succeeded: usize,
}

/// Sends an event to every configured relay concurrently.
#[derive(Clone)]
pub struct RelayPublisher {
    sink: Arc<dyn RelaySink>,
    relays: Vec<String>,
}

impl RelayPublisher {
    pub fn new(sink: Arc<dyn RelaySink>, relays: Vec<String>) -> Self {
        Self { sink, relays }
    }

    /// Publish to all relays and wait for every attempt to finish.
    ///
    /// A failing relay never cancels the others. Succeeds if at least one
    /// relay accepted the event.
    pub async fn publish(&self, event: &Event) -> Result<PublishReport, PublishError> {
        let success = Arc::new(AtomicUsize::new(0));
        let mut tasks = JoinSet::new();

        for relay in &self.relays {
            let sink = Arc::clone(&self.sink);
            let success = Arc::clone(&success);
            let relay = relay.clone();
            let event = event.clone();

            tasks.spawn(async move {
                match sink.publish(&relay, &event).await {
                    Ok(()) => {
                        debug!("[PUBLISH] {} accepted {}", relay, event.id);
                        success.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(e) => warn!("[PUBLISH] {}", e),
                }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                warn!("[PUBLISH] Publish task failed: {}", e);
            }
        }

        let report = PublishReport {
            attempted: self.relays.len(),
            succeeded: success.load(Ordering::SeqCst),
        };

        if report.succeeded == 0 {
            return Err(PublishError::AllRelaysFailed {
                attempted: report.attempted,
            });
        }

        info!(
            "[PUBLISH] Event {} accepted by {}/{} relays",
            event.id, report.succeeded, report.attempted
        );
        Ok(report)
    }
}
