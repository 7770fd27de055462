use anyhow::Result;
use nostr::prelude::*;
use nostr_sdk::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, Mutex};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::geocoder::ReverseGeocoder;
use crate::processor::GeohashReplyProcessor;
use crate::publisher::{RelayPublisher, RelaySink};
use crate::signer::EventSigner;
use crate::stats::{BotStats, DispatchSummary};

/// Subscribes to the source relays and answers geotagged notes.
#[derive(Clone)]
pub struct RelayRouter {
    config: Config,
    source_client: Client,
    processor: GeohashReplyProcessor,
    publisher: RelayPublisher,
    stats: Arc<Mutex<BotStats>>,
}

impl RelayRouter {
    pub async fn new(
        config: Config,
        signer: EventSigner,
        geocoder: Arc<dyn ReverseGeocoder>,
        sink: Arc<dyn RelaySink>,
    ) -> Result<Self> {
        let source_client = Client::new(Keys::generate());

        for relay_url in &config.sources {
            info!("Adding source relay: {}", relay_url);
            source_client.add_relay(relay_url).await?;
        }

        Ok(Self::with_client(config, source_client, signer, geocoder, sink))
    }

    /// Build around an existing source client. No relays are added.
    pub fn with_client(
        config: Config,
        source_client: Client,
        signer: EventSigner,
        geocoder: Arc<dyn ReverseGeocoder>,
        sink: Arc<dyn RelaySink>,
    ) -> Self {
        let processor =
            GeohashReplyProcessor::new(geocoder, signer, config.allowed_prefixes.clone());
        let publisher = RelayPublisher::new(sink, config.sinks.clone());

        Self {
            config,
            source_client,
            processor,
            publisher,
            stats: Arc::new(Mutex::new(BotStats::new())),
        }
    }

    pub async fn connect(&self) {
        info!("Connecting to source relays...");
        self.source_client.connect().await;
    }

    pub async fn disconnect(&self) -> Result<()> {
        info!("Disconnecting from source relays...");
        self.source_client.disconnect().await;
        Ok(())
    }

    fn filter(&self) -> Filter {
        let kinds: Vec<Kind> = self.config.kinds.iter().map(|k| Kind::from(*k)).collect();
        Filter::new().kinds(kinds).since(Timestamp::now())
    }

    /// Stream events from now on until the relay pool shuts down.
    pub async fn stream_events(&self) -> Result<()> {
        // Grab the receiver before subscribing so nothing is missed.
        let mut notifications = self.source_client.notifications();

        let filter = self.filter();
        info!("[STREAM] Subscribing to kinds {:?}", self.config.kinds);
        let subscription = self.source_client.subscribe(filter, None).await?;
        info!("[STREAM] Subscription created: {:?}", subscription);

        // Decouple the broadcast receiver from slow geocoding.
        let (tx, mut rx) = mpsc::channel::<Event>(1000);
        let forwarder = tokio::spawn(async move {
            loop {
                match notifications.recv().await {
                    Ok(RelayPoolNotification::Event { event, .. }) => {
                        if tx.send(*event).await.is_err() {
                            break;
                        }
                    }
                    Ok(RelayPoolNotification::Shutdown) => {
                        info!("[STREAM] Relay pool shut down");
                        break;
                    }
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!("[STREAM] Dropped {} notifications", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        error!("[STREAM] Notification channel closed");
                        break;
                    }
                }
            }
        });

        let mut checkpoint = tokio::time::interval(Duration::from_secs(60));
        checkpoint.tick().await;

        loop {
            tokio::select! {
                received = rx.recv() => {
                    let Some(event) = received else { break };
                    let summary = self.handle_event(&event).await;
                    self.stats.lock().await.record(summary);
                }
                _ = checkpoint.tick() => {
                    self.stats.lock().await.log();
                }
            }
        }

        forwarder.abort();
        info!("[STREAM] Subscription stream ended");
        self.stats.lock().await.log();
        Ok(())
    }

    /// Answer every geotag of one event. Failures skip the tag.
    pub async fn handle_event(&self, event: &Event) -> DispatchSummary {
        let mut summary = DispatchSummary::default();

        if event.pubkey == self.processor.signer().public_key() {
            debug!("[STREAM] Ignoring own event {}", event.id);
            return summary;
        }
        if !self.config.kinds.contains(&event.kind.as_u16()) {
            debug!("[STREAM] Ignoring event {} of kind {}", event.id, event.kind);
            return summary;
        }

        for geohash in self.processor.geotags(event) {
            summary.geotags += 1;
            debug!("[STREAM] Event {} tagged {}", event.id, geohash);

            let reply = match self.processor.reply(event, &geohash).await {
                Ok(reply) => reply,
                Err(e) => {
                    warn!("[STREAM] Skipping geohash {} on {}: {}", geohash, event.id, e);
                    summary.skipped += 1;
                    continue;
                }
            };

            match self.publisher.publish(&reply).await {
                Ok(_) => summary.replied += 1,
                Err(e) => {
                    warn!("[STREAM] Reply to {} not published: {}", event.id, e);
                    summary.skipped += 1;
                }
            }
        }

        summary
    }

    pub async fn stats(&self) -> BotStats {
        self.stats.lock().await.clone()
    }
}
