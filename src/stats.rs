use std::time::Instant;

use tracing::info;

/// Outcome of dispatching one inbound event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Geotags that matched and entered the pipeline.
    pub geotags: usize,
    /// Replies accepted by at least one relay.
    pub replied: usize,
    /// Geotags dropped at some pipeline stage.
    pub skipped: usize,
}

/// In-memory counters for the running bot. Nothing is persisted.
#[derive(Debug, Clone)]
pub struct BotStats {
    pub started_at: Instant,
    pub events_seen: u64,
    pub geotags_seen: u64,
    pub replies_published: u64,
    pub tags_skipped: u64,
}

impl BotStats {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            events_seen: 0,
            geotags_seen: 0,
            replies_published: 0,
            tags_skipped: 0,
        }
    }

    pub fn record(&mut self, summary: DispatchSummary) {
        self.events_seen += 1;
        self.geotags_seen += summary.geotags as u64;
        self.replies_published += summary.replied as u64;
        self.tags_skipped += summary.skipped as u64;
    }

    pub fn summary(&self) -> String {
        format!(
            "Events: {}, Geotags: {}, Replies: {}, Skipped: {}, Uptime: {}s",
            self.events_seen,
            self.geotags_seen,
            self.replies_published,
            self.tags_skipped,
            self.started_at.elapsed().as_secs()
        )
    }

    pub fn log(&self) {
        info!("[STATS] {}", self.summary());
    }
}

impl Default for BotStats {
    fn default() -> Self {
        Self::new()
    }
}
