pub mod composer;
pub mod config;
pub mod error;
pub mod geo;
pub mod geocoder;
pub mod processor;
pub mod publisher;
pub mod relay_router;
pub mod signer;
pub mod stats;
pub mod tag;

// Re-export commonly used types for convenience
pub use config::{Config, GeocoderConfig};
pub use error::{DecodeError, GeocodeError, PipelineError, PublishError, SignError};
pub use geo::GeoCoordinate;
pub use geocoder::{Address, NominatimGeocoder, ReverseGeocoder};
pub use processor::GeohashReplyProcessor;
pub use publisher::{DryRunSink, NostrRelaySink, PublishReport, RelayPublisher, RelaySink};
pub use relay_router::RelayRouter;
pub use signer::EventSigner;
pub use stats::{BotStats, DispatchSummary};
pub use tag::{ReplyTag, TagSet};

// Re-export nostr types that are commonly needed by callers and tests
pub use nostr::{Event, Timestamp};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
