//! Turns a geotagged note into a signed address reply.

use std::sync::Arc;

use nostr::Event;
use tracing::debug;

use crate::composer;
use crate::error::PipelineError;
use crate::geo;
use crate::geocoder::ReverseGeocoder;
use crate::signer::EventSigner;
use crate::tag::ReplyTag;

/// Answers `g` tags with the reverse-geocoded address.
///
/// # Arguments
/// * `allowed_prefixes` - If empty, every geohash is answered.
///                        Otherwise only geohashes starting with one of these.
#[derive(Clone)]
pub struct GeohashReplyProcessor {
    geocoder: Arc<dyn ReverseGeocoder>,
    signer: EventSigner,
    allowed_prefixes: Vec<String>,
}

impl GeohashReplyProcessor {
    pub fn new(
        geocoder: Arc<dyn ReverseGeocoder>,
        signer: EventSigner,
        allowed_prefixes: Vec<String>,
    ) -> Self {
        Self {
            geocoder,
            signer,
            allowed_prefixes,
        }
    }

    pub fn signer(&self) -> &EventSigner {
        &self.signer
    }

    fn matches_prefix(&self, geohash: &str) -> bool {
        self.allowed_prefixes.is_empty()
            || self
                .allowed_prefixes
                .iter()
                .any(|prefix| geohash.starts_with(prefix.as_str()))
    }

    /// Geohash values of the event's two-element `g` tags, in tag order.
    pub fn geotags(&self, event: &Event) -> Vec<String> {
        event
            .tags
            .iter()
            .filter_map(|tag| match ReplyTag::from_nostr(tag) {
                ReplyTag::Geohash(value) => Some(value),
                _ => None,
            })
            .filter(|value| {
                let allowed = self.matches_prefix(value);
                if !allowed {
                    debug!("Geohash {} outside allowed prefixes", value);
                }
                allowed
            })
            .collect()
    }

    /// Decode, geocode, compose and sign the reply for one geohash.
    pub async fn reply(&self, event: &Event, geohash: &str) -> Result<Event, PipelineError> {
        let coordinate = geo::decode(geohash)?;
        debug!("Geohash {} decoded to {}", geohash, coordinate);

        let address = self.geocoder.reverse(coordinate).await?;
        let content = composer::compose(&address);

        Ok(self.signer.build_reply(event, &content)?)
    }
}
