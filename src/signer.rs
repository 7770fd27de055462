//! Key handling and reply construction.

use nostr::nips::nip19::{FromBech32, ToBech32};
use nostr::{Event, EventBuilder, Keys, PublicKey, SecretKey, Timestamp};
use tracing::debug;

use crate::error::SignError;
use crate::tag::{ReplyTag, TagSet};

/// Topic attached to every reply.
pub const REPLY_TOPIC: &str = "geohash";

/// Holds the bot's keys and signs reply events.
#[derive(Clone)]
pub struct EventSigner {
    keys: Keys,
}

impl EventSigner {
    /// Decode a bech32 `nsec` secret key.
    pub fn from_nsec(nsec: &str) -> Result<Self, SignError> {
        let secret_key = SecretKey::from_bech32(nsec.trim())
            .map_err(|e| SignError::InvalidSecretKey(e.to_string()))?;
        let signer = Self {
            keys: Keys::new(secret_key),
        };

        // Fail early if the derived key can't be rendered for logs.
        signer.npub()?;
        Ok(signer)
    }

    /// Read the `nsec` from the named environment variable.
    pub fn from_env(var: &str) -> Result<Self, SignError> {
        let nsec =
            std::env::var(var).map_err(|_| SignError::MissingSecretKey(var.to_string()))?;
        Self::from_nsec(&nsec)
    }

    pub fn public_key(&self) -> PublicKey {
        self.keys.public_key()
    }

    pub fn npub(&self) -> Result<String, SignError> {
        self.public_key()
            .to_bech32()
            .map_err(|e| SignError::PublicKey(e.to_string()))
    }

    /// Build and sign a reply to `inbound`.
    ///
    /// The reply keeps the inbound kind, is timestamped one second after it,
    /// and carries the tags from [`reply_tags`].
    pub fn build_reply(&self, inbound: &Event, content: &str) -> Result<Event, SignError> {
        let tags = reply_tags(inbound).to_nostr()?;
        let inbound_at = inbound.created_at.as_u64();
        let created_at = inbound_at
            .checked_add(1)
            .map(Timestamp::from)
            .ok_or(SignError::TimestampOverflow(inbound_at))?;

        let event = EventBuilder::new(inbound.kind, content)
            .tags(tags)
            .custom_created_at(created_at)
            .sign_with_keys(&self.keys)
            .map_err(|e| SignError::Signing(e.to_string()))?;

        debug!("Signed reply {} to {}", event.id, inbound.id);
        Ok(event)
    }
}

impl std::fmt::Debug for EventSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSigner")
            .field("public_key", &self.public_key().to_hex())
            .finish()
    }
}

/// Tags for a reply to `inbound`: topic, reply reference, author reference,
/// then every event reference already on `inbound` so the thread ancestry
/// survives. Exact duplicates are dropped.
pub fn reply_tags(inbound: &Event) -> TagSet {
    let mut tags = TagSet::new();
    tags.append_unique(ReplyTag::topic(REPLY_TOPIC));
    tags.append_unique(ReplyTag::reply_to(inbound.id.to_hex()));
    tags.append_unique(ReplyTag::pubkey(inbound.pubkey.to_hex()));

    for tag in inbound.tags.iter().map(ReplyTag::from_nostr) {
        if tag.is_event_ref() {
            tags.append_unique(tag);
        }
    }
    tags
}
