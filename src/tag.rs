//! Typed view of Nostr tags.
//!
//! On the wire a tag is a list of strings whose first element names it. The
//! bot decodes the handful it cares about into [`ReplyTag`] and keeps the rest
//! verbatim in [`ReplyTag::Other`]. Decoding is lossless: `to_raw` returns the
//! exact list the tag was built from.

use nostr::Tag;

use crate::error::SignError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyTag {
    /// `["g", <geohash>]`
    Geohash(String),
    /// `["t", <topic>]`
    Topic(String),
    /// `["e", <event id>, <relay>?, <marker>?, ...]`
    ///
    /// Anything after the marker (NIP-10 puts the author pubkey there) is
    /// kept in `extra`.
    EventRef {
        id: String,
        relay: Option<String>,
        marker: Option<String>,
        extra: Vec<String>,
    },
    /// `["p", <pubkey>, <relay>?]`
    PubkeyRef { pubkey: String, relay: Option<String> },
    /// Anything else, including known names with an unexpected shape.
    Other(Vec<String>),
}

impl ReplyTag {
    /// Decode a raw tag. Shape is checked positionally; a `g` tag with
    /// three elements, for example, is kept as `Other`.
    pub fn from_raw(raw: &[String]) -> Self {
        match raw {
            [name, value] if name == "g" => Self::Geohash(value.clone()),
            [name, value] if name == "t" => Self::Topic(value.clone()),
            [name, id, rest @ ..] if name == "e" => Self::EventRef {
                id: id.clone(),
                relay: rest.first().cloned(),
                marker: rest.get(1).cloned(),
                extra: rest.iter().skip(2).cloned().collect(),
            },
            [name, pubkey, rest @ ..] if name == "p" && rest.len() <= 1 => Self::PubkeyRef {
                pubkey: pubkey.clone(),
                relay: rest.first().cloned(),
            },
            _ => Self::Other(raw.to_vec()),
        }
    }

    pub fn from_nostr(tag: &Tag) -> Self {
        Self::from_raw(tag.as_slice())
    }

    /// Reply reference to an event, with an empty relay hint.
    pub fn reply_to(id: impl Into<String>) -> Self {
        Self::EventRef {
            id: id.into(),
            relay: Some(String::new()),
            marker: Some("reply".to_string()),
            extra: Vec::new(),
        }
    }

    pub fn pubkey(pubkey: impl Into<String>) -> Self {
        Self::PubkeyRef {
            pubkey: pubkey.into(),
            relay: None,
        }
    }

    pub fn topic(topic: impl Into<String>) -> Self {
        Self::Topic(topic.into())
    }

    pub fn is_event_ref(&self) -> bool {
        matches!(self, Self::EventRef { .. })
    }

    /// The wire representation.
    pub fn to_raw(&self) -> Vec<String> {
        match self {
            Self::Geohash(value) => vec!["g".to_string(), value.clone()],
            Self::Topic(value) => vec!["t".to_string(), value.clone()],
            Self::EventRef {
                id,
                relay,
                marker,
                extra,
            } => {
                let mut raw = vec!["e".to_string(), id.clone()];
                // Later positions force the earlier ones to be present.
                let marker = marker
                    .clone()
                    .or_else(|| (!extra.is_empty()).then(String::new));
                if relay.is_some() || marker.is_some() {
                    raw.push(relay.clone().unwrap_or_default());
                }
                raw.extend(marker);
                raw.extend(extra.iter().cloned());
                raw
            }
            Self::PubkeyRef { pubkey, relay } => {
                let mut raw = vec!["p".to_string(), pubkey.clone()];
                if let Some(relay) = relay {
                    raw.push(relay.clone());
                }
                raw
            }
            Self::Other(raw) => raw.clone(),
        }
    }

    pub fn to_nostr(&self) -> Result<Tag, SignError> {
        let raw = self.to_raw();
        Tag::parse(&raw).map_err(|e| SignError::InvalidTag {
            tag: raw.clone(),
            reason: e.to_string(),
        })
    }
}

/// Ordered tag list that ignores exact duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: Vec<ReplyTag>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `tag` unless an identical tag is already present.
    /// Returns whether the tag was added.
    pub fn append_unique(&mut self, tag: ReplyTag) -> bool {
        let raw = tag.to_raw();
        if self.tags.iter().any(|existing| existing.to_raw() == raw) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn to_raw(&self) -> Vec<Vec<String>> {
        self.tags.iter().map(ReplyTag::to_raw).collect()
    }

    pub fn to_nostr(&self) -> Result<Vec<Tag>, SignError> {
        self.tags.iter().map(ReplyTag::to_nostr).collect()
    }
}
