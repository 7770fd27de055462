//! Error types for the reply pipeline.
//!
//! Every variant here is recoverable: the router logs it and moves on to the
//! next tag or event. Only closure of the subscription stream ends the loop.

use thiserror::Error;

/// A geohash string could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Empty geohash.
    #[error("empty geohash")]
    Empty,

    /// Character outside the base-32 geohash alphabet.
    #[error("invalid character '{character}' in geohash '{hash}'")]
    InvalidCharacter { hash: String, character: char },

    /// Rejected by the geohash codec itself.
    #[error("malformed geohash: {0}")]
    Malformed(String),
}

/// Reverse geocoding failed.
#[derive(Error, Debug)]
pub enum GeocodeError {
    /// Transport or body decoding failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("geocoding service returned status {status}")]
    Service { status: u16 },

    /// The service found nothing at the coordinate.
    #[error("no address found: {0}")]
    NoResult(String),
}

/// The reply could not be signed.
#[derive(Error, Debug)]
pub enum SignError {
    /// The bech32 secret key could not be decoded.
    #[error("invalid secret key: {0}")]
    InvalidSecretKey(String),

    /// The secret key environment variable is not set.
    #[error("environment variable {0} is not set")]
    MissingSecretKey(String),

    /// The public key could not be encoded.
    #[error("public key encoding failed: {0}")]
    PublicKey(String),

    /// A reply tag was rejected by the event builder.
    #[error("invalid tag {tag:?}: {reason}")]
    InvalidTag { tag: Vec<String>, reason: String },

    /// The reply timestamp would not fit after the inbound one.
    #[error("created_at {0} leaves no room for a later reply")]
    TimestampOverflow(u64),

    /// Signing the event failed.
    #[error("signing failed: {0}")]
    Signing(String),
}

/// Publishing a reply failed.
#[derive(Error, Debug)]
pub enum PublishError {
    /// Could not add or connect to a relay.
    #[error("failed to connect to {relay}: {reason}")]
    Connect { relay: String, reason: String },

    /// The relay did not accept the event.
    #[error("{relay} rejected event: {reason}")]
    Rejected { relay: String, reason: String },

    /// Every configured relay failed.
    #[error("failed to publish on all {attempted} relays")]
    AllRelaysFailed { attempted: usize },
}

/// Failure of a single geotag's decode → geocode → sign run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("decode: {0}")]
    Decode(#[from] DecodeError),

    #[error("geocode: {0}")]
    Geocode(#[from] GeocodeError),

    #[error("sign: {0}")]
    Sign(#[from] SignError),
}
