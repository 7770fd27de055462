use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "georeply")]
#[command(about = "Replies to geohash-tagged Nostr notes with the reverse-geocoded address")]
pub struct Cli {
    /// Configuration file (created with defaults when missing)
    #[arg(long, value_name = "PATH", default_value = "config.toml")]
    pub config: PathBuf,

    /// Relay to subscribe and publish to; repeatable, overrides the config file
    #[arg(long = "relay", value_name = "URL")]
    pub relays: Vec<String>,

    /// Build and log replies without publishing them
    #[arg(long)]
    pub dry_run: bool,

    /// Print the bot's public key and exit
    #[arg(long)]
    pub show_pubkey: bool,
}

impl Cli {
    pub fn validate(&self) -> Result<()> {
        for relay in &self.relays {
            validate_relay_url(relay)?;
        }
        Ok(())
    }
}

/// Relays are websocket endpoints.
pub fn validate_relay_url(url: &str) -> Result<()> {
    let rest = url
        .strip_prefix("wss://")
        .or_else(|| url.strip_prefix("ws://"))
        .ok_or_else(|| anyhow!("Relay URL must start with ws:// or wss://: {}", url))?;

    if rest.is_empty() || rest.starts_with('/') {
        return Err(anyhow!("Relay URL has no host: {}", url));
    }
    Ok(())
}
