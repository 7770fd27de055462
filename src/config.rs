use serde::{Deserialize, Serialize};
use std::path::Path;

/// Bot configuration, loaded once at startup from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Relays to subscribe to.
    pub sources: Vec<String>,
    /// Relays replies are published to.
    pub sinks: Vec<String>,
    /// Event kinds to watch. Replies reuse the inbound kind.
    #[serde(default = "default_kinds")]
    pub kinds: Vec<u16>,
    /// Only answer geohashes starting with one of these. Empty means all.
    #[serde(default)]
    pub allowed_prefixes: Vec<String>,
    /// Environment variable holding the bot's `nsec`.
    #[serde(default = "default_nsec_env")]
    pub nsec_env: String,
    #[serde(default)]
    pub geocoder: GeocoderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    /// Nominatim-compatible reverse endpoint.
    pub endpoint: String,
    /// Sent as User-Agent; Nominatim rejects anonymous clients.
    pub user_agent: String,
    /// Value for the Accept-Language header.
    pub language: Option<String>,
    /// Nominatim detail level, 3 (country) to 18 (building).
    pub zoom: u8,
    pub timeout_secs: u64,
}

fn default_kinds() -> Vec<u16> {
    vec![1]
}

fn default_nsec_env() -> String {
    "BOT_NSEC".to_string()
}

impl Config {
    pub async fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Replace both relay sets with `relays`.
    pub fn override_relays(&mut self, relays: &[String]) {
        if relays.is_empty() {
            return;
        }
        self.sources = relays.to_vec();
        self.sinks = relays.to_vec();
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sources: vec!["wss://yabu.me".to_string()],
            sinks: vec!["wss://yabu.me".to_string()],
            kinds: default_kinds(),
            allowed_prefixes: Vec::new(),
            nsec_env: default_nsec_env(),
            geocoder: GeocoderConfig::default(),
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        GeocoderConfig {
            endpoint: "https://nominatim.openstreetmap.org/reverse".to_string(),
            user_agent: format!("georeply/{}", env!("CARGO_PKG_VERSION")),
            language: None,
            zoom: 18,
            timeout_secs: 30,
        }
    }
}
