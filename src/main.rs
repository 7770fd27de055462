mod cli;

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{validate_relay_url, Cli};
use georeply::config::Config;
use georeply::geocoder::{NominatimGeocoder, ReverseGeocoder};
use georeply::publisher::{DryRunSink, NostrRelaySink, RelaySink};
use georeply::relay_router::RelayRouter;
use georeply::signer::EventSigner;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();
    cli.validate()?;

    // Default: debug for georeply, only warnings from the relay pool
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("georeply=debug,nostr_relay_pool=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting georeply {}", georeply::VERSION);

    let mut config = if cli.config.exists() {
        info!("Loading configuration from {}", cli.config.display());
        Config::load(&cli.config).await?
    } else {
        info!("Using default configuration");
        let default_config = Config::default();

        info!("Writing default configuration to {}", cli.config.display());
        let toml_string = toml::to_string_pretty(&default_config)?;
        tokio::fs::write(&cli.config, toml_string).await?;

        default_config
    };
    config.override_relays(&cli.relays);

    for relay in config.sources.iter().chain(&config.sinks) {
        validate_relay_url(relay)?;
    }

    let signer = EventSigner::from_env(&config.nsec_env)?;
    let npub = signer.npub()?;
    if cli.show_pubkey {
        println!("{}", npub);
        return Ok(());
    }

    info!("Configuration loaded:");
    info!("  Bot pubkey: {}", npub);
    info!("  Source relays: {:?}", config.sources);
    info!("  Sink relays: {:?}", config.sinks);
    info!("  Kinds: {:?}", config.kinds);

    let geocoder: Arc<dyn ReverseGeocoder> = Arc::new(NominatimGeocoder::new(&config.geocoder)?);
    info!("  Geocoder: {} ({})", geocoder.name(), config.geocoder.endpoint);
    let sink: Arc<dyn RelaySink> = if cli.dry_run {
        info!("Dry run: replies will be logged, not published");
        Arc::new(DryRunSink)
    } else {
        Arc::new(NostrRelaySink::new())
    };

    let relay_router = RelayRouter::new(config, signer, geocoder, sink).await?;
    relay_router.connect().await;

    let shutdown = tokio::signal::ctrl_c();

    tokio::select! {
        result = relay_router.stream_events() => {
            if let Err(e) = result {
                error!("Relay router error: {}", e);
            }
        }
        _ = shutdown => {
            info!("Received shutdown signal");
        }
    }

    info!("Shutting down...");
    relay_router.stats().await.log();
    relay_router.disconnect().await?;

    Ok(())
}
