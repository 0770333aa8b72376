mod action;
mod app;
mod app_state;
mod component;
mod components;
mod feed;
mod overlay;
mod selection;
mod switches;
mod theme;
mod transport;
mod widgets;

use std::sync::Arc;
use std::time::Duration;

use advisor_proto::config::{Config, FeedConfig};
use advisor_proto::feed::StaticFeed;
use advisor_proto::model::EarningsCallEntry;
use advisor_proto::provider::CallFeed;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = advisor_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let log_path = data_dir.join("advisor.log");

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code.
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("advisor log: {}", log_path.display());

    tracing::info!("advisor starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("config load failed, using defaults: {:#}", e);
        Config::default()
    });

    // ── Data feed ────────────────────────────────────────────────────────────
    let feed = build_feed(&config.feed, &config.catalog.entries);

    // ── Run TUI ──────────────────────────────────────────────────────────────
    // No playback engine ships; the transport runs cosmetically.
    let app = app::App::new(&config, feed, None)?;
    app.run().await?;

    tracing::info!("advisor exiting");
    Ok(())
}

fn build_feed(cfg: &FeedConfig, catalog: &[EarningsCallEntry]) -> Arc<dyn CallFeed> {
    let latency = Duration::from_millis(cfg.latency_ms);
    let feed = match &cfg.json_path {
        Some(path) => match StaticFeed::from_json_file(path) {
            Ok(feed) => {
                tracing::info!("feed: loaded {}", path.display());
                feed
            }
            Err(e) => {
                tracing::warn!("feed: {} ({}), using built-in figures", e, path.display());
                StaticFeed::mock(catalog, cfg.price_base, cfg.price_spread)
            }
        },
        None => StaticFeed::mock(catalog, cfg.price_base, cfg.price_spread),
    };
    Arc::new(feed.with_latency(latency))
}
