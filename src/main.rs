use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::Result;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use pagefeed::application::{FeedEvent, spawn_feed};
use pagefeed::domain::entities::{FetchCursor, Item};
use pagefeed::infrastructure::{
    AppConfig, CliArgs, ImageLoader, ImageStore, JsonApiClient, ProbeMonitor,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config() -> Result<(AppConfig, Vec<String>)> {
    let args = CliArgs::parse();
    let prefetch = args.prefetch_image.clone();

    let mut config = AppConfig::load(args.config.as_ref())?;
    config.merge_with_args(args);

    Ok((config, prefetch))
}

fn print_new_items(items: &[Item], from: usize) {
    for item in &items[from..] {
        println!("{:>4}  {}", item.id, item.title);
    }
}

/// Drives the feed to completion the way a scrolling list would: every
/// snapshot replays the near-end row, which triggers the next page until
/// the cursor is exhausted or the list stops growing.
async fn run_feed(config: &AppConfig) -> Result<()> {
    let source = Arc::new(JsonApiClient::new(&config.feed.base_url)?);
    let monitor = ProbeMonitor::spawn(
        config.effective_probe_url(),
        Duration::from_secs(config.probe.interval_secs),
    )?;

    let cursor = FetchCursor::new(config.feed.page_size, config.feed.max_start);
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let handle = spawn_feed(source, &monitor, cursor, event_tx);

    handle.start();

    let mut seen = 0usize;
    while let Some(event) = event_rx.recv().await {
        match event {
            FeedEvent::ListChanged(items) => {
                print_new_items(&items, seen);
                let done = items.len() == seen
                    || items.len() < 2
                    || items.len() as u64 >= u64::from(config.feed.max_start);
                if done {
                    info!(total = items.len(), "Feed complete");
                    break;
                }
                seen = items.len();
                handle.row_visible(items.len() - 2, items.len());
            }
            FeedEvent::NetworkUnavailable => {
                eprintln!("network unavailable, waiting for connectivity");
            }
            FeedEvent::FetchFailed(e) => {
                if e.is_network_error() {
                    eprintln!("transport failure, check connectivity: {e}");
                }
                warn!(error = %e, "Page fetch failed, stopping");
                break;
            }
        }
    }

    Ok(())
}

async fn prefetch_images(config: &AppConfig, urls: Vec<String>) -> Result<()> {
    let store = Arc::new(ImageStore::new(
        config.images.memory_capacity,
        config.images.effective_cache_dir(),
    ));
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let loader = Arc::new(ImageLoader::new(store, event_tx)?);

    let count = urls.len();
    for url in urls {
        loader.load_async(url);
    }

    for _ in 0..count {
        let Some(event) = event_rx.recv().await else {
            break;
        };
        match event.image {
            Some(img) => println!("cached {} ({}x{})", event.url, img.width(), img.height()),
            None => eprintln!("failed to load {}", event.url),
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let (config, prefetch) = load_config()?;
    init_logging(&config)?;

    info!(version = pagefeed::VERSION, "Starting pagefeed");

    run_feed(&config).await?;

    if !prefetch.is_empty() {
        prefetch_images(&config, prefetch).await?;
    }

    Ok(())
}
