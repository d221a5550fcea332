use std::path::PathBuf;

use clap::Parser;

use super::app_config::LogLevel;

/// Command-line arguments for the demo binary.
#[derive(Debug, Parser)]
#[command(
    name = "pagefeed",
    version,
    about = "Paginated REST feed client with a two-tier image cache",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// List resource endpoint.
    #[arg(long, value_name = "URL", env = "PAGEFEED_BASE_URL")]
    pub base_url: Option<String>,

    /// Items requested per page.
    #[arg(long)]
    pub page_size: Option<u32>,

    /// Offset at which pagination stops.
    #[arg(long)]
    pub max_start: Option<u32>,

    /// Decoded images kept in the memory cache tier.
    #[arg(long)]
    pub memory_capacity: Option<usize>,

    /// Image disk cache root directory.
    #[arg(long, value_name = "PATH")]
    pub cache_dir: Option<PathBuf>,

    /// URL probed for reachability.
    #[arg(long, value_name = "URL")]
    pub probe_url: Option<String>,

    /// Seconds between reachability probes.
    #[arg(long)]
    pub probe_interval: Option<u64>,

    /// Image URL to prefetch into the cache after the feed completes.
    /// May be given multiple times.
    #[arg(long, value_name = "URL")]
    pub prefetch_image: Vec<String>,
}
