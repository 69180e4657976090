//! Graphwire CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "graphwire")]
#[command(about = "Query a knowledge-graph service and follow its live events", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// TOML file with connection settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Service base URL [env: GRAPHWIRE_BASE_URL]
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Path prefix for every API request [env: GRAPHWIRE_API_PREFIX]
    #[arg(long, global = true)]
    api_prefix: Option<String>,

    /// Per-request timeout in milliseconds [env: GRAPHWIRE_TIMEOUT_MS]
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Event stream path [env: GRAPHWIRE_WS_PATH]
    #[arg(long, global = true)]
    ws_path: Option<String>,

    /// Reconnect delay in milliseconds [env: GRAPHWIRE_RETRY_MS]
    #[arg(long, global = true)]
    retry_ms: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service health
    Health,
    /// Show graph statistics
    Stats,
    /// List nodes
    Nodes {
        /// Free-text search
        #[arg(short, long)]
        search: Option<String>,

        /// Only nodes carrying this tag (repeatable)
        #[arg(short, long = "tag")]
        tags: Vec<String>,

        #[arg(short, long)]
        limit: Option<u32>,

        #[arg(short, long)]
        offset: Option<u32>,
    },
    /// List tags
    Tags {
        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long)]
        limit: Option<u32>,

        /// Include per-tag node counts
        #[arg(long)]
        counts: bool,
    },
    /// Show one node with its edges and suggestions
    Node {
        id: String,

        /// Fetch the full body instead of the detail view
        #[arg(long)]
        content: bool,

        /// Bypass the cache
        #[arg(long)]
        refresh: bool,
    },
    /// Print live events until interrupted
    Watch,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for JSON output
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!("graphwire={}", log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let flags = config::Overrides {
        base_url: cli.base_url,
        api_prefix: cli.api_prefix,
        timeout_ms: cli.timeout_ms,
        ws_path: cli.ws_path,
        retry_ms: cli.retry_ms,
    };
    let settings = config::load(&flags, cli.config.as_deref())?;
    tracing::debug!("Using {:?}", settings);

    match cli.command {
        Commands::Health => commands::health(&settings).await,
        Commands::Stats => commands::stats(&settings).await,
        Commands::Nodes {
            search,
            tags,
            limit,
            offset,
        } => commands::nodes(&settings, search, tags, limit, offset).await,
        Commands::Tags {
            search,
            limit,
            counts,
        } => commands::tags(&settings, search, limit, counts).await,
        Commands::Node {
            id,
            content,
            refresh,
        } => commands::node(&settings, &id, content, refresh).await,
        Commands::Watch => commands::watch(&settings).await,
    }
}
