//! tracelog service host
//!
//! Boots the logger the way a service would at start-up: the boot block is
//! logged as one group and flushed to every sink at once, then a
//! console-only sample line follows.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracelog_core::{
    default_data_dir, init_diagnostics, LogOptions, LoggerConfig, SinkKind, STORE_FILE_NAME,
};

/// tracelog service - start-up logging demo
#[derive(Parser, Debug)]
#[command(name = "tracelog-service")]
#[command(about = "Boot a service host with multi-sink logging")]
struct Args {
    /// Data directory for the trace log store
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Port reported in the start-up block
    #[arg(short, long, default_value_t = 8000)]
    port: u16,

    /// Also write JSONL files to this directory
    #[arg(long)]
    logs_dir: Option<PathBuf>,

    /// Disable the console sink
    #[arg(long)]
    no_console: bool,

    /// Load sink configuration from a JSON file (overrides the flags above)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn config_from_args(args: &Args) -> Result<LoggerConfig> {
    if let Some(path) = &args.config {
        return LoggerConfig::from_json_file(path)
            .with_context(|| format!("loading config from {}", path.display()));
    }

    let data_dir = args.data_dir.clone().unwrap_or_else(default_data_dir);
    let mut config = LoggerConfig::new().with_store(data_dir.join(STORE_FILE_NAME));
    if let Some(dir) = &args.logs_dir {
        config = config.with_file(dir, "service");
    }
    if args.no_console {
        config = config.no_console();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_diagnostics(args.verbose);

    let config = config_from_args(&args)?;
    let logger = config.build().context("building logger")?;

    tracing::info!(port = args.port, "service starting");

    let id = logger.start();
    let boot = LogOptions::new().in_group(id);
    logger
        .info_with(
            "Server",
            &format!("Running on http://localhost:{}", args.port),
            boot.clone(),
        )
        .await;
    if let Some(path) = &config.store_path {
        logger
            .info_with("Server", &format!("Trace store: {}", path.display()), boot)
            .await;
    }
    if !logger.end(&id).await {
        tracing::warn!("start-up block was not written to every sink");
    }

    logger
        .info_with(
            "Logging Sample",
            "This is a sample Logging.",
            LogOptions::new().to(&[SinkKind::Console]),
        )
        .await;

    Ok(())
}
