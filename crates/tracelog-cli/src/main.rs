//! tracelog CLI
//!
//! Thin wrapper around tracelog-core for emitting and inspecting trace logs.
//!
//! ## Usage
//!
//! ```bash
//! # Log an error to every sink
//! tracelog emit error Auth "token expired" --user u1
//!
//! # Log to the console only
//! tracelog emit info Sample "hello" --sink console
//!
//! # List stored logs (newest first)
//! tracelog list --level error --limit 20
//!
//! # Show one row
//! tracelog show <ulid>
//!
//! # Archive a row
//! tracelog archive <ulid>
//!
//! # Per-level counts
//! tracelog stats
//!
//! # Read back JSONL files
//! tracelog tail-file --logs-dir ./logs
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracelog_core::{
    default_data_dir, init_diagnostics, read_all_entries, LogFilter, LogLevel, LogOptions,
    LoggerConfig, ResourceStatus, SinkKind, Subject, TraceLogRow, TraceLogStore, Ulid,
    STORE_FILE_NAME,
};

/// tracelog - multi-sink trace logging
#[derive(Parser)]
#[command(name = "tracelog")]
#[command(version = "0.1.0")]
#[command(about = "Emit and inspect trace logs")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Data directory (default: ~/.tracelog/data)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log one record
    Emit {
        /// info, success, warn or error
        level: String,
        /// Category (log name)
        category: String,
        /// Message text
        message: String,
        /// Restrict to these sink kinds (repeatable; default: all)
        #[arg(short, long = "sink")]
        sinks: Vec<String>,
        /// Attribute the record to this user id
        #[arg(short, long)]
        user: Option<String>,
        /// Also write JSONL files to this directory
        #[arg(long)]
        logs_dir: Option<PathBuf>,
    },

    /// List stored logs, newest first
    List {
        #[arg(short, long)]
        level: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Include archived rows
        #[arg(long)]
        all: bool,
    },

    /// Show a stored log in full
    Show {
        /// Trace log id (ULID)
        id: String,
    },

    /// Archive (soft delete) a stored log
    Archive {
        /// Trace log id (ULID)
        id: String,
        /// Recorded as modified_by
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Count stored logs per level
    Stats,

    /// Print entries from JSONL log files
    TailFile {
        #[arg(long)]
        logs_dir: PathBuf,
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },
}

/// Parse a trace log id from ULID string
fn parse_log_id(s: &str) -> Result<Ulid> {
    Ulid::from_string(s).map_err(|e| anyhow::anyhow!("Invalid log ID '{}': {}", s, e))
}

fn parse_sinks(raw: &[String]) -> Result<Vec<SinkKind>> {
    raw.iter()
        .map(|s| s.parse::<SinkKind>().map_err(anyhow::Error::from))
        .collect()
}

fn store_path(data_dir: &std::path::Path) -> PathBuf {
    data_dir.join(STORE_FILE_NAME)
}

fn open_store(data_dir: &std::path::Path) -> Result<TraceLogStore> {
    let path = store_path(data_dir);
    TraceLogStore::new(&path).with_context(|| format!("opening store at {}", path.display()))
}

fn print_row_summary(row: &TraceLogRow) {
    let first_line = row.content.lines().next().unwrap_or("");
    println!(
        "{}  {:<7}  {:<16}  {}",
        row.trace_log_id,
        row.trace_log_type.as_str(),
        row.trace_log_name,
        first_line
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_diagnostics(cli.verbose);

    let data_dir = cli.data_dir.unwrap_or_else(default_data_dir);
    tracing::debug!(data_dir = %data_dir.display(), "using data directory");

    match cli.command {
        Commands::Emit {
            level,
            category,
            message,
            sinks,
            user,
            logs_dir,
        } => {
            let level: LogLevel = level.parse()?;
            let kinds = parse_sinks(&sinks)?;

            let mut config = LoggerConfig::new().with_store(store_path(&data_dir));
            if let Some(dir) = logs_dir {
                config = config.with_file(dir, "cli");
            }
            let logger = config.build().context("building logger")?;

            let mut options = LogOptions::new().to(&kinds);
            if let Some(user) = user {
                options = options.as_subject(Subject::new(user));
            }

            if !logger.log(level, &category, &message, options).await {
                anyhow::bail!("failed to log to every targeted sink");
            }
        }

        Commands::List {
            level,
            category,
            limit,
            all,
        } => {
            let store = open_store(&data_dir)?;
            let filter = LogFilter {
                level: level.map(|l| l.parse::<LogLevel>()).transpose()?,
                category,
                include_inactive: all,
                limit,
            };
            let rows = store.list_logs(&filter)?;
            if rows.is_empty() {
                println!("No logs found.");
            }
            for row in &rows {
                print_row_summary(row);
            }
        }

        Commands::Show { id } => {
            let store = open_store(&data_dir)?;
            let id = parse_log_id(&id)?;
            let row = store
                .get_log(&id)?
                .ok_or_else(|| anyhow::anyhow!("Log not found: {}", id))?;

            println!("ID:         {}", row.trace_log_id);
            println!("Name:       {}", row.trace_log_name);
            println!("Type:       {}", row.trace_log_type);
            println!(
                "Status:     {}",
                match row.resource_status {
                    ResourceStatus::Active => "active",
                    ResourceStatus::Inactive => "inactive",
                }
            );
            println!("Initiator:  {}", row.request_initiator.as_deref().unwrap_or("-"));
            println!("Created:    {} by {}", row.created_at.to_rfc3339(), row.created_by);
            println!("Modified:   {}", row.modified_at.to_rfc3339());
            println!();
            println!("{}", row.content);
        }

        Commands::Archive { id, user } => {
            let store = open_store(&data_dir)?;
            let id = parse_log_id(&id)?;
            store.set_status(&id, ResourceStatus::Inactive, user.as_deref())?;
            println!("Archived {}", id);
        }

        Commands::Stats => {
            let store = open_store(&data_dir)?;
            let counts = store.count_by_level()?;
            println!("total:   {}", counts.total);
            println!("info:    {}", counts.info);
            println!("success: {}", counts.success);
            println!("warn:    {}", counts.warn);
            println!("error:   {}", counts.error);
        }

        Commands::TailFile { logs_dir, limit } => {
            let entries = read_all_entries(&logs_dir)?;
            let skip = entries.len().saturating_sub(limit);
            for entry in entries.iter().skip(skip) {
                println!("{}", entry.rendered);
            }
        }
    }

    Ok(())
}
