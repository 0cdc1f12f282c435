//! Askflow CLI - inspect and replay the preparation timeline of an ask

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "askflow")]
#[command(version)]
#[command(about = "Preparation progress for a text-to-SQL assistant")]
#[command(long_about = r#"
Askflow resolves what the preparation timeline of an ask should show:
  • Which phases (retrieving, organizing, generating) are visible
  • Which phase is working right now
  • Whether a saved view or a corrected SQL answered the question

Example usage:
  askflow resolve --input answer.json
  askflow replay --input ask.jsonl --delay-ms 300
  askflow graph
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON instead of human output
    #[arg(long, global = true)]
    json: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a single answer snapshot
    Resolve {
        /// JSON file holding the snapshot
        #[arg(short, long)]
        input: PathBuf,

        /// Answer composition has completed
        #[arg(short, long)]
        answer_finished: bool,

        /// Reasoning streamed so far
        #[arg(short, long)]
        stream: Option<String>,
    },

    /// Replay a JSON-lines file of snapshots through the tracker
    Replay {
        /// JSON-lines file, one snapshot per line
        #[arg(short, long)]
        input: PathBuf,

        /// Pause between snapshots
        #[arg(short, long)]
        delay_ms: Option<u64>,
    },

    /// Show the stage table and transition graph
    Graph,

    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Print version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(&self) -> bool {
        matches!(self, OutputMode::Human)
    }
}

/// Print a `{ "ok": true, "command": ..., "data": ... }` envelope
pub fn emit_success(mode: OutputMode, command: &str, data: serde_json::Value) -> anyhow::Result<()> {
    if mode.is_human() {
        return Ok(());
    }
    let envelope = serde_json::json!({
        "ok": true,
        "command": command,
        "data": data,
    });
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = askflow::config::load_config(cli.config.as_deref())?.unwrap_or_default();
    askflow::ui::init_theme(config.plain.unwrap_or(false));

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match cli.command {
        Commands::Resolve {
            input,
            answer_finished,
            stream,
        } => commands::run_resolve(output_mode, &input, stream.as_deref(), answer_finished),
        Commands::Replay { input, delay_ms } => {
            let delay = delay_ms.or(config.replay_delay_ms).unwrap_or(0);
            commands::run_replay(output_mode, &input, delay)
        }
        Commands::Graph => commands::run_graph(output_mode),
        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(askflow::config::default_config_path);
            commands::run_init(output_mode, &path, force)
        }
        Commands::Version => commands::run_version(output_mode),
    }
}
