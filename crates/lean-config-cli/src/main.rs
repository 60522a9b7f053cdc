//! `lean-config` — read and write Lean CLI configuration.
//!
//! # Usage
//!
//! ```text
//! lean-config [OPTIONS] <COMMAND>
//!
//! Commands:
//!   list    List every option with its current value
//!   get     Print the value of one option
//!   set     Set the value of one option
//!   unset   Remove the value of one option
//!   image   Print the engine or research image to use
//!
//! Options:
//!   --global-config <PATH>  Global scope file [env: LEAN_GLOBAL_CONFIG]
//!   --project-dir   <DIR>   Project root      [env: LEAN_PROJECT_DIR] [default: .]
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`
//! (e.g. `RUST_LOG=lean_config=debug`).

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use lean_config_cli::commands::{self, ImageKind};
use lean_config_cli::{open_manager, paths};

// ── CLI argument definitions ──────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name = "lean-config",
    about = "Read and write Lean CLI configuration",
    version
)]
struct Cli {
    /// Path of the global (per-user) configuration file.
    ///
    /// Defaults to the platform configuration directory.
    #[arg(long, env = "LEAN_GLOBAL_CONFIG")]
    global_config: Option<PathBuf>,

    /// Root of the current project; its scope file is `<DIR>/.lean/config.toml`.
    #[arg(long, default_value = ".", env = "LEAN_PROJECT_DIR")]
    project_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every option with its current value.
    List {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Print the value of one option.
    Get { key: String },
    /// Set the value of one option.
    Set { key: String, value: String },
    /// Remove the value of one option.
    Unset { key: String },
    /// Print the engine or research image to use.
    Image {
        #[arg(value_enum)]
        kind: ImageKind,
        /// Image reference overriding the configured one.
        #[arg(long)]
        image: Option<String>,
        /// Print the version-pinned image name instead.
        #[arg(long)]
        version: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let global_path = match cli.global_config {
        Some(path) => path,
        None => paths::global_config_path().context("no --global-config given")?,
    };
    let project_path = paths::project_config_path(&cli.project_dir);
    debug!(
        global = %global_path.display(),
        project = %project_path.display(),
        "resolved configuration scopes"
    );

    let mut manager = open_manager(&global_path, &project_path)?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Command::List { json } => commands::list(&manager, json, &mut out),
        Command::Get { key } => commands::get(&manager, &key, &mut out),
        Command::Set { key, value } => commands::set(&mut manager, &key, &value, &mut out),
        Command::Unset { key } => commands::unset(&mut manager, &key, &mut out),
        Command::Image {
            kind,
            image,
            version,
        } => commands::image(
            &manager,
            kind,
            image.as_deref(),
            version.as_deref(),
            &mut out,
        ),
    }
}
