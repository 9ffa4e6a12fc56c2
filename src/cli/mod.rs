//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod buffs;
mod command;
mod convert;
mod suggest;

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{load_config, merge_cli_overrides, CliOverrides, ColorMode, JetConfig, OutputFormat};
use crate::models::RollKind;
use crate::store::Store;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// jetp - Convert macro palettes and compose buffed roll commands
#[derive(Parser)]
#[command(name = "jetp")]
#[command(about = "Convert chat palettes into sheet data and compose buffed roll commands")]
#[command(version)]
pub struct Cli {
    /// Path to jetpalette.toml (default: discovered from the working directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a pasted chat palette into sheet data (JSON)
    Convert {
        /// Palette text file ("-" reads stdin)
        input: PathBuf,

        /// Write the sheet JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print composed commands for judges or attacks
    Command {
        /// Sheet data file (JSON or JSON5)
        data: PathBuf,

        /// judge or attack
        kind: RollKind,

        /// Item index (all items when omitted)
        index: Option<usize>,

        /// Append a success threshold `>=VALUE` to judges
        #[arg(long, value_name = "VALUE", conflicts_with = "lte")]
        gte: Option<String>,

        /// Append a success threshold `=<VALUE` to judges
        #[arg(long, value_name = "VALUE")]
        lte: Option<String>,

        /// Output format: text, html, json
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Color text output: auto, always, never
        #[arg(long)]
        color: Option<ColorMode>,
    },

    /// Advance one turn for all active buffs (or restore their turns)
    Turn {
        /// Sheet data file, updated in place
        data: PathBuf,

        /// Restore every turn-limited buff to its maximum and activate it
        #[arg(long)]
        reset: bool,
    },

    /// Toggle a buff on or off
    Toggle {
        /// Sheet data file, updated in place
        data: PathBuf,

        /// Buff index
        index: usize,
    },

    /// Suggest dictionary entries for typed text
    Suggest {
        /// Sheet data file
        data: PathBuf,

        /// Text typed so far
        input: String,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "jetpalette=debug" } else { "jetpalette=warn" };
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Read a text file, or stdin for "-".
pub(crate) fn read_input(path: &Path) -> Result<String, String> {
    if path.as_os_str() == "-" {
        return std::io::read_to_string(std::io::stdin()).map_err(|e| format!("Cannot read stdin: {}", e));
    }
    fs::read_to_string(path).map_err(|e| format!("Cannot read '{}': {}", path.display(), e))
}

pub(crate) fn load_store(path: &Path, config: &JetConfig) -> Result<Store, String> {
    let text = read_input(path)?;
    Store::import_json_with(&text, &config.colors.default_buff)
        .map_err(|e| format!("'{}': {}", path.display(), e))
}

pub(crate) fn save_store(path: &Path, store: &Store) -> Result<(), String> {
    let json = store.export_json().map_err(|e| e.to_string())?;
    fs::write(path, json + "\n").map_err(|e| format!("Cannot write '{}': {}", path.display(), e))
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match cli.command {
        Commands::Convert { input, output } => convert::run_convert(&input, output.as_deref(), &config),
        Commands::Command { data, kind, index, gte, lte, format, color } => {
            merge_cli_overrides(&mut config, &CliOverrides { format, color });
            command::run_command(&data, kind, index, gte.as_deref(), lte.as_deref(), &config)
        }
        Commands::Turn { data, reset } => buffs::run_turn(&data, reset, &config),
        Commands::Toggle { data, index } => buffs::run_toggle(&data, index, &config),
        Commands::Suggest { data, input } => suggest::run_suggest(&data, &input, &config),
    }
}
