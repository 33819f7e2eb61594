//! Barkpad CLI - a terminal host for the four-button indicator puzzle.
//!
//! `barkpad solve` samples a layout and explains its solution;
//! `barkpad play` runs a live puzzle driven by remote commands on stdin.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod presenter;

use commands::{config as config_cmd, play, solve};
use config::{split_labels, Config};

/// Barkpad - sample, solve and play indicator button puzzles.
#[derive(Parser, Debug)]
#[command(
    name = "barkpad",
    author,
    version,
    about = "Barkpad: sample, solve and play indicator button puzzles",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Host facts shared by `solve` and `play`.
#[derive(Args, Debug)]
struct HostArgs {
    /// Seed for layout sampling (falls back to BARKPAD_SEED, then the config file).
    #[arg(short, long)]
    seed: Option<u64>,

    /// Lit host indicators, comma separated (e.g. `BOB,FRK`).
    #[arg(long, value_delimiter = ',')]
    lit: Vec<String>,

    /// Unlit host indicators, comma separated.
    #[arg(long, value_delimiter = ',')]
    unlit: Vec<String>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Sample a layout and print its solution with a per-stage explanation.
    Solve {
        #[command(flatten)]
        host: HostArgs,

        /// Print the layout and derivation as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Play a sampled puzzle, reading remote commands from stdin.
    ///
    /// Lines like `press tl tr` or `1 4 2` press buttons, `silence` mutes
    /// the cue chimes, `solve` forces a solve and `quit` ends the session.
    Play {
        #[command(flatten)]
        host: HostArgs,

        /// Shorten every presentation delay.
        #[arg(long)]
        fast: bool,

        /// Do not print the cue loop.
        #[arg(long)]
        no_cues: bool,

        /// JSON file with puzzle settings (timings, command token limit).
        #[arg(long)]
        puzzle_config: Option<PathBuf>,
    },

    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration.
    Show,

    /// Set a configuration value.
    Set {
        /// Configuration key.
        key: String,
        /// Configuration value.
        value: String,
    },

    /// Get a configuration value.
    Get {
        /// Configuration key.
        key: String,
    },

    /// Reset configuration to defaults.
    Reset,

    /// Show path to config file.
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbosity flags
    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Solve { host, json } => {
            let config = apply_host_args(config, host, false);
            solve::execute(&config, json)?;
        }

        Commands::Play {
            host,
            fast,
            no_cues,
            puzzle_config,
        } => {
            let config = apply_host_args(config, host, fast);
            play::execute(&config, puzzle_config.as_deref(), !no_cues).await?;
        }

        Commands::Config(config_cmd_inner) => {
            let mut config = config;
            match config_cmd_inner {
                ConfigCommands::Show => {
                    config_cmd::show(&config)?;
                }
                ConfigCommands::Set { key, value } => {
                    config_cmd::set(&mut config, &key, &value)?;
                }
                ConfigCommands::Get { key } => {
                    config_cmd::get(&config, &key)?;
                }
                ConfigCommands::Reset => {
                    config_cmd::reset()?;
                }
                ConfigCommands::Path => {
                    if let Some(path) = Config::config_file_path() {
                        println!("{}", path.display());
                    } else {
                        println!("(no config file path available)");
                    }
                }
            }
        }
    }

    Ok(())
}

fn apply_host_args(config: Config, host: HostArgs, fast: bool) -> Config {
    let normalize = |names: Vec<String>| -> Vec<String> {
        names.iter().flat_map(|name| split_labels(name)).collect()
    };
    config.with_overrides(host.seed, normalize(host.lit), normalize(host.unlit), fast)
}
