//! Play command implementation.
//!
//! Activates one sampled puzzle and feeds stdin lines through the remote
//! command grammar. Strikes and the solve are reported the way a host
//! module would receive them.

use std::path::Path;

use anyhow::{Context, Result};
use barkpad_core::{
    forward_signals, ConfigurationSampler, HostSignals, PressOutcome, Puzzle, PuzzleConfig,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::config::Config;
use crate::presenter::Presenter;

/// Host stand-in that prints the outbound signals.
#[derive(Debug, Default)]
pub struct ConsoleHost {
    pub strikes: usize,
    pub solved: bool,
}

impl HostSignals for ConsoleHost {
    fn report_strike(&mut self) {
        self.strikes += 1;
        println!("💥 STRIKE ({} so far)", self.strikes);
    }

    fn report_solved(&mut self) {
        self.solved = true;
        println!("✅ SOLVED");
    }
}

/// Line typed by the player, before the remote grammar sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input<'a> {
    Blank,
    Quit,
    ForceSolve,
    Remote(&'a str),
}

fn classify(line: &str) -> Input<'_> {
    let trimmed = line.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "" => Input::Blank,
        "quit" | "exit" => Input::Quit,
        "solve" | "force-solve" => Input::ForceSolve,
        _ => Input::Remote(trimmed),
    }
}

/// Puzzle settings from a JSON file, or the default/fast preset.
pub fn load_puzzle_config(config: &Config, path: Option<&Path>) -> Result<PuzzleConfig> {
    match path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read puzzle config {}", path.display()))?;
            PuzzleConfig::from_json(&contents)
                .with_context(|| format!("Invalid puzzle config {}", path.display()))
        }
        None if config.fast => Ok(PuzzleConfig::fast()),
        None => Ok(PuzzleConfig::default()),
    }
}

/// Execute the play command.
pub async fn execute(config: &Config, puzzle_config: Option<&Path>, show_cues: bool) -> Result<()> {
    let facts = config.indicator_set()?;
    let puzzle_config = load_puzzle_config(config, puzzle_config)?;
    let mut sampler = match config.seed {
        Some(seed) => ConfigurationSampler::from_seed(seed),
        None => ConfigurationSampler::from_entropy(),
    };

    let mut puzzle = Puzzle::with_config(puzzle_config)?;
    let mut presenter = Presenter::new(puzzle.config().timings.clone(), show_cues);
    let mut host = ConsoleHost::default();

    puzzle.activate_sampled(&mut sampler, &facts)?;
    if let Some(layout) = puzzle.layout() {
        println!("🐶 Buttons: {}", layout.configuration);
    }
    dispatch(&mut puzzle, &mut presenter, &mut host);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match classify(&line) {
            Input::Blank => continue,
            Input::Quit => break,
            Input::ForceSolve => {
                if !puzzle.force_solve() {
                    println!("Already solved");
                }
            }
            Input::Remote(text) => match puzzle.handle_remote(text) {
                Ok(outcomes) => {
                    for outcome in outcomes {
                        print_outcome(outcome);
                    }
                }
                Err(e) => {
                    warn!(error = %e, "command_ignored");
                    println!("Ignored: {e}");
                }
            },
        }
        dispatch(&mut puzzle, &mut presenter, &mut host);
    }

    presenter.finish().await;
    info!(
        strikes = host.strikes,
        solved = host.solved,
        "play_session_ended"
    );
    println!(
        "Session over: {} with {} strike(s)",
        if host.solved { "solved" } else { "unsolved" },
        host.strikes
    );
    Ok(())
}

/// Hand queued events to the presenter and the host.
fn dispatch(puzzle: &mut Puzzle, presenter: &mut Presenter, host: &mut ConsoleHost) {
    let events = puzzle.drain_events();
    for event in &events {
        presenter.observe(event);
    }
    forward_signals(&events, host);
}

fn print_outcome(outcome: PressOutcome) {
    match outcome {
        PressOutcome::Accepted { stage, step } => {
            println!("✓ stage {} ({}/{})", stage + 1, step, stage + 1)
        }
        PressOutcome::StageCleared { stage } => println!("✓ stage {} cleared", stage + 1),
        PressOutcome::Solved => println!("✓ final press"),
        PressOutcome::Strike { .. } => println!("✗ wrong button, stage restarts"),
        PressOutcome::PrematureStrike => println!("✗ pressed before activation"),
        PressOutcome::Absorbed => println!("· already solved"),
    }
}
