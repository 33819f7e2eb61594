//! Solve command implementation.
//!
//! Samples one layout from the configured host facts and explains how each
//! stage's press is derived.

use anyhow::{Context, Result};
use barkpad_core::{
    derive_solution, ConfigurationSampler, Derivation, Layout, Position, Resolution, StageTrace,
};
use serde::Serialize;
use tracing::info;

use crate::config::Config;

/// Machine-readable output of `barkpad solve --json`.
#[derive(Debug, Serialize)]
pub struct SolveReport {
    pub seed: Option<u64>,
    pub layout: Layout,
    #[serde(flatten)]
    pub derivation: Derivation,
    /// A remote command that solves the puzzle from the start.
    pub press_command: String,
}

/// Execute the solve command.
pub fn execute(config: &Config, json: bool) -> Result<()> {
    let facts = config.indicator_set()?;
    let layout = match config.seed {
        Some(seed) => ConfigurationSampler::from_seed(seed).sample(&facts),
        None => ConfigurationSampler::from_entropy().sample(&facts),
    };
    let derivation = derive_solution(&layout);
    info!(solution = %derivation.solution, "solve_complete");

    let report = SolveReport {
        seed: config.seed,
        layout,
        press_command: press_command(&derivation.solution.full_press_sequence()),
        derivation,
    };

    if json {
        let out = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
        println!("{out}");
    } else {
        print_report(&report);
    }
    Ok(())
}

/// `press tr br ...` for a press sequence.
pub fn press_command(presses: &[Position]) -> String {
    let mut command = String::from("press");
    for pressed in presses {
        command.push(' ');
        command.push_str(&pressed.short_name().to_ascii_lowercase());
    }
    command
}

fn print_report(report: &SolveReport) {
    let configuration = &report.layout.configuration;

    println!("Barkpad Layout");
    println!("{:-<40}", "");
    if let Some(seed) = report.seed {
        println!("Seed:      {seed}");
    }
    for position in Position::ALL {
        println!(
            "{:<10} {} ({})",
            format!("{}:", position.short_name()),
            configuration.label_at(position),
            configuration.status_at(position)
        );
    }
    println!("Cues:      {}", report.layout.cue_order);
    println!();

    if report.derivation.override_applied {
        println!("BOB is lit and flashes first with CAR and KEY present: press CAR every stage.");
    } else {
        for step in &report.derivation.trace {
            println!("{}", describe_stage(step));
        }
    }
    println!();
    println!("Solution:  {}", report.derivation.solution);
    println!("Command:   {}", report.press_command);
}

fn describe_stage(step: &StageTrace) -> String {
    let why = match step.resolution {
        Resolution::StageOne { rule } => format!("first-stage rule {rule:?}"),
        Resolution::RequestedLabel { label } => format!("{label} is on the module"),
        Resolution::FixedPosition => match step.requested {
            Some(label) => format!("{label} is absent, fixed fallback"),
            None => "fixed fallback".to_string(),
        },
        Resolution::Relative { rotation } => match step.requested {
            Some(label) => format!("{label} is absent, rotate {rotation} from the flash"),
            None => format!("rotate {rotation} from the flash"),
        },
    };
    format!(
        "Stage {}: {} flashes ({}) -> {}  [{}]",
        step.stage + 1,
        step.flashing.short_name(),
        step.flashing_status,
        step.press.short_name(),
        why
    )
}
