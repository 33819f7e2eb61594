//! Sample a seeded layout, print how each stage is derived, then play it through.
//!
//! Run with:
//! ```bash
//! cargo run --example seeded_walkthrough -p barkpad-core -- 42
//! ```

use barkpad_core::{
    ConfigurationSampler, IndicatorSet, LabelId, PresentationState, Puzzle, PuzzleConfig,
    Resolution,
};

// =============================================================================
// Host facts
// =============================================================================

/// A bomb with lit FRK and BOB, unlit CAR.
fn host_facts() -> anyhow::Result<IndicatorSet> {
    Ok(IndicatorSet::new()
        .with_lit("FRK".parse::<LabelId>()?)
        .with_lit(LabelId::BOB)
        .with_unlit(LabelId::CAR))
}

fn main() -> anyhow::Result<()> {
    let seed = std::env::args()
        .nth(1)
        .map(|s| s.parse::<u64>())
        .transpose()?
        .unwrap_or(42);

    let facts = host_facts()?;
    let mut sampler = ConfigurationSampler::from_seed(seed);
    let mut puzzle = Puzzle::with_config(PuzzleConfig::fast())?;
    let derivation = puzzle.activate_sampled(&mut sampler, &facts)?.clone();

    let Some(&layout) = puzzle.layout() else {
        anyhow::bail!("layout missing after activation");
    };
    println!("seed:     {seed}");
    println!("labels:   {}", layout.configuration);
    println!("cues:     {}", layout.cue_order);
    println!("solution: {}", derivation.solution);

    if derivation.override_applied {
        println!("override: BOB lit and flashing first, CAR and KEY present");
    }
    for step in &derivation.trace {
        let why = match step.resolution {
            Resolution::StageOne { rule } => format!("stage one rule {rule:?}"),
            Resolution::RequestedLabel { label } => format!("{label} is present"),
            Resolution::FixedPosition => "fixed fallback".to_string(),
            Resolution::Relative { rotation } => format!("{rotation} from the flash"),
        };
        println!(
            "  stage {}: {} flashes ({}) -> press {} [{}]",
            step.stage + 1,
            step.flashing,
            step.flashing_status,
            step.press,
            why
        );
    }

    // =========================================================================
    // Play
    // =========================================================================

    let mut presentation = PresentationState::new(puzzle.config().timings.clone());
    for pressed in derivation.solution.full_press_sequence() {
        puzzle.press(pressed);
        for event in puzzle.drain_events() {
            let reaction = presentation.observe(&event);
            if let Some(sound) = reaction.sound {
                print!("{} ", sound.asset_name());
            }
        }
    }
    println!();
    println!(
        "solved: {} with {} strikes",
        puzzle.is_solved(),
        puzzle.strikes()
    );

    Ok(())
}
