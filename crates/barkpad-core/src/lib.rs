//! Rule engine for a four-button indicator puzzle.
//!
//! Each puzzle instance is sampled, solved and then played exactly once:
//!
//! ```text
//! IndicatorFacts ──► ConfigurationSampler ──► Layout
//!                                               │
//!                                  derive_solution
//!                                               ▼
//!          press(Position) ──► Puzzle ──► PuzzleEvent ──► PresentationState
//!                                  │
//!                                  └──► HostSignals (strike / solved)
//! ```
//!
//! ## Core Concepts
//!
//! - **Label**: one of fifteen indicator names shown on a button. Standard labels
//!   take their status (missing, lit, unlit) from the host; extended labels have a
//!   fixed status.
//! - **Layout**: four distinct labels on the buttons plus the order in which
//!   buttons flash, one cue per stage.
//! - **Solution**: the five expected presses, derived from the layout through
//!   fixed rule tables and one override.
//! - **Puzzle**: validates presses stage by stage. A mistake costs a strike and
//!   restarts the current stage; earlier stages stay cleared.
//!
//! Sampling takes an explicit generator, so a seeded [`ConfigurationSampler`]
//! replays the same layout every time.

pub mod command;
pub mod config;
mod deriver;
mod error;
mod facts;
mod label;
mod layout;
mod position;
pub mod presentation;
mod puzzle;
mod sampler;
pub mod tables;

#[cfg(test)]
mod test_fixtures;

pub use command::{parse_command, parse_command_with_limit, RemoteCommand, DEFAULT_MAX_TOKENS};
pub use config::PuzzleConfig;
pub use deriver::{derive_solution, Derivation, Resolution, StageTrace};
pub use error::{CommandParseError, PuzzleError, PuzzleResult};
pub use facts::{IndicatorFacts, IndicatorSet, NoIndicators};
pub use label::{LabelId, LabelStatus, LABEL_NAMES};
pub use layout::{Configuration, CueOrder, Layout, Slot, Solution, STAGE_COUNT};
pub use position::{Position, Rotation};
pub use presentation::{
    solve_fanfare, ButtonLight, CueCycle, CueDirective, CueFrame, CuePlan, FanfareStep,
    PresentationState, PresentationTimings, Reaction, RestartReason, SoundCue,
};
pub use puzzle::{
    forward_signals, HostSignals, Phase, PressOutcome, Progress, Puzzle, PuzzleEvent, SolveCause,
};
pub use sampler::{ConfigurationSampler, WeightedPool};
