//! Press validation state machine.
//!
//! A [`Puzzle`] waits for activation, then validates presses against the
//! derived solution. Stage `k` asks for the first `k + 1` expected presses
//! in order. A wrong press costs a strike and restarts the current stage only.
//!
//! Every transition is also queued as a [`PuzzleEvent`] for observers such as
//! the presentation layer or the host's strike/solve counters.

use std::sync::atomic::{AtomicU32, Ordering};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::command::{parse_command_with_limit, RemoteCommand};
use crate::config::PuzzleConfig;
use crate::deriver::{derive_solution, Derivation};
use crate::error::{CommandParseError, PuzzleError, PuzzleResult};
use crate::facts::IndicatorFacts;
use crate::layout::{Layout, Solution, STAGE_COUNT};
use crate::position::Position;
use crate::sampler::ConfigurationSampler;

static NEXT_INSTANCE_ID: AtomicU32 = AtomicU32::new(1);

/// Lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    WaitingForActivation,
    Presenting,
    Resolved,
}

/// Progress through the stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Progress {
    /// Current stage (0..=4).
    pub stage: usize,
    /// Presses already entered in the current stage (0..=stage).
    pub step: usize,
    pub solved: bool,
}

/// How the puzzle got solved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveCause {
    /// The final correct press.
    Press(Position),
    /// Administrative forced solve.
    Forced,
}

/// Observable transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum PuzzleEvent {
    Activated {
        layout: Layout,
        override_applied: bool,
    },
    /// Correct press that does not finish the stage.
    PressAccepted {
        pressed: Position,
        stage: usize,
        /// Presses entered in the stage after this one.
        step: usize,
    },
    /// Correct press that finished `stage`; the next stage begins.
    StageCleared { pressed: Position, stage: usize },
    /// Wrong press, or any press before activation (`expected` is `None`).
    Strike {
        pressed: Position,
        expected: Option<Position>,
        stage: usize,
    },
    Solved { cause: SolveCause },
    /// Press after the puzzle resolved; no effect.
    PressAbsorbed { pressed: Position },
    /// Cue chimes turned off.
    Silenced,
}

/// Result of one press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum PressOutcome {
    /// Pressed before activation. Counts as a strike.
    PrematureStrike,
    /// Wrong button. Counts as a strike.
    Strike { expected: Position },
    Accepted { stage: usize, step: usize },
    StageCleared { stage: usize },
    Solved,
    /// Puzzle already resolved.
    Absorbed,
}

impl PressOutcome {
    pub fn is_strike(&self) -> bool {
        matches!(self, PressOutcome::PrematureStrike | PressOutcome::Strike { .. })
    }
}

/// Outbound signals to the host.
pub trait HostSignals {
    fn report_strike(&mut self);
    fn report_solved(&mut self);
}

/// Forward the strike and solve events to a host.
pub fn forward_signals(events: &[PuzzleEvent], host: &mut dyn HostSignals) {
    for event in events {
        match event {
            PuzzleEvent::Strike { .. } => host.report_strike(),
            PuzzleEvent::Solved { .. } => host.report_solved(),
            _ => {}
        }
    }
}

/// One puzzle instance.
pub struct Puzzle {
    /// Instance number for log correlation.
    id: u32,

    config: PuzzleConfig,

    phase: Phase,

    layout: Option<Layout>,

    derivation: Option<Derivation>,

    progress: Progress,

    strikes: usize,

    /// Events not yet drained.
    events: Vec<PuzzleEvent>,
}

impl Puzzle {
    /// Create a puzzle with default configuration.
    pub fn new() -> Self {
        Self::build(PuzzleConfig::default())
    }

    /// Create with custom configuration. Rejects configs that fail validation.
    pub fn with_config(config: PuzzleConfig) -> PuzzleResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: PuzzleConfig) -> Self {
        Self {
            id: NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed),
            config,
            phase: Phase::WaitingForActivation,
            layout: None,
            derivation: None,
            progress: Progress::default(),
            strikes: 0,
            events: Vec::new(),
        }
    }

    /// Activate with a given layout: derive the solution and start presenting.
    ///
    /// A puzzle force-solved before activation still records its layout but stays resolved.
    pub fn activate(&mut self, layout: Layout) -> PuzzleResult<&Derivation> {
        if self.layout.is_some() {
            return Err(PuzzleError::AlreadyActivated);
        }

        let derivation = derive_solution(&layout);
        info!(
            id = self.id,
            labels = %layout.configuration,
            cues = %layout.cue_order,
            solution = %derivation.solution,
            override_applied = derivation.override_applied,
            "puzzle_activated"
        );

        self.events.push(PuzzleEvent::Activated {
            layout,
            override_applied: derivation.override_applied,
        });
        self.layout = Some(layout);
        if self.phase == Phase::WaitingForActivation {
            self.phase = Phase::Presenting;
            self.progress = Progress::default();
        }

        Ok(self.derivation.insert(derivation))
    }

    /// Sample a layout from host facts, then activate with it.
    pub fn activate_sampled<R: Rng>(
        &mut self,
        sampler: &mut ConfigurationSampler<R>,
        facts: &dyn IndicatorFacts,
    ) -> PuzzleResult<&Derivation> {
        if self.layout.is_some() {
            return Err(PuzzleError::AlreadyActivated);
        }
        let layout = sampler.sample(facts);
        self.activate(layout)
    }

    /// Handle a button press.
    pub fn press(&mut self, pressed: Position) -> PressOutcome {
        match self.phase {
            Phase::Resolved => {
                debug!(id = self.id, pressed = %pressed, "press_absorbed");
                self.events.push(PuzzleEvent::PressAbsorbed { pressed });
                PressOutcome::Absorbed
            }
            Phase::WaitingForActivation => self.premature(pressed),
            Phase::Presenting => match self.derivation.as_ref().map(|d| d.solution) {
                Some(solution) => self.validate(pressed, solution),
                None => self.premature(pressed),
            },
        }
    }

    fn premature(&mut self, pressed: Position) -> PressOutcome {
        self.strikes += 1;
        warn!(id = self.id, pressed = %pressed, "strike_before_activation");
        self.events.push(PuzzleEvent::Strike {
            pressed,
            expected: None,
            stage: self.progress.stage,
        });
        PressOutcome::PrematureStrike
    }

    fn validate(&mut self, pressed: Position, solution: Solution) -> PressOutcome {
        let Progress { stage, step, .. } = self.progress;
        let expected = solution.expected(step);

        if pressed != expected {
            self.strikes += 1;
            self.progress.step = 0;
            warn!(
                id = self.id,
                pressed = %pressed,
                expected = %expected,
                stage = stage + 1,
                "strike_wrong_press"
            );
            self.events.push(PuzzleEvent::Strike {
                pressed,
                expected: Some(expected),
                stage,
            });
            return PressOutcome::Strike { expected };
        }

        if step < stage {
            self.progress.step = step + 1;
            debug!(
                id = self.id,
                pressed = %pressed,
                stage = stage + 1,
                step = step + 1,
                "press_accepted"
            );
            self.events.push(PuzzleEvent::PressAccepted {
                pressed,
                stage,
                step: step + 1,
            });
            return PressOutcome::Accepted {
                stage,
                step: step + 1,
            };
        }

        info!(id = self.id, stage = stage + 1, "stage_cleared");
        if stage + 1 >= STAGE_COUNT {
            self.resolve(SolveCause::Press(pressed));
            return PressOutcome::Solved;
        }

        self.progress = Progress {
            stage: stage + 1,
            step: 0,
            solved: false,
        };
        self.events.push(PuzzleEvent::StageCleared { pressed, stage });
        PressOutcome::StageCleared { stage }
    }

    /// Administrative solve, bypassing validation. Returns false if already solved.
    pub fn force_solve(&mut self) -> bool {
        if self.progress.solved {
            return false;
        }
        info!(id = self.id, "force_solve_requested");
        self.resolve(SolveCause::Forced);
        true
    }

    fn resolve(&mut self, cause: SolveCause) {
        if let SolveCause::Press(_) = cause {
            self.progress.step = self.progress.stage;
        }
        self.progress.solved = true;
        self.phase = Phase::Resolved;
        info!(id = self.id, strikes = self.strikes, "puzzle_solved");
        self.events.push(PuzzleEvent::Solved { cause });
    }

    /// Turn off cue chimes. Progress is untouched.
    pub fn silence(&mut self) {
        debug!(id = self.id, "silenced");
        self.events.push(PuzzleEvent::Silenced);
    }

    /// Run a parsed remote command.
    ///
    /// Presses stop at the first strike or once the puzzle resolves.
    pub fn apply_command(&mut self, command: &RemoteCommand) -> Vec<PressOutcome> {
        match command {
            RemoteCommand::Silence => {
                self.silence();
                Vec::new()
            }
            RemoteCommand::Press(presses) => {
                let mut outcomes = Vec::with_capacity(presses.len());
                for pressed in presses {
                    let outcome = self.press(*pressed);
                    outcomes.push(outcome);
                    if outcome.is_strike() || outcome == PressOutcome::Solved {
                        break;
                    }
                }
                debug!(
                    id = self.id,
                    requested = presses.len(),
                    applied = outcomes.len(),
                    "remote_presses_applied"
                );
                outcomes
            }
        }
    }

    /// Parse and run remote command text. Malformed text changes nothing.
    pub fn handle_remote(&mut self, input: &str) -> Result<Vec<PressOutcome>, CommandParseError> {
        let command = parse_command_with_limit(input, self.config.max_command_tokens)
            .inspect_err(|e| debug!(id = self.id, error = %e, "remote_command_rejected"))?;
        Ok(self.apply_command(&command))
    }

    /// Take all queued events.
    pub fn drain_events(&mut self) -> Vec<PuzzleEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn config(&self) -> &PuzzleConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn is_solved(&self) -> bool {
        self.progress.solved
    }

    /// Strikes issued so far.
    pub fn strikes(&self) -> usize {
        self.strikes
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn derivation(&self) -> Option<&Derivation> {
        self.derivation.as_ref()
    }

    pub fn solution(&self) -> Option<&Solution> {
        self.derivation.as_ref().map(|d| &d.solution)
    }
}

impl Default for Puzzle {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Puzzle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Puzzle")
            .field("id", &self.id)
            .field("phase", &self.phase)
            .field("progress", &self.progress)
            .field("strikes", &self.strikes)
            .field("pending_events", &self.events.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position::*;
    use crate::test_fixtures::{mixed_layout, override_layout, RecordingHost};

    fn activated(layout: Layout) -> Puzzle {
        let mut puzzle = Puzzle::new();
        puzzle.activate(layout).unwrap();
        puzzle.drain_events();
        puzzle
    }

    fn wrong_press(expected: Position) -> Position {
        Position::ALL
            .into_iter()
            .find(|p| *p != expected)
            .unwrap()
    }

    #[test]
    fn test_premature_press_is_a_strike() {
        let mut puzzle = Puzzle::new();
        assert_eq!(puzzle.press(TopLeft), PressOutcome::PrematureStrike);
        assert_eq!(puzzle.phase(), Phase::WaitingForActivation);
        assert_eq!(puzzle.progress(), Progress::default());
        assert_eq!(puzzle.strikes(), 1);
        assert_eq!(
            puzzle.drain_events(),
            vec![PuzzleEvent::Strike {
                pressed: TopLeft,
                expected: None,
                stage: 0
            }]
        );
    }

    #[test]
    fn test_happy_path() {
        let mut puzzle = activated(mixed_layout());
        let solution = *puzzle.solution().unwrap();
        let mut host = RecordingHost::default();

        let presses = solution.full_press_sequence();
        let (last, rest) = presses.split_last().unwrap();
        for pressed in rest {
            assert!(!puzzle.press(*pressed).is_strike());
        }
        assert_eq!(puzzle.press(*last), PressOutcome::Solved);

        forward_signals(&puzzle.drain_events(), &mut host);
        assert_eq!(host.strikes, 0);
        assert_eq!(host.solves, 1);
        assert_eq!(puzzle.phase(), Phase::Resolved);
        assert_eq!(
            puzzle.progress(),
            Progress {
                stage: 4,
                step: 4,
                solved: true
            }
        );
    }

    #[test]
    fn test_stage_progression() {
        // Solution: TR, BR, BR, BL, BR.
        let mut puzzle = activated(mixed_layout());

        assert_eq!(puzzle.press(TopRight), PressOutcome::StageCleared { stage: 0 });
        assert_eq!(puzzle.progress().stage, 1);
        assert_eq!(puzzle.progress().step, 0);

        assert_eq!(puzzle.press(TopRight), PressOutcome::Accepted { stage: 1, step: 1 });
        assert_eq!(puzzle.press(BottomRight), PressOutcome::StageCleared { stage: 1 });
        assert_eq!(puzzle.progress().stage, 2);
    }

    #[test]
    fn test_mismatch_resets_only_current_stage() {
        let mut puzzle = activated(mixed_layout());
        let solution = *puzzle.solution().unwrap();

        // Clear stages 0..=2.
        for stage in 0..3 {
            for step in 0..=stage {
                puzzle.press(solution.expected(step));
            }
        }
        assert_eq!(puzzle.progress().stage, 3);

        // Two correct presses into stage 3, then a wrong one.
        puzzle.press(solution.expected(0));
        puzzle.press(solution.expected(1));
        assert_eq!(puzzle.progress().step, 2);
        puzzle.drain_events();

        let expected = solution.expected(2);
        let outcome = puzzle.press(wrong_press(expected));
        assert_eq!(outcome, PressOutcome::Strike { expected });
        assert_eq!(
            puzzle.progress(),
            Progress {
                stage: 3,
                step: 0,
                solved: false
            }
        );

        let mut host = RecordingHost::default();
        forward_signals(&puzzle.drain_events(), &mut host);
        assert_eq!(host.strikes, 1);
        assert_eq!(host.solves, 0);
    }

    #[test]
    fn test_presses_after_solve_are_absorbed() {
        let mut puzzle = activated(override_layout());
        for pressed in puzzle.solution().unwrap().full_press_sequence() {
            puzzle.press(pressed);
        }
        assert!(puzzle.is_solved());
        let strikes = puzzle.strikes();
        puzzle.drain_events();

        assert_eq!(puzzle.press(BottomLeft), PressOutcome::Absorbed);
        assert_eq!(puzzle.strikes(), strikes);
        assert_eq!(
            puzzle.drain_events(),
            vec![PuzzleEvent::PressAbsorbed {
                pressed: BottomLeft
            }]
        );
    }

    #[test]
    fn test_force_solve() {
        let mut puzzle = activated(mixed_layout());
        puzzle.press(TopRight);
        puzzle.drain_events();

        assert!(puzzle.force_solve());
        assert_eq!(puzzle.phase(), Phase::Resolved);
        assert!(puzzle.is_solved());
        assert_eq!(
            puzzle.drain_events(),
            vec![PuzzleEvent::Solved {
                cause: SolveCause::Forced
            }]
        );

        assert!(!puzzle.force_solve());
        assert!(puzzle.drain_events().is_empty());
    }

    #[test]
    fn test_force_solve_before_activation() {
        let mut puzzle = Puzzle::new();
        assert!(puzzle.force_solve());
        puzzle.activate(mixed_layout()).unwrap();
        assert_eq!(puzzle.phase(), Phase::Resolved);
        assert_eq!(puzzle.press(TopRight), PressOutcome::Absorbed);
    }

    #[test]
    fn test_activate_twice_fails() {
        let mut puzzle = activated(mixed_layout());
        assert!(matches!(
            puzzle.activate(override_layout()),
            Err(PuzzleError::AlreadyActivated)
        ));
    }

    #[test]
    fn test_remote_command_stops_at_strike() {
        let mut puzzle = activated(mixed_layout());
        // TR clears stage 0; TL is wrong for stage 1 (expects TR); BR never runs.
        let outcomes = puzzle.handle_remote("press tr tl br").unwrap();
        assert_eq!(
            outcomes,
            vec![
                PressOutcome::StageCleared { stage: 0 },
                PressOutcome::Strike {
                    expected: TopRight
                },
            ]
        );
        assert_eq!(puzzle.progress().stage, 1);
    }

    #[test]
    fn test_malformed_remote_command_changes_nothing() {
        let mut puzzle = activated(mixed_layout());
        assert!(puzzle.handle_remote("tr middle").is_err());
        assert_eq!(puzzle.progress(), Progress::default());
        assert_eq!(puzzle.strikes(), 0);
        assert!(puzzle.drain_events().is_empty());
    }

    #[test]
    fn test_remote_full_solve_in_one_command() {
        let mut puzzle = activated(override_layout());
        let outcomes = puzzle
            .handle_remote("press 2 2 2 2 2 2 2 2 2 2 2 2 2 2 2")
            .unwrap();
        assert_eq!(outcomes.len(), 15);
        assert_eq!(outcomes.last(), Some(&PressOutcome::Solved));
    }

    #[test]
    fn test_silence_leaves_progress() {
        let mut puzzle = activated(mixed_layout());
        puzzle.press(TopRight);
        let before = puzzle.progress();
        assert!(puzzle.handle_remote("shut up").unwrap().is_empty());
        assert_eq!(puzzle.progress(), before);
        assert_eq!(puzzle.drain_events().last(), Some(&PuzzleEvent::Silenced));
    }

    #[test]
    fn test_with_config_validates() {
        let zero_tokens = PuzzleConfig {
            max_command_tokens: 0,
            ..Default::default()
        };
        assert!(matches!(
            Puzzle::with_config(zero_tokens),
            Err(PuzzleError::InvalidConfig { .. })
        ));

        let tight = PuzzleConfig {
            max_command_tokens: 2,
            ..Default::default()
        };
        let mut puzzle = Puzzle::with_config(tight).unwrap();
        puzzle.activate(mixed_layout()).unwrap();
        assert!(puzzle.handle_remote("press tr").is_ok());
        assert!(matches!(
            puzzle.handle_remote("press tr tr"),
            Err(CommandParseError::TooManyTokens { count: 3, max: 2 })
        ));
    }

    #[test]
    fn test_instance_ids_are_unique() {
        let a = Puzzle::new();
        let b = Puzzle::new();
        assert_ne!(a.id(), b.id());
    }
}
