//! Cue presentation, driven purely by puzzle events.
//!
//! Nothing here feeds back into correctness. A host renders the buttons by
//! feeding every [`PuzzleEvent`] to [`PresentationState::observe`] and acting
//! on the returned [`Reaction`]: play the sound, light the pressed button, and
//! restart (or stop) its cue loop.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::layout::CueOrder;
use crate::position::Position;
use crate::puzzle::{PuzzleEvent, SolveCause};

/// Presentation pacing, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationTimings {
    /// How long a cue stays lit.
    pub flash_ms: u64,
    /// Pause between cues of one replay.
    pub gap_ms: u64,
    /// Pause after the last cue before replaying from stage 1.
    pub rest_ms: u64,
    /// Time before all buttons revert to their idle look.
    pub revert_ms: u64,
    pub activation_lead_in_ms: u64,
    pub stage_cleared_lead_in_ms: u64,
    /// Longer wait while the player is part-way through a stage.
    pub correct_input_lead_in_ms: u64,
    pub strike_lead_in_ms: u64,
    pub silenced_lead_in_ms: u64,
}

impl Default for PresentationTimings {
    fn default() -> Self {
        Self {
            flash_ms: 500,
            gap_ms: 250,
            rest_ms: 2250,
            revert_ms: 500,
            activation_lead_in_ms: 1000,
            stage_cleared_lead_in_ms: 1500,
            correct_input_lead_in_ms: 5000,
            strike_lead_in_ms: 1500,
            silenced_lead_in_ms: 250,
        }
    }
}

impl PresentationTimings {
    /// Divide every delay by `divisor` (minimum 1 ms each).
    pub fn scaled_down(&self, divisor: u64) -> Self {
        let scale = |ms: u64| (ms / divisor.max(1)).max(1);
        Self {
            flash_ms: scale(self.flash_ms),
            gap_ms: scale(self.gap_ms),
            rest_ms: scale(self.rest_ms),
            revert_ms: scale(self.revert_ms),
            activation_lead_in_ms: scale(self.activation_lead_in_ms),
            stage_cleared_lead_in_ms: scale(self.stage_cleared_lead_in_ms),
            correct_input_lead_in_ms: scale(self.correct_input_lead_in_ms),
            strike_lead_in_ms: scale(self.strike_lead_in_ms),
            silenced_lead_in_ms: scale(self.silenced_lead_in_ms),
        }
    }

    /// Wait before the first cue after a restart.
    pub fn lead_in(&self, reason: RestartReason) -> Duration {
        let ms = match reason {
            RestartReason::Activation => self.activation_lead_in_ms,
            RestartReason::StageCleared => self.stage_cleared_lead_in_ms,
            RestartReason::CorrectInput => self.correct_input_lead_in_ms,
            RestartReason::Strike => self.strike_lead_in_ms,
            RestartReason::Silenced => self.silenced_lead_in_ms,
        };
        Duration::from_millis(ms)
    }
}

/// Why the cue loop is being restarted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartReason {
    Activation,
    StageCleared,
    CorrectInput,
    Strike,
    Silenced,
}

/// One lit cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CueFrame {
    pub position: Position,
    pub lit_for: Duration,
    pub pause_after: Duration,
    /// Play the position's chime while lit.
    pub chime: bool,
}

/// Endless replay of the cues for stages `0..=stage`.
#[derive(Debug, Clone)]
pub struct CueCycle {
    cues: CueOrder,
    stage: usize,
    next: usize,
    flash: Duration,
    gap: Duration,
    rest: Duration,
    chime: bool,
}

impl CueCycle {
    pub fn new(cues: CueOrder, stage: usize, timings: &PresentationTimings, chime: bool) -> Self {
        Self {
            cues,
            stage,
            next: 0,
            flash: Duration::from_millis(timings.flash_ms),
            gap: Duration::from_millis(timings.gap_ms),
            rest: Duration::from_millis(timings.rest_ms),
            chime,
        }
    }
}

impl Iterator for CueCycle {
    type Item = CueFrame;

    fn next(&mut self) -> Option<CueFrame> {
        let position = self.cues.cue(self.next);
        let pause_after = if self.next >= self.stage {
            self.next = 0;
            self.rest
        } else {
            self.next += 1;
            self.gap
        };
        Some(CueFrame {
            position,
            lit_for: self.flash,
            pause_after,
            chime: self.chime,
        })
    }
}

/// A freshly started cue loop.
#[derive(Debug, Clone)]
pub struct CuePlan {
    pub reason: RestartReason,
    /// Wait before reverting every button to idle.
    pub revert_after: Duration,
    /// Further wait after the revert, before the first cue.
    pub then_wait: Duration,
    pub cycle: CueCycle,
}

/// What the cue loop should do after an event.
#[derive(Debug, Clone)]
pub enum CueDirective {
    /// Leave the running loop alone.
    Keep,
    /// Cancel the running loop and start this one.
    Restart(CuePlan),
    /// Cancel the running loop and play the solve fanfare.
    Celebrate,
}

/// Look of the pressed button right after a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonLight {
    Flash,
    Failure,
}

/// Sound asset to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    Good(Position),
    Miss(Position),
    Finale,
}

impl SoundCue {
    /// Asset name for the host's audio system.
    pub fn asset_name(self) -> &'static str {
        const GOOD: [&str; 4] = ["sound_a", "sound_b", "sound_c", "sound_d"];
        const MISS: [&str; 4] = ["miss_a", "miss_b", "miss_c", "miss_d"];
        match self {
            SoundCue::Good(position) => GOOD[position.index()],
            SoundCue::Miss(position) => MISS[position.index()],
            SoundCue::Finale => "sound_c_fin",
        }
    }
}

/// One beat of the solve fanfare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanfareStep {
    pub wait_before: Duration,
    pub position: Position,
    pub sound: SoundCue,
}

/// Solve fanfare: each button turns green in turn, the last with the finale.
pub fn solve_fanfare() -> [FanfareStep; 4] {
    let step = |ms, position, sound| FanfareStep {
        wait_before: Duration::from_millis(ms),
        position,
        sound,
    };
    [
        step(450, Position::BottomRight, SoundCue::Good(Position::BottomRight)),
        step(125, Position::TopRight, SoundCue::Good(Position::TopRight)),
        step(225, Position::TopLeft, SoundCue::Good(Position::TopLeft)),
        step(125, Position::BottomLeft, SoundCue::Finale),
    ]
}

/// Everything a renderer does in response to one event.
#[derive(Debug, Clone)]
pub struct Reaction {
    pub sound: Option<SoundCue>,
    pub light: Option<(Position, ButtonLight)>,
    pub directive: CueDirective,
}

impl Reaction {
    fn keep() -> Self {
        Self {
            sound: None,
            light: None,
            directive: CueDirective::Keep,
        }
    }
}

/// Presentation-side view of a puzzle, rebuilt from events alone.
#[derive(Debug, Clone)]
pub struct PresentationState {
    timings: PresentationTimings,
    cues: Option<CueOrder>,
    stage: usize,
    labels_visible: bool,
    sound_enabled: bool,
    solved: bool,
}

impl PresentationState {
    pub fn new(timings: PresentationTimings) -> Self {
        Self {
            timings,
            cues: None,
            stage: 0,
            labels_visible: false,
            sound_enabled: false,
            solved: false,
        }
    }

    /// Whether button labels should be shown.
    pub fn labels_visible(&self) -> bool {
        self.labels_visible
    }

    /// Whether cues chime.
    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// Highest stage currently being replayed.
    pub fn stage(&self) -> usize {
        self.stage
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Update from one event and describe what to render.
    pub fn observe(&mut self, event: &PuzzleEvent) -> Reaction {
        match *event {
            PuzzleEvent::Activated { layout, .. } => {
                self.cues = Some(layout.cue_order);
                self.stage = 0;
                if self.solved {
                    return Reaction::keep();
                }
                self.labels_visible = true;
                Reaction {
                    sound: None,
                    light: None,
                    directive: self.restart(RestartReason::Activation),
                }
            }
            PuzzleEvent::PressAccepted { pressed, .. } => {
                self.sound_enabled = true;
                self.labels_visible = false;
                Reaction {
                    sound: Some(SoundCue::Good(pressed)),
                    light: Some((pressed, ButtonLight::Flash)),
                    directive: self.restart(RestartReason::CorrectInput),
                }
            }
            PuzzleEvent::StageCleared { pressed, stage } => {
                self.sound_enabled = true;
                self.labels_visible = false;
                self.stage = stage + 1;
                Reaction {
                    sound: Some(SoundCue::Good(pressed)),
                    light: Some((pressed, ButtonLight::Flash)),
                    directive: self.restart(RestartReason::StageCleared),
                }
            }
            PuzzleEvent::Strike {
                pressed,
                expected: None,
                ..
            } => {
                self.sound_enabled = true;
                Reaction {
                    sound: Some(SoundCue::Miss(pressed)),
                    light: None,
                    directive: CueDirective::Keep,
                }
            }
            PuzzleEvent::Strike { pressed, .. } => {
                self.sound_enabled = true;
                self.labels_visible = true;
                Reaction {
                    sound: Some(SoundCue::Miss(pressed)),
                    light: Some((pressed, ButtonLight::Failure)),
                    directive: self.restart(RestartReason::Strike),
                }
            }
            PuzzleEvent::Solved { cause } => {
                self.solved = true;
                self.labels_visible = false;
                let (sound, light) = match cause {
                    SolveCause::Press(pressed) => (
                        Some(SoundCue::Good(pressed)),
                        Some((pressed, ButtonLight::Flash)),
                    ),
                    SolveCause::Forced => (None, None),
                };
                Reaction {
                    sound,
                    light,
                    directive: CueDirective::Celebrate,
                }
            }
            PuzzleEvent::PressAbsorbed { pressed } => Reaction {
                sound: Some(SoundCue::Good(pressed)),
                light: None,
                directive: CueDirective::Keep,
            },
            PuzzleEvent::Silenced => {
                self.sound_enabled = false;
                Reaction {
                    sound: None,
                    light: None,
                    directive: self.restart(RestartReason::Silenced),
                }
            }
        }
    }

    /// Plan a fresh cue loop, or keep the current one when there is nothing to show.
    fn restart(&self, reason: RestartReason) -> CueDirective {
        let Some(cues) = self.cues else {
            return CueDirective::Keep;
        };
        if self.solved {
            return CueDirective::Keep;
        }

        let lead_in = self.timings.lead_in(reason);
        let revert_after = lead_in.min(Duration::from_millis(self.timings.revert_ms));
        CueDirective::Restart(CuePlan {
            reason,
            revert_after,
            then_wait: lead_in - revert_after,
            cycle: CueCycle::new(cues, self.stage, &self.timings, self.sound_enabled),
        })
    }
}
