//! Terminal presenter for the cue loop.
//!
//! Owns the presentation state and at most one background task. Every
//! puzzle event may cancel that task and start a fresh one, so a stale cue
//! never prints after the player has moved on.

use barkpad_core::{
    solve_fanfare, ButtonLight, CueDirective, CuePlan, PresentationState, PresentationTimings,
    PuzzleEvent, Reaction,
};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, warn};

pub struct Presenter {
    state: PresentationState,
    show_cues: bool,
    task: Option<JoinHandle<()>>,
}

impl Presenter {
    pub fn new(timings: PresentationTimings, show_cues: bool) -> Self {
        Self {
            state: PresentationState::new(timings),
            show_cues,
            task: None,
        }
    }

    /// Feed one puzzle event and act on the resulting reaction.
    pub fn observe(&mut self, event: &PuzzleEvent) {
        let labels_were_visible = self.state.labels_visible();
        let reaction = self.state.observe(event);
        self.render(&reaction);

        if self.state.labels_visible() != labels_were_visible {
            let word = if self.state.labels_visible() {
                "shown"
            } else {
                "hidden"
            };
            println!("   [labels {word}]");
        }

        match reaction.directive {
            CueDirective::Keep => {}
            CueDirective::Restart(plan) => {
                self.cancel();
                if self.show_cues {
                    debug!(reason = ?plan.reason, "cue_loop_restarted");
                    self.task = Some(tokio::spawn(run_cues(plan)));
                }
            }
            CueDirective::Celebrate => {
                self.cancel();
                if self.show_cues {
                    self.task = Some(tokio::spawn(run_fanfare()));
                }
            }
        }
    }

    fn render(&self, reaction: &Reaction) {
        if let Some((position, light)) = reaction.light {
            let look = match light {
                ButtonLight::Flash => "flash",
                ButtonLight::Failure => "red",
            };
            println!("   [{} {look}]", position.short_name());
        }
        if let Some(sound) = reaction.sound {
            debug!(asset = sound.asset_name(), "sound_played");
        }
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Stop the cue loop, letting a running fanfare play out.
    pub async fn finish(mut self) {
        let Some(task) = self.task.take() else {
            return;
        };
        if self.state.is_solved() {
            wait_for_fanfare(task).await;
        } else {
            task.abort();
        }
    }
}

/// Await the fanfare task. Returns false if it panicked.
async fn wait_for_fanfare(task: JoinHandle<()>) -> bool {
    match task.await {
        Err(e) if e.is_panic() => {
            warn!(error = %e, "fanfare_task_panicked");
            false
        }
        _ => true,
    }
}

impl Drop for Presenter {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run_cues(plan: CuePlan) {
    sleep(plan.revert_after).await;
    sleep(plan.then_wait).await;
    for frame in plan.cycle {
        let chime = if frame.chime { " ♪" } else { "" };
        println!("   [cue] {}{chime}", frame.position.short_name());
        sleep(frame.lit_for).await;
        sleep(frame.pause_after).await;
    }
}

async fn run_fanfare() {
    for step in solve_fanfare() {
        sleep(step.wait_before).await;
        println!(
            "   [{} green] {}",
            step.position.short_name(),
            step.sound.asset_name()
        );
    }
}
