//! Solution derivation.
//!
//! Turns a [`Layout`] into the five expected presses. Stage 1 uses a fixed
//! permutation chosen by the first flashing label; stages 2-5 look up the rule
//! tables using the previous correct press and the current flashing label.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::label::{LabelId, LabelStatus};
use crate::layout::{Layout, Solution, STAGE_COUNT};
use crate::position::{Position, Rotation};
use crate::tables::{self, Row, StageOneRule, Target};

/// How a stage's expected press was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Resolution {
    /// Stage 1 permutation.
    StageOne { rule: StageOneRule },
    /// The requested label is on the module.
    RequestedLabel { label: LabelId },
    /// Fallback to a fixed position.
    FixedPosition,
    /// Fallback to a movement relative to the flashing button.
    Relative { rotation: Rotation },
}

/// Explanation of one derived stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTrace {
    /// Stage index (0..=4).
    pub stage: usize,
    pub flashing: Position,
    pub flashing_status: LabelStatus,
    /// Table row, for stages 2-5.
    pub row: Option<Row>,
    /// Table column, for stages 2-5.
    pub column: Option<usize>,
    /// Label the table asked for, whether or not it is on the module.
    pub requested: Option<LabelId>,
    pub resolution: Resolution,
    pub press: Position,
}

/// Result of deriving a solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derivation {
    pub solution: Solution,
    /// The lit-BOB override fired; `trace` is empty in that case.
    pub override_applied: bool,
    pub trace: Vec<StageTrace>,
}

/// Derive the expected presses for a layout.
pub fn derive_solution(layout: &Layout) -> Derivation {
    let configuration = &layout.configuration;
    let cues = &layout.cue_order;

    let first = cues.cue(0);
    let first_status = configuration.status_at(first);
    let first_label = configuration.label_at(first);

    let rule = match first_status {
        LabelStatus::On if first_label == LabelId::BOB => {
            if let (Some(car), true) = (
                configuration.position_of(LabelId::CAR),
                configuration.contains(LabelId::KEY),
            ) {
                debug!(press = %car, "override_applied");
                return Derivation {
                    solution: Solution::new([car; STAGE_COUNT]),
                    override_applied: true,
                    trace: Vec::new(),
                };
            }
            StageOneRule::LitBob
        }
        LabelStatus::On => StageOneRule::Lit,
        LabelStatus::Off => StageOneRule::Unlit,
        _ => StageOneRule::Other,
    };

    let mut presses = [Position::TopLeft; STAGE_COUNT];
    let mut trace = Vec::with_capacity(STAGE_COUNT);

    presses[0] = tables::stage_one_target(rule, first);
    trace.push(StageTrace {
        stage: 0,
        flashing: first,
        flashing_status: first_status,
        row: None,
        column: None,
        requested: None,
        resolution: Resolution::StageOne { rule },
        press: presses[0],
    });
    debug!(
        stage = 1,
        flashing = %first,
        label = %first_label,
        status = %first_status,
        press = %presses[0],
        "stage_derived"
    );

    for stage in 1..STAGE_COUNT {
        let previous_status = configuration.status_at(presses[stage - 1]);
        let flashing = cues.cue(stage);
        let flashing_label = configuration.label_at(flashing);
        let flashing_status = configuration.status_at(flashing);

        let row = Row::select(previous_status, flashing_status);
        let column = flashing_label.column();
        let requested = tables::requested_label(row, column);

        let (press, resolution) = match requested
            .and_then(|label| configuration.position_of(label).map(|p| (label, p)))
        {
            Some((label, position)) => (position, Resolution::RequestedLabel { label }),
            None => {
                let target = tables::fallback_target(row, column);
                let resolution = match target {
                    Target::Fixed(_) => Resolution::FixedPosition,
                    Target::Relative(rotation) => Resolution::Relative { rotation },
                };
                (target.resolve(flashing), resolution)
            }
        };

        presses[stage] = press;
        trace.push(StageTrace {
            stage,
            flashing,
            flashing_status,
            row: Some(row),
            column: Some(column),
            requested,
            resolution,
            press,
        });
        debug!(
            stage = stage + 1,
            row = row.index(),
            column,
            previous_status = %previous_status,
            flashing = %flashing,
            label = %flashing_label,
            status = %flashing_status,
            press = %press,
            "stage_derived"
        );
    }

    Derivation {
        solution: Solution::new(presses),
        override_applied: false,
        trace,
    }
}
