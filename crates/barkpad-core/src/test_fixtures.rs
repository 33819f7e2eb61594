//! Minimal fixtures for puzzle tests.
//!
//! Provides hand-built layouts and a recording host so tests never depend on
//! the random sampler.

use crate::label::{LabelId, LabelStatus};
use crate::layout::{Configuration, CueOrder, Layout, Slot};
use crate::position::Position;
use crate::puzzle::HostSignals;

/// Label by raw id. Panics on an out-of-range id.
pub fn label(id: u8) -> LabelId {
    LabelId::new(id).expect("fixture label id in range")
}

/// Slot by raw id and status.
pub fn slot(id: u8, status: LabelStatus) -> Slot {
    Slot {
        label: label(id),
        status,
    }
}

/// Builder for test layouts.
pub struct LayoutBuilder {
    slots: [Slot; 4],
    cues: [Position; 5],
}

impl LayoutBuilder {
    /// Start from four labels; the cue order defaults to TL, TR, BL, BR, TL.
    pub fn new(slots: [(u8, LabelStatus); 4]) -> Self {
        Self {
            slots: slots.map(|(id, status)| slot(id, status)),
            cues: [
                Position::TopLeft,
                Position::TopRight,
                Position::BottomLeft,
                Position::BottomRight,
                Position::TopLeft,
            ],
        }
    }

    /// Replace the whole cue order.
    pub fn cues(mut self, cues: [Position; 5]) -> Self {
        self.cues = cues;
        self
    }

    pub fn build(self) -> Layout {
        Layout::new(
            Configuration::new(self.slots).expect("fixture configuration is valid"),
            CueOrder::new(self.cues).expect("fixture cue order is valid"),
        )
    }
}

/// Layout where BOB is lit and both CAR and KEY are assigned, with BOB flashing first.
pub fn override_layout() -> Layout {
    LayoutBuilder::new([
        (0, LabelStatus::On),
        (1, LabelStatus::Missing),
        (2, LabelStatus::Missing),
        (14, LabelStatus::ExtendedB),
    ])
    .build()
}

/// Layout with a mix of statuses and no override.
pub fn mixed_layout() -> Layout {
    use crate::position::Position::*;

    LayoutBuilder::new([
        (4, LabelStatus::On),
        (9, LabelStatus::Off),
        (11, LabelStatus::ExtendedA),
        (6, LabelStatus::Missing),
    ])
    .cues([BottomRight, TopLeft, TopRight, BottomRight, BottomLeft])
    .build()
}

/// Host that counts the signals it receives.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub strikes: usize,
    pub solves: usize,
}

impl HostSignals for RecordingHost {
    fn report_strike(&mut self) {
        self.strikes += 1;
    }

    fn report_solved(&mut self) {
        self.solves += 1;
    }
}
