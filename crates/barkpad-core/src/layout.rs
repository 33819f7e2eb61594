//! Per-instance puzzle layout: label assignment, cue order and solution.
//!
//! All three are fixed at activation and never change afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PuzzleError, PuzzleResult};
use crate::facts::IndicatorFacts;
use crate::label::{LabelId, LabelStatus};
use crate::position::Position;

/// Number of stages in a puzzle.
pub const STAGE_COUNT: usize = 5;

/// Maximum number of stages a single position may flash in.
pub const MAX_FLASHES_PER_POSITION: usize = 2;

/// One button's label and that label's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub label: LabelId,
    pub status: LabelStatus,
}

/// Injective mapping from the four positions to labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[Slot; 4]", into = "[Slot; 4]")]
pub struct Configuration {
    slots: [Slot; 4],
}

impl Configuration {
    /// Create a configuration, validating distinct labels and status consistency.
    pub fn new(slots: [Slot; 4]) -> PuzzleResult<Self> {
        for (i, slot) in slots.iter().enumerate() {
            if slots[..i].iter().any(|other| other.label == slot.label) {
                return Err(PuzzleError::DuplicateLabel { label: slot.label });
            }
            if !slot.status.is_valid_for(slot.label) {
                return Err(PuzzleError::StatusMismatch {
                    label: slot.label,
                    status: slot.status,
                });
            }
        }
        Ok(Self { slots })
    }

    /// Create a configuration whose statuses are read from host facts.
    pub fn from_facts(labels: [LabelId; 4], facts: &dyn IndicatorFacts) -> PuzzleResult<Self> {
        Self::new(labels.map(|label| Slot {
            label,
            status: facts.status_of(label),
        }))
    }

    /// Slot at a position.
    pub fn slot(&self, position: Position) -> Slot {
        self.slots[position.index()]
    }

    /// Label at a position.
    pub fn label_at(&self, position: Position) -> LabelId {
        self.slot(position).label
    }

    /// Status of the label at a position.
    pub fn status_at(&self, position: Position) -> LabelStatus {
        self.slot(position).status
    }

    /// Position holding `label`, if it is assigned.
    pub fn position_of(&self, label: LabelId) -> Option<Position> {
        Position::ALL
            .into_iter()
            .find(|position| self.label_at(*position) == label)
    }

    /// Whether `label` is assigned to any position.
    pub fn contains(&self, label: LabelId) -> bool {
        self.position_of(label).is_some()
    }

    /// Slots in reading order.
    pub fn slots(&self) -> &[Slot; 4] {
        &self.slots
    }
}

impl TryFrom<[Slot; 4]> for Configuration {
    type Error = PuzzleError;

    fn try_from(slots: [Slot; 4]) -> Result<Self, Self::Error> {
        Self::new(slots)
    }
}

impl From<Configuration> for [Slot; 4] {
    fn from(configuration: Configuration) -> Self {
        configuration.slots
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.slots.iter().map(|slot| slot.label.name()).collect();
        write!(f, "{}", names.join(", "))
    }
}

/// The position that flashes during each stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[Position; 5]", into = "[Position; 5]")]
pub struct CueOrder([Position; STAGE_COUNT]);

impl CueOrder {
    /// Create a cue order. No position may flash in more than two stages.
    pub fn new(cues: [Position; STAGE_COUNT]) -> PuzzleResult<Self> {
        for position in Position::ALL {
            let count = cues.iter().filter(|cue| **cue == position).count();
            if count > MAX_FLASHES_PER_POSITION {
                return Err(PuzzleError::CueOverused { position, count });
            }
        }
        Ok(Self(cues))
    }

    /// Flashing position for a stage (0..=4).
    pub fn cue(&self, stage: usize) -> Position {
        self.0[stage]
    }

    pub fn as_array(&self) -> &[Position; STAGE_COUNT] {
        &self.0
    }
}

impl TryFrom<[Position; STAGE_COUNT]> for CueOrder {
    type Error = PuzzleError;

    fn try_from(cues: [Position; STAGE_COUNT]) -> Result<Self, Self::Error> {
        Self::new(cues)
    }
}

impl From<CueOrder> for [Position; STAGE_COUNT] {
    fn from(order: CueOrder) -> Self {
        order.0
    }
}

impl fmt::Display for CueOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_positions(f, &self.0)
    }
}

/// Expected press for each stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution([Position; STAGE_COUNT]);

impl Solution {
    pub(crate) fn new(presses: [Position; STAGE_COUNT]) -> Self {
        Self(presses)
    }

    /// Expected press at a stage step (0..=4).
    pub fn expected(&self, step: usize) -> Position {
        self.0[step]
    }

    pub fn as_array(&self) -> &[Position; STAGE_COUNT] {
        &self.0
    }

    /// Full press sequence that solves the puzzle from the start: stage k
    /// replays the first k + 1 entries.
    pub fn full_press_sequence(&self) -> Vec<Position> {
        (0..STAGE_COUNT)
            .flat_map(|stage| self.0[..=stage].iter().copied())
            .collect()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_positions(f, &self.0)
    }
}

fn write_positions(f: &mut fmt::Formatter<'_>, positions: &[Position]) -> fmt::Result {
    let names: Vec<String> = positions.iter().map(ToString::to_string).collect();
    write!(f, "{}", names.join(", "))
}

/// Everything sampled at activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    pub configuration: Configuration,
    pub cue_order: CueOrder,
}

impl Layout {
    pub fn new(configuration: Configuration, cue_order: CueOrder) -> Self {
        Self {
            configuration,
            cue_order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::IndicatorSet;
    use crate::test_fixtures::{label, slot};

    #[test]
    fn test_configuration_rejects_duplicates() {
        let result = Configuration::new([
            slot(0, LabelStatus::On),
            slot(3, LabelStatus::Missing),
            slot(0, LabelStatus::On),
            slot(12, LabelStatus::ExtendedA),
        ]);
        assert!(matches!(result, Err(PuzzleError::DuplicateLabel { .. })));
    }

    #[test]
    fn test_configuration_rejects_wrong_status() {
        let result = Configuration::new([
            slot(0, LabelStatus::On),
            slot(3, LabelStatus::ExtendedA),
            slot(5, LabelStatus::Missing),
            slot(12, LabelStatus::ExtendedA),
        ]);
        assert!(matches!(result, Err(PuzzleError::StatusMismatch { .. })));

        let result = Configuration::new([
            slot(0, LabelStatus::On),
            slot(3, LabelStatus::Off),
            slot(5, LabelStatus::Missing),
            slot(13, LabelStatus::ExtendedA),
        ]);
        assert!(matches!(result, Err(PuzzleError::StatusMismatch { .. })));
    }

    #[test]
    fn test_from_facts_and_lookup() {
        let facts = IndicatorSet::new().with_lit(label(0)).with_unlit(label(4));
        let configuration =
            Configuration::from_facts([label(4), label(0), label(11), label(7)], &facts).unwrap();

        assert_eq!(configuration.status_at(Position::TopLeft), LabelStatus::Off);
        assert_eq!(configuration.status_at(Position::TopRight), LabelStatus::On);
        assert_eq!(
            configuration.status_at(Position::BottomLeft),
            LabelStatus::ExtendedA
        );
        assert_eq!(
            configuration.status_at(Position::BottomRight),
            LabelStatus::Missing
        );
        assert_eq!(configuration.position_of(label(0)), Some(Position::TopRight));
        assert_eq!(configuration.position_of(label(1)), None);
        assert_eq!(configuration.to_string(), "FRK, BOB, BUB, NSA");
    }

    #[test]
    fn test_cue_order_flash_limit() {
        use crate::position::Position::*;

        assert!(CueOrder::new([TopLeft, TopLeft, TopRight, TopRight, BottomLeft]).is_ok());
        assert!(matches!(
            CueOrder::new([TopLeft, TopLeft, TopRight, TopLeft, BottomLeft]),
            Err(PuzzleError::CueOverused {
                position: TopLeft,
                count: 3
            })
        ));
    }

    #[test]
    fn test_full_press_sequence() {
        use crate::position::Position::*;

        let solution = Solution::new([TopLeft, TopRight, BottomLeft, BottomRight, TopLeft]);
        let presses = solution.full_press_sequence();
        assert_eq!(presses.len(), 15);
        assert_eq!(&presses[..3], &[TopLeft, TopLeft, TopRight]);
        assert_eq!(&presses[10..], solution.as_array());
    }

    #[test]
    fn test_configuration_serde_validates() {
        let good = r#"[
            {"label": 0, "status": "on"},
            {"label": 1, "status": "missing"},
            {"label": 2, "status": "off"},
            {"label": 14, "status": "extended_b"}
        ]"#;
        assert!(serde_json::from_str::<Configuration>(good).is_ok());

        let duplicate = r#"[
            {"label": 0, "status": "on"},
            {"label": 0, "status": "on"},
            {"label": 2, "status": "off"},
            {"label": 14, "status": "extended_b"}
        ]"#;
        assert!(serde_json::from_str::<Configuration>(duplicate).is_err());
    }
}
