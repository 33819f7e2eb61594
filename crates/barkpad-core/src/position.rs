//! Button positions and relative movements between them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PuzzleError, PuzzleResult};

/// One of the four buttons, in reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Position {
    /// All positions in reading order.
    pub const ALL: [Position; 4] = [
        Position::TopLeft,
        Position::TopRight,
        Position::BottomLeft,
        Position::BottomRight,
    ];

    /// Position at a reading-order index.
    pub fn from_index(index: usize) -> PuzzleResult<Self> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(PuzzleError::InvalidPosition { index })
    }

    /// Reading-order index (0..=3).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short name used by the remote-control grammar.
    pub fn short_name(self) -> &'static str {
        match self {
            Position::TopLeft => "TL",
            Position::TopRight => "TR",
            Position::BottomLeft => "BL",
            Position::BottomRight => "BR",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Position::TopLeft => "TopLeft",
            Position::TopRight => "TopRight",
            Position::BottomLeft => "BottomLeft",
            Position::BottomRight => "BottomRight",
        };
        f.write_str(name)
    }
}

/// Movement relative to the flashing button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotation {
    /// Stay on the flashing button.
    Flashing,
    CounterClockwise,
    Opposite,
    Clockwise,
}

/// Destination index for each rotation, indexed by the origin's reading order.
const ROTATIONS: [[usize; 4]; 4] = [
    [0, 1, 2, 3], // flashing
    [2, 0, 3, 1], // counter-clockwise
    [3, 2, 1, 0], // opposite
    [1, 3, 0, 2], // clockwise
];

impl Rotation {
    /// Decode a negative rule-table cell (-4..=-1).
    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            -4 => Some(Rotation::Flashing),
            -3 => Some(Rotation::CounterClockwise),
            -2 => Some(Rotation::Opposite),
            -1 => Some(Rotation::Clockwise),
            _ => None,
        }
    }

    /// Rule-table encoding of this rotation.
    pub fn code(self) -> i8 {
        match self {
            Rotation::Flashing => -4,
            Rotation::CounterClockwise => -3,
            Rotation::Opposite => -2,
            Rotation::Clockwise => -1,
        }
    }

    /// Apply the movement starting from `from`.
    pub fn apply(self, from: Position) -> Position {
        let row = (self.code() + 4) as usize;
        Position::ALL[ROTATIONS[row][from.index()]]
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rotation::Flashing => "flashing",
            Rotation::CounterClockwise => "counter-clockwise",
            Rotation::Opposite => "opposing",
            Rotation::Clockwise => "clockwise",
        };
        f.write_str(name)
    }
}
