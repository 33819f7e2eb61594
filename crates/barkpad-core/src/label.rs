//! Button labels and their indicator status.
//!
//! There are fifteen labels. Ids 0..=10 are the standard indicators whose
//! status comes from the host; ids 11..=14 are the extended labels whose
//! status is fixed by id range.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PuzzleError, PuzzleResult};

/// Display names, indexed by label id.
pub const LABEL_NAMES: [&str; LabelId::COUNT] = [
    "BOB", "CAR", "CLR", "IND", "FRK", "FRQ", "MSA", "NSA", "SIG", "SND", "TRN", "BUB", "DOG",
    "ETC", "KEY",
];

/// Identifier of one of the fifteen labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LabelId(u8);

impl LabelId {
    /// Total number of labels.
    pub const COUNT: usize = 15;

    /// Number of standard (host-driven) labels.
    pub const STANDARD_COUNT: usize = 11;

    /// Column shared by every extended label in the rule tables.
    pub const EXTENDED_COLUMN: usize = 11;

    pub const BOB: LabelId = LabelId(0);
    pub const CAR: LabelId = LabelId(1);
    pub const KEY: LabelId = LabelId(14);

    /// Create a label id, rejecting anything outside 0..=14.
    pub fn new(id: u8) -> PuzzleResult<Self> {
        if (id as usize) < Self::COUNT {
            Ok(Self(id))
        } else {
            Err(PuzzleError::InvalidLabel { id })
        }
    }

    /// Iterate all fifteen labels in id order.
    pub fn all() -> impl Iterator<Item = LabelId> {
        (0..Self::COUNT as u8).map(LabelId)
    }

    /// Iterate the eleven standard labels in id order.
    pub fn standard() -> impl Iterator<Item = LabelId> {
        (0..Self::STANDARD_COUNT as u8).map(LabelId)
    }

    /// Raw id.
    pub fn id(self) -> u8 {
        self.0
    }

    /// Raw id as an index.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Display name, e.g. `"BOB"`.
    pub fn name(self) -> &'static str {
        LABEL_NAMES[self.index()]
    }

    /// Whether the status of this label comes from the host.
    pub fn is_standard(self) -> bool {
        self.index() < Self::STANDARD_COUNT
    }

    /// Status of an extended label; `None` for standard labels.
    pub fn fixed_status(self) -> Option<LabelStatus> {
        match self.0 {
            0..=10 => None,
            11 | 12 => Some(LabelStatus::ExtendedA),
            _ => Some(LabelStatus::ExtendedB),
        }
    }

    /// Rule-table column. All extended labels collapse onto column 11.
    pub fn column(self) -> usize {
        if self.is_standard() {
            self.index()
        } else {
            Self::EXTENDED_COLUMN
        }
    }
}

impl TryFrom<u8> for LabelId {
    type Error = PuzzleError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<LabelId> for u8 {
    fn from(label: LabelId) -> Self {
        label.0
    }
}

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LabelId {
    type Err = PuzzleError;

    /// Parse a label by name (case-insensitive) or by numeric id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(id) = trimmed.parse::<u8>() {
            return Self::new(id);
        }
        LABEL_NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(trimmed))
            .map(|index| LabelId(index as u8))
            .ok_or_else(|| PuzzleError::UnknownLabelName {
                name: trimmed.to_string(),
            })
    }
}

/// Status of the label shown on a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStatus {
    /// Standard indicator not present on the host.
    Missing,
    /// Standard indicator present and unlit.
    Off,
    /// Standard indicator present and lit.
    On,
    /// Extended label from the first set (ids 11, 12).
    ExtendedA,
    /// Extended label from the second set (ids 13, 14).
    ExtendedB,
}

impl LabelStatus {
    /// Present on the host, lit or unlit.
    pub fn is_present(self) -> bool {
        matches!(self, LabelStatus::On | LabelStatus::Off)
    }

    /// Whether this status can belong to `label`.
    pub fn is_valid_for(self, label: LabelId) -> bool {
        match label.fixed_status() {
            Some(fixed) => fixed == self,
            None => matches!(self, LabelStatus::Missing | LabelStatus::Off | LabelStatus::On),
        }
    }
}

impl fmt::Display for LabelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LabelStatus::Missing => "missing",
            LabelStatus::Off => "unlit",
            LabelStatus::On => "lit",
            LabelStatus::ExtendedA => "extended-a",
            LabelStatus::ExtendedB => "extended-b",
        };
        f.write_str(text)
    }
}
