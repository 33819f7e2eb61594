//! Error types for the puzzle engine.

use thiserror::Error;

use crate::label::{LabelId, LabelStatus};
use crate::position::Position;

/// Result type alias for puzzle operations.
pub type PuzzleResult<T> = Result<T, PuzzleError>;

/// Errors that can occur while building or driving a puzzle.
#[derive(Debug, Error)]
pub enum PuzzleError {
    /// A label id outside 0..=14.
    #[error("invalid label id: {id} (must be 0..=14)")]
    InvalidLabel { id: u8 },

    /// A label name that matches none of the fifteen labels.
    #[error("unknown label name: {name:?}")]
    UnknownLabelName { name: String },

    /// A position index outside 0..=3.
    #[error("invalid position index: {index} (must be 0..=3)")]
    InvalidPosition { index: usize },

    /// The same label was assigned to two positions.
    #[error("label {label} assigned to more than one position")]
    DuplicateLabel { label: LabelId },

    /// A status that cannot belong to the given label.
    #[error("label {label} cannot carry status {status:?}")]
    StatusMismatch { label: LabelId, status: LabelStatus },

    /// A cue order that flashes one position more than twice.
    #[error("position {position} flashes {count} times (at most 2 allowed)")]
    CueOverused { position: Position, count: usize },

    /// Activation requested on a puzzle that was already activated.
    #[error("puzzle already activated")]
    AlreadyActivated,

    /// Configuration values out of range.
    #[error("invalid config: {message}")]
    InvalidConfig { message: String },

    /// Configuration (de)serialization error.
    #[error("config serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from the remote-control command grammar.
///
/// A command that fails to parse is dropped without touching puzzle state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    /// Nothing to do: blank input, or only a filler word.
    #[error("empty command")]
    Empty,

    /// More tokens than the configured limit.
    #[error("too many tokens: {count} (limit {max})")]
    TooManyTokens { count: usize, max: usize },

    /// `press`/`select` anywhere but the first token.
    #[error("filler word {token:?} at token {index} (only allowed first)")]
    MisplacedFiller { index: usize, token: String },

    /// A token that names no button.
    #[error("unrecognized token {token:?}")]
    UnknownToken { token: String },
}
