//! Remote-control command grammar.
//!
//! Commands are whitespace-separated, case-insensitive tokens naming buttons
//! by corner (`TL TR BL BR`) or reading order (`1 2 3 4`), optionally led by a
//! single `press` or `select`. A separate command silences the cue chimes.

use serde::{Deserialize, Serialize};

use crate::error::CommandParseError;
use crate::position::Position;

/// Default token limit: one filler word plus the fifteen presses of a full solve.
pub const DEFAULT_MAX_TOKENS: usize = 16;

/// A parsed remote command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteCommand {
    /// Press these buttons in order.
    Press(Vec<Position>),
    /// Turn off cue chimes until the next press.
    Silence,
}

/// Parse a command with the default token limit.
pub fn parse_command(input: &str) -> Result<RemoteCommand, CommandParseError> {
    parse_command_with_limit(input, DEFAULT_MAX_TOKENS)
}

/// Parse a command, rejecting more than `max_tokens` tokens.
pub fn parse_command_with_limit(
    input: &str,
    max_tokens: usize,
) -> Result<RemoteCommand, CommandParseError> {
    if is_silence(input) {
        return Ok(RemoteCommand::Silence);
    }

    let tokens: Vec<&str> = input.split_whitespace().collect();
    if tokens.len() > max_tokens {
        return Err(CommandParseError::TooManyTokens {
            count: tokens.len(),
            max: max_tokens,
        });
    }

    let mut presses = Vec::with_capacity(tokens.len());
    for (index, token) in tokens.iter().enumerate() {
        if is_filler(token) {
            if index == 0 {
                continue;
            }
            return Err(CommandParseError::MisplacedFiller {
                index,
                token: token.to_string(),
            });
        }
        let position = parse_position(token).ok_or_else(|| CommandParseError::UnknownToken {
            token: token.to_string(),
        })?;
        presses.push(position);
    }

    if presses.is_empty() {
        return Err(CommandParseError::Empty);
    }
    Ok(RemoteCommand::Press(presses))
}

/// Button named by a single token.
pub fn parse_position(token: &str) -> Option<Position> {
    match token.to_ascii_lowercase().as_str() {
        "tl" | "1" => Some(Position::TopLeft),
        "tr" | "2" => Some(Position::TopRight),
        "bl" | "3" => Some(Position::BottomLeft),
        "br" | "4" => Some(Position::BottomRight),
        _ => None,
    }
}

fn is_filler(token: &str) -> bool {
    token.eq_ignore_ascii_case("press") || token.eq_ignore_ascii_case("select")
}

/// `silence`, `shut … up`, or `be quiet`, as the whole command.
fn is_silence(input: &str) -> bool {
    let text = input.trim().to_ascii_lowercase();
    if text == "silence" {
        return true;
    }
    if text.len() >= "shutup".len() && text.starts_with("shut") && text.ends_with("up") {
        return true;
    }
    text.strip_prefix("be")
        .map(|rest| rest.trim_start() == "quiet")
        .unwrap_or(false)
}
