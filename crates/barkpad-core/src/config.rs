//! Puzzle configuration.
//!
//! Only presentation pacing and the remote command limit are configurable;
//! the rules themselves are fixed.

use serde::{Deserialize, Serialize};

use crate::command::DEFAULT_MAX_TOKENS;
use crate::error::{PuzzleError, PuzzleResult};
use crate::presentation::PresentationTimings;

/// Configuration for a puzzle instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleConfig {
    /// Cue pacing.
    #[serde(default)]
    pub timings: PresentationTimings,

    /// Maximum tokens accepted in one remote command.
    #[serde(default = "default_max_tokens")]
    pub max_command_tokens: usize,
}

fn default_max_tokens() -> usize {
    DEFAULT_MAX_TOKENS
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            timings: PresentationTimings::default(),
            max_command_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl PuzzleConfig {
    /// Config with all presentation delays cut to a tenth, for demos and tests.
    pub fn fast() -> Self {
        Self {
            timings: PresentationTimings::default().scaled_down(10),
            ..Default::default()
        }
    }

    /// Check value ranges.
    pub fn validate(&self) -> PuzzleResult<()> {
        if self.max_command_tokens == 0 {
            return Err(PuzzleError::InvalidConfig {
                message: "max_command_tokens must be >= 1".to_string(),
            });
        }
        if self.timings.flash_ms == 0 {
            return Err(PuzzleError::InvalidConfig {
                message: "timings.flash_ms must be >= 1".to_string(),
            });
        }
        Ok(())
    }

    /// Deserialize from JSON and validate.
    pub fn from_json(json: &str) -> PuzzleResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
