use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::constants::{
    DEFAULT_MAX_CHARS, DEFAULT_MAX_DURATION_SECONDS, DEFAULT_MAX_GAP_SECONDS,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PolicyError {
    #[error("max duration must be positive, got {0}")]
    MaxDuration(f64),
    #[error("max chars must be positive")]
    MaxChars,
    #[error("max gap must be zero or positive, got {0}")]
    MaxGap(f64),
    #[error("words per cue must be positive")]
    WordsPerCue,
}

/// How words are grouped into cues. Exactly one strategy is used per run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GroupingPolicy {
    /// Greedily extend a cue until the next word would exceed a limit.
    Constrained {
        max_duration_seconds: f64,
        max_chars: usize,
        max_gap_seconds: f64,
    },
    /// A fixed number of words per cue, ignoring timing.
    FixedWindow { words_per_cue: usize },
}

impl Default for GroupingPolicy {
    fn default() -> Self {
        GroupingPolicy::Constrained {
            max_duration_seconds: DEFAULT_MAX_DURATION_SECONDS,
            max_chars: DEFAULT_MAX_CHARS,
            max_gap_seconds: DEFAULT_MAX_GAP_SECONDS,
        }
    }
}

impl GroupingPolicy {
    pub fn validate(&self) -> Result<(), PolicyError> {
        match *self {
            GroupingPolicy::Constrained {
                max_duration_seconds,
                max_chars,
                max_gap_seconds,
            } => {
                if !(max_duration_seconds > 0.0) {
                    return Err(PolicyError::MaxDuration(max_duration_seconds));
                }
                if max_chars == 0 {
                    return Err(PolicyError::MaxChars);
                }
                if !(max_gap_seconds >= 0.0) {
                    return Err(PolicyError::MaxGap(max_gap_seconds));
                }
                Ok(())
            }
            GroupingPolicy::FixedWindow { words_per_cue } => {
                if words_per_cue == 0 {
                    return Err(PolicyError::WordsPerCue);
                }
                Ok(())
            }
        }
    }
}

impl std::fmt::Display for GroupingPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupingPolicy::Constrained {
                max_duration_seconds,
                max_chars,
                max_gap_seconds,
            } => write!(
                f,
                "constrained (max {max_duration_seconds}s, {max_chars} chars, {max_gap_seconds}s gap)"
            ),
            GroupingPolicy::FixedWindow { words_per_cue } => {
                write!(f, "fixed window ({words_per_cue} words)")
            }
        }
    }
}
