use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::constants::MIN_WORD_DURATION;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WordError {
    #[error("word text is empty")]
    EmptyText,
    #[error("word text {0:?} contains a line break")]
    LineBreak(String),
    #[error("word {text:?} starts at {start}, expected a finite time >= 0")]
    InvalidStart { text: String, start: f64 },
    #[error("word {text:?} ends at {end}, expected a finite time")]
    InvalidEnd { text: String, end: f64 },
}

/// A single transcribed token with its timing, in seconds from the start of
/// the audio.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub start: f64,
    pub end: f64,
}

impl Word {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// Checks the word can be placed in a cue. An `end` at or before `start`
    /// is allowed; grouping floors it through [`Word::effective_end`].
    pub fn validate(&self) -> Result<(), WordError> {
        if self.text.trim().is_empty() {
            return Err(WordError::EmptyText);
        }
        if self.text.contains(['\n', '\r']) {
            return Err(WordError::LineBreak(self.text.clone()));
        }
        if !self.start.is_finite() || self.start < 0.0 {
            return Err(WordError::InvalidStart {
                text: self.text.clone(),
                start: self.start,
            });
        }
        if !self.end.is_finite() {
            return Err(WordError::InvalidEnd {
                text: self.text.clone(),
                end: self.end,
            });
        }
        Ok(())
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// End time with the minimum-duration floor applied: recognizers
    /// occasionally report `end <= start` for very short tokens.
    pub fn effective_end(&self) -> f64 {
        if self.end <= self.start {
            self.start + MIN_WORD_DURATION
        } else {
            self.end
        }
    }
}
