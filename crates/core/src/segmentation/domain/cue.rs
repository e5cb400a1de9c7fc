use serde::{Deserialize, Serialize};

/// A timed subtitle unit: `text` is shown for the half-open interval
/// `[start, end)`, in seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    /// 1-based position in the containing sequence.
    pub index: usize,
    pub start: f64,
    pub end: f64,
    pub text: String,
}

impl Cue {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn is_active_at(&self, time: f64) -> bool {
        self.start <= time && time < self.end
    }
}

/// Returns the cue a renderer should display at `time`, if any.
pub fn active_cue(cues: &[Cue], time: f64) -> Option<&Cue> {
    cues.iter().find(|c| c.is_active_at(time))
}
