use std::fmt::Write;

use crate::segmentation::domain::cue::Cue;
use crate::shared::timestamp;

/// Serializes cues as SubRip text: index, timing line, text, blank line.
///
/// An empty slice encodes to an empty string.
pub fn encode(cues: &[Cue]) -> String {
    let mut out = String::new();
    for cue in cues {
        // Writing into a String cannot fail.
        let _ = write!(
            out,
            "{}\n{} --> {}\n{}\n\n",
            cue.index,
            timestamp::format(cue.start),
            timestamp::format(cue.end),
            cue.text
        );
    }
    out
}
