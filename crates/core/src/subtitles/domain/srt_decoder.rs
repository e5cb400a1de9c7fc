use std::borrow::Cow;
use std::sync::LazyLock;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use thiserror::Error;

use crate::segmentation::domain::cue::Cue;
use crate::shared::timestamp::{self, MalformedTimestamp};

static TIMING_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S+)\s+-->\s+(\S+)$").expect("valid regex"));

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SrtDecodeError {
    #[error("malformed subtitle block #{position}: {reason}")]
    MalformedSubtitleBlock { position: usize, reason: String },
    #[error("malformed timestamp in subtitle block #{position}: {source}")]
    MalformedTimestamp {
        position: usize,
        #[source]
        source: MalformedTimestamp,
    },
}

/// Parses SubRip bytes into cues, in file order.
///
/// The text encoding is sniffed before parsing. Any malformed block fails
/// the whole call; no partial cue list is returned. Cue indices are taken
/// from the file, not renumbered. Text lines keep their whitespace and
/// multi-line text is joined with single spaces.
pub fn decode(raw: &[u8]) -> Result<Vec<Cue>, SrtDecodeError> {
    let text = decode_text(raw);
    let mut cues = Vec::new();
    for (i, block) in split_blocks(&text).into_iter().enumerate() {
        cues.push(parse_block(&block, i + 1)?);
    }
    log::debug!("Decoded {} subtitle cues", cues.len());
    Ok(cues)
}

/// Converts raw bytes to text: BOM first, then UTF-8, then a statistical
/// guess. Falls back to lossy UTF-8 if the guessed encoding does not decode
/// cleanly.
fn decode_text(raw: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(raw) {
        let (text, _) = encoding.decode_without_bom_handling(&raw[bom_len..]);
        return text;
    }
    if let Ok(text) = std::str::from_utf8(raw) {
        return Cow::Borrowed(text);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(raw, true);
    let encoding = detector.guess(None, true);
    let (text, had_errors) = encoding.decode_without_bom_handling(raw);
    if had_errors {
        log::warn!("Subtitle bytes are not valid {}, decoding as UTF-8", encoding.name());
        return UTF_8.decode_without_bom_handling(raw).0;
    }
    log::debug!("Detected subtitle encoding {}", encoding.name());
    text
}

/// Groups lines into blocks; any run of blank or whitespace-only lines
/// separates them. Lines are kept as written.
fn split_blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn parse_block(lines: &[&str], position: usize) -> Result<Cue, SrtDecodeError> {
    let malformed = |reason: String| SrtDecodeError::MalformedSubtitleBlock { position, reason };

    let [index_line, timing_line, text_lines @ ..] = lines else {
        return Err(malformed("expected index and timing lines".to_string()));
    };
    if text_lines.is_empty() {
        return Err(malformed("missing subtitle text".to_string()));
    }

    let index_line = index_line.trim();
    let index = parse_index(index_line)
        .ok_or_else(|| malformed(format!("invalid index {index_line:?}")))?;

    let timing_line = timing_line.trim();
    let (start, end) = parse_timing(timing_line)
        .ok_or_else(|| malformed(format!("invalid timing line {timing_line:?}")))?;
    let start = timestamp::parse(start)
        .map_err(|source| SrtDecodeError::MalformedTimestamp { position, source })?;
    let end = timestamp::parse(end)
        .map_err(|source| SrtDecodeError::MalformedTimestamp { position, source })?;
    if end <= start {
        return Err(malformed(format!("end {end}s is not after start {start}s")));
    }

    // An index line followed by a valid timing line inside the text is the
    // next block, run on without its blank separator.
    if let Some(pair) = text_lines
        .windows(2)
        .find(|pair| parse_index(pair[0].trim()).is_some() && is_timing_line(pair[1]))
    {
        return Err(malformed(format!(
            "missing blank line before block {:?}",
            pair[0].trim()
        )));
    }

    Ok(Cue {
        index,
        start,
        end,
        text: text_lines.join(" "),
    })
}

fn parse_index(line: &str) -> Option<usize> {
    line.parse::<usize>().ok().filter(|i| *i > 0)
}

fn parse_timing(line: &str) -> Option<(&str, &str)> {
    let caps = TIMING_LINE.captures(line)?;
    let start = caps.get(1)?.as_str();
    let end = caps.get(2)?.as_str();
    Some((start, end))
}

fn is_timing_line(line: &str) -> bool {
    parse_timing(line.trim()).is_some_and(|(start, end)| {
        timestamp::parse(start).is_ok() && timestamp::parse(end).is_ok()
    })
}
