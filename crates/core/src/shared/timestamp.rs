//! SubRip timestamps (`HH:MM:SS,mmm`) to and from seconds.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static TIMESTAMP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+):(\d{2}):(\d{2}),(\d{3})$").expect("valid regex"));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed timestamp: {0:?}")]
pub struct MalformedTimestamp(pub String);

/// Formats seconds as `HH:MM:SS,mmm`.
///
/// Milliseconds are rounded half-up, so `3599.9996` carries all the way into
/// the hour field. Hours widen past two digits instead of wrapping. Negative
/// and NaN inputs are treated as zero.
pub fn format(seconds: f64) -> String {
    let total_millis = (seconds.max(0.0) * 1000.0).round() as u64;
    let millis = total_millis % 1000;
    let total_secs = total_millis / 1000;
    let secs = total_secs % 60;
    let minutes = (total_secs / 60) % 60;
    let hours = total_secs / 3600;
    format!("{hours:02}:{minutes:02}:{secs:02},{millis:03}")
}

/// Parses `HH:MM:SS,mmm` back into seconds.
///
/// The result is built from an integer millisecond count, so for any value on
/// the millisecond grid `parse(&format(s)) == Ok(s)` holds exactly.
pub fn parse(text: &str) -> Result<f64, MalformedTimestamp> {
    let caps = TIMESTAMP_PATTERN
        .captures(text)
        .ok_or_else(|| MalformedTimestamp(text.to_string()))?;

    let field = |i: usize| -> Result<u64, MalformedTimestamp> {
        caps[i]
            .parse::<u64>()
            .map_err(|_| MalformedTimestamp(text.to_string()))
    };

    let hours = field(1)?;
    let minutes = field(2)?;
    let secs = field(3)?;
    let millis = field(4)?;

    let total_millis = hours
        .checked_mul(3600)
        .and_then(|h| h.checked_add(minutes * 60 + secs))
        .and_then(|s| s.checked_mul(1000))
        .and_then(|ms| ms.checked_add(millis))
        .ok_or_else(|| MalformedTimestamp(text.to_string()))?;

    Ok(total_millis as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case::zero(0.0, "00:00:00,000")]
    #[case::half_second(1.5, "00:00:01,500")]
    #[case::all_fields(3661.123, "01:01:01,123")]
    #[case::rounds_up(0.0996, "00:00:00,100")]
    #[case::carry_into_hours(3599.9996, "01:00:00,000")]
    #[case::carry_into_minutes(59.9999, "00:01:00,000")]
    #[case::truncation_would_differ(2.0009, "00:00:02,001")]
    #[case::wide_hours(360_000.0, "100:00:00,000")]
    fn test_format(#[case] seconds: f64, #[case] expected: &str) {
        assert_eq!(format(seconds), expected);
    }

    #[test]
    fn test_format_negative_clamps_to_zero() {
        assert_eq!(format(-1.25), "00:00:00,000");
    }

    #[test]
    fn test_format_nan_clamps_to_zero() {
        assert_eq!(format(f64::NAN), "00:00:00,000");
    }

    #[rstest]
    #[case("00:00:00,000", 0.0)]
    #[case("00:00:05,900", 5.9)]
    #[case("01:01:01,123", 3661.123)]
    #[case("123:00:00,001", 442_800.001)]
    fn test_parse_valid(#[case] text: &str, #[case] expected: f64) {
        assert_relative_eq!(parse(text).unwrap(), expected);
    }

    #[rstest]
    #[case::dot_separator("00:00:01.500")]
    #[case::short_millis("00:00:01,50")]
    #[case::single_digit_minutes("00:1:01,500")]
    #[case::surrounding_space(" 00:00:01,500")]
    #[case::empty("")]
    #[case::text("later")]
    fn test_parse_rejects_malformed(#[case] text: &str) {
        let err = parse(text).unwrap_err();
        assert_eq!(err, MalformedTimestamp(text.to_string()));
    }

    #[test]
    fn test_parse_error_mentions_offending_text() {
        let err = parse("1:2:3").unwrap_err().to_string();
        assert!(err.contains("1:2:3"), "got: {err}");
    }

    #[test]
    fn test_round_trip_is_exact_on_millisecond_grid() {
        let max_millis: u64 = 359_999_999;
        let mut millis = 0u64;
        while millis <= max_millis {
            let seconds = millis as f64 / 1000.0;
            assert_eq!(parse(&format(seconds)).unwrap(), seconds, "at {millis} ms");
            millis += 7_919;
        }
        let edge = max_millis as f64 / 1000.0;
        assert_eq!(format(edge), "99:59:59,999");
        assert_eq!(parse(&format(edge)).unwrap(), edge);
    }
}
