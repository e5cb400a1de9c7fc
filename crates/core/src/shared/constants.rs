pub const DEFAULT_MAX_DURATION_SECONDS: f64 = 5.0;
pub const DEFAULT_MAX_CHARS: usize = 39;
pub const DEFAULT_MAX_GAP_SECONDS: f64 = 0.63;

/// Duration given to words the recognizer reports with `end <= start`.
pub const MIN_WORD_DURATION: f64 = 0.1;

pub const SRT_EXTENSION: &str = "srt";
pub const DEFAULT_OUTPUT_DIR: &str = "transcripts";

pub const GOOGLE_SPEECH_ENDPOINT: &str = "https://speech.googleapis.com/v1p1beta1";
pub const DEFAULT_LANGUAGE_CODE: &str = "en-US";
pub const DEFAULT_SAMPLE_RATE_HERTZ: u32 = 16000;

/// Upper bound for one long-running recognition, polling included.
pub const DEFAULT_TRANSCRIPTION_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
