use std::time::Duration;

use thiserror::Error;

use super::word::Word;

#[derive(Error, Debug)]
pub enum TranscriptionError {
    #[error("transcription request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("transcription did not finish within {0:?}")]
    Timeout(Duration),
    #[error("transcription service returned {status}: {message}")]
    Service { status: u16, message: String },
    #[error("unexpected transcription response: {0}")]
    InvalidResponse(String),
    #[error("transcription returned no results")]
    EmptyResult,
}

/// Domain interface for speech-to-text transcription.
///
/// Implementations turn encoded audio into word-level timestamps. An empty
/// transcript is reported as [`TranscriptionError::EmptyResult`], never as an
/// empty `Ok`.
pub trait Transcriber: Send {
    fn transcribe(&self, audio: &[u8]) -> Result<Vec<Word>, TranscriptionError>;
}
