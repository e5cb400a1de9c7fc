use std::thread;
use std::time::{Duration, Instant};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::shared::constants::{
    DEFAULT_LANGUAGE_CODE, DEFAULT_POLL_INTERVAL_MS, DEFAULT_SAMPLE_RATE_HERTZ,
    DEFAULT_TRANSCRIPTION_TIMEOUT_SECS, GOOGLE_SPEECH_ENDPOINT,
};
use crate::transcription::domain::transcriber::{Transcriber, TranscriptionError};
use crate::transcription::domain::word::Word;

/// Audio container/codec names understood by the recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AudioEncoding {
    Mp3,
    Linear16,
    Flac,
    OggOpus,
}

impl AudioEncoding {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mp3" => Some(Self::Mp3),
            "wav" => Some(Self::Linear16),
            "flac" => Some(Self::Flac),
            "ogg" | "opus" => Some(Self::OggOpus),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GoogleSpeechConfig {
    pub api_key: String,
    pub endpoint: String,
    pub language_code: String,
    pub sample_rate_hertz: u32,
    pub encoding: AudioEncoding,
    /// Budget for the whole recognition, submission and polling included.
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl GoogleSpeechConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: GOOGLE_SPEECH_ENDPOINT.to_string(),
            language_code: DEFAULT_LANGUAGE_CODE.to_string(),
            sample_rate_hertz: DEFAULT_SAMPLE_RATE_HERTZ,
            encoding: AudioEncoding::Mp3,
            timeout: Duration::from_secs(DEFAULT_TRANSCRIPTION_TIMEOUT_SECS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

/// Transcriber backed by the Google Cloud Speech-to-Text REST API.
///
/// Submits a long-running recognition with word time offsets enabled and
/// polls the operation until it completes or the timeout budget runs out.
/// Failures are returned as-is; retrying is left to the caller.
pub struct GoogleSpeechTranscriber {
    config: GoogleSpeechConfig,
    client: Client,
}

impl GoogleSpeechTranscriber {
    pub fn new(config: GoogleSpeechConfig) -> Result<Self, TranscriptionError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(TranscriptionError::Request)?;
        Ok(Self { config, client })
    }

    fn submit(&self, audio: &[u8], deadline: Instant) -> Result<String, TranscriptionError> {
        let body = RecognizeRequest {
            config: RecognitionConfig {
                encoding: self.config.encoding,
                sample_rate_hertz: self.config.sample_rate_hertz,
                language_code: &self.config.language_code,
                enable_word_time_offsets: true,
            },
            audio: RecognitionAudio {
                content: STANDARD.encode(audio),
            },
        };

        let url = format!("{}/speech:longrunningrecognize", self.config.endpoint);
        let response = self
            .client
            .post(url)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .timeout(self.remaining(deadline)?)
            .send()
            .map_err(|e| self.request_error(e))?;

        let handle: OperationHandle = self.read_json(response)?;
        log::info!("Submitted recognition operation {}", handle.name);
        Ok(handle.name)
    }

    fn fetch(&self, name: &str, deadline: Instant) -> Result<Operation, TranscriptionError> {
        let url = format!("{}/operations/{name}", self.config.endpoint);
        let response = self
            .client
            .get(url)
            .query(&[("key", self.config.api_key.as_str())])
            .timeout(self.remaining(deadline)?)
            .send()
            .map_err(|e| self.request_error(e))?;
        self.read_json(response)
    }

    fn read_json<T: DeserializeOwned>(&self, response: Response) -> Result<T, TranscriptionError> {
        let status = response.status();
        let text = response.text().map_err(|e| self.request_error(e))?;
        parse_body(status, text)
    }

    fn remaining(&self, deadline: Instant) -> Result<Duration, TranscriptionError> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(TranscriptionError::Timeout(self.config.timeout));
        }
        Ok(remaining)
    }

    fn request_error(&self, e: reqwest::Error) -> TranscriptionError {
        if e.is_timeout() {
            TranscriptionError::Timeout(self.config.timeout)
        } else {
            TranscriptionError::Request(e)
        }
    }
}

/// Error statuses carry the body as the service message; success bodies must
/// deserialize as `T`.
fn parse_body<T: DeserializeOwned>(
    status: StatusCode,
    text: String,
) -> Result<T, TranscriptionError> {
    if !status.is_success() {
        return Err(TranscriptionError::Service {
            status: status.as_u16(),
            message: text,
        });
    }
    serde_json::from_str(&text).map_err(|e| TranscriptionError::InvalidResponse(e.to_string()))
}

impl Transcriber for GoogleSpeechTranscriber {
    fn transcribe(&self, audio: &[u8]) -> Result<Vec<Word>, TranscriptionError> {
        let deadline = Instant::now() + self.config.timeout;
        let name = self.submit(audio, deadline)?;

        loop {
            let operation = self.fetch(&name, deadline)?;
            if let Some(words) = words_from_operation(operation)? {
                log::info!("Transcription finished with {} words", words.len());
                return Ok(words);
            }
            let remaining = self.remaining(deadline)?;
            log::debug!("Operation {name} still running, {remaining:?} left");
            thread::sleep(self.config.poll_interval.min(remaining));
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognizeRequest<'a> {
    config: RecognitionConfig<'a>,
    audio: RecognitionAudio,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig<'a> {
    encoding: AudioEncoding,
    sample_rate_hertz: u32,
    language_code: &'a str,
    enable_word_time_offsets: bool,
}

#[derive(Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Debug, Deserialize)]
struct OperationHandle {
    name: String,
}

#[derive(Deserialize)]
struct Operation {
    #[serde(default)]
    done: bool,
    error: Option<OperationStatus>,
    response: Option<RecognizeResponse>,
}

#[derive(Deserialize)]
struct OperationStatus {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize, Default)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<RecognitionResult>,
}

#[derive(Deserialize)]
struct RecognitionResult {
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Deserialize)]
struct Alternative {
    #[serde(default)]
    words: Vec<WordInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WordInfo {
    start_time: Option<String>,
    end_time: Option<String>,
    word: String,
}

/// `Ok(None)` while the operation is still running.
fn words_from_operation(operation: Operation) -> Result<Option<Vec<Word>>, TranscriptionError> {
    if !operation.done {
        return Ok(None);
    }
    if let Some(status) = operation.error {
        return Err(TranscriptionError::Service {
            status: status.code,
            message: status.message,
        });
    }

    let response = operation.response.unwrap_or_default();
    let mut words = Vec::new();
    for result in response.results {
        // Only the top alternative carries the transcript we subtitle.
        let Some(best) = result.alternatives.into_iter().next() else {
            continue;
        };
        for info in best.words {
            let text = info.word.trim();
            if text.is_empty() {
                continue;
            }
            words.push(Word::new(
                text,
                parse_offset(info.start_time.as_deref())?,
                parse_offset(info.end_time.as_deref())?,
            ));
        }
    }

    if words.is_empty() {
        return Err(TranscriptionError::EmptyResult);
    }
    Ok(Some(words))
}

/// Parses a protobuf JSON duration such as `"1.500s"`. Absent offsets mean zero.
fn parse_offset(value: Option<&str>) -> Result<f64, TranscriptionError> {
    let Some(value) = value else {
        return Ok(0.0);
    };
    value
        .strip_suffix('s')
        .and_then(|secs| secs.parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .ok_or_else(|| TranscriptionError::InvalidResponse(format!("bad time offset {value:?}")))
}
