use std::fs;
use std::path::{Path, PathBuf};

use crate::segmentation::domain::cue_segmenter::CueSegmenter;
use crate::segmentation::domain::grouping_policy::GroupingPolicy;
use crate::subtitles::domain::subtitle_writer::SubtitleWriter;
use crate::transcription::domain::transcriber::Transcriber;

/// Audio file in, `.srt` file out: transcribe, group words into cues and
/// persist them.
pub struct GenerateSubtitlesUseCase {
    transcriber: Box<dyn Transcriber>,
    writer: Box<dyn SubtitleWriter>,
    policy: GroupingPolicy,
}

impl GenerateSubtitlesUseCase {
    pub fn new(
        transcriber: Box<dyn Transcriber>,
        writer: Box<dyn SubtitleWriter>,
        policy: GroupingPolicy,
    ) -> Self {
        Self {
            transcriber,
            writer,
            policy,
        }
    }

    /// Returns the path of the written subtitle file. Nothing is written if
    /// transcription fails.
    pub fn run(
        &self,
        audio_path: &Path,
        output_dir: &Path,
        file_name: &str,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        self.policy.validate()?;

        // 1. Load the encoded audio
        let audio = fs::read(audio_path)
            .map_err(|e| format!("Failed to read audio {}: {e}", audio_path.display()))?;

        // 2. Transcribe to word-level timestamps
        log::info!("Transcribing {} ({} bytes)", audio_path.display(), audio.len());
        let words = self.transcriber.transcribe(&audio)?;

        // 3. Group words into cues
        let cues = CueSegmenter::segment(&words, &self.policy);
        log::info!("Grouped {} words into {} cues", words.len(), cues.len());

        // 4. Persist
        let path = self.writer.write(output_dir, file_name, &cues)?;
        Ok(path)
    }
}
