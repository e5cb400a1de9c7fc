use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::segmentation::domain::cue::Cue;

#[derive(Error, Debug)]
pub enum SrtWriteError {
    #[error("failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write subtitles to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to move subtitles into place at {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Domain interface for persisting a cue sequence.
pub trait SubtitleWriter: Send {
    /// Writes `cues` as `file_name` inside `output_dir`, creating the
    /// directory if needed, and returns the written path.
    fn write(
        &self,
        output_dir: &Path,
        file_name: &str,
        cues: &[Cue],
    ) -> Result<PathBuf, SrtWriteError>;
}
