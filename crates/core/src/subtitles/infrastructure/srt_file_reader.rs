use std::fs;
use std::path::Path;

use crate::segmentation::domain::cue::Cue;
use crate::subtitles::domain::srt_decoder::decode;

/// Reads and decodes a SubRip file from disk.
pub struct SrtFileReader;

impl SrtFileReader {
    pub fn read(&self, path: &Path) -> Result<Vec<Cue>, Box<dyn std::error::Error>> {
        let raw = fs::read(path)
            .map_err(|e| format!("Failed to read subtitles {}: {e}", path.display()))?;
        let cues = decode(&raw)?;
        log::info!("Read {} cues from {}", cues.len(), path.display());
        Ok(cues)
    }
}
