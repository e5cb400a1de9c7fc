use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::segmentation::domain::cue::Cue;
use crate::subtitles::domain::srt_encoder::encode;
use crate::subtitles::domain::subtitle_writer::{SrtWriteError, SubtitleWriter};

/// Writes UTF-8 `.srt` files.
///
/// Output goes to a `.part` sibling first and is renamed into place once
/// flushed, so a failed write never leaves a truncated subtitle file.
pub struct SrtFileWriter;

impl SubtitleWriter for SrtFileWriter {
    fn write(
        &self,
        output_dir: &Path,
        file_name: &str,
        cues: &[Cue],
    ) -> Result<PathBuf, SrtWriteError> {
        fs::create_dir_all(output_dir).map_err(|e| SrtWriteError::CreateDir {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

        let dest = output_dir.join(file_name);
        let temp_path = part_path(&dest);

        if let Err(e) = write_file(&temp_path, encode(cues).as_bytes()) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        if let Err(e) = fs::rename(&temp_path, &dest) {
            let _ = fs::remove_file(&temp_path);
            return Err(SrtWriteError::Persist {
                path: dest,
                source: e,
            });
        }

        log::info!("Wrote {} cues to {}", cues.len(), dest.display());
        Ok(dest)
    }
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), SrtWriteError> {
    let to_write_error = |e| SrtWriteError::Write {
        path: path.to_path_buf(),
        source: e,
    };
    let mut file = fs::File::create(path).map_err(to_write_error)?;
    file.write_all(contents).map_err(to_write_error)?;
    file.flush().map_err(to_write_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn cues() -> Vec<Cue> {
        vec![
            Cue {
                index: 1,
                start: 0.0,
                end: 0.9,
                text: "ACTION NOW".to_string(),
            },
            Cue {
                index: 2,
                start: 5.9,
                end: 6.4,
                text: "OR NEVER".to_string(),
            },
        ]
    }

    #[test]
    fn test_write_creates_directory_and_file() {
        let tmp = TempDir::new().unwrap();
        let out_dir = tmp.path().join("transcripts").join("nested");

        let path = SrtFileWriter.write(&out_dir, "clip.srt", &cues()).unwrap();

        assert_eq!(path, out_dir.join("clip.srt"));
        assert_eq!(fs::read_to_string(&path).unwrap(), encode(&cues()));
    }

    #[test]
    fn test_write_leaves_no_part_file() {
        let tmp = TempDir::new().unwrap();
        let path = SrtFileWriter.write(tmp.path(), "clip.srt", &cues()).unwrap();
        assert!(!part_path(&path).exists());
        let entries: Vec<_> = fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_replaces_existing_file() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("clip.srt");
        fs::write(&dest, "stale").unwrap();

        SrtFileWriter.write(tmp.path(), "clip.srt", &cues()).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), encode(&cues()));
    }

    #[test]
    fn test_write_empty_cues_creates_empty_file() {
        let tmp = TempDir::new().unwrap();
        let path = SrtFileWriter.write(tmp.path(), "empty.srt", &[]).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "");
    }

    #[test]
    fn test_output_dir_blocked_by_file_returns_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("transcripts");
        fs::write(&blocker, "not a directory").unwrap();

        let result = SrtFileWriter.write(&blocker, "clip.srt", &cues());
        assert!(matches!(result, Err(SrtWriteError::CreateDir { .. })));
    }

    #[test]
    fn test_failed_rename_cleans_up_part_file() {
        let tmp = TempDir::new().unwrap();
        // A non-empty directory at the destination makes the rename fail.
        let dest = tmp.path().join("clip.srt");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("keep"), "x").unwrap();

        let result = SrtFileWriter.write(tmp.path(), "clip.srt", &cues());
        assert!(matches!(result, Err(SrtWriteError::Persist { .. })));
        assert!(!part_path(&dest).exists());
    }

    #[test]
    fn test_part_path_appends_suffix() {
        assert_eq!(
            part_path(Path::new("/tmp/out/clip.srt")),
            PathBuf::from("/tmp/out/clip.srt.part")
        );
    }
}
