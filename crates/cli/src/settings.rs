use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use reelcaption_core::segmentation::domain::grouping_policy::GroupingPolicy;
use reelcaption_core::shared::constants::{
    DEFAULT_LANGUAGE_CODE, DEFAULT_OUTPUT_DIR, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_SAMPLE_RATE_HERTZ, DEFAULT_TRANSCRIPTION_TIMEOUT_SECS,
};

/// Persistent defaults; command-line flags take precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub policy: GroupingPolicy,
    pub output_dir: PathBuf,
    pub language_code: String,
    pub sample_rate_hertz: u32,
    pub timeout_secs: u64,
    pub poll_interval_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            policy: GroupingPolicy::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            language_code: DEFAULT_LANGUAGE_CODE.to_string(),
            sample_rate_hertz: DEFAULT_SAMPLE_RATE_HERTZ,
            timeout_secs: DEFAULT_TRANSCRIPTION_TIMEOUT_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("ReelCaption").join("settings.json"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Missing files give defaults; unreadable ones are reported and ignored.
    pub fn load_from(path: &Path) -> Self {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring invalid settings file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load_from(&tmp.path().join("settings.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_invalid_json_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.json");
        fs::write(
            &path,
            r#"{"policy": {"kind": "fixed_window", "words_per_cue": 1}, "timeout_secs": 600}"#,
        )
        .unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.policy, GroupingPolicy::FixedWindow { words_per_cue: 1 });
        assert_eq!(settings.timeout_secs, 600);
        assert_eq!(settings.language_code, "en-US");
        assert_eq!(settings.output_dir, PathBuf::from("transcripts"));
    }

    #[test]
    fn test_save_then_load_preserves_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ReelCaption").join("settings.json");
        let settings = Settings {
            language_code: "en-GB".to_string(),
            sample_rate_hertz: 44100,
            ..Settings::default()
        };

        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn test_config_path_is_under_app_directory() {
        if let Some(path) = Settings::config_path() {
            assert!(path.ends_with("ReelCaption/settings.json"));
        }
    }
}
