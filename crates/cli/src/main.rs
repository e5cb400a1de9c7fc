mod settings;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use clap::{Args, Parser, Subcommand};

use reelcaption_core::pipeline::generate_subtitles_use_case::GenerateSubtitlesUseCase;
use reelcaption_core::segmentation::domain::cue_segmenter::CueSegmenter;
use reelcaption_core::segmentation::domain::grouping_policy::GroupingPolicy;
use reelcaption_core::shared::constants::{
    DEFAULT_MAX_CHARS, DEFAULT_MAX_DURATION_SECONDS, DEFAULT_MAX_GAP_SECONDS, SRT_EXTENSION,
};
use reelcaption_core::shared::timestamp;
use reelcaption_core::subtitles::domain::subtitle_writer::SubtitleWriter;
use reelcaption_core::subtitles::infrastructure::srt_file_reader::SrtFileReader;
use reelcaption_core::subtitles::infrastructure::srt_file_writer::SrtFileWriter;
use reelcaption_core::transcription::domain::word::Word;
use reelcaption_core::transcription::infrastructure::google_speech_transcriber::{
    AudioEncoding, GoogleSpeechConfig, GoogleSpeechTranscriber,
};

use settings::Settings;

/// Word-timed SubRip subtitles for short-form video.
#[derive(Parser)]
#[command(name = "reelcaption", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Transcribe an audio file with Google Speech-to-Text and write subtitles.
    Transcribe {
        /// Input audio file (mp3, wav, flac, ogg/opus).
        audio: PathBuf,

        #[command(flatten)]
        output: OutputArgs,

        #[command(flatten)]
        grouping: GroupingArgs,

        /// Google Cloud API key.
        #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
        api_key: String,

        /// BCP-47 language of the speech (default from settings, en-US).
        #[arg(long)]
        language: Option<String>,

        /// Sample rate of the audio in hertz.
        #[arg(long)]
        sample_rate: Option<u32>,

        /// Seconds to wait for the transcription before giving up.
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Group words from a JSON file (`[{"text", "start", "end"}, ...]`) into subtitles.
    Segment {
        /// JSON file with word timings.
        words: PathBuf,

        #[command(flatten)]
        output: OutputArgs,

        #[command(flatten)]
        grouping: GroupingArgs,
    },

    /// Decode a SubRip file and list its cues.
    Inspect {
        /// SubRip file to read.
        srt: PathBuf,

        /// Print cues as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Show the settings file location and effective settings.
    Config {
        /// Write the current settings to the settings file.
        #[arg(long)]
        init: bool,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Directory for the subtitle file (created if missing).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Subtitle file name (default: transcript<unix-time>.srt).
    #[arg(long)]
    name: Option<String>,
}

#[derive(Args)]
struct GroupingArgs {
    /// Longest a multi-word cue may last, in seconds.
    #[arg(long)]
    max_duration: Option<f64>,

    /// Character budget per cue, counting one space per word.
    #[arg(long)]
    max_chars: Option<usize>,

    /// Pause between words, in seconds, that starts a new cue.
    #[arg(long)]
    max_gap: Option<f64>,

    /// Fixed number of words per cue instead of timing limits.
    #[arg(long, conflicts_with_all = ["max_duration", "max_chars", "max_gap"])]
    words_per_cue: Option<usize>,
}

impl GroupingArgs {
    fn resolve(&self, base: GroupingPolicy) -> GroupingPolicy {
        if let Some(words_per_cue) = self.words_per_cue {
            return GroupingPolicy::FixedWindow { words_per_cue };
        }
        if self.max_duration.is_none() && self.max_chars.is_none() && self.max_gap.is_none() {
            return base;
        }

        let (duration, chars, gap) = match base {
            GroupingPolicy::Constrained {
                max_duration_seconds,
                max_chars,
                max_gap_seconds,
            } => (max_duration_seconds, max_chars, max_gap_seconds),
            GroupingPolicy::FixedWindow { .. } => (
                DEFAULT_MAX_DURATION_SECONDS,
                DEFAULT_MAX_CHARS,
                DEFAULT_MAX_GAP_SECONDS,
            ),
        };

        GroupingPolicy::Constrained {
            max_duration_seconds: self.max_duration.unwrap_or(duration),
            max_chars: self.max_chars.unwrap_or(chars),
            max_gap_seconds: self.max_gap.unwrap_or(gap),
        }
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = Settings::load();

    match cli.command {
        Command::Transcribe {
            audio,
            output,
            grouping,
            api_key,
            language,
            sample_rate,
            timeout,
        } => {
            validate_input(&audio)?;
            let policy = grouping.resolve(settings.policy);
            policy.validate()?;

            let mut config = GoogleSpeechConfig::new(api_key);
            config.encoding = audio_encoding(&audio);
            config.language_code = language.unwrap_or(settings.language_code.clone());
            config.sample_rate_hertz = sample_rate.unwrap_or(settings.sample_rate_hertz);
            config.timeout = Duration::from_secs(timeout.unwrap_or(settings.timeout_secs));
            config.poll_interval = Duration::from_millis(settings.poll_interval_ms);

            let use_case = GenerateSubtitlesUseCase::new(
                Box::new(GoogleSpeechTranscriber::new(config)?),
                Box::new(SrtFileWriter),
                policy,
            );
            let (output_dir, name) = output.resolve(&settings);
            let path = use_case.run(&audio, &output_dir, &name)?;
            println!("{}", path.display());
        }
        Command::Segment {
            words: words_path,
            output,
            grouping,
        } => {
            validate_input(&words_path)?;
            let policy = grouping.resolve(settings.policy);
            policy.validate()?;

            let json = fs::read_to_string(&words_path)?;
            let words = parse_word_list(&json)
                .map_err(|e| format!("Invalid word list {}: {e}", words_path.display()))?;
            let cues = CueSegmenter::segment(&words, &policy);

            let (output_dir, name) = output.resolve(&settings);
            let path = SrtFileWriter.write(&output_dir, &name, &cues)?;
            println!("{}", path.display());
        }
        Command::Inspect { srt, json } => {
            validate_input(&srt)?;
            let cues = SrtFileReader.read(&srt)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&cues)?);
            } else {
                for cue in &cues {
                    println!(
                        "{:>4}  {} --> {}  {}",
                        cue.index,
                        timestamp::format(cue.start),
                        timestamp::format(cue.end),
                        cue.text
                    );
                }
            }
        }
        Command::Config { init } => {
            let path = Settings::config_path().ok_or("Could not determine config directory")?;
            if init {
                settings.save_to(&path)?;
                log::info!("Settings written to {}", path.display());
            }
            println!("{}", path.display());
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }

    Ok(())
}

impl OutputArgs {
    fn resolve(&self, settings: &Settings) -> (PathBuf, String) {
        let dir = self
            .output_dir
            .clone()
            .unwrap_or_else(|| settings.output_dir.clone());
        let name = self.name.clone().unwrap_or_else(default_file_name);
        (dir, name)
    }
}

/// `transcript<unix-seconds>.srt`, taken when the command runs.
fn default_file_name() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("transcript{secs}.{SRT_EXTENSION}")
}

fn audio_encoding(path: &Path) -> AudioEncoding {
    let encoding = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(AudioEncoding::from_extension);
    encoding.unwrap_or_else(|| {
        log::warn!("Unknown audio extension for {}, assuming MP3", path.display());
        AudioEncoding::Mp3
    })
}

/// Deserializes a JSON word list and checks every word before grouping.
fn parse_word_list(json: &str) -> Result<Vec<Word>, Box<dyn std::error::Error>> {
    let words: Vec<Word> = serde_json::from_str(json)?;
    for (i, word) in words.iter().enumerate() {
        word.validate().map_err(|e| format!("word #{}: {e}", i + 1))?;
    }
    Ok(words)
}

fn validate_input(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("Input file not found: {}", path.display()).into());
    }
    Ok(())
}
