use super::cue::Cue;
use super::grouping_policy::GroupingPolicy;
use crate::transcription::domain::word::Word;

/// Groups word-level timestamps into subtitle cues.
pub struct CueSegmenter;

/// Words collected for the cue currently being built.
struct PendingCue<'a> {
    start: f64,
    end: f64,
    texts: Vec<&'a str>,
    char_count: usize,
}

impl<'a> PendingCue<'a> {
    fn open(word: &'a Word) -> Self {
        let mut pending = Self {
            start: word.start,
            end: word.start,
            texts: Vec::new(),
            char_count: 0,
        };
        pending.push(word);
        pending
    }

    fn push(&mut self, word: &'a Word) {
        self.end = word.effective_end();
        self.texts.push(&word.text);
        self.char_count += text_len(&word.text) + 1;
    }

    fn into_cue(self, index: usize) -> Cue {
        Cue {
            index,
            start: self.start,
            end: self.end,
            text: self.texts.join(" "),
        }
    }
}

impl CueSegmenter {
    /// Splits `words` into cues according to `policy`.
    ///
    /// Every word lands in exactly one cue, in input order, and cues are
    /// numbered from 1. Words reporting `end <= start` are given a short
    /// minimum duration. Input order is taken as given.
    pub fn segment(words: &[Word], policy: &GroupingPolicy) -> Vec<Cue> {
        let cues = match *policy {
            GroupingPolicy::Constrained {
                max_duration_seconds,
                max_chars,
                max_gap_seconds,
            } => Self::segment_constrained(words, max_duration_seconds, max_chars, max_gap_seconds),
            GroupingPolicy::FixedWindow { words_per_cue } => {
                Self::segment_fixed_window(words, words_per_cue)
            }
        };
        log::debug!("Segmented {} words into {} cues ({policy})", words.len(), cues.len());
        cues
    }

    fn segment_constrained(
        words: &[Word],
        max_duration: f64,
        max_chars: usize,
        max_gap: f64,
    ) -> Vec<Cue> {
        let mut cues = Vec::new();
        let mut pending: Option<PendingCue> = None;

        for word in words {
            let word_end = word.effective_end();

            if let Some(current) = pending.take() {
                let gap = word.start - current.end;
                let chars = current.char_count + text_len(&word.text) + 1;
                let duration = word_end - current.start;

                if chars > max_chars || duration > max_duration || gap > max_gap {
                    cues.push(current.into_cue(cues.len() + 1));
                    pending = Some(PendingCue::open(word));
                } else {
                    let mut current = current;
                    current.push(word);
                    pending = Some(current);
                }
            } else {
                // A word that breaks a limit on its own still gets a cue.
                pending = Some(PendingCue::open(word));
            }
        }

        if let Some(current) = pending {
            cues.push(current.into_cue(cues.len() + 1));
        }
        cues
    }

    fn segment_fixed_window(words: &[Word], words_per_cue: usize) -> Vec<Cue> {
        words
            .chunks(words_per_cue.max(1))
            .enumerate()
            .map(|(i, chunk)| {
                let mut pending = PendingCue::open(&chunk[0]);
                for word in &chunk[1..] {
                    pending.push(word);
                }
                pending.into_cue(i + 1)
            })
            .collect()
    }
}

fn text_len(text: &str) -> usize {
    text.chars().count()
}
