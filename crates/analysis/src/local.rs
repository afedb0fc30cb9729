//! Transcript-based filler and silence detection.
//!
//! Works purely from word timings, so it runs offline on any transcript
//! the transcription service produced.

use std::collections::{HashMap, HashSet};

use reelcut_common::{DetectionConfig, ReelcutError, ReelcutResult};
use reelcut_edit_model::{DetectedFiller, FillerKind, Transcript};

use crate::detector::FillerDetector;

/// Built-in filler vocabulary. Two-word entries match a word and its
/// successor.
pub const DEFAULT_FILLER_WORDS: &[&str] = &[
    // Hesitations
    "um", "uh", "umm", "uhh", "er", "err", "ah", "ahh",
    // Discourse markers
    "like", "so", "basically", "actually", "literally",
    "you know", "i mean", "kind of", "sort of",
    // Acknowledgements
    "well", "right", "okay", "ok",
];

const WORD_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':', '\'', '"'];

/// Lowercase a word and strip surrounding punctuation for matching.
pub fn normalize_word(text: &str) -> String {
    text.trim().to_lowercase().trim_matches(WORD_PUNCTUATION).to_string()
}

/// Set of normalized filler words and phrases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillerVocabulary {
    words: HashSet<String>,
}

impl Default for FillerVocabulary {
    fn default() -> Self {
        Self {
            words: DEFAULT_FILLER_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl FillerVocabulary {
    /// Add entries, normalized the same way transcript words are.
    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.words.extend(
            extra
                .into_iter()
                .map(|w| normalize_word(w.as_ref()))
                .filter(|w| !w.is_empty()),
        );
        self
    }

    pub fn contains(&self, normalized: &str) -> bool {
        self.words.contains(normalized)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Detection settings.
#[derive(Debug, Clone)]
pub struct LocalDetectorConfig {
    pub vocabulary: FillerVocabulary,
    /// Pauses at least this long are flagged.
    pub silence_threshold_secs: f64,
}

impl Default for LocalDetectorConfig {
    fn default() -> Self {
        Self::from(&DetectionConfig::default())
    }
}

impl From<&DetectionConfig> for LocalDetectorConfig {
    fn from(config: &DetectionConfig) -> Self {
        Self {
            vocabulary: FillerVocabulary::default().with_extra(&config.extra_filler_words),
            silence_threshold_secs: config.silence_threshold_secs,
        }
    }
}

struct TimedWord<'a> {
    text: &'a str,
    normalized: String,
    start: f64,
    end: f64,
}

/// Find filler words and long pauses in `transcript`.
///
/// A word in the vocabulary is flagged on its own. Otherwise, if it and
/// the next word form a vocabulary phrase, the pair is flagged. Pauses
/// between words, before the first word, and after the last word (up to
/// `duration`) are flagged when they reach the silence threshold.
/// Results are sorted by start time.
pub fn detect_in_transcript(
    transcript: &Transcript,
    duration: f64,
    config: &LocalDetectorConfig,
) -> Vec<DetectedFiller> {
    let words: Vec<TimedWord<'_>> = transcript
        .words()
        .map(|w| TimedWord {
            text: w.text.trim(),
            normalized: normalize_word(&w.text),
            start: w.start_time,
            end: w.end_time,
        })
        .collect();

    if words.is_empty() {
        tracing::warn!("No words found in transcript");
        return Vec::new();
    }

    let mut found = Vec::new();

    for (i, word) in words.iter().enumerate() {
        if config.vocabulary.contains(&word.normalized) {
            found.push(candidate(FillerKind::Filler, word.text.to_string(), word.start, word.end));
            continue;
        }
        if let Some(next) = words.get(i + 1) {
            let phrase = format!("{} {}", word.normalized, next.normalized);
            if config.vocabulary.contains(&phrase) {
                found.push(candidate(
                    FillerKind::Filler,
                    format!("{} {}", word.text, next.text),
                    word.start,
                    next.end,
                ));
            }
        }
    }

    let threshold = config.silence_threshold_secs;
    for pair in words.windows(2) {
        let gap = pair[1].start - pair[0].end;
        if gap >= threshold {
            found.push(candidate(
                FillerKind::Silence,
                format!("[{gap:.1}s silence]"),
                pair[0].end,
                pair[1].start,
            ));
        }
    }

    if let Some(first) = words.first() {
        if first.start >= threshold {
            found.push(candidate(
                FillerKind::Silence,
                format!("[{:.1}s silence at start]", first.start),
                0.0,
                first.start,
            ));
        }
    }

    if let Some(last) = words.last() {
        let tail = duration - last.end;
        if tail >= threshold {
            found.push(candidate(
                FillerKind::Silence,
                format!("[{tail:.1}s silence at end]"),
                last.end,
                duration,
            ));
        }
    }

    found.sort_by(|a, b| a.start.total_cmp(&b.start));
    tracing::info!(count = found.len(), "Detected fillers/silences");
    found
}

fn candidate(kind: FillerKind, text: String, start: f64, end: f64) -> DetectedFiller {
    DetectedFiller {
        id: short_id(),
        kind,
        text,
        start,
        end,
    }
}

/// First eight hex digits of a fresh v4 UUID.
fn short_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Detector backed by transcripts already held in memory.
#[derive(Debug, Clone, Default)]
pub struct TranscriptFillerDetector {
    config: LocalDetectorConfig,
    sources: HashMap<String, (Transcript, f64)>,
}

impl TranscriptFillerDetector {
    pub fn new(config: LocalDetectorConfig) -> Self {
        Self {
            config,
            sources: HashMap::new(),
        }
    }

    /// Register the transcript for a source of `duration` seconds.
    pub fn with_source(mut self, source_id: impl Into<String>, transcript: Transcript, duration: f64) -> Self {
        self.sources.insert(source_id.into(), (transcript, duration));
        self
    }
}

#[async_trait::async_trait]
impl FillerDetector for TranscriptFillerDetector {
    async fn detect(&self, source_id: &str) -> ReelcutResult<Vec<DetectedFiller>> {
        let (transcript, duration) = self.sources.get(source_id).ok_or_else(|| {
            ReelcutError::detection(format!("no transcript loaded for source {source_id}"))
        })?;
        Ok(detect_in_transcript(transcript, *duration, &self.config))
    }
}
