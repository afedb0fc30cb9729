//! Word-level transcript as supplied by the transcription service.

use serde::{Deserialize, Serialize};

/// A single transcribed word with source-time bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptWord {
    pub id: String,
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
    #[serde(default = "full_confidence")]
    pub confidence: f64,
}

/// A transcribed utterance grouping consecutive words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub start_time: f64,
    pub end_time: f64,
    pub words: Vec<TranscriptWord>,
}

/// Full transcript for one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub segments: Vec<TranscriptSegment>,
    pub duration: f64,
    #[serde(default = "default_language")]
    pub language: String,
}

impl Transcript {
    /// All words in transcript order.
    pub fn words(&self) -> impl Iterator<Item = &TranscriptWord> {
        self.segments.iter().flat_map(|s| s.words.iter())
    }

    /// Look up words by id, preserving transcript order. Unknown ids are
    /// skipped.
    pub fn words_by_ids(&self, ids: &[String]) -> Vec<TranscriptWord> {
        self.words()
            .filter(|w| ids.iter().any(|id| id == &w.id))
            .cloned()
            .collect()
    }

    pub fn word_count(&self) -> usize {
        self.segments.iter().map(|s| s.words.len()).sum()
    }
}

fn full_confidence() -> f64 {
    1.0
}

fn default_language() -> String {
    "en-US".to_string()
}
