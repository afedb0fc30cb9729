//! Render request wire types.

use reelcut_edit_model::{
    complement_ranges, BubbleSettings, TimeRange, VisualReplacement, VoiceSubstitution,
};
use serde::{Deserialize, Serialize};

/// A span of source media to keep, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeepRange {
    pub source_start: f64,
    pub source_end: f64,
}

impl KeepRange {
    pub fn duration(&self) -> f64 {
        self.source_end - self.source_start
    }
}

/// A span of source media to drop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutRange {
    pub start: f64,
    pub end: f64,
}

/// How the output timeline is described to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RenderTimeline {
    /// Splice exactly these ranges, in this order.
    KeepRanges {
        ranges: Vec<KeepRange>,
        output_duration: f64,
    },
    /// Keep the whole source except these cuts. Cuts may overlap; the
    /// renderer merges them.
    Deletions {
        cuts: Vec<CutRange>,
        source_duration: f64,
    },
}

impl RenderTimeline {
    /// Source ranges the renderer will actually keep, in output order.
    pub fn resolved_ranges(&self) -> Vec<TimeRange> {
        match self {
            Self::KeepRanges { ranges, .. } => ranges
                .iter()
                .filter_map(|r| TimeRange::new(r.source_start, r.source_end))
                .collect(),
            Self::Deletions {
                cuts,
                source_duration,
            } => {
                let cuts: Vec<TimeRange> = cuts
                    .iter()
                    .filter_map(|c| TimeRange::new(c.start, c.end))
                    .collect();
                complement_ranges(&cuts, *source_duration)
            }
        }
    }

    /// Length of the rendered video.
    pub fn output_duration(&self) -> f64 {
        match self {
            Self::KeepRanges {
                output_duration, ..
            } => *output_duration,
            Self::Deletions { .. } => self.resolved_ranges().iter().map(|r| r.duration()).sum(),
        }
    }
}

/// Everything the render backend needs for one output video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub source_id: String,
    pub timeline: RenderTimeline,

    #[serde(default)]
    pub voice_edits: Vec<VoiceSubstitution>,

    #[serde(default)]
    pub visual_replacements: Vec<VisualReplacement>,

    /// Present only when a camera recording is composited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bubble: Option<BubbleSettings>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeline_serializes_with_mode_tag() {
        let timeline = RenderTimeline::KeepRanges {
            ranges: vec![KeepRange {
                source_start: 4.0,
                source_end: 10.0,
            }],
            output_duration: 6.0,
        };
        let json = serde_json::to_value(&timeline).unwrap();
        assert_eq!(json["mode"], "keep_ranges");
        assert_eq!(json["ranges"][0]["source_start"], 4.0);

        let cuts: RenderTimeline = serde_json::from_str(
            r#"{"mode":"deletions","cuts":[{"start":1.0,"end":2.0}],"source_duration":5.0}"#,
        )
        .unwrap();
        assert!(matches!(cuts, RenderTimeline::Deletions { .. }));
    }

    #[test]
    fn test_deletion_timeline_merges_overlapping_cuts() {
        let timeline = RenderTimeline::Deletions {
            cuts: vec![
                CutRange { start: 2.5, end: 4.0 },
                CutRange { start: 2.0, end: 3.0 },
            ],
            source_duration: 10.0,
        };
        let kept: Vec<(f64, f64)> = timeline
            .resolved_ranges()
            .iter()
            .map(|r| (r.start, r.end))
            .collect();
        assert_eq!(kept, vec![(0.0, 2.0), (4.0, 10.0)]);
        assert!((timeline.output_duration() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_everything_cut_keeps_nothing() {
        let timeline = RenderTimeline::Deletions {
            cuts: vec![CutRange { start: 0.0, end: 5.0 }],
            source_duration: 5.0,
        };
        assert!(timeline.resolved_ranges().is_empty());
        assert_eq!(timeline.output_duration(), 0.0);
    }
}
