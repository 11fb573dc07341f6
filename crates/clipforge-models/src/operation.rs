//! Statically declared registry of editing operations.
//!
//! Each variant is one public editor operation, addressed on the wire by its
//! `op` tag. `input` may be omitted when the operation is a step in a chain;
//! the previous step's output is substituted.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::caption::{Caption, CaptionStyle, Position};
use crate::overlay::ImageOverlaySpec;
use crate::ratio::{PadStyle, RatioTarget, ResizeMode};
use crate::timestamp::Seconds;

fn default_true() -> bool {
    true
}

fn default_volume() -> f64 {
    1.0
}

/// A single editing operation with its keyword arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Cut {
        #[serde(default)]
        input: Option<PathBuf>,
        start: Seconds,
        #[serde(default)]
        end: Option<Seconds>,
        #[serde(default)]
        reencode: bool,
        #[serde(default)]
        output: Option<PathBuf>,
    },
    Join {
        /// First clip; in a chain this is the previous output
        #[serde(default)]
        input: Option<PathBuf>,
        /// Clips appended after `input`, in order
        #[serde(default)]
        inputs: Vec<PathBuf>,
        #[serde(default)]
        reencode: bool,
        #[serde(default)]
        output: Option<PathBuf>,
    },
    InsertImage {
        #[serde(default)]
        input: Option<PathBuf>,
        image: PathBuf,
        start: Seconds,
        end: Seconds,
        #[serde(default)]
        x: Position,
        #[serde(default)]
        y: Position,
        #[serde(default)]
        center: bool,
        #[serde(default)]
        output: Option<PathBuf>,
    },
    InsertImages {
        #[serde(default)]
        input: Option<PathBuf>,
        images: Vec<ImageOverlaySpec>,
        #[serde(default)]
        output: Option<PathBuf>,
    },
    InsertVideo {
        #[serde(default)]
        input: Option<PathBuf>,
        overlay: PathBuf,
        #[serde(default)]
        start: Seconds,
        #[serde(default)]
        end: Option<Seconds>,
        #[serde(default)]
        x: Position,
        #[serde(default)]
        y: Position,
        #[serde(default = "default_true")]
        center: bool,
        #[serde(default)]
        keep_overlay_audio: bool,
        #[serde(default)]
        output: Option<PathBuf>,
    },
    MuteAudio {
        #[serde(default)]
        input: Option<PathBuf>,
        start: Seconds,
        end: Seconds,
        #[serde(default)]
        output: Option<PathBuf>,
    },
    ReplaceAudio {
        #[serde(default)]
        input: Option<PathBuf>,
        audio: PathBuf,
        #[serde(default)]
        start_time: Seconds,
        #[serde(default)]
        output: Option<PathBuf>,
    },
    MergeAudio {
        #[serde(default)]
        input: Option<PathBuf>,
        audio: PathBuf,
        #[serde(default)]
        start: Seconds,
        /// Gain applied to the merged track
        #[serde(default = "default_volume")]
        volume: f64,
        #[serde(default)]
        output: Option<PathBuf>,
    },
    ChangeSpeedSegment {
        #[serde(default)]
        input: Option<PathBuf>,
        start: Seconds,
        end: Seconds,
        speed: f64,
        #[serde(default)]
        output: Option<PathBuf>,
    },
    ChangeRatio {
        #[serde(default)]
        input: Option<PathBuf>,
        ratio: RatioTarget,
        #[serde(default)]
        mode: ResizeMode,
        #[serde(default)]
        style: PadStyle,
        #[serde(default)]
        width: Option<u32>,
        #[serde(default)]
        output: Option<PathBuf>,
    },
    #[serde(alias = "set_captions")]
    InsertCaptions {
        #[serde(default)]
        input: Option<PathBuf>,
        captions: Vec<Caption>,
        #[serde(default)]
        style: CaptionStyle,
        #[serde(default)]
        output: Option<PathBuf>,
    },
    Probe {
        #[serde(default)]
        input: Option<PathBuf>,
    },
}

impl Operation {
    /// Every operation name accepted on the wire.
    pub const NAMES: &'static [&'static str] = &[
        "cut",
        "join",
        "insert_image",
        "insert_images",
        "insert_video",
        "mute_audio",
        "replace_audio",
        "merge_audio",
        "change_speed_segment",
        "change_ratio",
        "insert_captions",
        "set_captions",
        "probe",
    ];

    /// Canonical operation name.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Cut { .. } => "cut",
            Operation::Join { .. } => "join",
            Operation::InsertImage { .. } => "insert_image",
            Operation::InsertImages { .. } => "insert_images",
            Operation::InsertVideo { .. } => "insert_video",
            Operation::MuteAudio { .. } => "mute_audio",
            Operation::ReplaceAudio { .. } => "replace_audio",
            Operation::MergeAudio { .. } => "merge_audio",
            Operation::ChangeSpeedSegment { .. } => "change_speed_segment",
            Operation::ChangeRatio { .. } => "change_ratio",
            Operation::InsertCaptions { .. } => "insert_captions",
            Operation::Probe { .. } => "probe",
        }
    }

    fn input_slot(&mut self) -> &mut Option<PathBuf> {
        match self {
            Operation::Cut { input, .. }
            | Operation::Join { input, .. }
            | Operation::InsertImage { input, .. }
            | Operation::InsertImages { input, .. }
            | Operation::InsertVideo { input, .. }
            | Operation::MuteAudio { input, .. }
            | Operation::ReplaceAudio { input, .. }
            | Operation::MergeAudio { input, .. }
            | Operation::ChangeSpeedSegment { input, .. }
            | Operation::ChangeRatio { input, .. }
            | Operation::InsertCaptions { input, .. }
            | Operation::Probe { input } => input,
        }
    }

    /// The primary input path, if set.
    pub fn input(&self) -> Option<&Path> {
        match self {
            Operation::Cut { input, .. }
            | Operation::Join { input, .. }
            | Operation::InsertImage { input, .. }
            | Operation::InsertImages { input, .. }
            | Operation::InsertVideo { input, .. }
            | Operation::MuteAudio { input, .. }
            | Operation::ReplaceAudio { input, .. }
            | Operation::MergeAudio { input, .. }
            | Operation::ChangeSpeedSegment { input, .. }
            | Operation::ChangeRatio { input, .. }
            | Operation::InsertCaptions { input, .. }
            | Operation::Probe { input } => input.as_deref(),
        }
    }

    /// Fill in the primary input when the caller left it empty.
    pub fn with_default_input(mut self, fallback: impl Into<PathBuf>) -> Self {
        let slot = self.input_slot();
        if slot.is_none() {
            *slot = Some(fallback.into());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_cover_variants() {
        let ops: Vec<Operation> = serde_json::from_str(
            r#"[
                {"op": "cut", "start": 1},
                {"op": "join", "inputs": ["a.mp4", "b.mp4"]},
                {"op": "mute_audio", "start": 4, "end": 6},
                {"op": "set_captions", "captions": []},
                {"op": "probe"}
            ]"#,
        )
        .unwrap();

        for op in &ops {
            assert!(Operation::NAMES.contains(&op.name()));
        }
        assert_eq!(ops[3].name(), "insert_captions");
    }

    #[test]
    fn test_unknown_operation_rejected() {
        assert!(serde_json::from_str::<Operation>(r#"{"op": "explode"}"#).is_err());
    }

    #[test]
    fn test_ratio_keyword_rejected_at_parse() {
        let result = serde_json::from_str::<Operation>(
            r#"{"op": "change_ratio", "ratio": "square"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_clock_timestamps_accepted() {
        let op: Operation =
            serde_json::from_str(r#"{"op": "cut", "start": "00:05:00", "end": "00:10:00"}"#)
                .unwrap();
        match op {
            Operation::Cut { start, end, .. } => {
                assert_eq!(start.as_f64(), 300.0);
                assert_eq!(end.map(Seconds::as_f64), Some(600.0));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_default_input_only_fills_empty_slot() {
        let op: Operation = serde_json::from_str(r#"{"op": "probe"}"#).unwrap();
        let op = op.with_default_input("prev.mp4");
        assert_eq!(op.input(), Some(Path::new("prev.mp4")));

        let op: Operation =
            serde_json::from_str(r#"{"op": "probe", "input": "mine.mp4"}"#).unwrap();
        let op = op.with_default_input("prev.mp4");
        assert_eq!(op.input(), Some(Path::new("mine.mp4")));
    }

    #[test]
    fn test_insert_video_defaults() {
        let op: Operation =
            serde_json::from_str(r#"{"op": "insert_video", "overlay": "o.mp4", "start": 2}"#)
                .unwrap();
        match op {
            Operation::InsertVideo {
                center,
                keep_overlay_audio,
                end,
                ..
            } => {
                assert!(center);
                assert!(!keep_overlay_audio);
                assert!(end.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
