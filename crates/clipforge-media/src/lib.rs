#![deny(unreachable_patterns)]
#![deny(rustdoc::broken_intra_doc_links)]
//! FFmpeg CLI pipeline for path-to-path video editing.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building with bounded, counted invocations
//! - FFprobe metadata (dimensions, duration, aspect ratio)
//! - A typed filter-graph representation and builders for captions,
//!   overlays, audio delay/mix, aspect-ratio conversion and retiming
//! - Segment stitching for partial speed changes
//! - Tracked temporary files in a per-editor working directory
//! - [`VideoEditor`], the operations façade, and [`pipeline`] for running
//!   declarative operation chains
//! - Still-image helpers in [`image_edit`]

pub mod command;
pub mod config;
pub mod editor;
pub mod encoder;
pub mod error;
pub mod filters;
pub mod image_edit;
pub mod overlay;
pub mod pipeline;
pub mod probe;
pub mod speed;
pub mod workspace;

pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use config::EditorConfig;
pub use editor::VideoEditor;
pub use encoder::{choose_encoder, EncoderChoice};
pub use error::{MediaError, MediaResult};
pub use filters::{Filter, FilterChain, FilterGraph};
pub use overlay::{ImageOverlay, ImageSource, VideoOverlay};
pub use pipeline::{execute, parse_operation, run_chain, StepOutcome};
pub use probe::{aspect_ratio, probe_media, MediaInfo};
pub use speed::SpeedSegmentPlan;
pub use workspace::TempWorkspace;
