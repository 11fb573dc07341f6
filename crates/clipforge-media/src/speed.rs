//! Segment arithmetic for partial speed changes.
//!
//! A speed change over `[start, end)` splits the input into up to three
//! parts: an untouched part before the window, the retimed window itself and
//! an untouched tail. Each part is rendered to its own file and the files are
//! stitched back together with the concat demuxer.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Parts shorter than this are dropped.
const MIN_SEGMENT_SECS: f64 = 1e-3;

/// Which part of the input a segment covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRole {
    Pre,
    Mid,
    Post,
}

/// One part of the input to render.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub role: SegmentRole,
    /// Offset into the input
    pub start: f64,
    /// Length to read; `None` reads to the end of the input
    pub length: Option<f64>,
    /// Playback factor; 1.0 for untouched parts
    pub speed: f64,
}

impl Segment {
    /// Whether the segment needs timestamp/tempo filters.
    pub fn is_retimed(&self) -> bool {
        (self.speed - 1.0).abs() > f64::EPSILON
    }

    /// Rendered length, once the speed factor is applied.
    pub fn output_length(&self) -> Option<f64> {
        self.length.map(|len| len / self.speed)
    }
}

/// Validated split of an input around a retimed window.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedSegmentPlan {
    start: f64,
    end: f64,
    speed: f64,
    /// Input duration; 0.0 when unknown
    duration: f64,
}

impl SpeedSegmentPlan {
    /// Clamp the window to the input and validate it.
    ///
    /// `duration` of 0.0 means the input length is unknown, in which case
    /// `end` is taken as given and a tail is always rendered.
    pub fn new(start: f64, end: f64, speed: f64, duration: f64) -> MediaResult<Self> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(MediaError::validation(format!(
                "Speed must be a positive number, got {}",
                speed
            )));
        }
        if !start.is_finite() || !end.is_finite() {
            return Err(MediaError::validation("Segment bounds must be finite"));
        }

        let start = start.max(0.0);
        let end = if duration > 0.0 { end.min(duration) } else { end };

        if end <= start {
            return Err(MediaError::validation(format!(
                "Empty speed segment after clamping: start {} >= end {}",
                start, end
            )));
        }

        Ok(Self {
            start,
            end,
            speed,
            duration,
        })
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Segments in playback order.
    pub fn segments(&self) -> Vec<Segment> {
        let mut segments = Vec::with_capacity(3);

        if self.start > MIN_SEGMENT_SECS {
            segments.push(Segment {
                role: SegmentRole::Pre,
                start: 0.0,
                length: Some(self.start),
                speed: 1.0,
            });
        }

        segments.push(Segment {
            role: SegmentRole::Mid,
            start: self.start,
            length: Some(self.end - self.start),
            speed: self.speed,
        });

        let has_tail = self.duration <= 0.0 || self.duration - self.end > MIN_SEGMENT_SECS;
        if has_tail {
            segments.push(Segment {
                role: SegmentRole::Post,
                start: self.end,
                length: None,
                speed: 1.0,
            });
        }

        segments
    }

    /// Whether the window covers the whole input.
    pub fn is_single_segment(&self) -> bool {
        self.segments().len() == 1
    }

    /// Output length in seconds, when the input duration is known.
    pub fn expected_duration(&self) -> Option<f64> {
        if self.duration <= 0.0 {
            return None;
        }
        let window = self.end - self.start;
        Some(self.duration - window + window / self.speed)
    }
}

/// Quote a path for a concat-demuxer `file` directive.
fn quote_concat_path(path: &Path) -> String {
    format!("'{}'", path.display().to_string().replace('\'', r"'\''"))
}

/// Concat-demuxer manifest listing `parts` in order.
pub fn concat_list_contents(parts: &[PathBuf]) -> MediaResult<String> {
    let mut contents = String::new();
    for part in parts {
        let abs = std::path::absolute(part)?;
        contents.push_str("file ");
        contents.push_str(&quote_concat_path(&abs));
        contents.push('\n');
    }
    Ok(contents)
}

/// Write a concat-demuxer manifest to `list`.
pub async fn write_concat_list(list: &Path, parts: &[PathBuf]) -> MediaResult<()> {
    let contents = concat_list_contents(parts)?;
    tokio::fs::write(list, contents).await?;
    debug!(list = %list.display(), parts = parts.len(), "Wrote concat list");
    Ok(())
}
