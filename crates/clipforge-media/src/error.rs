//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

use clipforge_models::{KeywordError, TimestampError};

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during media processing.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found: {0}")]
    FfmpegNotFound(String),

    #[error("FFprobe not found: {0}")]
    FfprobeNotFound(String),

    #[error("Invalid argument: {0}")]
    Validation(String),

    #[error("FFmpeg command failed (exit code {exit_code:?}): {command}\nSTDOUT:\n{stdout}\nSTDERR:\n{stderr}")]
    FfmpegFailed {
        command: String,
        stdout: String,
        stderr: String,
        exit_code: Option<i32>,
    },

    #[error("FFprobe failed for {path}: {message}")]
    ProbeFailed { path: PathBuf, message: String },

    #[error("No video stream found in {0}")]
    NoVideoStream(PathBuf),

    #[error("Operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl MediaError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an FFmpeg failure error carrying the tool's captured output.
    pub fn ffmpeg_failed(
        command: impl Into<String>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            command: command.into(),
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code,
        }
    }

    /// Create a probe failure error.
    pub fn probe_failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ProbeFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Malformed arguments, detected before any process is spawned.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Metadata extraction failed or lacked an expected stream.
    pub fn is_probe(&self) -> bool {
        matches!(self, Self::ProbeFailed { .. } | Self::NoVideoStream(_))
    }

    /// The processing tool exited non-zero.
    pub fn is_external_tool(&self) -> bool {
        matches!(self, Self::FfmpegFailed { .. })
    }

    /// Required binaries are missing.
    pub fn is_tool_unavailable(&self) -> bool {
        matches!(self, Self::FfmpegNotFound(_) | Self::FfprobeNotFound(_))
    }
}

impl From<KeywordError> for MediaError {
    fn from(err: KeywordError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<TimestampError> for MediaError {
    fn from(err: TimestampError) -> Self {
        Self::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ffmpeg_failed_message_embeds_output() {
        let err = MediaError::ffmpeg_failed("ffmpeg -i a.mp4 b.mp4", "", "Invalid data", Some(1));
        let msg = err.to_string();
        assert!(msg.contains("ffmpeg -i a.mp4 b.mp4"));
        assert!(msg.contains("STDERR:\nInvalid data"));
        assert!(err.is_external_tool());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_keyword_error_maps_to_validation() {
        let err: MediaError = KeywordError::new("ratio", "square", "nope").into();
        assert!(err.is_validation());
        assert!(err.to_string().contains("square"));
    }
}
