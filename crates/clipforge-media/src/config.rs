//! Editor configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clipforge_models::EncodingConfig;

/// Default upper bound on a single external tool invocation.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(3600);

/// Configuration for a [`crate::VideoEditor`].
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    /// FFmpeg executable (name on PATH or absolute path)
    pub ffmpeg_path: PathBuf,
    /// FFprobe executable
    pub ffprobe_path: PathBuf,
    /// Working directory for intermediates; a fresh temp dir when unset
    pub work_dir: Option<PathBuf>,
    /// Bounded wait for each external call; `None` waits forever
    pub timeout: Option<Duration>,
    /// Encoder parameters for re-encoding operations
    pub encoding: EncodingConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: PathBuf::from("ffmpeg"),
            ffprobe_path: PathBuf::from("ffprobe"),
            work_dir: None,
            timeout: Some(DEFAULT_TOOL_TIMEOUT),
            encoding: EncodingConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Create config from environment variables.
    ///
    /// `FFMPEG_TIMEOUT_SECS=0` disables the timeout.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let timeout = match std::env::var("FFMPEG_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.timeout,
        };

        let encoding = EncodingConfig {
            preset: std::env::var("CLIPFORGE_PRESET").unwrap_or(defaults.encoding.preset),
            crf: std::env::var("CLIPFORGE_CRF")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|crf| *crf <= 51)
                .unwrap_or(defaults.encoding.crf),
            audio_bitrate: std::env::var("CLIPFORGE_AUDIO_BITRATE")
                .unwrap_or(defaults.encoding.audio_bitrate),
            ..defaults.encoding
        };

        Self {
            ffmpeg_path: std::env::var("FFMPEG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.ffmpeg_path),
            ffprobe_path: std::env::var("FFPROBE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.ffprobe_path),
            work_dir: std::env::var("CLIPFORGE_WORK_DIR").ok().map(PathBuf::from),
            timeout,
            encoding,
        }
    }

    pub fn with_ffmpeg(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffmpeg_path = path.into();
        self
    }

    pub fn with_ffprobe(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffprobe_path = path.into();
        self
    }

    /// Use `dir` for intermediates. It is created if missing and never
    /// removed by cleanup.
    pub fn with_work_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.work_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_encoding(mut self, encoding: EncodingConfig) -> Self {
        self.encoding = encoding;
        self
    }
}
