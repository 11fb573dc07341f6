//! FFprobe media information.

use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::command::run_tool;
use crate::error::{MediaError, MediaResult};

/// Stream-level metadata for one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    /// File that was probed
    pub path: PathBuf,
    /// Container duration in seconds (0.0 when unknown)
    pub duration: f64,
    /// First video stream dimensions
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Frame rate of the first video stream
    pub fps: Option<f64>,
    /// Video codec
    pub video_codec: Option<String>,
    pub has_video: bool,
    pub has_audio: bool,
}

impl MediaInfo {
    /// `(width, height)` of the first video stream.
    pub fn dimensions(&self) -> MediaResult<(u32, u32)> {
        match (self.has_video, self.width, self.height) {
            (true, Some(w), Some(h)) => Ok((w, h)),
            _ => Err(MediaError::NoVideoStream(self.path.clone())),
        }
    }

    /// Reduced `W:H` aspect ratio string.
    pub fn aspect_ratio(&self) -> MediaResult<String> {
        let (w, h) = self.dimensions()?;
        Ok(aspect_ratio(w, h))
    }
}

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    duration: Option<String>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
}

/// Probe a media file.
pub async fn probe_media(
    ffprobe: &Path,
    path: impl AsRef<Path>,
    timeout: Option<Duration>,
) -> MediaResult<MediaInfo> {
    let path = path.as_ref();

    let args: [&OsStr; 7] = [
        OsStr::new("-v"),
        OsStr::new("error"),
        OsStr::new("-print_format"),
        OsStr::new("json"),
        OsStr::new("-show_format"),
        OsStr::new("-show_streams"),
        path.as_os_str(),
    ];

    let output = run_tool(ffprobe, &args, timeout)
        .await
        .map_err(|e| match e {
            MediaError::FfmpegFailed { stderr, exit_code, .. } => MediaError::probe_failed(
                path,
                format!("exit code {:?}: {}", exit_code, stderr.trim()),
            ),
            other => other,
        })?;

    parse_probe_output(path, &output.stdout)
}

/// Parse `ffprobe -print_format json` output.
pub fn parse_probe_output(path: &Path, stdout: &[u8]) -> MediaResult<MediaInfo> {
    let probe: FfprobeOutput = serde_json::from_slice(stdout)
        .map_err(|e| MediaError::probe_failed(path, format!("unparseable output: {}", e)))?;

    let video = probe
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"));
    let has_audio = probe
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"));

    // Container duration, then the video stream's own, then unknown
    let duration = parse_seconds(probe.format.duration.as_deref())
        .or_else(|| video.and_then(|v| parse_seconds(v.duration.as_deref())))
        .unwrap_or(0.0);

    let fps = video.and_then(|v| {
        v.avg_frame_rate
            .as_deref()
            .and_then(parse_frame_rate)
            .or_else(|| v.r_frame_rate.as_deref().and_then(parse_frame_rate))
    });

    Ok(MediaInfo {
        path: path.to_path_buf(),
        duration,
        width: video.and_then(|v| v.width),
        height: video.and_then(|v| v.height),
        fps,
        video_codec: video.and_then(|v| v.codec_name.clone()),
        has_video: video.is_some(),
        has_audio,
    })
}

fn parse_seconds(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|d| d.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
}

/// Parse frame rate string (e.g., "30/1" or "29.97").
fn parse_frame_rate(s: &str) -> Option<f64> {
    if let Some((num, den)) = s.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
        return None;
    }
    s.parse().ok()
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Aspect ratio reduced by the greatest common divisor, as `W:H`.
pub fn aspect_ratio(width: u32, height: u32) -> String {
    let g = gcd(width, height).max(1);
    format!("{}:{}", width / g, height / g)
}
