//! Path-to-path editing operations.
//!
//! [`VideoEditor`] owns a working directory and a runner. Every operation
//! takes input paths, validates its arguments before spawning anything, runs
//! one or more FFmpeg passes and returns the output path. When the caller
//! does not name an output, a file is allocated in the working directory and
//! tracked until [`VideoEditor::remove_temp`] or [`VideoEditor::cleanup`].

use image::ImageFormat;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

use clipforge_models::encoding::{IMAGE_SUFFIX, VIDEO_SUFFIX};
use clipforge_models::ratio::DEFAULT_TARGET_WIDTH;
use clipforge_models::{Caption, CaptionStyle, PadStyle, RatioTarget, ResizeMode};

use crate::command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
use crate::config::EditorConfig;
use crate::encoder::{choose_encoder, EncoderChoice};
use crate::error::{MediaError, MediaResult};
use crate::filters::{
    atempo_chain, captions_chain, concat_chain, crop_filter, delay_trim_chain,
    delayed_audio_chain, delayed_mix_chains, mute_window, overlay_images_graph,
    overlay_video_chain, pad_blur_graph, pad_color_filter, pad_image_graph, setpts_filter,
    FilterGraph, OverlayStage,
};
use crate::image_edit;
use crate::overlay::{ImageOverlay, ImageSource, VideoOverlay};
use crate::probe::{probe_media, MediaInfo};
use crate::speed::{write_concat_list, Segment, SpeedSegmentPlan};
use crate::workspace::TempWorkspace;

const CONCAT_LIST_SUFFIX: &str = ".txt";

/// FFmpeg-backed video editor.
#[derive(Debug)]
pub struct VideoEditor {
    config: EditorConfig,
    runner: FfmpegRunner,
    ffprobe: PathBuf,
    probes: AtomicUsize,
    workspace: TempWorkspace,
}

fn check_start(what: &str, start: f64) -> MediaResult<()> {
    if !start.is_finite() || start < 0.0 {
        return Err(MediaError::validation(format!(
            "{}: start must be a non-negative number, got {}",
            what, start
        )));
    }
    Ok(())
}

fn check_window(what: &str, start: f64, end: f64) -> MediaResult<()> {
    check_start(what, start)?;
    if !end.is_finite() || end <= start {
        return Err(MediaError::validation(format!(
            "{}: end ({}) must be after start ({})",
            what, end, start
        )));
    }
    Ok(())
}

fn delay_ms(seconds: f64) -> u64 {
    (seconds * 1000.0).round() as u64
}

impl VideoEditor {
    /// Verify the tools are installed and prepare the working directory.
    pub fn new(config: EditorConfig) -> MediaResult<Self> {
        let ffmpeg = check_ffmpeg(&config.ffmpeg_path)?;
        let ffprobe = check_ffprobe(&config.ffprobe_path)?;
        let workspace = TempWorkspace::create(config.work_dir.as_deref())?;
        let runner = FfmpegRunner::new(ffmpeg).with_timeout(config.timeout);

        info!(
            ffmpeg = %runner.program().display(),
            work_dir = %workspace.dir().display(),
            "Video editor ready"
        );

        Ok(Self {
            config,
            runner,
            ffprobe,
            probes: AtomicUsize::new(0),
            workspace,
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Directory holding generated intermediates.
    pub fn work_dir(&self) -> &Path {
        self.workspace.dir()
    }

    /// External processes spawned so far (FFmpeg and FFprobe).
    pub fn invocations(&self) -> usize {
        self.runner.invocations() + self.probes.load(Ordering::Relaxed)
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    /// Probe a media file.
    pub async fn probe(&self, path: impl AsRef<Path>) -> MediaResult<MediaInfo> {
        self.probes.fetch_add(1, Ordering::Relaxed);
        probe_media(&self.ffprobe, path, self.config.timeout).await
    }

    /// `(width, height)` of the first video stream.
    pub async fn get_size(&self, path: impl AsRef<Path>) -> MediaResult<(u32, u32)> {
        self.probe(path).await?.dimensions()
    }

    /// Duration in seconds; 0.0 when it cannot be determined.
    pub async fn get_duration(&self, path: impl AsRef<Path>) -> MediaResult<f64> {
        Ok(self.probe(path).await?.duration)
    }

    /// Reduced aspect ratio, e.g. `16:9`.
    pub async fn get_ratio(&self, path: impl AsRef<Path>) -> MediaResult<String> {
        self.probe(path).await?.aspect_ratio()
    }

    // =========================================================================
    // Temp files
    // =========================================================================

    /// Delete tracked files and stop tracking them.
    pub fn remove_temp<I, P>(&mut self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.workspace.release(paths);
    }

    /// Currently tracked temp files.
    pub fn list_temp(&self) -> Vec<PathBuf> {
        self.workspace.list_tracked()
    }

    /// Remove every tracked file and, if the editor created it, the working
    /// directory. Safe to call more than once.
    pub fn cleanup(&mut self) {
        self.workspace.teardown();
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn resolve_output(&mut self, output: Option<&Path>, suffix: &str) -> MediaResult<PathBuf> {
        match output {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                Ok(path.to_path_buf())
            }
            None => self.workspace.allocate(suffix),
        }
    }

    /// Run `cmd`, dropping its output from the tracked set if it fails.
    async fn render(&mut self, cmd: &FfmpegCommand) -> MediaResult<()> {
        if let Err(e) = self.runner.run(cmd).await {
            self.discard_output(cmd.output_path());
            return Err(e);
        }
        Ok(())
    }

    /// Release an allocated output after a failed operation. Caller-named
    /// outputs are left alone.
    fn discard_output(&mut self, output: &Path) {
        if self.workspace.is_tracked(output) {
            self.workspace.release([output]);
        }
    }

    fn encoder(&self) -> EncoderChoice {
        choose_encoder(&self.config.encoding)
    }

    fn audio_args(&self) -> Vec<String> {
        self.config.encoding.audio_args()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Keep `[start, end)` of the input; `end = None` keeps the rest.
    ///
    /// Without `reencode` streams are copied and the cut snaps to keyframes.
    pub async fn cut(
        &mut self,
        input: impl AsRef<Path>,
        start: f64,
        end: Option<f64>,
        output: Option<&Path>,
        reencode: bool,
    ) -> MediaResult<PathBuf> {
        let input = input.as_ref();
        match end {
            Some(end) => check_window("cut", start, end)?,
            None => check_start("cut", start)?,
        }

        let output = self.resolve_output(output, VIDEO_SUFFIX)?;
        info!(input = %input.display(), start, end = ?end, reencode, "Cutting video");

        let mut cmd = FfmpegCommand::new(input, &output).output_seek(start);
        if let Some(end) = end {
            cmd = cmd.output_to(end);
        }
        cmd = if reencode {
            cmd.encoder(&self.encoder()).output_args(self.audio_args())
        } else {
            cmd.codec_copy()
        };

        self.render(&cmd).await?;
        Ok(output)
    }

    /// Concatenate inputs in order.
    ///
    /// Tries a stream-copy concat first; if FFmpeg rejects it (mismatched
    /// codecs or parameters) the inputs are re-encoded through the concat
    /// filter. `reencode` skips the copy attempt.
    pub async fn join(
        &mut self,
        inputs: &[PathBuf],
        output: Option<&Path>,
        reencode: bool,
    ) -> MediaResult<PathBuf> {
        if inputs.len() < 2 {
            return Err(MediaError::validation(format!(
                "join needs at least 2 inputs, got {}",
                inputs.len()
            )));
        }

        let output = self.resolve_output(output, VIDEO_SUFFIX)?;
        info!(inputs = inputs.len(), output = %output.display(), reencode, "Joining videos");

        if !reencode {
            let result = match self.workspace.allocate(CONCAT_LIST_SUFFIX) {
                Ok(list) => {
                    let result = self.copy_join(&list, inputs, &output).await;
                    self.workspace.release([&list]);
                    result
                }
                Err(e) => Err(e),
            };

            match result {
                Ok(()) => return Ok(output),
                Err(e @ MediaError::FfmpegFailed { .. }) => {
                    warn!(error = %e, "Stream-copy join failed, re-encoding");
                }
                Err(e) => {
                    self.discard_output(&output);
                    return Err(e);
                }
            }
        }

        let mut cmd = FfmpegCommand::new(&inputs[0], &output);
        for extra in &inputs[1..] {
            cmd = cmd.input(extra);
        }
        let cmd = cmd
            .filter_complex(concat_chain(inputs.len()).to_string())
            .map("[outv]")
            .map("[outa]")
            .encoder(&self.encoder())
            .output_args(self.audio_args())
            .faststart();

        self.render(&cmd).await?;
        Ok(output)
    }

    async fn copy_join(&self, list: &Path, inputs: &[PathBuf], output: &Path) -> MediaResult<()> {
        write_concat_list(list, inputs).await?;
        let cmd = FfmpegCommand::concat_list(list, output).codec_copy();
        self.runner.run(&cmd).await
    }

    /// Overlay one image over a time window.
    pub async fn insert_image(
        &mut self,
        input: impl AsRef<Path>,
        overlay: ImageOverlay,
        output: Option<&Path>,
    ) -> MediaResult<PathBuf> {
        self.insert_images(input, vec![overlay], output).await
    }

    /// Overlay several images in a single encoding pass.
    ///
    /// Later overlays are drawn on top of earlier ones. In-memory images are
    /// written to temporary PNGs which are removed after the render.
    pub async fn insert_images(
        &mut self,
        input: impl AsRef<Path>,
        overlays: Vec<ImageOverlay>,
        output: Option<&Path>,
    ) -> MediaResult<PathBuf> {
        let input = input.as_ref();
        if overlays.is_empty() {
            return Err(MediaError::validation("No images to insert"));
        }
        for (i, overlay) in overlays.iter().enumerate() {
            check_window(&format!("image overlay {}", i), overlay.start, overlay.end)?;
        }

        let output = self.resolve_output(output, VIDEO_SUFFIX)?;
        info!(input = %input.display(), images = overlays.len(), "Inserting images");

        let mut materialized = Vec::new();
        let result = self
            .render_overlays(input, overlays, &output, &mut materialized)
            .await;
        self.workspace.release(&materialized);
        if result.is_err() {
            self.discard_output(&output);
        }
        result?;
        Ok(output)
    }

    /// Write decoded sources to temp PNGs (recorded in `materialized`) and
    /// render the overlay cascade.
    async fn render_overlays(
        &mut self,
        input: &Path,
        overlays: Vec<ImageOverlay>,
        output: &Path,
        materialized: &mut Vec<PathBuf>,
    ) -> MediaResult<()> {
        let mut image_paths = Vec::with_capacity(overlays.len());
        let mut stages = Vec::with_capacity(overlays.len());

        for ImageOverlay {
            source,
            start,
            end,
            x,
            y,
        } in overlays
        {
            let path = match source {
                ImageSource::Path(path) => path,
                ImageSource::Decoded(img) => {
                    let tmp = self.workspace.allocate(IMAGE_SUFFIX)?;
                    materialized.push(tmp.clone());
                    image_edit::save(&img, &tmp, ImageFormat::Png)?;
                    tmp
                }
            };
            image_paths.push(path);
            stages.push(OverlayStage { x, y, start, end });
        }

        let (graph, last) = overlay_images_graph(&stages);
        let mut cmd = FfmpegCommand::new(input, output);
        for path in &image_paths {
            cmd = cmd.input(path);
        }
        let cmd = cmd
            .filter_complex(graph.to_string())
            .map(format!("[{}]", last))
            .map("0:a?")
            .encoder(&self.encoder())
            .output_args(self.audio_args())
            .faststart();

        self.runner.run(&cmd).await
    }

    /// Play another video over the input (picture-in-picture).
    pub async fn insert_video(
        &mut self,
        input: impl AsRef<Path>,
        overlay: VideoOverlay,
        output: Option<&Path>,
    ) -> MediaResult<PathBuf> {
        let input = input.as_ref();
        match overlay.end {
            Some(end) => check_window("video overlay", overlay.start, end)?,
            None => check_start("video overlay", overlay.start)?,
        }

        let base = self.probe(input).await?;
        let clip = self.probe(&overlay.path).await?;

        let end = match overlay.end {
            Some(end) => end,
            None if clip.duration > 0.0 => overlay.start + clip.duration,
            None => {
                return Err(MediaError::probe_failed(
                    &overlay.path,
                    "overlay duration unknown; pass an explicit end",
                ))
            }
        };

        let output = self.resolve_output(output, VIDEO_SUFFIX)?;
        info!(
            input = %input.display(),
            overlay = %overlay.path.display(),
            start = overlay.start,
            end,
            "Inserting video"
        );

        let stage = OverlayStage {
            x: overlay.x,
            y: overlay.y,
            start: overlay.start,
            end,
        };
        let mut graph = overlay_video_chain(&stage)
            .into_iter()
            .fold(FilterGraph::new(), FilterGraph::chain);

        let audio_map = if overlay.keep_audio && clip.has_audio {
            let delay = delay_ms(overlay.start);
            if base.has_audio {
                for chain in delayed_mix_chains("1:a", delay, 1.0, "aud") {
                    graph.push(chain);
                }
            } else {
                graph.push(delayed_audio_chain("1:a", delay, 1.0, "aud"));
            }
            "[aud]"
        } else {
            "0:a?"
        };

        let cmd = FfmpegCommand::new(input, &output)
            .input(&overlay.path)
            .filter_complex(graph.to_string())
            .map("[vout]")
            .map(audio_map)
            .encoder(&self.encoder())
            .output_args(self.audio_args())
            .faststart();

        self.render(&cmd).await?;
        Ok(output)
    }

    /// Silence the audio over `[start, end]`; video is copied.
    pub async fn mute_audio(
        &mut self,
        input: impl AsRef<Path>,
        start: f64,
        end: f64,
        output: Option<&Path>,
    ) -> MediaResult<PathBuf> {
        let input = input.as_ref();
        check_window("mute_audio", start, end)?;

        let info = self.probe(input).await?;
        let output = self.resolve_output(output, VIDEO_SUFFIX)?;
        info!(input = %input.display(), start, end, "Muting audio");

        let cmd = if info.has_audio {
            FfmpegCommand::new(input, &output)
                .audio_filter(mute_window(start, end).to_string())
                .video_codec("copy")
                .output_args(self.audio_args())
        } else {
            debug!(input = %input.display(), "No audio track, copying input");
            FfmpegCommand::new(input, &output).codec_copy()
        };

        self.render(&cmd).await?;
        Ok(output)
    }

    /// Replace (or add) the audio track, starting it at `start_time`.
    ///
    /// Audio that would run past the end of the video is trimmed. When the
    /// start is at or after the end of the video, the result has no audio.
    pub async fn replace_audio(
        &mut self,
        input: impl AsRef<Path>,
        audio: impl AsRef<Path>,
        start_time: f64,
        output: Option<&Path>,
    ) -> MediaResult<PathBuf> {
        let input = input.as_ref();
        let audio = audio.as_ref();
        check_start("replace_audio", start_time)?;

        let video_duration = self.get_duration(input).await?;
        if video_duration <= 0.0 {
            return Err(MediaError::probe_failed(input, "could not determine video duration"));
        }
        let audio_duration = self.get_duration(audio).await?;

        let output = self.resolve_output(output, VIDEO_SUFFIX)?;

        let cmd = if start_time >= video_duration {
            info!(
                start_time,
                video_duration, "Audio starts after the video ends, dropping audio"
            );
            FfmpegCommand::new(input, &output)
                .map("0:v")
                .video_codec("copy")
                .no_audio()
        } else {
            let delay = delay_ms(start_time);
            let needs_filter = delay > 0 || audio_duration > video_duration - start_time;
            info!(
                input = %input.display(),
                audio = %audio.display(),
                start_time,
                needs_filter,
                "Replacing audio"
            );

            let cmd = FfmpegCommand::new(input, &output).input(audio);
            let cmd = if needs_filter {
                cmd.filter_complex(delay_trim_chain(delay, video_duration).to_string())
                    .map("0:v:0")
                    .map("[aud]")
            } else {
                cmd.map("0:v:0").map("1:a:0")
            };
            cmd.video_codec("copy").output_args(self.audio_args())
        };

        self.render(&cmd).await?;
        Ok(output)
    }

    /// Mix an extra audio file into the existing track from `start` on.
    ///
    /// Falls back to [`Self::replace_audio`] when the input has no audio.
    pub async fn merge_audio(
        &mut self,
        input: impl AsRef<Path>,
        audio: impl AsRef<Path>,
        start: f64,
        volume: f64,
        output: Option<&Path>,
    ) -> MediaResult<PathBuf> {
        let input = input.as_ref();
        let audio = audio.as_ref();
        check_start("merge_audio", start)?;
        if !volume.is_finite() || volume < 0.0 {
            return Err(MediaError::validation(format!(
                "merge_audio: volume must be a non-negative number, got {}",
                volume
            )));
        }

        let base = self.probe(input).await?;
        if !base.has_audio {
            info!(input = %input.display(), "No audio track to merge into, replacing");
            return self.replace_audio(input, audio, start, output).await;
        }

        let output = self.resolve_output(output, VIDEO_SUFFIX)?;

        let cmd = if base.duration > 0.0 && start >= base.duration {
            info!(start, duration = base.duration, "Merged audio starts after the video ends");
            FfmpegCommand::new(input, &output).codec_copy()
        } else {
            info!(input = %input.display(), audio = %audio.display(), start, volume, "Merging audio");
            let graph = delayed_mix_chains("1:a", delay_ms(start), volume, "aud")
                .into_iter()
                .fold(FilterGraph::new(), FilterGraph::chain);
            FfmpegCommand::new(input, &output)
                .input(audio)
                .filter_complex(graph.to_string())
                .map("0:v:0")
                .map("[aud]")
                .video_codec("copy")
                .output_args(self.audio_args())
        };

        self.render(&cmd).await?;
        Ok(output)
    }

    /// Play `[start, end]` at `speed` times normal speed, leaving the rest
    /// of the video untouched.
    pub async fn change_speed_segment(
        &mut self,
        input: impl AsRef<Path>,
        start: f64,
        end: f64,
        speed: f64,
        output: Option<&Path>,
    ) -> MediaResult<PathBuf> {
        let input = input.as_ref();
        if !speed.is_finite() || speed <= 0.0 {
            return Err(MediaError::validation(format!(
                "change_speed_segment: speed must be a positive number, got {}",
                speed
            )));
        }
        if !start.is_finite() || !end.is_finite() || end <= start {
            return Err(MediaError::validation(format!(
                "change_speed_segment: end ({}) must be after start ({})",
                end, start
            )));
        }

        let info = self.probe(input).await?;
        let plan = SpeedSegmentPlan::new(start, end, speed, info.duration)?;
        let segments = plan.segments();
        let encoder = self.encoder();

        let output = self.resolve_output(output, VIDEO_SUFFIX)?;
        info!(
            input = %input.display(),
            start = plan.start(),
            end = plan.end(),
            speed,
            segments = segments.len(),
            expected_duration = ?plan.expected_duration(),
            "Changing segment speed"
        );

        if let [only] = segments.as_slice() {
            let cmd = self
                .segment_command(input, only, &output, info.has_audio, &encoder)
                .faststart();
            self.render(&cmd).await?;
            return Ok(output);
        }

        let mut intermediates = Vec::with_capacity(segments.len() + 1);
        let result = self
            .stitch_segments(input, &segments, &output, info.has_audio, &encoder, &mut intermediates)
            .await;
        self.workspace.release(&intermediates);
        if result.is_err() {
            self.discard_output(&output);
        }
        result?;
        Ok(output)
    }

    /// Render each segment to its own file, then concat them into `output`.
    /// Every file allocated on the way is recorded in `intermediates`.
    async fn stitch_segments(
        &mut self,
        input: &Path,
        segments: &[Segment],
        output: &Path,
        has_audio: bool,
        encoder: &EncoderChoice,
        intermediates: &mut Vec<PathBuf>,
    ) -> MediaResult<()> {
        let mut parts = Vec::with_capacity(segments.len());
        for segment in segments {
            let part = self.workspace.allocate(VIDEO_SUFFIX)?;
            intermediates.push(part.clone());
            debug!(role = ?segment.role, start = segment.start, length = ?segment.length, "Rendering segment");
            let cmd = self.segment_command(input, segment, &part, has_audio, encoder);
            self.runner.run(&cmd).await?;
            parts.push(part);
        }

        let list = self.workspace.allocate(CONCAT_LIST_SUFFIX)?;
        intermediates.push(list.clone());
        write_concat_list(&list, &parts).await?;
        let cmd = FfmpegCommand::concat_list(&list, output)
            .codec_copy()
            .faststart();
        self.runner.run(&cmd).await
    }

    fn segment_command(
        &self,
        input: &Path,
        segment: &Segment,
        output: &Path,
        has_audio: bool,
        encoder: &EncoderChoice,
    ) -> FfmpegCommand {
        let mut cmd = FfmpegCommand::new(input, output);
        if segment.start > 0.0 {
            cmd = cmd.seek(segment.start);
        }
        if let Some(length) = segment.length {
            cmd = cmd.duration(length);
        }

        if segment.is_retimed() {
            cmd = cmd.video_filter(setpts_filter(segment.speed).to_string());
            if has_audio {
                if let Some(chain) = atempo_chain(segment.speed) {
                    cmd = cmd.audio_filter(chain.to_string());
                }
            }
        }

        cmd = cmd.encoder(encoder);
        cmd = if has_audio {
            cmd.output_args(self.audio_args())
        } else {
            cmd.no_audio()
        };
        cmd.output_args(["-avoid_negative_ts", "make_zero"])
    }

    /// Convert to a target aspect ratio by cropping or padding.
    ///
    /// `width` defaults to 1080; the height follows from the ratio. Pad
    /// styles are ignored in crop mode.
    pub async fn change_ratio(
        &mut self,
        input: impl AsRef<Path>,
        ratio: RatioTarget,
        mode: ResizeMode,
        style: &PadStyle,
        width: Option<u32>,
        output: Option<&Path>,
    ) -> MediaResult<PathBuf> {
        let input = input.as_ref();
        let width = width.unwrap_or(DEFAULT_TARGET_WIDTH);
        let (w, h) = ratio.dimensions(width);
        if w == 0 || h == 0 {
            return Err(MediaError::validation(format!(
                "change_ratio: width {} is too small for {}",
                width, ratio
            )));
        }

        let output = self.resolve_output(output, VIDEO_SUFFIX)?;
        info!(
            input = %input.display(),
            ratio = %ratio,
            mode = %mode,
            style = style.kind(),
            width = w,
            height = h,
            "Changing aspect ratio"
        );

        let cmd = FfmpegCommand::new(input, &output);
        let cmd = match (mode, style) {
            (ResizeMode::Crop, _) => cmd.video_filter(crop_filter(w, h).to_string()),
            (ResizeMode::Pad, PadStyle::Color { color }) => {
                cmd.video_filter(pad_color_filter(w, h, color.as_str()).to_string())
            }
            (
                ResizeMode::Pad,
                PadStyle::Blur {
                    blur_strength,
                    blur_power,
                },
            ) => cmd
                .filter_complex(pad_blur_graph(w, h, *blur_strength, *blur_power).to_string())
                .map("[vout]")
                .map("0:a?"),
            (ResizeMode::Pad, PadStyle::Image { path }) => cmd
                .input(path)
                .input_args(["-loop", "1"])
                .filter_complex(pad_image_graph(w, h).to_string())
                .map("[vout]")
                .map("0:a?"),
        };
        let cmd = cmd.encoder(&self.encoder()).output_args(self.audio_args());

        self.render(&cmd).await?;
        Ok(output)
    }

    /// Burn timed captions into the video in one pass; audio is copied.
    ///
    /// Overlapping windows are allowed and render simultaneously.
    pub async fn insert_captions(
        &mut self,
        input: impl AsRef<Path>,
        captions: &[Caption],
        style: &CaptionStyle,
        output: Option<&Path>,
    ) -> MediaResult<PathBuf> {
        let input = input.as_ref();
        if captions.is_empty() {
            return Err(MediaError::validation("No captions to insert"));
        }
        if let Some((i, bad)) = captions
            .iter()
            .enumerate()
            .find(|(_, c)| !c.has_valid_window())
        {
            return Err(MediaError::validation(format!(
                "caption {} has an invalid window ({} .. {})",
                i, bad.start, bad.end
            )));
        }

        let output = self.resolve_output(output, VIDEO_SUFFIX)?;
        info!(input = %input.display(), captions = captions.len(), "Burning captions");

        let cmd = FfmpegCommand::new(input, &output)
            .video_filter(captions_chain(captions, style).to_string())
            .encoder(&self.encoder())
            .audio_codec("copy")
            .faststart();

        self.render(&cmd).await?;
        Ok(output)
    }

    /// Alias of [`Self::insert_captions`].
    pub async fn set_captions(
        &mut self,
        input: impl AsRef<Path>,
        captions: &[Caption],
        style: &CaptionStyle,
        output: Option<&Path>,
    ) -> MediaResult<PathBuf> {
        self.insert_captions(input, captions, style, output).await
    }
}
