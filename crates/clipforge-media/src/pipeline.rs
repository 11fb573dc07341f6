//! Dispatch of [`Operation`] values onto [`VideoEditor`] methods.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use clipforge_models::Operation;

use crate::editor::VideoEditor;
use crate::error::{MediaError, MediaResult};
use crate::overlay::{ImageOverlay, VideoOverlay};
use crate::probe::MediaInfo;

/// Result of one executed operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepOutcome {
    /// Operation name
    pub op: &'static str,
    /// File the operation wrote; `None` for metadata queries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Probe result, for `probe`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<MediaInfo>,
}

impl StepOutcome {
    fn written(op: &'static str, output: PathBuf) -> Self {
        Self {
            op,
            output: Some(output),
            info: None,
        }
    }
}

/// Decode an operation from JSON. Unknown names or bad arguments are
/// validation errors.
pub fn parse_operation(value: serde_json::Value) -> MediaResult<Operation> {
    serde_json::from_value(value)
        .map_err(|e| MediaError::validation(format!("Invalid operation: {}", e)))
}

/// Run one operation. `input` is used when the operation names none.
pub async fn execute(
    editor: &mut VideoEditor,
    op: Operation,
    input: Option<&Path>,
) -> MediaResult<StepOutcome> {
    let op = match input {
        Some(fallback) => op.with_default_input(fallback),
        None => op,
    };
    let name = op.name();
    let input = op
        .input()
        .map(Path::to_path_buf)
        .ok_or_else(|| MediaError::validation(format!("{}: no input given", name)))?;

    debug!(op = name, input = %input.display(), "Executing operation");

    let output = match op {
        Operation::Cut {
            start,
            end,
            reencode,
            output,
            ..
        } => {
            editor
                .cut(
                    &input,
                    start.as_f64(),
                    end.map(|e| e.as_f64()),
                    output.as_deref(),
                    reencode,
                )
                .await?
        }
        Operation::Join {
            inputs,
            reencode,
            output,
            ..
        } => {
            let mut all = Vec::with_capacity(inputs.len() + 1);
            all.push(input);
            all.extend(inputs);
            editor.join(&all, output.as_deref(), reencode).await?
        }
        Operation::InsertImage {
            image,
            start,
            end,
            x,
            y,
            center,
            output,
            ..
        } => {
            let overlay = ImageOverlay::new(image, start.as_f64(), end.as_f64());
            let overlay = if center { overlay.centered() } else { overlay.at(x, y) };
            editor.insert_image(&input, overlay, output.as_deref()).await?
        }
        Operation::InsertImages { images, output, .. } => {
            let overlays = images.into_iter().map(ImageOverlay::from).collect();
            editor.insert_images(&input, overlays, output.as_deref()).await?
        }
        Operation::InsertVideo {
            overlay,
            start,
            end,
            x,
            y,
            center,
            keep_overlay_audio,
            output,
            ..
        } => {
            let mut request = VideoOverlay::new(overlay, start.as_f64()).with_audio(keep_overlay_audio);
            if let Some(end) = end {
                request = request.until(end.as_f64());
            }
            if !center {
                request = request.at(x, y);
            }
            editor.insert_video(&input, request, output.as_deref()).await?
        }
        Operation::MuteAudio {
            start, end, output, ..
        } => {
            editor
                .mute_audio(&input, start.as_f64(), end.as_f64(), output.as_deref())
                .await?
        }
        Operation::ReplaceAudio {
            audio,
            start_time,
            output,
            ..
        } => {
            editor
                .replace_audio(&input, &audio, start_time.as_f64(), output.as_deref())
                .await?
        }
        Operation::MergeAudio {
            audio,
            start,
            volume,
            output,
            ..
        } => {
            editor
                .merge_audio(&input, &audio, start.as_f64(), volume, output.as_deref())
                .await?
        }
        Operation::ChangeSpeedSegment {
            start,
            end,
            speed,
            output,
            ..
        } => {
            editor
                .change_speed_segment(&input, start.as_f64(), end.as_f64(), speed, output.as_deref())
                .await?
        }
        Operation::ChangeRatio {
            ratio,
            mode,
            style,
            width,
            output,
            ..
        } => {
            editor
                .change_ratio(&input, ratio, mode, &style, width, output.as_deref())
                .await?
        }
        Operation::InsertCaptions {
            captions,
            style,
            output,
            ..
        } => {
            editor
                .insert_captions(&input, &captions, &style, output.as_deref())
                .await?
        }
        Operation::Probe { .. } => {
            let info = editor.probe(&input).await?;
            return Ok(StepOutcome {
                op: name,
                output: None,
                info: Some(info),
            });
        }
    };

    Ok(StepOutcome::written(name, output))
}

/// Run `steps` in order, feeding each step's output to the next one.
///
/// Steps that write nothing (probes) leave the current file unchanged.
/// Returns one outcome per step.
pub async fn run_chain(
    editor: &mut VideoEditor,
    input: &Path,
    steps: Vec<Operation>,
) -> MediaResult<Vec<StepOutcome>> {
    let mut current = input.to_path_buf();
    let mut outcomes = Vec::with_capacity(steps.len());

    for (i, step) in steps.into_iter().enumerate() {
        let outcome = execute(editor, step, Some(&current)).await?;
        info!(step = i, op = outcome.op, output = ?outcome.output, "Step finished");
        if let Some(output) = &outcome.output {
            current = output.clone();
        }
        outcomes.push(outcome);
    }

    Ok(outcomes)
}

/// Final file of a chain: the last written output, or `input` if none.
pub fn final_output<'a>(input: &'a Path, outcomes: &'a [StepOutcome]) -> &'a Path {
    outcomes
        .iter()
        .rev()
        .find_map(|o| o.output.as_deref())
        .unwrap_or(input)
}
