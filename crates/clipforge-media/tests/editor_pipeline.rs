//! End-to-end editor tests against stand-in media tools.
//!
//! The fake `ffmpeg` appends its argv to `<output>.args` (one argument per
//! line, runs separated by `----`) and touches the output. It fails when the
//! output path contains `fail`, rejects stream-copy concat when it contains
//! `mismatch`, and hangs when it contains `slow`. The fake `ffprobe` prints
//! `<input>.probe.json` when present and a 10 s 1920x1080 clip with audio
//! otherwise.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use image::{DynamicImage, RgbaImage};
use serde_json::json;
use tempfile::TempDir;

use clipforge_media::{
    pipeline, EditorConfig, ImageOverlay, MediaError, VideoEditor, VideoOverlay,
};
use clipforge_models::{Caption, CaptionStyle, PadStyle, Position, RatioTarget, ResizeMode};

const FAKE_FFMPEG: &str = r#"#!/bin/sh
for last; do :; done
{ for a in "$@"; do printf '%s\n' "$a"; done; printf '%s\n' '----'; } >> "$last.args"
case "$last" in
  *fail*) echo "simulated failure" >&2; exit 1 ;;
  *slow*) sleep 5 ;;
esac
case "$last" in
  *mismatch*)
    for a in "$@"; do
      if [ "$a" = "concat" ]; then echo "codec parameters differ" >&2; exit 1; fi
    done
    ;;
esac
: > "$last"
exit 0
"#;

const FAKE_FFPROBE: &str = r#"#!/bin/sh
for last; do :; done
case "$last" in
  *corrupt*) echo "Invalid data found when processing input" >&2; exit 1 ;;
esac
if [ -f "$last.probe.json" ]; then
  cat "$last.probe.json"
else
  cat <<'EOF'
{"format":{"duration":"10.0"},"streams":[{"codec_type":"video","codec_name":"h264","width":1920,"height":1080,"avg_frame_rate":"30/1"},{"codec_type":"audio","codec_name":"aac"}]}
EOF
fi
"#;

struct FakeTools {
    _dir: TempDir,
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
}

/// Scripts are written once, before any test spawns a process.
fn tools() -> &'static FakeTools {
    static TOOLS: OnceLock<FakeTools> = OnceLock::new();
    TOOLS.get_or_init(|| {
        let dir = TempDir::new().unwrap();
        let write_script = |name: &str, body: &str| {
            let path = dir.path().join(name);
            std::fs::write(&path, body).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path
        };
        let ffmpeg = write_script("ffmpeg", FAKE_FFMPEG);
        let ffprobe = write_script("ffprobe", FAKE_FFPROBE);
        FakeTools {
            _dir: dir,
            ffmpeg,
            ffprobe,
        }
    })
}

fn config() -> EditorConfig {
    EditorConfig::default()
        .with_ffmpeg(&tools().ffmpeg)
        .with_ffprobe(&tools().ffprobe)
}

fn editor_in(root: &Path) -> VideoEditor {
    VideoEditor::new(config().with_work_dir(root.join("work"))).unwrap()
}

/// Argument lists of every run that wrote `output`.
fn runs(output: &Path) -> Vec<Vec<String>> {
    let log = std::fs::read_to_string(format!("{}.args", output.display())).unwrap_or_default();
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for line in log.lines() {
        if line == "----" {
            runs.push(std::mem::take(&mut current));
        } else {
            current.push(line.to_string());
        }
    }
    runs
}

fn single_run(output: &Path) -> Vec<String> {
    let mut all = runs(output);
    assert_eq!(all.len(), 1, "expected exactly one run for {}", output.display());
    all.remove(0)
}

/// Value following `flag` in an argument list.
fn arg_after<'a>(args: &'a [String], flag: &str) -> &'a str {
    let idx = args
        .iter()
        .position(|a| a == flag)
        .unwrap_or_else(|| panic!("{} not in {:?}", flag, args));
    &args[idx + 1]
}

fn has_pair(args: &[String], flag: &str, value: &str) -> bool {
    args.windows(2).any(|w| w[0] == flag && w[1] == value)
}

fn write_probe(path: &Path, json: serde_json::Value) {
    std::fs::write(format!("{}.probe.json", path.display()), json.to_string()).unwrap();
}

fn video_only_probe(duration: f64) -> serde_json::Value {
    json!({
        "format": {"duration": duration.to_string()},
        "streams": [{"codec_type": "video", "width": 1280, "height": 720}]
    })
}

#[tokio::test]
async fn test_new_rejects_missing_binaries() {
    let err = VideoEditor::new(EditorConfig::default().with_ffmpeg("/nonexistent/ffmpeg")).unwrap_err();
    assert!(err.is_tool_unavailable());

    let err = VideoEditor::new(config().with_ffprobe("/nonexistent/ffprobe")).unwrap_err();
    assert!(matches!(err, MediaError::FfprobeNotFound(_)));
}

#[tokio::test]
async fn test_metadata_queries() {
    let root = TempDir::new().unwrap();
    let editor = editor_in(root.path());
    let input = root.path().join("in.mp4");

    assert_eq!(editor.get_size(&input).await.unwrap(), (1920, 1080));
    assert_eq!(editor.get_ratio(&input).await.unwrap(), "16:9");
    assert_eq!(editor.get_duration(&input).await.unwrap(), 10.0);

    let audio = root.path().join("voice.mp3");
    write_probe(&audio, json!({"format": {"duration": "3.5"}, "streams": [{"codec_type": "audio"}]}));
    assert_eq!(editor.get_duration(&audio).await.unwrap(), 3.5);
    assert!(matches!(editor.get_size(&audio).await, Err(MediaError::NoVideoStream(_))));

    let broken = root.path().join("corrupt.mp4");
    assert!(editor.probe(&broken).await.unwrap_err().is_probe());

    assert_eq!(editor.invocations(), 6);
}

#[tokio::test]
async fn test_cut_stream_copy_into_new_directory() {
    let root = TempDir::new().unwrap();
    let mut editor = editor_in(root.path());
    let input = root.path().join("long.mp4");
    let output = root.path().join("out/nested/cut.mp4");

    let written = editor
        .cut(&input, 300.0, Some(600.0), Some(&output), false)
        .await
        .unwrap();

    assert_eq!(written, output);
    assert!(output.exists());
    let args = single_run(&output);
    assert_eq!(arg_after(&args, "-ss"), "300");
    assert_eq!(arg_after(&args, "-to"), "600");
    assert!(has_pair(&args, "-c", "copy"));
    // -ss after -i: accurate output seek
    let i = args.iter().position(|a| a == "-i").unwrap();
    let ss = args.iter().position(|a| a == "-ss").unwrap();
    assert!(ss > i);

    // Caller-named outputs are never tracked
    assert!(editor.list_temp().is_empty());
    assert_eq!(editor.invocations(), 1);
}

#[tokio::test]
async fn test_cut_reencode_to_tracked_temp() {
    let root = TempDir::new().unwrap();
    let mut editor = editor_in(root.path());

    let output = editor
        .cut(root.path().join("in.mp4"), 1.5, None, None, true)
        .await
        .unwrap();

    assert!(output.starts_with(editor.work_dir()));
    assert_eq!(output.extension().unwrap(), "mp4");
    assert_eq!(editor.list_temp(), vec![output.clone()]);

    let args = single_run(&output);
    assert!(!args.contains(&"-to".to_string()));
    assert!(has_pair(&args, "-c:v", "libx264"));
    assert!(has_pair(&args, "-preset", "fast"));
    assert!(has_pair(&args, "-crf", "23"));
    assert!(has_pair(&args, "-c:a", "aac"));
    assert!(has_pair(&args, "-b:a", "192k"));

    editor.remove_temp([&output]);
    assert!(!output.exists());
    assert!(editor.list_temp().is_empty());
}

#[tokio::test]
async fn test_validation_errors_spawn_nothing() {
    let root = TempDir::new().unwrap();
    let mut editor = editor_in(root.path());
    let input = root.path().join("in.mp4");

    let errors = vec![
        editor.cut(&input, 5.0, Some(5.0), None, false).await.unwrap_err(),
        editor.cut(&input, -1.0, None, None, false).await.unwrap_err(),
        editor.join(&[input.clone()], None, false).await.unwrap_err(),
        editor.mute_audio(&input, 6.0, 4.0, None).await.unwrap_err(),
        editor
            .change_speed_segment(&input, 1.0, 2.0, 0.0, None)
            .await
            .unwrap_err(),
        editor
            .change_speed_segment(&input, 2.0, 1.0, 2.0, None)
            .await
            .unwrap_err(),
        editor
            .insert_captions(
                &input,
                &[Caption::new(0.5, 2.1, "ok"), Caption::new(3.0, 1.0, "backwards")],
                &CaptionStyle::default(),
                None,
            )
            .await
            .unwrap_err(),
        editor.insert_images(&input, Vec::new(), None).await.unwrap_err(),
        editor
            .insert_image(&input, ImageOverlay::new("logo.png", 4.0, 2.0), None)
            .await
            .unwrap_err(),
        editor
            .replace_audio(&input, "a.mp3", f64::NAN, None)
            .await
            .unwrap_err(),
        editor
            .merge_audio(&input, "a.mp3", 0.0, -0.5, None)
            .await
            .unwrap_err(),
        editor
            .change_ratio(&input, RatioTarget::Vertical, ResizeMode::Pad, &PadStyle::default(), Some(0), None)
            .await
            .unwrap_err(),
    ];

    for err in &errors {
        assert!(err.is_validation(), "unexpected error: {}", err);
    }
    assert_eq!(editor.invocations(), 0);
    assert!(editor.list_temp().is_empty());
}

#[tokio::test]
async fn test_join_stream_copy() {
    let root = TempDir::new().unwrap();
    let mut editor = editor_in(root.path());
    let inputs = vec![
        root.path().join("main.mp4"),
        root.path().join("intro.mp4"),
        root.path().join("outro.mp4"),
    ];
    let output = root.path().join("joined.mp4");

    editor.join(&inputs, Some(&output), false).await.unwrap();

    let args = single_run(&output);
    assert!(has_pair(&args, "-f", "concat"));
    assert!(has_pair(&args, "-safe", "0"));
    assert!(has_pair(&args, "-c", "copy"));
    // The concat list is released once the join finishes
    assert!(editor.list_temp().is_empty());
    assert_eq!(editor.invocations(), 1);
}

#[tokio::test]
async fn test_join_falls_back_to_reencode() {
    let root = TempDir::new().unwrap();
    let mut editor = editor_in(root.path());
    let inputs = vec![root.path().join("a.mp4"), root.path().join("b.webm")];
    let output = root.path().join("mismatch.mp4");

    editor.join(&inputs, Some(&output), false).await.unwrap();

    let all = runs(&output);
    assert_eq!(all.len(), 2);
    assert!(has_pair(&all[0], "-f", "concat"));

    let fallback = &all[1];
    assert_eq!(
        arg_after(fallback, "-filter_complex"),
        "[0:v:0][0:a:0][1:v:0][1:a:0]concat=n=2:v=1:a=1[outv][outa]"
    );
    assert!(has_pair(fallback, "-map", "[outv]"));
    assert!(has_pair(fallback, "-map", "[outa]"));
    assert!(has_pair(fallback, "-movflags", "+faststart"));
    assert_eq!(editor.invocations(), 2);
    assert!(editor.list_temp().is_empty());
}

#[tokio::test]
async fn test_join_reencode_skips_copy_attempt() {
    let root = TempDir::new().unwrap();
    let mut editor = editor_in(root.path());
    let inputs = vec![root.path().join("a.mp4"), root.path().join("b.mp4")];
    let output = root.path().join("joined.mp4");

    editor.join(&inputs, Some(&output), true).await.unwrap();

    let args = single_run(&output);
    assert!(args.contains(&"-filter_complex".to_string()));
    assert!(!args.contains(&"-safe".to_string()));
}

#[tokio::test]
async fn test_insert_images_materializes_decoded_sources() {
    let root = TempDir::new().unwrap();
    let mut editor = editor_in(root.path());
    let input = root.path().join("in.mp4");
    let decoded = DynamicImage::ImageRgba8(RgbaImage::new(8, 8));

    let output = editor
        .insert_images(
            &input,
            vec![
                ImageOverlay::new("logo.png", 0.0, 5.0).at(20i64, 20i64),
                ImageOverlay::new(decoded, 1.5, 3.0).centered(),
            ],
            None,
        )
        .await
        .unwrap();

    let args = single_run(&output);
    assert_eq!(args.iter().filter(|a| *a == "-i").count(), 3);
    assert!(args.iter().any(|a| a.ends_with(".png") && a != "logo.png"));
    assert_eq!(
        arg_after(&args, "-filter_complex"),
        "[0:v][1:v]overlay=20:20:enable='between(t,0,5)'[v1];\
         [v1][2:v]overlay=(W-w)/2:(H-h)/2:enable='between(t,1.5,3)'[v2]"
    );
    assert!(has_pair(&args, "-map", "[v2]"));
    assert!(has_pair(&args, "-map", "0:a?"));

    // Only the output survives; the temporary PNG was released
    assert_eq!(editor.list_temp(), vec![output]);
}

#[tokio::test]
async fn test_insert_video_mixes_overlay_audio() {
    let root = TempDir::new().unwrap();
    let mut editor = editor_in(root.path());
    let input = root.path().join("in.mp4");
    let clip = root.path().join("reaction.mp4");
    write_probe(
        &clip,
        json!({"format": {"duration": "4.0"}, "streams": [{"codec_type": "video", "width": 640, "height": 360}, {"codec_type": "audio"}]}),
    );
    let output = root.path().join("pip.mp4");

    editor
        .insert_video(&input, VideoOverlay::new(&clip, 2.0).with_audio(true), Some(&output))
        .await
        .unwrap();

    let args = single_run(&output);
    let graph = arg_after(&args, "-filter_complex");
    assert!(graph.contains("[1:v]setpts=PTS-STARTPTS+2/TB[ov]"));
    // Defaults: centered, visible for the clip's own length
    assert!(graph.contains("overlay=(W-w)/2:(H-h)/2:enable='between(t,2,6)':eof_action=pass[vout]"));
    assert!(graph.contains("[1:a]adelay=2000:all=1[mixin]"));
    assert!(graph.contains("amix=inputs=2:duration=first"));
    assert!(has_pair(&args, "-map", "[aud]"));
}

#[tokio::test]
async fn test_mute_audio_window() {
    let root = TempDir::new().unwrap();
    let mut editor = editor_in(root.path());
    let output = root.path().join("muted.mp4");

    editor
        .mute_audio(root.path().join("in.mp4"), 4.0, 6.0, Some(&output))
        .await
        .unwrap();

    let args = single_run(&output);
    assert_eq!(arg_after(&args, "-af"), "volume=enable='between(t,4,6)':volume=0");
    assert!(has_pair(&args, "-c:v", "copy"));
}

#[tokio::test]
async fn test_replace_audio_after_video_end_drops_audio() {
    let root = TempDir::new().unwrap();
    let mut editor = editor_in(root.path());
    let output = root.path().join("silent.mp4");

    editor
        .replace_audio(root.path().join("in.mp4"), root.path().join("song.mp3"), 12.0, Some(&output))
        .await
        .unwrap();

    let args = single_run(&output);
    assert!(args.contains(&"-an".to_string()));
    assert!(has_pair(&args, "-map", "0:v"));
    assert!(has_pair(&args, "-c:v", "copy"));
    assert_eq!(args.iter().filter(|a| *a == "-i").count(), 1);
}

#[tokio::test]
async fn test_replace_audio_fast_path_and_delay() {
    let root = TempDir::new().unwrap();
    let mut editor = editor_in(root.path());
    let input = root.path().join("in.mp4");
    let audio = root.path().join("voice.mp3");
    write_probe(&audio, json!({"format": {"duration": "5.0"}, "streams": [{"codec_type": "audio"}]}));

    let fast = root.path().join("fast.mp4");
    editor.replace_audio(&input, &audio, 0.0, Some(&fast)).await.unwrap();
    let args = single_run(&fast);
    assert!(has_pair(&args, "-map", "0:v:0"));
    assert!(has_pair(&args, "-map", "1:a:0"));
    assert!(!args.contains(&"-filter_complex".to_string()));

    let delayed = root.path().join("delayed.mp4");
    editor.replace_audio(&input, &audio, 1.5, Some(&delayed)).await.unwrap();
    let args = single_run(&delayed);
    assert_eq!(
        arg_after(&args, "-filter_complex"),
        "[1:a]adelay=1500:all=1,atrim=0:10.000,asetpts=PTS-STARTPTS[aud]"
    );
    assert!(has_pair(&args, "-map", "[aud]"));
}

#[tokio::test]
async fn test_merge_audio_without_base_track_replaces() {
    let root = TempDir::new().unwrap();
    let mut editor = editor_in(root.path());
    let input = root.path().join("screen.mp4");
    write_probe(&input, video_only_probe(10.0));
    let output = root.path().join("merged.mp4");

    editor
        .merge_audio(&input, root.path().join("music.mp3"), 0.0, 0.3, Some(&output))
        .await
        .unwrap();

    let args = single_run(&output);
    assert!(has_pair(&args, "-map", "1:a:0"));
    assert!(!args.iter().any(|a| a.contains("amix")));
}

#[tokio::test]
async fn test_merge_audio_mixes_with_gain() {
    let root = TempDir::new().unwrap();
    let mut editor = editor_in(root.path());
    let output = root.path().join("merged.mp4");

    editor
        .merge_audio(root.path().join("in.mp4"), root.path().join("music.mp3"), 1.0, 0.3, Some(&output))
        .await
        .unwrap();

    let args = single_run(&output);
    assert_eq!(
        arg_after(&args, "-filter_complex"),
        "[1:a]adelay=1000:all=1,volume=0.3[mixin];\
         [0:a][mixin]amix=inputs=2:duration=first:dropout_transition=0:normalize=0[aud]"
    );
}

#[tokio::test]
async fn test_change_speed_segment_stitches_three_parts() {
    let root = TempDir::new().unwrap();
    let mut editor = editor_in(root.path());
    let output = root.path().join("speed.mp4");

    editor
        .change_speed_segment(root.path().join("in.mp4"), 2.0, 4.0, 2.0, Some(&output))
        .await
        .unwrap();

    // One probe, three segments, one concat
    assert_eq!(editor.invocations(), 5);
    let concat = single_run(&output);
    assert!(has_pair(&concat, "-f", "concat"));
    assert!(has_pair(&concat, "-c", "copy"));

    let mut segment_runs: Vec<Vec<String>> = std::fs::read_dir(editor.work_dir())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map_or(false, |ext| ext == "args"))
        .map(|p| single_run(&p.with_extension("")))
        .collect();
    assert_eq!(segment_runs.len(), 3);

    segment_runs.sort_by_key(|args| args.iter().position(|a| a == "-ss").map(|i| args[i + 1].clone()));
    let retimed: Vec<_> = segment_runs
        .iter()
        .filter(|args| args.iter().any(|a| a == "setpts=PTS/2"))
        .collect();
    assert_eq!(retimed.len(), 1);
    assert_eq!(arg_after(retimed[0], "-ss"), "2.000");
    assert_eq!(arg_after(retimed[0], "-t"), "2.000");
    assert_eq!(arg_after(retimed[0], "-af"), "atempo=2");

    // Segments and the list are gone once stitched
    assert!(editor.list_temp().is_empty());
}

#[tokio::test]
async fn test_change_speed_whole_clip_is_single_pass() {
    let root = TempDir::new().unwrap();
    let mut editor = editor_in(root.path());
    let output = root.path().join("fast.mp4");

    editor
        .change_speed_segment(root.path().join("in.mp4"), 0.0, 30.0, 4.0, Some(&output))
        .await
        .unwrap();

    assert_eq!(editor.invocations(), 2);
    let args = single_run(&output);
    assert_eq!(arg_after(&args, "-vf"), "setpts=PTS/4");
    assert_eq!(arg_after(&args, "-af"), "atempo=2,atempo=2");
    assert!(!args.contains(&"-ss".to_string()));
}

#[tokio::test]
async fn test_change_speed_without_audio_drops_tempo() {
    let root = TempDir::new().unwrap();
    let mut editor = editor_in(root.path());
    let input = root.path().join("screen.mp4");
    write_probe(&input, video_only_probe(10.0));
    let output = root.path().join("slow-motion.mp4");

    editor
        .change_speed_segment(&input, 0.0, 10.0, 0.5, Some(&output))
        .await
        .unwrap();

    let args = single_run(&output);
    assert!(!args.contains(&"-af".to_string()));
    assert!(args.contains(&"-an".to_string()));
}

#[tokio::test]
async fn test_change_ratio_modes() {
    let root = TempDir::new().unwrap();
    let mut editor = editor_in(root.path());
    let input = root.path().join("in.mp4");

    let padded = root.path().join("wide.mp4");
    editor
        .change_ratio(&input, RatioTarget::Widescreen, ResizeMode::Pad, &PadStyle::default(), None, Some(&padded))
        .await
        .unwrap();
    assert_eq!(
        arg_after(&single_run(&padded), "-vf"),
        "scale=1080:606:force_original_aspect_ratio=decrease,pad=1080:606:(ow-iw)/2:(oh-ih)/2:black"
    );

    let cropped = root.path().join("vertical.mp4");
    editor
        .change_ratio(&input, RatioTarget::Vertical, ResizeMode::Crop, &PadStyle::blur(), None, Some(&cropped))
        .await
        .unwrap();
    assert_eq!(
        arg_after(&single_run(&cropped), "-vf"),
        "scale=1080:1920:force_original_aspect_ratio=increase,crop=1080:1920"
    );

    let blurred = root.path().join("blurred.mp4");
    editor
        .change_ratio(&input, RatioTarget::Vertical, ResizeMode::Pad, &PadStyle::blur(), Some(720), Some(&blurred))
        .await
        .unwrap();
    let args = single_run(&blurred);
    assert!(arg_after(&args, "-filter_complex").contains("boxblur=20:10[bg]"));
    assert!(arg_after(&args, "-filter_complex").contains("scale=720:1280"));
    assert!(has_pair(&args, "-map", "[vout]"));
    assert!(has_pair(&args, "-c:a", "aac"));

    let backdrop = root.path().join("backdrop.mp4");
    let style = PadStyle::Image {
        path: root.path().join("bg.jpg"),
    };
    editor
        .change_ratio(&input, RatioTarget::Ultrawide, ResizeMode::Pad, &style, None, Some(&backdrop))
        .await
        .unwrap();
    let args = single_run(&backdrop);
    assert!(has_pair(&args, "-loop", "1"));
    assert!(arg_after(&args, "-filter_complex").starts_with("[1:v]scale=1080:462"));
}

#[tokio::test]
async fn test_insert_captions_keeps_windows() {
    let root = TempDir::new().unwrap();
    let mut editor = editor_in(root.path());
    let output = root.path().join("captioned.mp4");
    let style = CaptionStyle {
        x: Position::from("center"),
        y: Position::from("h-(text_h*4)"),
        ..CaptionStyle::default()
    };

    editor
        .set_captions(
            root.path().join("in.mp4"),
            &[
                Caption::new(0.5, 2.1, "Hello world"),
                Caption::new(2.2, 4.0, "This is a test"),
            ],
            &style,
            Some(&output),
        )
        .await
        .unwrap();

    let args = single_run(&output);
    let vf = arg_after(&args, "-vf");
    assert!(vf.contains("enable='between(t,0.5,2.1)'"));
    assert!(vf.contains("enable='between(t,2.2,4)'"));
    assert!(vf.contains("x=(w-text_w)/2"));
    assert!(has_pair(&args, "-c:a", "copy"));
}

#[tokio::test]
async fn test_failed_render_releases_allocated_output() {
    let root = TempDir::new().unwrap();
    let mut editor =
        VideoEditor::new(config().with_work_dir(root.path().join("fail-work"))).unwrap();

    let err = editor
        .cut(root.path().join("in.mp4"), 0.0, Some(1.0), None, false)
        .await
        .unwrap_err();

    assert!(err.is_external_tool());
    assert!(err.to_string().contains("simulated failure"));
    assert!(editor.list_temp().is_empty());
}

#[tokio::test]
async fn test_failed_speed_segment_releases_parts() {
    let root = TempDir::new().unwrap();
    let mut editor =
        VideoEditor::new(config().with_work_dir(root.path().join("fail-work"))).unwrap();

    let err = editor
        .change_speed_segment(root.path().join("in.mp4"), 2.0, 4.0, 2.0, None)
        .await
        .unwrap_err();

    assert!(err.is_external_tool());
    assert!(editor.list_temp().is_empty());
}

#[tokio::test]
async fn test_failed_join_releases_list_and_output() {
    let root = TempDir::new().unwrap();
    let mut editor =
        VideoEditor::new(config().with_work_dir(root.path().join("fail-work"))).unwrap();
    let inputs = [root.path().join("a.mp4"), root.path().join("b.mp4")];

    let err = editor.join(&inputs, None, false).await.unwrap_err();

    assert!(err.is_external_tool());
    assert!(editor.list_temp().is_empty());
}

#[tokio::test]
async fn test_failed_image_insert_releases_materialized_png() {
    let root = TempDir::new().unwrap();
    let mut editor =
        VideoEditor::new(config().with_work_dir(root.path().join("fail-work"))).unwrap();
    let decoded = DynamicImage::ImageRgba8(RgbaImage::new(8, 8));

    let err = editor
        .insert_images(
            root.path().join("in.mp4"),
            vec![ImageOverlay::new(decoded, 0.0, 2.0)],
            None,
        )
        .await
        .unwrap_err();

    assert!(err.is_external_tool());
    assert!(editor.list_temp().is_empty());
}

#[tokio::test]
async fn test_hung_tool_times_out() {
    let root = TempDir::new().unwrap();
    let mut editor = VideoEditor::new(
        config()
            .with_work_dir(root.path().join("work"))
            .with_timeout(Some(Duration::from_millis(200))),
    )
    .unwrap();

    let err = editor
        .cut(root.path().join("in.mp4"), 0.0, None, Some(&root.path().join("slow.mp4")), false)
        .await
        .unwrap_err();
    assert!(matches!(err, MediaError::Timeout(_)));
}

#[tokio::test]
async fn test_cleanup_is_idempotent() {
    let root = TempDir::new().unwrap();
    let mut editor = VideoEditor::new(config()).unwrap();
    let work_dir = editor.work_dir().to_path_buf();
    assert!(work_dir
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("veditor_"));

    editor.cut(root.path().join("in.mp4"), 0.0, None, None, false).await.unwrap();
    assert_eq!(editor.list_temp().len(), 1);

    editor.cleanup();
    assert!(!work_dir.exists());
    assert!(editor.list_temp().is_empty());
    editor.cleanup();
}

#[tokio::test]
async fn test_chain_feeds_outputs_forward() {
    let root = TempDir::new().unwrap();
    let mut editor = editor_in(root.path());
    let input = root.path().join("in.mp4");
    let framed = root.path().join("final/framed.mp4");

    let steps = vec![
        pipeline::parse_operation(json!({"op": "cut", "start": "00:00:01", "end": 8})).unwrap(),
        pipeline::parse_operation(json!({
            "op": "change_ratio",
            "ratio": "vertical",
            "style": {"type": "color", "color": "#102030"},
            "output": framed
        }))
        .unwrap(),
        pipeline::parse_operation(json!({"op": "probe"})).unwrap(),
    ];

    let outcomes = pipeline::run_chain(&mut editor, &input, steps).await.unwrap();
    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].op, "cut");
    assert_eq!(outcomes[1].output.as_deref(), Some(framed.as_path()));
    assert_eq!(outcomes[2].op, "probe");
    assert!(outcomes[2].info.is_some());
    assert_eq!(pipeline::final_output(&input, &outcomes), framed.as_path());

    // Step two reads what step one wrote
    let cut_output = outcomes[0].output.clone().unwrap();
    let args = single_run(&framed);
    assert_eq!(arg_after(&args, "-i"), cut_output.to_string_lossy());
    assert!(arg_after(&args, "-vf").ends_with(":#102030"));
}
