//! FFmpeg filter-graph construction.
//!
//! Graphs are assembled as a small typed representation (filters grouped
//! into chains with named input/output pads) and serialized to FFmpeg's
//! textual syntax only when a command is built. A graph made of a single
//! unlabeled chain is "simple" and can be passed as `-vf`/`-af`; anything
//! else goes through `-filter_complex`.

use std::fmt;

use clipforge_models::{Axis, Caption, CaptionStyle, Position};

/// Lower bound of the `atempo` filter's per-stage factor.
pub const ATEMPO_MIN: f64 = 0.5;
/// Upper bound of the `atempo` filter's per-stage factor.
pub const ATEMPO_MAX: f64 = 2.0;

const TEMPO_EPSILON: f64 = 1e-9;

/// One filter invocation, e.g. `scale=1080:1920`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    name: String,
    args: Vec<String>,
}

impl Filter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Positional argument.
    pub fn arg(mut self, value: impl ToString) -> Self {
        self.args.push(value.to_string());
        self
    }

    /// Named argument, `key=value`.
    pub fn opt(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.args.push(format!("{}={}", key, value));
        self
    }

    /// Time-window predicate, `enable='between(t,start,end)'`.
    pub fn enable_between(self, start: f64, end: f64) -> Self {
        self.opt("enable", format!("'{}'", between(start, end)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            write!(f, "={}", self.args.join(":"))?;
        }
        Ok(())
    }
}

/// Filters applied in sequence between labeled pads.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterChain {
    inputs: Vec<String>,
    filters: Vec<Filter>,
    outputs: Vec<String>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an input pad (`0:v`, `bg`, ...).
    pub fn input(mut self, label: impl Into<String>) -> Self {
        self.inputs.push(label.into());
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add an output pad.
    pub fn output(mut self, label: impl Into<String>) -> Self {
        self.outputs.push(label.into());
        self
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    fn is_unlabeled(&self) -> bool {
        self.inputs.is_empty() && self.outputs.is_empty()
    }
}

impl fmt::Display for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for label in &self.inputs {
            write!(f, "[{}]", label)?;
        }
        for (i, filter) in self.filters.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", filter)?;
        }
        for label in &self.outputs {
            write!(f, "[{}]", label)?;
        }
        Ok(())
    }
}

/// A set of chains joined with `;`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterGraph {
    chains: Vec<FilterChain>,
}

impl FilterGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chain(mut self, chain: FilterChain) -> Self {
        self.chains.push(chain);
        self
    }

    pub fn push(&mut self, chain: FilterChain) {
        self.chains.push(chain);
    }

    pub fn chains(&self) -> &[FilterChain] {
        &self.chains
    }

    /// A single unlabeled chain, valid as a plain `-vf`/`-af` argument.
    pub fn is_simple(&self) -> bool {
        self.chains.len() == 1 && self.chains[0].is_unlabeled()
    }
}

impl From<FilterChain> for FilterGraph {
    fn from(chain: FilterChain) -> Self {
        Self {
            chains: vec![chain],
        }
    }
}

impl fmt::Display for FilterGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chain) in self.chains.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{}", chain)?;
        }
        Ok(())
    }
}

/// `between(t,start,end)`
pub fn between(start: f64, end: f64) -> String {
    format!("between(t,{},{})", start, end)
}

// =============================================================================
// Captions
// =============================================================================

/// Escape caption text for a drawtext `text=` value.
pub fn escape_drawtext(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ':' => out.push_str(r"\\:"),
            ';' => out.push_str(r"\;"),
            '"' => out.push_str(r#"\""#),
            ',' => out.push_str(r"\,"),
            '\'' => out.push('\u{2019}'),
            '%' => out.push_str(r"\\\\\%"),
            '[' => out.push_str(r"\["),
            ']' => out.push_str(r"\]"),
            '{' => out.push_str(r"\{"),
            '}' => out.push_str(r"\}"),
            other => out.push(other),
        }
    }
    out
}

/// One drawtext stage for a caption.
pub fn drawtext_filter(caption: &Caption, style: &CaptionStyle) -> Filter {
    let mut filter = Filter::new("drawtext");
    if let Some(fontfile) = &style.fontfile {
        filter = filter.opt("fontfile", format!("'{}'", fontfile.display()));
    } else if let Some(font) = &style.font {
        filter = filter.opt("font", format!("'{}'", font));
    }

    filter
        .opt("text", escape_drawtext(&caption.text))
        .opt("fontsize", style.fontsize)
        .opt("fontcolor", &style.fontcolor)
        .opt("borderw", style.borderw)
        .opt("bordercolor", &style.bordercolor)
        .opt("shadowx", style.shadowx)
        .opt("shadowy", style.shadowy)
        .opt("x", style.x.resolve(Axis::X, style.padding_x))
        .opt("y", style.y.resolve(Axis::Y, style.padding_y))
        .opt("text_align", &style.text_align)
        .enable_between(caption.start, caption.end)
}

/// All captions as one comma-joined chain so they burn in a single pass.
pub fn captions_chain(captions: &[Caption], style: &CaptionStyle) -> FilterChain {
    captions
        .iter()
        .fold(FilterChain::new(), |chain, caption| {
            chain.filter(drawtext_filter(caption, style))
        })
}

// =============================================================================
// Overlays
// =============================================================================

/// Placement and time window of one overlay stage.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStage {
    pub x: Position,
    pub y: Position,
    pub start: f64,
    pub end: f64,
}

/// Sequential overlay stages; stage `i` composites input `i + 1` over the
/// previous stage's output. Returns the graph and its final video label.
pub fn overlay_images_graph(stages: &[OverlayStage]) -> (FilterGraph, String) {
    let mut graph = FilterGraph::new();
    let mut prev = "0:v".to_string();

    for (idx, stage) in stages.iter().enumerate() {
        let out = format!("v{}", idx + 1);
        graph.push(
            FilterChain::new()
                .input(prev)
                .input(format!("{}:v", idx + 1))
                .filter(
                    Filter::new("overlay")
                        .arg(&stage.x)
                        .arg(&stage.y)
                        .enable_between(stage.start, stage.end),
                )
                .output(&out),
        );
        prev = out;
    }

    (graph, prev)
}

/// Video-on-video overlay: input 1 is shifted to start at `stage.start` and
/// composited over input 0 until `stage.end`. Output label `vout`.
pub fn overlay_video_chain(stage: &OverlayStage) -> Vec<FilterChain> {
    vec![
        FilterChain::new()
            .input("1:v")
            .filter(Filter::new("setpts").arg(format!("PTS-STARTPTS+{}/TB", stage.start)))
            .output("ov"),
        FilterChain::new()
            .input("0:v")
            .input("ov")
            .filter(
                Filter::new("overlay")
                    .arg(&stage.x)
                    .arg(&stage.y)
                    .enable_between(stage.start, stage.end)
                    .opt("eof_action", "pass"),
            )
            .output("vout"),
    ]
}

// =============================================================================
// Audio
// =============================================================================

/// Shift input 1's audio by `delay_ms` and cut it at the video's end.
/// Output label `aud`.
pub fn delay_trim_chain(delay_ms: u64, video_duration: f64) -> FilterChain {
    FilterChain::new()
        .input("1:a")
        .filter(Filter::new("adelay").arg(delay_ms).opt("all", 1))
        .filter(
            Filter::new("atrim")
                .arg(0)
                .arg(format!("{:.3}", video_duration)),
        )
        .filter(Filter::new("asetpts").arg("PTS-STARTPTS"))
        .output("aud")
}

/// Silence the audio inside a time window.
pub fn mute_window(start: f64, end: f64) -> FilterChain {
    FilterChain::new().filter(
        Filter::new("volume")
            .enable_between(start, end)
            .opt("volume", 0),
    )
}

/// Shift an audio pad by `delay_ms`, optionally changing its gain.
pub fn delayed_audio_chain(pad: &str, delay_ms: u64, volume: f64, out: &str) -> FilterChain {
    let mut chain = FilterChain::new()
        .input(pad)
        .filter(Filter::new("adelay").arg(delay_ms).opt("all", 1));
    if (volume - 1.0).abs() > f64::EPSILON {
        chain = chain.filter(Filter::new("volume").arg(volume));
    }
    chain.output(out)
}

/// Delay an extra audio input and mix it under the base track.
///
/// `extra` is the extra input's audio pad (e.g. `1:a`). The result is
/// labeled `out` and lasts as long as the base track.
pub fn delayed_mix_chains(extra: &str, delay_ms: u64, volume: f64, out: &str) -> Vec<FilterChain> {
    vec![
        delayed_audio_chain(extra, delay_ms, volume, "mixin"),
        FilterChain::new()
            .input("0:a")
            .input("mixin")
            .filter(
                Filter::new("amix")
                    .opt("inputs", 2)
                    .opt("duration", "first")
                    .opt("dropout_transition", 0)
                    .opt("normalize", 0),
            )
            .output(out),
    ]
}

// =============================================================================
// Aspect ratio
// =============================================================================

fn scale_cover(w: u32, h: u32) -> Filter {
    Filter::new("scale")
        .arg(w)
        .arg(h)
        .opt("force_original_aspect_ratio", "increase")
}

fn scale_fit(w: u32, h: u32) -> Filter {
    Filter::new("scale")
        .arg(w)
        .arg(h)
        .opt("force_original_aspect_ratio", "decrease")
}

fn crop(w: u32, h: u32) -> Filter {
    Filter::new("crop").arg(w).arg(h)
}

fn centered_overlay() -> Filter {
    Filter::new("overlay").arg("(W-w)/2").arg("(H-h)/2")
}

/// Scale up to cover the target, then center-crop to it.
pub fn crop_filter(w: u32, h: u32) -> FilterChain {
    FilterChain::new().filter(scale_cover(w, h)).filter(crop(w, h))
}

/// Dimensions used for solid-color padding.
///
/// Landscape and square targets are rounded down to even values because
/// the pad filter needs even chroma planes there.
pub fn pad_dimensions(w: u32, h: u32) -> (u32, u32) {
    if w < h {
        (w, h)
    } else {
        (w - w % 2, h - h % 2)
    }
}

/// Scale down to fit, then pad with a solid color, frame centered.
pub fn pad_color_filter(w: u32, h: u32, color: &str) -> FilterChain {
    let (w, h) = pad_dimensions(w, h);
    FilterChain::new().filter(scale_fit(w, h)).filter(
        Filter::new("pad")
            .arg(w)
            .arg(h)
            .arg("(ow-iw)/2")
            .arg("(oh-ih)/2")
            .arg(color),
    )
}

/// Blurred cover-scaled background with the fitted frame centered on top.
/// Output label `vout`.
pub fn pad_blur_graph(w: u32, h: u32, strength: u32, power: u32) -> FilterGraph {
    FilterGraph::new()
        .chain(
            FilterChain::new()
                .input("0:v")
                .filter(scale_cover(w, h))
                .filter(crop(w, h))
                .filter(Filter::new("boxblur").arg(strength).arg(power))
                .output("bg"),
        )
        .chain(FilterChain::new().input("0:v").filter(scale_fit(w, h)).output("fg"))
        .chain(
            FilterChain::new()
                .input("bg")
                .input("fg")
                .filter(centered_overlay())
                .output("vout"),
        )
}

/// Still image (input 1) covering the frame with the video fitted on top.
/// Output label `vout`.
pub fn pad_image_graph(w: u32, h: u32) -> FilterGraph {
    FilterGraph::new()
        .chain(
            FilterChain::new()
                .input("1:v")
                .filter(scale_cover(w, h))
                .filter(crop(w, h))
                .output("bg"),
        )
        .chain(FilterChain::new().input("0:v").filter(scale_fit(w, h)).output("fg"))
        .chain(
            FilterChain::new()
                .input("bg")
                .input("fg")
                .filter(centered_overlay().opt("shortest", 1))
                .output("vout"),
        )
}

// =============================================================================
// Speed
// =============================================================================

/// Video timestamp scaling for a playback speed factor.
pub fn setpts_filter(speed: f64) -> Filter {
    Filter::new("setpts").arg(format!("PTS/{}", speed))
}

/// Decompose a tempo factor into `atempo` stages within [0.5, 2.0].
///
/// Factors above 2 become repeated 2.0 stages, factors below 0.5 repeated
/// 0.5 stages, followed by one residual stage unless it is 1.0.
pub fn tempo_factors(speed: f64) -> Vec<f64> {
    let mut factors = Vec::new();
    if !speed.is_finite() || speed <= 0.0 {
        return factors;
    }

    let mut residual = speed;
    while residual > ATEMPO_MAX {
        factors.push(ATEMPO_MAX);
        residual /= ATEMPO_MAX;
    }
    while residual < ATEMPO_MIN {
        factors.push(ATEMPO_MIN);
        residual /= ATEMPO_MIN;
    }
    if (residual - 1.0).abs() > TEMPO_EPSILON {
        factors.push(residual);
    }
    factors
}

/// Audio tempo chain for a speed factor; `None` when no stage is needed.
pub fn atempo_chain(speed: f64) -> Option<FilterChain> {
    let chain = tempo_factors(speed)
        .into_iter()
        .fold(FilterChain::new(), |chain, factor| {
            chain.filter(Filter::new("atempo").arg(factor))
        });
    (!chain.is_empty()).then_some(chain)
}

// =============================================================================
// Join
// =============================================================================

/// Re-encoding concatenation of `n` inputs, each with one video and one
/// audio stream. Outputs `outv` and `outa`.
pub fn concat_chain(n: usize) -> FilterChain {
    let mut chain = FilterChain::new();
    for i in 0..n {
        chain = chain.input(format!("{}:v:0", i)).input(format!("{}:a:0", i));
    }
    chain
        .filter(Filter::new("concat").opt("n", n).opt("v", 1).opt("a", 1))
        .output("outv")
        .output("outa")
}
