//! Caption entries and burn-in styling.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Default distance from the frame edge for keyword positions.
pub const DEFAULT_TEXT_PADDING: u32 = 10;

/// One timed caption, as produced by a transcription backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Caption {
    /// Start of the display window in seconds
    pub start: f64,
    /// End of the display window in seconds
    pub end: f64,
    /// Raw display text (escaped at filter build time)
    pub text: String,
}

impl Caption {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Whether the display window is non-empty and finite.
    pub fn has_valid_window(&self) -> bool {
        self.start.is_finite() && self.end.is_finite() && self.start >= 0.0 && self.start < self.end
    }
}

/// Axis a position expression is evaluated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// A coordinate on one axis: literal pixels or an expression.
///
/// Expressions may be the keywords `left`/`center`/`right` (x axis) or
/// `top`/`center`/`bottom` (y axis); anything else is passed to FFmpeg
/// unchanged (e.g. `h-(text_h*4)`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Position {
    Pixels(i64),
    Expr(String),
}

impl Default for Position {
    fn default() -> Self {
        Position::Pixels(0)
    }
}

impl From<i64> for Position {
    fn from(value: i64) -> Self {
        Position::Pixels(value)
    }
}

impl From<&str> for Position {
    fn from(value: &str) -> Self {
        Position::Expr(value.to_string())
    }
}

impl Position {
    /// Resolve to a drawtext coordinate expression.
    pub fn resolve(&self, axis: Axis, padding: u32) -> String {
        match self {
            Position::Pixels(px) => px.to_string(),
            Position::Expr(expr) => match (axis, expr.as_str()) {
                (Axis::X, "left") | (Axis::Y, "top") => padding.to_string(),
                (Axis::X, "center") => "(w-text_w)/2".to_string(),
                (Axis::Y, "center") => "(h-text_h)/2".to_string(),
                (Axis::X, "right") => format!("(w-text_w)-{}", padding),
                (Axis::Y, "bottom") => format!("(h-text_h)-{}", padding),
                _ => expr.clone(),
            },
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Pixels(px) => write!(f, "{}", px),
            Position::Expr(expr) => f.write_str(expr),
        }
    }
}

/// Styling shared by every caption in one burn-in pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CaptionStyle {
    /// Path to a .ttf/.otf font file; takes precedence over `font`
    pub fontfile: Option<PathBuf>,
    /// Font family name
    pub font: Option<String>,
    pub fontsize: u32,
    /// Font color (e.g. "white", "red@0.8")
    pub fontcolor: String,
    pub borderw: u32,
    pub bordercolor: String,
    pub shadowx: i32,
    pub shadowy: i32,
    pub x: Position,
    pub y: Position,
    pub padding_x: u32,
    pub padding_y: u32,
    pub text_align: String,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            fontfile: None,
            font: None,
            fontsize: 32,
            fontcolor: "white".to_string(),
            borderw: 2,
            bordercolor: "black".to_string(),
            shadowx: 2,
            shadowy: 2,
            x: Position::default(),
            y: Position::default(),
            padding_x: DEFAULT_TEXT_PADDING,
            padding_y: DEFAULT_TEXT_PADDING,
            text_align: "center".to_string(),
        }
    }
}
