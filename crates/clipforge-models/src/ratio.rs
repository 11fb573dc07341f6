//! Aspect-ratio targets, resize modes and padding styles.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::path::PathBuf;

use crate::error::KeywordError;

/// Default output width when resolving a ratio target.
pub const DEFAULT_TARGET_WIDTH: u32 = 1080;

/// Default box-blur radius for blurred padding.
pub const DEFAULT_BLUR_STRENGTH: u32 = 20;
/// Default box-blur power for blurred padding.
pub const DEFAULT_BLUR_POWER: u32 = 10;

/// Supported output aspect ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RatioTarget {
    /// 9:16 portrait
    Vertical,
    /// 16:9 landscape
    Widescreen,
    /// 21:9 cinema
    Ultrawide,
}

impl RatioTarget {
    pub const ALL: &'static [RatioTarget] = &[
        RatioTarget::Vertical,
        RatioTarget::Widescreen,
        RatioTarget::Ultrawide,
    ];

    /// Ratio as `(width_part, height_part)`.
    pub fn parts(&self) -> (u32, u32) {
        match self {
            RatioTarget::Vertical => (9, 16),
            RatioTarget::Widescreen => (16, 9),
            RatioTarget::Ultrawide => (21, 9),
        }
    }

    /// Resolve to explicit pixel dimensions for a base width.
    ///
    /// Height is `width * ratio_h / ratio_w`, truncated.
    pub fn dimensions(&self, width: u32) -> (u32, u32) {
        let (rw, rh) = self.parts();
        let height = (u64::from(width) * u64::from(rh) / u64::from(rw)) as u32;
        (width, height)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RatioTarget::Vertical => "vertical",
            RatioTarget::Widescreen => "widescreen",
            RatioTarget::Ultrawide => "ultrawide",
        }
    }
}

impl fmt::Display for RatioTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RatioTarget {
    type Err = KeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vertical" => Ok(RatioTarget::Vertical),
            "widescreen" => Ok(RatioTarget::Widescreen),
            "ultrawide" => Ok(RatioTarget::Ultrawide),
            _ => Err(KeywordError::new(
                "ratio",
                s,
                "use 'vertical', 'widescreen', or 'ultrawide'",
            )),
        }
    }
}

/// How a frame is fitted into the target ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResizeMode {
    /// Keep the whole frame and fill the rest with a background
    #[default]
    Pad,
    /// Fill the frame and cut the excess
    Crop,
}

impl ResizeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResizeMode::Pad => "pad",
            ResizeMode::Crop => "crop",
        }
    }
}

impl fmt::Display for ResizeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ResizeMode {
    type Err = KeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pad" => Ok(ResizeMode::Pad),
            "crop" => Ok(ResizeMode::Crop),
            _ => Err(KeywordError::new("mode", s, "must be 'pad' or 'crop'")),
        }
    }
}

/// Solid padding color: `black` or `#RRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "String", into = "String")]
pub struct PadColor(String);

impl PadColor {
    pub fn black() -> Self {
        Self("black".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PadColor {
    fn default() -> Self {
        Self::black()
    }
}

impl FromStr for PadColor {
    type Err = KeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("black") {
            return Ok(Self(s.to_string()));
        }
        let is_hex = s.len() == 7
            && s.starts_with('#')
            && s[1..].chars().all(|c| c.is_ascii_hexdigit());
        if is_hex {
            Ok(Self(s.to_string()))
        } else {
            Err(KeywordError::new(
                "color",
                s,
                "must be 'black' or a hex string like '#RRGGBB'",
            ))
        }
    }
}

impl TryFrom<String> for PadColor {
    type Error = KeywordError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PadColor> for String {
    fn from(value: PadColor) -> Self {
        value.0
    }
}

impl fmt::Display for PadColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Background used in pad mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PadStyle {
    /// Solid color bars
    Color {
        #[serde(default)]
        color: PadColor,
    },
    /// Blurred, cover-scaled copy of the video itself
    Blur {
        #[serde(default = "default_blur_strength")]
        blur_strength: u32,
        #[serde(default = "default_blur_power")]
        blur_power: u32,
    },
    /// A still image stretched to cover the frame
    Image { path: PathBuf },
}

fn default_blur_strength() -> u32 {
    DEFAULT_BLUR_STRENGTH
}
fn default_blur_power() -> u32 {
    DEFAULT_BLUR_POWER
}

impl Default for PadStyle {
    fn default() -> Self {
        PadStyle::Color {
            color: PadColor::black(),
        }
    }
}

impl PadStyle {
    pub fn blur() -> Self {
        PadStyle::Blur {
            blur_strength: DEFAULT_BLUR_STRENGTH,
            blur_power: DEFAULT_BLUR_POWER,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PadStyle::Color { .. } => "color",
            PadStyle::Blur { .. } => "blur",
            PadStyle::Image { .. } => "image",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_truncate() {
        assert_eq!(RatioTarget::Vertical.dimensions(1080), (1080, 1920));
        assert_eq!(RatioTarget::Widescreen.dimensions(1080), (1080, 607));
        assert_eq!(RatioTarget::Ultrawide.dimensions(1080), (1080, 462));
        assert_eq!(RatioTarget::Widescreen.dimensions(1920), (1920, 1080));
    }

    #[test]
    fn test_ratio_keywords() {
        assert_eq!("Vertical".parse::<RatioTarget>().unwrap(), RatioTarget::Vertical);
        let err = "square".parse::<RatioTarget>().unwrap_err();
        assert_eq!(err.kind, "ratio");
        assert!(err.to_string().contains("square"));
    }

    #[test]
    fn test_mode_keywords() {
        assert_eq!("crop".parse::<ResizeMode>().unwrap(), ResizeMode::Crop);
        assert!("stretch".parse::<ResizeMode>().is_err());
        assert_eq!(ResizeMode::default(), ResizeMode::Pad);
    }

    #[test]
    fn test_pad_color_validation() {
        assert!("black".parse::<PadColor>().is_ok());
        assert!("BLACK".parse::<PadColor>().is_ok());
        assert!("#00ff7A".parse::<PadColor>().is_ok());
        assert!("white".parse::<PadColor>().is_err());
        assert!("#12345".parse::<PadColor>().is_err());
        assert!("#12345g".parse::<PadColor>().is_err());
    }

    #[test]
    fn test_pad_style_deserialize() {
        let style: PadStyle = serde_json::from_str(r#"{"type": "blur"}"#).unwrap();
        assert_eq!(style, PadStyle::blur());

        let style: PadStyle = serde_json::from_str(r#"{"type": "color"}"#).unwrap();
        assert_eq!(style, PadStyle::default());

        assert!(serde_json::from_str::<PadStyle>(r#"{"type": "color", "color": "pink"}"#).is_err());
        assert!(serde_json::from_str::<PadStyle>(r#"{"type": "gradient"}"#).is_err());
    }
}
