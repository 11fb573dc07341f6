//! Image overlay requests.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::caption::Position;

/// Overlay position expression that centers the overlay on the base frame.
pub const CENTERED_X: &str = "(W-w)/2";
/// Vertical counterpart of [`CENTERED_X`].
pub const CENTERED_Y: &str = "(H-h)/2";

/// One image composited over a time window of the base video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ImageOverlaySpec {
    /// Path to the image file
    pub image: PathBuf,
    /// Window start in seconds
    pub start: f64,
    /// Window end in seconds
    pub end: f64,
    /// Left edge on the base frame (pixels or overlay expression)
    #[serde(default)]
    pub x: Position,
    /// Top edge on the base frame (pixels or overlay expression)
    #[serde(default)]
    pub y: Position,
}

impl ImageOverlaySpec {
    pub fn new(image: impl Into<PathBuf>, start: f64, end: f64) -> Self {
        Self {
            image: image.into(),
            start,
            end,
            x: Position::default(),
            y: Position::default(),
        }
    }

    /// Place the overlay's top-left corner.
    pub fn at(mut self, x: impl Into<Position>, y: impl Into<Position>) -> Self {
        self.x = x.into();
        self.y = y.into();
        self
    }

    /// Center the overlay on the base frame.
    pub fn centered(self) -> Self {
        self.at(CENTERED_X, CENTERED_Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_origin() {
        let spec: ImageOverlaySpec =
            serde_json::from_str(r#"{"image": "logo.png", "start": 0, "end": 5}"#).unwrap();
        assert_eq!(spec.x, Position::Pixels(0));
        assert_eq!(spec.y, Position::Pixels(0));
    }

    #[test]
    fn test_centered() {
        let spec = ImageOverlaySpec::new("logo.png", 1.0, 2.0).centered();
        assert_eq!(spec.x.to_string(), "(W-w)/2");
        assert_eq!(spec.y.to_string(), "(H-h)/2");
    }
}
