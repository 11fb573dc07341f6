//! Overlay requests accepted by [`crate::VideoEditor`].

use image::DynamicImage;
use std::path::{Path, PathBuf};

use clipforge_models::overlay::{CENTERED_X, CENTERED_Y};
use clipforge_models::{ImageOverlaySpec, Position};

/// Where an overlay image comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// An image file on disk
    Path(PathBuf),
    /// An in-memory image, written to a temporary PNG for the render
    Decoded(DynamicImage),
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        ImageSource::Path(path.to_path_buf())
    }
}

impl From<&str> for ImageSource {
    fn from(path: &str) -> Self {
        ImageSource::Path(PathBuf::from(path))
    }
}

impl From<DynamicImage> for ImageSource {
    fn from(img: DynamicImage) -> Self {
        ImageSource::Decoded(img)
    }
}

/// An image shown over `[start, end]` of the base video.
#[derive(Debug, Clone)]
pub struct ImageOverlay {
    pub source: ImageSource,
    pub start: f64,
    pub end: f64,
    pub x: Position,
    pub y: Position,
}

impl ImageOverlay {
    pub fn new(source: impl Into<ImageSource>, start: f64, end: f64) -> Self {
        Self {
            source: source.into(),
            start,
            end,
            x: Position::default(),
            y: Position::default(),
        }
    }

    pub fn at(mut self, x: impl Into<Position>, y: impl Into<Position>) -> Self {
        self.x = x.into();
        self.y = y.into();
        self
    }

    pub fn centered(self) -> Self {
        self.at(CENTERED_X, CENTERED_Y)
    }
}

impl From<ImageOverlaySpec> for ImageOverlay {
    fn from(spec: ImageOverlaySpec) -> Self {
        Self {
            source: ImageSource::Path(spec.image),
            start: spec.start,
            end: spec.end,
            x: spec.x,
            y: spec.y,
        }
    }
}

/// A video clip played over the base video.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoOverlay {
    pub path: PathBuf,
    /// When the clip starts on the base timeline
    pub start: f64,
    /// When the clip disappears; defaults to `start` plus the clip's length
    pub end: Option<f64>,
    pub x: Position,
    pub y: Position,
    /// Mix the clip's own audio into the output
    pub keep_audio: bool,
}

impl VideoOverlay {
    /// A centered, silent overlay starting at `start`.
    pub fn new(path: impl Into<PathBuf>, start: f64) -> Self {
        Self {
            path: path.into(),
            start,
            end: None,
            x: Position::from(CENTERED_X),
            y: Position::from(CENTERED_Y),
            keep_audio: false,
        }
    }

    pub fn until(mut self, end: f64) -> Self {
        self.end = Some(end);
        self
    }

    pub fn at(mut self, x: impl Into<Position>, y: impl Into<Position>) -> Self {
        self.x = x.into();
        self.y = y.into();
        self
    }

    pub fn with_audio(mut self, keep: bool) -> Self {
        self.keep_audio = keep;
        self
    }
}
