//! Shared data models for the clipforge editing pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Captions and text positioning
//! - Aspect-ratio targets and padding styles
//! - Image overlay requests
//! - Encoding configuration
//! - The operation registry used at the transport boundary

pub mod caption;
pub mod encoding;
pub mod error;
pub mod operation;
pub mod overlay;
pub mod ratio;
pub mod timestamp;

// Re-export common types
pub use caption::{Axis, Caption, CaptionStyle, Position};
pub use encoding::EncodingConfig;
pub use error::KeywordError;
pub use operation::Operation;
pub use overlay::ImageOverlaySpec;
pub use ratio::{PadColor, PadStyle, RatioTarget, ResizeMode};
pub use timestamp::{parse_timestamp, Seconds, TimestampError};
