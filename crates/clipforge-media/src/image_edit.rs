//! Still-image helpers.
//!
//! Every function takes an image by reference and returns a new one, so
//! callers can branch edits freely. Decoded images are what
//! [`crate::overlay::ImageSource::Decoded`] overlays carry.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat, RgbaImage};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Axis to mirror an image across.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipAxis {
    /// Mirror left-to-right
    Horizontal,
    /// Mirror top-to-bottom
    Vertical,
}

/// Load an image and convert it to RGBA.
pub fn load(path: impl AsRef<Path>) -> MediaResult<DynamicImage> {
    let img = image::open(path.as_ref())?;
    Ok(DynamicImage::ImageRgba8(img.to_rgba8()))
}

/// `(width, height)`.
pub fn size(img: &DynamicImage) -> (u32, u32) {
    img.dimensions()
}

/// Resize to fit the given width and/or height, keeping the aspect ratio.
///
/// With both bounds the image fits inside the box. Each side is at least 1px.
pub fn resize_keep_aspect(
    img: &DynamicImage,
    width: Option<u32>,
    height: Option<u32>,
) -> MediaResult<DynamicImage> {
    let (w, h) = img.dimensions();
    let scale = match (width, height) {
        (None, None) => return Err(MediaError::validation("Provide a target width or height")),
        (Some(tw), None) => tw as f64 / w as f64,
        (None, Some(th)) => th as f64 / h as f64,
        (Some(tw), Some(th)) => (tw as f64 / w as f64).min(th as f64 / h as f64),
    };

    let new_w = ((w as f64 * scale) as u32).max(1);
    let new_h = ((h as f64 * scale) as u32).max(1);
    Ok(img.resize_exact(new_w, new_h, FilterType::Lanczos3))
}

/// Resize to exactly `width` x `height`.
pub fn resize_free(img: &DynamicImage, width: u32, height: u32) -> MediaResult<DynamicImage> {
    if width == 0 || height == 0 {
        return Err(MediaError::validation("Target size must be non-zero"));
    }
    Ok(img.resize_exact(width, height, FilterType::Lanczos3))
}

/// Rotate counter-clockwise by `degrees`, growing the canvas to fit.
///
/// Quarter turns are lossless. Other angles use nearest-neighbour sampling
/// and leave the uncovered corners transparent.
pub fn rotate(img: &DynamicImage, degrees: f64) -> MediaResult<DynamicImage> {
    if !degrees.is_finite() {
        return Err(MediaError::validation(format!(
            "Rotation angle must be finite, got {}",
            degrees
        )));
    }

    let turn = degrees.rem_euclid(360.0);
    let quarter = (turn / 90.0).round();
    if (turn - quarter * 90.0).abs() < 1e-9 {
        return Ok(match quarter as u32 % 4 {
            1 => img.rotate270(),
            2 => img.rotate180(),
            3 => img.rotate90(),
            _ => img.clone(),
        });
    }

    let src = img.to_rgba8();
    let (w, h) = (src.width() as f64, src.height() as f64);
    let (sin, cos) = turn.to_radians().sin_cos();
    let out_w = ((w * cos.abs() + h * sin.abs()) - 1e-9).ceil().max(1.0);
    let out_h = ((w * sin.abs() + h * cos.abs()) - 1e-9).ceil().max(1.0);

    let mut out = RgbaImage::new(out_w as u32, out_h as u32);
    for (ox, oy, pixel) in out.enumerate_pixels_mut() {
        let dx = ox as f64 + 0.5 - out_w / 2.0;
        let dy = oy as f64 + 0.5 - out_h / 2.0;
        // Inverse of the counter-clockwise turn in y-down coordinates
        let sx = (dx * cos - dy * sin + w / 2.0).floor();
        let sy = (dx * sin + dy * cos + h / 2.0).floor();
        if sx >= 0.0 && sy >= 0.0 && sx < w && sy < h {
            *pixel = *src.get_pixel(sx as u32, sy as u32);
        }
    }

    debug!(degrees, width = out.width(), height = out.height(), "Rotated image");
    Ok(DynamicImage::ImageRgba8(out))
}

pub fn flip(img: &DynamicImage, axis: FlipAxis) -> DynamicImage {
    match axis {
        FlipAxis::Horizontal => img.fliph(),
        FlipAxis::Vertical => img.flipv(),
    }
}

/// Remove the given number of pixels from each edge.
pub fn cut_borders(
    img: &DynamicImage,
    left: u32,
    top: u32,
    right: u32,
    bottom: u32,
) -> MediaResult<DynamicImage> {
    let (w, h) = img.dimensions();
    let new_right = w.saturating_sub(right);
    let new_bottom = h.saturating_sub(bottom);

    if left >= new_right || top >= new_bottom {
        return Err(MediaError::validation("Crop parameters remove the entire image"));
    }
    Ok(img.crop_imm(left, top, new_right - left, new_bottom - top))
}

/// Save `img` as `format`.
///
/// When `path` is an existing directory the file is named `output.<ext>`
/// inside it; otherwise missing parent directories are created. Returns the
/// written path.
pub fn save(img: &DynamicImage, path: impl AsRef<Path>, format: ImageFormat) -> MediaResult<PathBuf> {
    let path = path.as_ref();
    let target = if path.is_dir() {
        let ext = format.extensions_str().first().copied().unwrap_or("png");
        path.join(format!("output.{}", ext))
    } else {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        path.to_path_buf()
    };

    img.save_with_format(&target, format)?;
    debug!(path = %target.display(), "Saved image");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use tempfile::TempDir;

    fn sample(w: u32, h: u32) -> DynamicImage {
        let mut img = RgbaImage::new(w, h);
        // Mark the top-left pixel so orientation changes are observable
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        DynamicImage::ImageRgba8(img)
    }

    fn red(img: &DynamicImage, x: u32, y: u32) -> bool {
        img.get_pixel(x, y) == Rgba([255, 0, 0, 255])
    }

    #[test]
    fn test_resize_keep_aspect() {
        let img = sample(200, 100);
        assert_eq!(size(&resize_keep_aspect(&img, Some(100), None).unwrap()), (100, 50));
        assert_eq!(size(&resize_keep_aspect(&img, None, Some(25)).unwrap()), (50, 25));
        assert_eq!(size(&resize_keep_aspect(&img, Some(100), Some(10)).unwrap()), (20, 10));
        assert_eq!(size(&resize_keep_aspect(&img, Some(1), None).unwrap()), (1, 1));
        assert!(resize_keep_aspect(&img, None, None).unwrap_err().is_validation());
    }

    #[test]
    fn test_resize_free() {
        let img = sample(200, 100);
        assert_eq!(size(&resize_free(&img, 30, 70).unwrap()), (30, 70));
        assert!(resize_free(&img, 0, 70).is_err());
    }

    #[test]
    fn test_rotate_quarter_turns() {
        let img = sample(4, 2);
        let ccw = rotate(&img, 90.0).unwrap();
        assert_eq!(size(&ccw), (2, 4));
        // Counter-clockwise moves the top-left corner to the bottom-left
        assert!(red(&ccw, 0, 3));

        assert_eq!(size(&rotate(&img, 180.0).unwrap()), (4, 2));
        assert_eq!(size(&rotate(&img, -90.0).unwrap()), (2, 4));
        assert_eq!(size(&rotate(&img, 360.0).unwrap()), (4, 2));
        assert!(red(&rotate(&img, 720.0).unwrap(), 0, 0));
    }

    #[test]
    fn test_rotate_arbitrary_angle_expands_canvas() {
        let mut base = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 255, 255]));
        base.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        let img = DynamicImage::ImageRgba8(base);

        let rotated = rotate(&img, 45.0).unwrap();
        // 10 * (cos 45 + sin 45) = 14.14
        assert_eq!(size(&rotated), (15, 15));
        // Corners fall outside the source and stay transparent
        assert_eq!(rotated.get_pixel(0, 0)[3], 0);
        assert_eq!(rotated.get_pixel(14, 14)[3], 0);
        assert_eq!(rotated.get_pixel(7, 7), Rgba([0, 0, 255, 255]));

        let wide = rotate(&sample(20, 4), 30.0).unwrap();
        // 20 cos 30 + 4 sin 30 = 19.32; 20 sin 30 + 4 cos 30 = 13.46
        assert_eq!(size(&wide), (20, 14));
    }

    #[test]
    fn test_rotate_rejects_non_finite_angle() {
        let img = sample(4, 2);
        assert!(rotate(&img, f64::NAN).unwrap_err().is_validation());
        assert!(rotate(&img, f64::INFINITY).unwrap_err().is_validation());
    }

    #[test]
    fn test_flip() {
        let img = sample(4, 2);
        assert!(red(&flip(&img, FlipAxis::Horizontal), 3, 0));
        assert!(red(&flip(&img, FlipAxis::Vertical), 0, 1));
    }

    #[test]
    fn test_cut_borders() {
        let img = sample(10, 8);
        let cut = cut_borders(&img, 1, 2, 3, 4).unwrap();
        assert_eq!(size(&cut), (6, 2));
        assert!(cut_borders(&img, 5, 0, 5, 0).unwrap_err().is_validation());
        assert!(cut_borders(&img, 0, 0, 0, 100).is_err());
    }

    #[test]
    fn test_save_into_directory_and_new_parents() {
        let dir = TempDir::new().unwrap();
        let img = sample(3, 3);

        let in_dir = save(&img, dir.path(), ImageFormat::Png).unwrap();
        assert_eq!(in_dir, dir.path().join("output.png"));
        assert!(in_dir.exists());

        let nested = dir.path().join("a/b/logo.png");
        let saved = save(&img, &nested, ImageFormat::Png).unwrap();
        assert_eq!(saved, nested);

        let reloaded = load(&saved).unwrap();
        assert_eq!(size(&reloaded), (3, 3));
        assert!(red(&reloaded, 0, 0));
    }
}
