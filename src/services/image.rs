//! On-the-fly image resizing for the object serving path.

use image::{ExtendedColorType, ImageError, codecs::jpeg::JpegEncoder, imageops::FilterType};
use thiserror::Error;

const DEFAULT_QUALITY: u8 = 100;

/// Largest output side in pixels, requested or derived from the aspect ratio.
pub const MAX_DIMENSION: u32 = 4096;

#[derive(Debug, Error)]
pub enum ResizeError {
    #[error("width and height must be at most {MAX_DIMENSION} pixels")]
    TooLarge,

    #[error(transparent)]
    Decode(#[from] ImageError),
}

/// Resize parameters taken from the `width`, `height` and `quality` query
/// parameters. Zero means "not requested".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeRequest {
    pub width: u32,
    pub height: u32,
    pub quality: u8,
}

impl ResizeRequest {
    /// Lenient parsing: non-numeric or non-positive dimensions count as 0,
    /// quality outside 1..=100 falls back to 100.
    pub fn parse(width: Option<&str>, height: Option<&str>, quality: Option<&str>) -> Self {
        fn positive(value: Option<&str>) -> u32 {
            value
                .and_then(|v| v.trim().parse::<i64>().ok())
                .filter(|v| *v > 0)
                .map(|v| v.min(i64::from(u32::MAX)) as u32)
                .unwrap_or(0)
        }

        let quality = quality
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|q| (1..=100).contains(q))
            .map(|q| q as u8)
            .unwrap_or(DEFAULT_QUALITY);

        Self {
            width: positive(width),
            height: positive(height),
            quality,
        }
    }

    /// Neither dimension requested: serve the original bytes.
    pub fn is_passthrough(&self) -> bool {
        self.width == 0 && self.height == 0
    }

    pub fn exceeds_limit(&self) -> bool {
        self.width > MAX_DIMENSION || self.height > MAX_DIMENSION
    }
}

/// Output size for a source image.
///
/// Both dimensions given → exact size. One given → the other follows the
/// source aspect ratio (at least 1 pixel).
pub fn target_dimensions(source: (u32, u32), width: u32, height: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    let scale = |value: u32, num: u32, den: u32| -> u32 {
        if den == 0 {
            return 1;
        }
        let scaled = (f64::from(value) * f64::from(num) / f64::from(den)).round();
        (scaled as u32).max(1)
    };

    match (width, height) {
        (0, 0) => (src_w, src_h),
        (w, 0) => (w, scale(src_h, w, src_w)),
        (0, h) => (scale(src_w, h, src_h), h),
        (w, h) => (w, h),
    }
}

/// Decode, resize with Lanczos3 and re-encode as JPEG.
///
/// The requested size is checked before decoding and the derived size
/// before any pixel buffer is allocated.
pub fn resize_to_jpeg(bytes: &[u8], request: &ResizeRequest) -> Result<Vec<u8>, ResizeError> {
    if request.exceeds_limit() {
        return Err(ResizeError::TooLarge);
    }

    let source = image::load_from_memory(bytes)?;
    let (width, height) = target_dimensions(
        (source.width(), source.height()),
        request.width,
        request.height,
    );
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(ResizeError::TooLarge);
    }

    // JPEG has no alpha channel
    let resized = source.resize_exact(width, height, FilterType::Lanczos3).to_rgb8();

    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, request.quality);
    encoder.encode(resized.as_raw(), resized.width(), resized.height(), ExtendedColorType::Rgb8)?;

    Ok(out)
}
