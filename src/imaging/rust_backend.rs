//! Production backend: `image` crate decoders, libwebp encoder.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP, BMP, TIFF, GIF) | `image::ImageReader` (content-sniffed) |
//! | Alpha flattening | white background blend, see [`flatten_to_rgb`] |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Encode → WebP | `webp::Encoder` (lossy, quality-controlled, method 6) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{EncodeParams, Quality};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, Rgb, RgbImage};
use std::path::Path;

/// Largest width or height a WebP bitstream can describe.
pub const MAX_WEBP_DIMENSION: u32 = 16383;

/// libwebp effort level, 0 (fast) to 6 (smallest files).
const WEBP_METHOD: i32 = 6;

/// Pure-Rust decode + libwebp encode backend.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
///
/// The format is sniffed from the file contents, so a PNG saved with a
/// `.jpg` extension still decodes. Any failure to read the file counts as a
/// decode failure: the source is unusable either way.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| BackendError::Decode(format!("{}: {}", path.display(), e)))?;
    reader
        .decode()
        .map_err(|e| BackendError::Decode(format!("{}: {}", path.display(), e)))
}

/// Convert any decoded image to RGB8.
///
/// Images with an alpha channel (RGBA, LA, transparent palettes) are
/// composited onto white; WebP output is written without alpha.
pub fn flatten_to_rgb(img: DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.into_rgb8();
    }

    let rgba = img.into_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (dst, src) in out.pixels_mut().zip(rgba.pixels()) {
        let a = u32::from(src[3]);
        let blend = |c: u8| ((u32::from(c) * a + 255 * (255 - a) + 127) / 255) as u8;
        *dst = Rgb([blend(src[0]), blend(src[1]), blend(src[2])]);
    }
    out
}

/// Encode an RGB raster as lossy WebP bytes.
fn encode_webp(img: &RgbImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
    let mut config = webp::WebPConfig::new()
        .map_err(|()| BackendError::Encode("libwebp config init failed".into()))?;
    config.lossless = 0;
    config.quality = quality.as_factor();
    config.method = WEBP_METHOD;

    let encoder = webp::Encoder::from_rgb(img.as_raw(), img.width(), img.height());
    let memory = encoder
        .encode_advanced(&config)
        .map_err(|e| {
            BackendError::Encode(format!(
                "libwebp rejected {}x{}: {e:?}",
                img.width(),
                img.height()
            ))
        })?;
    Ok(memory.to_vec())
}

impl ImageBackend for RustBackend {
    type Raster = RgbImage;

    fn decode(&self, path: &Path) -> Result<RgbImage, BackendError> {
        Ok(flatten_to_rgb(load_image(path)?))
    }

    fn dimensions(&self, raster: &RgbImage) -> Dimensions {
        Dimensions {
            width: raster.width(),
            height: raster.height(),
        }
    }

    fn encode(&self, raster: &RgbImage, params: &EncodeParams) -> Result<(), BackendError> {
        if params.width > MAX_WEBP_DIMENSION || params.height > MAX_WEBP_DIMENSION {
            return Err(BackendError::Encode(format!(
                "{}x{} exceeds the WebP limit of {MAX_WEBP_DIMENSION}px per side",
                params.width, params.height
            )));
        }
        let bytes = if raster.dimensions() == (params.width, params.height) {
            encode_webp(raster, params.quality)?
        } else {
            let resized =
                image::imageops::resize(raster, params.width, params.height, FilterType::Lanczos3);
            encode_webp(&resized, params.quality)?
        };
        std::fs::write(&params.output, bytes)?;
        Ok(())
    }
}
