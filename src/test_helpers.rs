//! Shared test utilities: synthetic source images written to disk.
//!
//! Images are generated rather than checked in so tests control exact
//! dimensions and pixel content.

use image::{ImageEncoder, RgbImage, RgbaImage};
use std::path::Path;

/// Write a gradient JPEG with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write a solid-red RGBA PNG whose every pixel has the given alpha.
pub fn create_test_png_rgba(path: &Path, width: u32, height: u32, alpha: u8) {
    let img = RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, alpha]));
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

/// Write a gradient RGB image in any format the `image` crate can encode.
pub fn create_test_image(path: &Path, width: u32, height: u32, format: image::ImageFormat) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 7 % 256) as u8, (y * 5 % 256) as u8, 64])
    });
    img.save_with_format(path, format).unwrap();
}

/// Write a GIF whose left half is fully transparent and right half opaque red.
pub fn create_transparent_gif(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            image::Rgba([0, 0, 0, 0])
        } else {
            image::Rgba([255, 0, 0, 255])
        }
    });
    img.save_with_format(path, image::ImageFormat::Gif).unwrap();
}
