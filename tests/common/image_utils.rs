//! Image utilities for testing.
//!
//! This module provides helper functions for inspecting rendered frames.

use image::{ImageFormat, RgbaImage};

/// Detect image format from bytes
pub fn detect_image_format(bytes: &[u8]) -> Option<ImageFormat> {
    image::guess_format(bytes).ok()
}

/// Decode PNG bytes into an RGBA image
pub fn load_png(bytes: &[u8]) -> Result<RgbaImage, String> {
    match detect_image_format(bytes) {
        Some(ImageFormat::Png) => {}
        other => return Err(format!("Expected PNG, got {:?}", other)),
    }

    image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map(|img| img.to_rgba8())
        .map_err(|e| e.to_string())
}

/// Number of fully transparent pixels
pub fn transparent_pixels(image: &RgbaImage) -> usize {
    image.pixels().filter(|p| p.0[3] == 0).count()
}

/// Alpha channel in row-major order
pub fn alpha_channel(image: &RgbaImage) -> Vec<u8> {
    image.pixels().map(|p| p.0[3]).collect()
}

/// Check if an image has the expected dimensions
///
/// # Returns
///
/// * `Ok(())` if the image has the expected dimensions
/// * `Err(String)` with an error message if the dimensions differ
pub fn assert_image_dimensions(
    image: &RgbaImage,
    expected_width: u32,
    expected_height: u32,
) -> Result<(), String> {
    let (actual_width, actual_height) = image.dimensions();

    if actual_width != expected_width || actual_height != expected_height {
        return Err(format!(
            "Image dimensions differ: actual = {}x{}, expected = {}x{}",
            actual_width, actual_height, expected_width, expected_height
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_load_png() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 0]));
        let mut png_bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
            .unwrap();

        let decoded = load_png(&png_bytes).unwrap();
        assert_eq!(decoded, img);
        assert_eq!(transparent_pixels(&decoded), 4);
        assert!(load_png(b"not an image").is_err());
    }

    #[test]
    fn test_assert_image_dimensions() {
        let img = RgbaImage::new(10, 20);

        assert!(assert_image_dimensions(&img, 10, 20).is_ok());
        assert!(assert_image_dimensions(&img, 11, 20).is_err());
        assert!(assert_image_dimensions(&img, 10, 21).is_err());
    }
}
