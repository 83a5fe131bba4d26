//! Source image decoding for the image and patch steps.

use std::path::Path;

use eframe::egui;

/// Longest edge after downscaling; the window never shows the image larger.
pub const MAX_SOURCE_EDGE: u32 = 512;
pub const PLACEHOLDER_EDGE: usize = 256;

pub fn load_source_image(path: &Path) -> Result<egui::ColorImage, image::ImageError> {
    let decoded = image::open(path)?;
    let (width, height) = (decoded.width(), decoded.height());
    let longest = width.max(height).max(1);
    let resized = if longest > MAX_SOURCE_EDGE {
        let scale = MAX_SOURCE_EDGE as f32 / longest as f32;
        decoded.resize(
            (width as f32 * scale).max(1.0) as u32,
            (height as f32 * scale).max(1.0) as u32,
            image::imageops::FilterType::Triangle,
        )
    } else {
        decoded
    };
    let rgba = resized.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// Checkerboard with the same proportions as a patch grid, shown when no image loads.
pub fn placeholder_image(edge: usize, cells: usize) -> egui::ColorImage {
    let cell = (edge / cells.max(1)).max(1);
    let light = [0xd8, 0xde, 0xe9, 0xff];
    let dark = [0x8f, 0x9b, 0xb3, 0xff];
    let rgba: Vec<u8> = (0..edge * edge)
        .flat_map(|i| {
            let (x, y) = (i % edge, i / edge);
            if (x / cell + y / cell) % 2 == 0 {
                light
            } else {
                dark
            }
        })
        .collect();
    egui::ColorImage::from_rgba_unmultiplied([edge, edge], &rgba)
}

/// The decoded image, or the placeholder plus the reason loading failed.
pub fn load_or_placeholder(path: &Path, cells: usize) -> (egui::ColorImage, Option<String>) {
    match load_source_image(path) {
        Ok(image) => (image, None),
        Err(err) => {
            tracing::warn!(path = %path.display(), "failed to load source image: {err}");
            (
                placeholder_image(PLACEHOLDER_EDGE, cells),
                Some(format!("could not load '{}': {err}", path.display())),
            )
        }
    }
}

#[cfg(test)]
#[path = "tests/media_tests.rs"]
mod tests;
