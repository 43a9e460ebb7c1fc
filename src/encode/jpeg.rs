use std::io::Write;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::foundation::error::MosaicResult;
use crate::render::canvas::Canvas;
use crate::render::composite::word_to_rgba;

/// Encode `canvas` as baseline JPEG.
///
/// The encoder has no BGRA input, so every pixel is reordered to RGB first. Alpha is
/// dropped; premultiplied color already equals the pixel composited over black.
/// Quality 0 is raised to 1, the encoder's lowest setting.
pub fn write_jpeg(canvas: &Canvas, quality: u8, sink: &mut dyn Write) -> MosaicResult<()> {
    let quality = quality.clamp(1, 100);
    let words = canvas.argb8();
    let mut rgb = Vec::with_capacity(words.len() * 3);
    for &w in words.iter() {
        let [r, g, b, _] = word_to_rgba(w);
        rgb.extend_from_slice(&[r, g, b]);
    }

    let encoder = JpegEncoder::new_with_quality(sink, quality);
    encoder.write_image(&rgb, canvas.width(), canvas.height(), ExtendedColorType::Rgb8)?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/jpeg.rs"]
mod tests;
