use std::io::Write;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};

use crate::foundation::error::MosaicResult;
use crate::foundation::math::{f32_to_unorm16, unpremultiply_f32, unpremultiply_u8};
use crate::render::canvas::{Canvas, CanvasPixels};
use crate::render::composite::word_to_rgba;

/// Map a `0..=9` effort level to the encoder's compression and filter settings.
pub fn compression_for_level(level: u8) -> (CompressionType, FilterType) {
    match level {
        0 => (CompressionType::Fast, FilterType::NoFilter),
        1..=3 => (CompressionType::Fast, FilterType::Adaptive),
        4..=6 => (CompressionType::Default, FilterType::Adaptive),
        _ => (CompressionType::Best, FilterType::Adaptive),
    }
}

/// Encode `canvas` as PNG.
///
/// Fully opaque canvases are written as RGB, anything else as RGBA with straight alpha.
/// Wide canvases keep 16 bits per channel.
pub fn write_png(canvas: &Canvas, level: u8, sink: &mut dyn Write) -> MosaicResult<()> {
    let (compression, filter) = compression_for_level(level);
    let encoder = PngEncoder::new_with_quality(sink, compression, filter);
    let (w, h) = (canvas.width(), canvas.height());

    match canvas.pixels() {
        CanvasPixels::Argb8(words) => {
            let opaque = words.iter().all(|&word| word >> 24 == 0xff);
            let (bytes, color) = if opaque {
                (rgb8(words), ExtendedColorType::Rgb8)
            } else {
                (rgba8(words), ExtendedColorType::Rgba8)
            };
            tracing::debug!(opaque, "png 8-bit");
            encoder.write_image(&bytes, w, h, color)?;
        }
        CanvasPixels::RgbaF32(px) => {
            let opaque = px.iter().all(|p| f32_to_unorm16(p[3]) == u16::MAX);
            let (bytes, color) = if opaque {
                (rgb16(px), ExtendedColorType::Rgb16)
            } else {
                (rgba16(px), ExtendedColorType::Rgba16)
            };
            tracing::debug!(opaque, "png 16-bit");
            encoder.write_image(&bytes, w, h, color)?;
        }
    }
    Ok(())
}

fn rgb8(words: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(words.len() * 3);
    for &w in words {
        let [r, g, b, _] = word_to_rgba(w);
        out.extend_from_slice(&[r, g, b]);
    }
    out
}

fn rgba8(words: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(words.len() * 4);
    for &w in words {
        let [r, g, b, a] = word_to_rgba(w);
        out.extend_from_slice(&[
            unpremultiply_u8(r, a),
            unpremultiply_u8(g, a),
            unpremultiply_u8(b, a),
            a,
        ]);
    }
    out
}

// 16-bit samples go to the encoder in native byte order.
fn rgb16(px: &[[f32; 4]]) -> Vec<u8> {
    let mut out = Vec::with_capacity(px.len() * 6);
    for p in px {
        for &c in &p[..3] {
            out.extend_from_slice(&f32_to_unorm16(c).to_ne_bytes());
        }
    }
    out
}

fn rgba16(px: &[[f32; 4]]) -> Vec<u8> {
    let mut out = Vec::with_capacity(px.len() * 8);
    for &p in px {
        for c in unpremultiply_f32(p) {
            out.extend_from_slice(&f32_to_unorm16(c).to_ne_bytes());
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
