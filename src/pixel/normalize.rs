//! Bring captured buffers into a layout the compositor can sample.

use crate::foundation::error::MosaicResult;
use crate::pixel::buffer::PixelBuffer;
use crate::pixel::format::{Depth, FormatDescriptor, ShmFormat, describe};

/// Floating-point RGBA image, premultiplied, channels in `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct WideImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major `[r, g, b, a]` pixels.
    pub pixels: Vec<[f32; 4]>,
    /// Source had no alpha channel.
    pub opaque: bool,
}

/// A captured buffer in one of the two paintable representations.
#[derive(Clone, Debug, PartialEq)]
pub enum NormalizedImage {
    /// Canonical `A:R:G:B 8:8:8:8` words (`Argb8888` or `Xrgb8888`).
    Argb8 {
        /// Buffer tagged with a canonical format.
        buffer: PixelBuffer,
        /// Alpha bits are padding.
        opaque: bool,
    },
    /// Unpacked wide-gamut pixels.
    Wide(WideImage),
}

impl NormalizedImage {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        match self {
            Self::Argb8 { buffer, .. } => buffer.width(),
            Self::Wide(img) => img.width,
        }
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        match self {
            Self::Argb8 { buffer, .. } => buffer.height(),
            Self::Wide(img) => img.height,
        }
    }

    /// Whether the image came from a format without alpha.
    pub fn is_opaque(&self) -> bool {
        match self {
            Self::Argb8 { opaque, .. } => *opaque,
            Self::Wide(img) => img.opaque,
        }
    }
}

/// Whether `format` needs the wide floating-point canvas.
pub fn needs_wide_canvas(format: ShmFormat) -> MosaicResult<bool> {
    Ok(describe(format)?.is_wide())
}

/// Convert `buffer` into a paintable representation.
///
/// - canonical 8-bit formats pass through untouched
/// - other 8-bit channel orders are repacked in place and retagged
/// - 10-bit formats are unpacked into a new floating-point image
pub fn normalize(buffer: PixelBuffer) -> MosaicResult<NormalizedImage> {
    let desc = describe(buffer.format())?;
    let opaque = !desc.has_alpha;

    if desc.is_canonical() {
        return Ok(NormalizedImage::Argb8 { buffer, opaque });
    }

    match desc.depth {
        Depth::Eight => {
            tracing::debug!(from = %desc.format, "repacking buffer to canonical channel order");
            Ok(NormalizedImage::Argb8 {
                buffer: repack_argb8(buffer, &desc),
                opaque,
            })
        }
        Depth::Ten => {
            tracing::debug!(from = %desc.format, "unpacking wide buffer to floating point");
            Ok(NormalizedImage::Wide(unpack_wide(&buffer, &desc)))
        }
    }
}

fn repack_argb8(buffer: PixelBuffer, desc: &FormatDescriptor) -> PixelBuffer {
    let (target, has_alpha) = if desc.has_alpha {
        (ShmFormat::Argb8888, true)
    } else {
        (ShmFormat::Xrgb8888, false)
    };
    let d = *desc;
    buffer.map_words(target, move |w| {
        let a = if has_alpha { d.a.extract(w) } else { 0xff };
        (a << 24) | (d.r.extract(w) << 16) | (d.g.extract(w) << 8) | d.b.extract(w)
    })
}

fn unpack_wide(buffer: &PixelBuffer, desc: &FormatDescriptor) -> WideImage {
    let (width, height) = (buffer.width(), buffer.height());
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            let w = buffer.word(x, y);
            let a = if desc.has_alpha { desc.a.unorm(w) } else { 1.0 };
            pixels.push([desc.r.unorm(w), desc.g.unorm(w), desc.b.unorm(w), a]);
        }
    }
    WideImage {
        width,
        height,
        pixels,
        opaque: !desc.has_alpha,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pixel/normalize.rs"]
mod tests;
