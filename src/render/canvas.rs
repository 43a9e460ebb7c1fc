use std::borrow::Cow;

use crate::foundation::error::{MosaicError, MosaicResult};
use crate::foundation::math::f32_to_unorm8;

/// Storage format of a [`Canvas`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CanvasFormat {
    /// Premultiplied `A:R:G:B 8:8:8:8` words.
    Argb8,
    /// Premultiplied floating-point `[r, g, b, a]`, used when any source is wider than 8 bits.
    RgbaF32,
}

/// Pixel storage, row-major without padding.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasPixels {
    /// See [`CanvasFormat::Argb8`].
    Argb8(Vec<u32>),
    /// See [`CanvasFormat::RgbaF32`].
    RgbaF32(Vec<[f32; 4]>),
}

/// The composited screenshot.
///
/// Starts fully transparent. Premultiplied alpha throughout; encoders un-premultiply
/// where their format needs straight alpha.
#[derive(Clone, Debug, PartialEq)]
pub struct Canvas {
    width: u32,
    height: u32,
    pixels: CanvasPixels,
}

impl Canvas {
    /// Allocate a transparent canvas.
    pub fn new(width: u32, height: u32, format: CanvasFormat) -> MosaicResult<Self> {
        let len = pixel_count(width, height)?;
        let pixels = match format {
            CanvasFormat::Argb8 => CanvasPixels::Argb8(vec![0; len]),
            CanvasFormat::RgbaF32 => CanvasPixels::RgbaF32(vec![[0.0; 4]; len]),
        };
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Wrap existing premultiplied ARGB words.
    pub fn from_argb8(width: u32, height: u32, words: Vec<u32>) -> MosaicResult<Self> {
        let len = pixel_count(width, height)?;
        if words.len() != len {
            return Err(MosaicError::validation(format!(
                "expected {len} pixels for {width}x{height}, got {}",
                words.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels: CanvasPixels::Argb8(words),
        })
    }

    /// Wrap existing premultiplied floating-point pixels.
    pub fn from_rgba_f32(width: u32, height: u32, pixels: Vec<[f32; 4]>) -> MosaicResult<Self> {
        let len = pixel_count(width, height)?;
        if pixels.len() != len {
            return Err(MosaicError::validation(format!(
                "expected {len} pixels for {width}x{height}, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels: CanvasPixels::RgbaF32(pixels),
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Storage format.
    pub fn format(&self) -> CanvasFormat {
        match self.pixels {
            CanvasPixels::Argb8(_) => CanvasFormat::Argb8,
            CanvasPixels::RgbaF32(_) => CanvasFormat::RgbaF32,
        }
    }

    /// Borrow the pixel storage.
    pub fn pixels(&self) -> &CanvasPixels {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut CanvasPixels {
        &mut self.pixels
    }

    /// Pixels as premultiplied ARGB words, quantizing wide canvases.
    pub fn argb8(&self) -> Cow<'_, [u32]> {
        match &self.pixels {
            CanvasPixels::Argb8(words) => Cow::Borrowed(words),
            CanvasPixels::RgbaF32(px) => Cow::Owned(px.iter().map(|&p| pack_argb8(p)).collect()),
        }
    }
}

/// Pack a premultiplied float quad into an ARGB word.
#[inline]
pub(crate) fn pack_argb8(px: [f32; 4]) -> u32 {
    let [r, g, b, a] = px.map(f32_to_unorm8);
    u32::from_be_bytes([a, r, g, b])
}

fn pixel_count(width: u32, height: u32) -> MosaicResult<usize> {
    if width == 0 || height == 0 {
        return Err(MosaicError::validation(format!(
            "canvas must not be empty, got {width}x{height}"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| MosaicError::validation("canvas size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/render/canvas.rs"]
mod tests;
