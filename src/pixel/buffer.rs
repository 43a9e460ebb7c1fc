use crate::foundation::error::{MosaicError, MosaicResult};
use crate::pixel::format::ShmFormat;

/// Bytes per pixel of every supported packed format.
pub const BYTES_PER_PIXEL: usize = 4;

/// Raw captured pixels with their format tag.
///
/// Data and tag only change together: conversions consume the buffer and return a new one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    stride: usize,
    format: ShmFormat,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap captured bytes.
    ///
    /// `stride` is the number of bytes per row and may include padding.
    pub fn new(
        width: u32,
        height: u32,
        stride: usize,
        format: ShmFormat,
        data: Vec<u8>,
    ) -> MosaicResult<Self> {
        if width == 0 || height == 0 {
            return Err(MosaicError::validation(format!(
                "buffer must not be empty, got {width}x{height}"
            )));
        }
        let row = (width as usize)
            .checked_mul(BYTES_PER_PIXEL)
            .ok_or_else(|| MosaicError::validation("buffer row size overflow"))?;
        if stride < row {
            return Err(MosaicError::validation(format!(
                "stride {stride} is smaller than a {width} pixel row ({row} bytes)"
            )));
        }
        let needed = stride
            .checked_mul(height as usize)
            .ok_or_else(|| MosaicError::validation("buffer size overflow"))?;
        if data.len() < needed {
            return Err(MosaicError::validation(format!(
                "buffer holds {} bytes, {width}x{height} with stride {stride} needs {needed}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            stride,
            format,
            data,
        })
    }

    /// Tightly packed buffer built from 32-bit pixel words.
    pub fn from_words(width: u32, height: u32, format: ShmFormat, words: &[u32]) -> MosaicResult<Self> {
        let data = words.iter().flat_map(|w| w.to_le_bytes()).collect();
        Self::new(width, height, width as usize * BYTES_PER_PIXEL, format, data)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Format tag describing `data`.
    pub fn format(&self) -> ShmFormat {
        self.format
    }

    /// Raw bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Pixel word at `(x, y)`; callers guarantee bounds.
    #[inline]
    pub(crate) fn word(&self, x: u32, y: u32) -> u32 {
        let at = y as usize * self.stride + x as usize * BYTES_PER_PIXEL;
        u32::from_le_bytes([
            self.data[at],
            self.data[at + 1],
            self.data[at + 2],
            self.data[at + 3],
        ])
    }

    /// Rewrite every pixel word with `f` and retag the result.
    ///
    /// Storage is reused; the old tag is unobservable once this returns.
    pub(crate) fn map_words(mut self, format: ShmFormat, f: impl Fn(u32) -> u32) -> Self {
        let row = self.width as usize * BYTES_PER_PIXEL;
        for y in 0..self.height as usize {
            let start = y * self.stride;
            for px in self.data[start..start + row].chunks_exact_mut(BYTES_PER_PIXEL) {
                let word = u32::from_le_bytes([px[0], px[1], px[2], px[3]]);
                px.copy_from_slice(&f(word).to_le_bytes());
            }
        }
        self.format = format;
        self
    }
}

/// A buffer delivered by the capture source together with its frame flags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapturedFrame {
    /// Captured pixels.
    pub buffer: PixelBuffer,
    /// Rows are stored bottom-up.
    pub y_invert: bool,
}

impl CapturedFrame {
    /// Frame stored top-down.
    pub fn new(buffer: PixelBuffer) -> Self {
        Self {
            buffer,
            y_invert: false,
        }
    }

    /// Set the y-invert flag.
    pub fn with_y_invert(mut self, y_invert: bool) -> Self {
        self.y_invert = y_invert;
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pixel/buffer.rs"]
mod tests;
