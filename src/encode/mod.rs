//! Canvas encoders.
//!
//! Every encoder is a pure function of a finished canvas and a byte sink; none retry.
//! A failed write leaves whatever was already written in the sink.

/// Lossy JPEG output.
pub mod jpeg;
/// Lossless PNG output.
pub mod png;
/// Binary PPM (`P6`) output.
pub mod ppm;

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use crate::foundation::error::{MosaicError, MosaicResult};
use crate::render::canvas::Canvas;

/// Highest accepted PNG compression level.
pub const MAX_PNG_LEVEL: u8 = 9;
/// Highest accepted JPEG quality.
pub const MAX_JPEG_QUALITY: u8 = 100;

/// Output file format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// Lossless, keeps alpha when the canvas is not fully opaque.
    #[default]
    Png,
    /// Lossy, alpha is flattened against black.
    Jpeg,
    /// Uncompressed RGB.
    Ppm,
}

impl ImageFormat {
    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Ppm => "ppm",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = MosaicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "ppm" => Ok(Self::Ppm),
            _ => Err(MosaicError::validation(format!(
                "unknown output format '{s}' (expected png, jpeg or ppm)"
            ))),
        }
    }
}

/// Encoder options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeOpts {
    /// Output format.
    pub format: ImageFormat,
    /// PNG compression effort, `0..=9`. Level 0 also disables row filtering.
    pub png_level: u8,
    /// JPEG quality, `0..=100`.
    pub jpeg_quality: u8,
}

impl Default for EncodeOpts {
    fn default() -> Self {
        Self {
            format: ImageFormat::Png,
            png_level: 6,
            jpeg_quality: 80,
        }
    }
}

impl EncodeOpts {
    /// Defaults for `format`.
    pub fn for_format(format: ImageFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Reject out-of-range levels.
    pub fn validate(&self) -> MosaicResult<()> {
        if self.png_level > MAX_PNG_LEVEL {
            return Err(MosaicError::validation(format!(
                "png level must be between 0 and {MAX_PNG_LEVEL}, got {}",
                self.png_level
            )));
        }
        if self.jpeg_quality > MAX_JPEG_QUALITY {
            return Err(MosaicError::validation(format!(
                "jpeg quality must be between 0 and {MAX_JPEG_QUALITY}, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }
}

/// Encode `canvas` into `sink` as `opts.format`.
pub fn write_canvas(canvas: &Canvas, opts: &EncodeOpts, sink: &mut dyn Write) -> MosaicResult<()> {
    opts.validate()?;
    tracing::info!(
        format = %opts.format,
        width = canvas.width(),
        height = canvas.height(),
        "encoding canvas"
    );
    match opts.format {
        ImageFormat::Png => png::write_png(canvas, opts.png_level, sink)?,
        ImageFormat::Jpeg => jpeg::write_jpeg(canvas, opts.jpeg_quality, sink)?,
        ImageFormat::Ppm => ppm::write_ppm(canvas, sink)?,
    }
    sink.flush().map_err(MosaicError::EncodeWrite)
}

/// Encode `canvas` into a new file at `path`.
///
/// A partially written file is left in place on failure.
pub fn write_to_path(canvas: &Canvas, opts: &EncodeOpts, path: &Path) -> MosaicResult<()> {
    let file = File::create(path).map_err(MosaicError::EncodeWrite)?;
    let mut sink = BufWriter::new(file);
    write_canvas(canvas, opts, &mut sink)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/opts.rs"]
mod tests;
