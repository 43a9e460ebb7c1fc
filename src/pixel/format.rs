//! Native buffer format tags and their channel layouts.

use std::fmt;
use std::str::FromStr;

use crate::foundation::error::{MosaicError, MosaicResult};

const fn fourcc(code: &[u8; 4]) -> u32 {
    (code[0] as u32) | ((code[1] as u32) << 8) | ((code[2] as u32) << 16) | ((code[3] as u32) << 24)
}

/// Buffer format tag as advertised by the capture source (`wl_shm.format` values).
///
/// Every known format stores one pixel as a little-endian 32-bit word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShmFormat {
    /// `[31:0] A:R:G:B 8:8:8:8`, code 0.
    Argb8888,
    /// `[31:0] x:R:G:B 8:8:8:8`, code 1.
    Xrgb8888,
    /// `[31:0] A:B:G:R 8:8:8:8`.
    Abgr8888,
    /// `[31:0] x:B:G:R 8:8:8:8`.
    Xbgr8888,
    /// `[31:0] R:G:B:A 8:8:8:8`.
    Rgba8888,
    /// `[31:0] R:G:B:x 8:8:8:8`.
    Rgbx8888,
    /// `[31:0] B:G:R:A 8:8:8:8`.
    Bgra8888,
    /// `[31:0] B:G:R:x 8:8:8:8`.
    Bgrx8888,
    /// `[31:0] A:R:G:B 2:10:10:10`.
    Argb2101010,
    /// `[31:0] x:R:G:B 2:10:10:10`.
    Xrgb2101010,
    /// `[31:0] A:B:G:R 2:10:10:10`.
    Abgr2101010,
    /// `[31:0] x:B:G:R 2:10:10:10`.
    Xbgr2101010,
    /// `[31:0] R:G:B:A 10:10:10:2`.
    Rgba1010102,
    /// `[31:0] R:G:B:x 10:10:10:2`.
    Rgbx1010102,
    /// `[31:0] B:G:R:A 10:10:10:2`.
    Bgra1010102,
    /// `[31:0] B:G:R:x 10:10:10:2`.
    Bgrx1010102,
    /// Any other code.
    Other(u32),
}

const KNOWN: [(ShmFormat, u32, &str); 16] = [
    (ShmFormat::Argb8888, 0, "argb8888"),
    (ShmFormat::Xrgb8888, 1, "xrgb8888"),
    (ShmFormat::Abgr8888, fourcc(b"AB24"), "abgr8888"),
    (ShmFormat::Xbgr8888, fourcc(b"XB24"), "xbgr8888"),
    (ShmFormat::Rgba8888, fourcc(b"RA24"), "rgba8888"),
    (ShmFormat::Rgbx8888, fourcc(b"RX24"), "rgbx8888"),
    (ShmFormat::Bgra8888, fourcc(b"BA24"), "bgra8888"),
    (ShmFormat::Bgrx8888, fourcc(b"BX24"), "bgrx8888"),
    (ShmFormat::Argb2101010, fourcc(b"AR30"), "argb2101010"),
    (ShmFormat::Xrgb2101010, fourcc(b"XR30"), "xrgb2101010"),
    (ShmFormat::Abgr2101010, fourcc(b"AB30"), "abgr2101010"),
    (ShmFormat::Xbgr2101010, fourcc(b"XB30"), "xbgr2101010"),
    (ShmFormat::Rgba1010102, fourcc(b"RA30"), "rgba1010102"),
    (ShmFormat::Rgbx1010102, fourcc(b"RX30"), "rgbx1010102"),
    (ShmFormat::Bgra1010102, fourcc(b"BA30"), "bgra1010102"),
    (ShmFormat::Bgrx1010102, fourcc(b"BX30"), "bgrx1010102"),
];

impl ShmFormat {
    /// Decode a protocol code.
    pub fn from_raw(code: u32) -> Self {
        KNOWN
            .iter()
            .find(|(_, c, _)| *c == code)
            .map(|(f, _, _)| *f)
            .unwrap_or(Self::Other(code))
    }

    /// Protocol code.
    pub fn raw(self) -> u32 {
        match self {
            Self::Other(code) => code,
            known => KNOWN
                .iter()
                .find(|(f, _, _)| *f == known)
                .map(|(_, c, _)| *c)
                .unwrap_or_default(),
        }
    }

    fn name(self) -> Option<&'static str> {
        KNOWN.iter().find(|(f, _, _)| *f == self).map(|(_, _, n)| *n)
    }
}

impl fmt::Display for ShmFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.name() {
            return write!(f, "{} ({:#x})", name.to_ascii_uppercase(), self.raw());
        }
        let code = self.raw();
        let bytes = code.to_le_bytes();
        if bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            let tag: String = bytes.iter().map(|&b| char::from(b)).collect();
            write!(f, "{tag} ({code:#x})")
        } else {
            write!(f, "{code:#x}")
        }
    }
}

impl FromStr for ShmFormat {
    type Err = MosaicError;

    /// Accepts lowercase names (`xrgb8888`), fourcc tags (`AB24`), decimal and `0x` hex codes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        if let Some((f, _, _)) = KNOWN.iter().find(|(_, _, n)| *n == lower) {
            return Ok(*f);
        }
        if let Some(hex) = lower.strip_prefix("0x") {
            return u32::from_str_radix(hex, 16)
                .map(Self::from_raw)
                .map_err(|_| MosaicError::validation(format!("invalid format code '{s}'")));
        }
        if let Ok(code) = s.parse::<u32>() {
            return Ok(Self::from_raw(code));
        }
        if let Ok(tag) = <[u8; 4]>::try_from(s.as_bytes()) {
            return Ok(Self::from_raw(fourcc(&tag)));
        }
        Err(MosaicError::validation(format!("unknown pixel format '{s}'")))
    }
}

/// Bits per channel of a packed format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Depth {
    /// 8 bits per colour channel.
    Eight,
    /// 10 bits per colour channel, 2-bit alpha.
    Ten,
}

/// Bit field inside a little-endian 32-bit pixel word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Channel {
    /// Offset of the least significant bit.
    pub shift: u8,
    /// Field width in bits.
    pub bits: u8,
}

impl Channel {
    const fn new(shift: u8, bits: u8) -> Self {
        Self { shift, bits }
    }

    /// Extract the raw field value.
    #[inline]
    pub fn extract(self, word: u32) -> u32 {
        (word >> self.shift) & self.max()
    }

    /// Largest value the field can hold.
    #[inline]
    pub fn max(self) -> u32 {
        (1u32 << self.bits) - 1
    }

    /// Extract and normalize to `[0, 1]`.
    #[inline]
    pub fn unorm(self, word: u32) -> f32 {
        self.extract(word) as f32 / self.max() as f32
    }
}

/// Channel layout of a pixel format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatDescriptor {
    /// The described format.
    pub format: ShmFormat,
    /// Channel depth.
    pub depth: Depth,
    /// Whether the alpha field carries data (otherwise it is padding and reads as opaque).
    pub has_alpha: bool,
    /// Red field.
    pub r: Channel,
    /// Green field.
    pub g: Channel,
    /// Blue field.
    pub b: Channel,
    /// Alpha or padding field.
    pub a: Channel,
}

impl FormatDescriptor {
    /// Whether the buffer is already in the canonical `A:R:G:B 8:8:8:8` word layout.
    pub fn is_canonical(&self) -> bool {
        self.depth == Depth::Eight && self.r.shift == 16 && self.g.shift == 8 && self.b.shift == 0
    }

    /// Whether the format needs the wide floating-point path.
    pub fn is_wide(&self) -> bool {
        self.depth == Depth::Ten
    }
}

/// Look up the channel layout of `format`.
pub fn describe(format: ShmFormat) -> MosaicResult<FormatDescriptor> {
    use ShmFormat::*;

    // (depth, alpha, r, g, b, a) shifts; widths follow from the depth
    let (depth, has_alpha, [r, g, b, a]) = match format {
        Argb8888 => (Depth::Eight, true, [16, 8, 0, 24]),
        Xrgb8888 => (Depth::Eight, false, [16, 8, 0, 24]),
        Abgr8888 => (Depth::Eight, true, [0, 8, 16, 24]),
        Xbgr8888 => (Depth::Eight, false, [0, 8, 16, 24]),
        Rgba8888 => (Depth::Eight, true, [24, 16, 8, 0]),
        Rgbx8888 => (Depth::Eight, false, [24, 16, 8, 0]),
        Bgra8888 => (Depth::Eight, true, [8, 16, 24, 0]),
        Bgrx8888 => (Depth::Eight, false, [8, 16, 24, 0]),
        Argb2101010 => (Depth::Ten, true, [20, 10, 0, 30]),
        Xrgb2101010 => (Depth::Ten, false, [20, 10, 0, 30]),
        Abgr2101010 => (Depth::Ten, true, [0, 10, 20, 30]),
        Xbgr2101010 => (Depth::Ten, false, [0, 10, 20, 30]),
        Rgba1010102 => (Depth::Ten, true, [22, 12, 2, 0]),
        Rgbx1010102 => (Depth::Ten, false, [22, 12, 2, 0]),
        Bgra1010102 => (Depth::Ten, true, [2, 12, 22, 0]),
        Bgrx1010102 => (Depth::Ten, false, [2, 12, 22, 0]),
        Other(_) => return Err(MosaicError::UnsupportedFormat(format)),
    };
    let (color_bits, alpha_bits) = match depth {
        Depth::Eight => (8, 8),
        Depth::Ten => (10, 2),
    };

    Ok(FormatDescriptor {
        format,
        depth,
        has_alpha,
        r: Channel::new(r, color_bits),
        g: Channel::new(g, color_bits),
        b: Channel::new(b, color_bits),
        a: Channel::new(a, alpha_bits),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/pixel/format.rs"]
mod tests;
