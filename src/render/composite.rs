use crate::foundation::math::mul_div255_u8;

/// Premultiplied `[r, g, b, a]` bytes.
pub type PremulRgba8 = [u8; 4];

/// How a source pixel lands on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Overwrite the destination, alpha included.
    Copy,
    /// Porter-Duff source-over with premultiplied alpha.
    Over,
}

impl Operator {
    /// Pick the operator for one output tile.
    ///
    /// Copy is only chosen when the tile edges fall on whole canvas pixels and no other
    /// output shares its area. Overlapping outputs with translucent pixels still show
    /// seams where one tile is copied over another; that tradeoff is kept.
    pub fn choose(grid_aligned: bool, overlapping: bool) -> Self {
        if grid_aligned && !overlapping {
            Self::Copy
        } else {
            Self::Over
        }
    }

    pub(crate) fn apply_rgba8(self, dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
        match self {
            Self::Copy => src,
            Self::Over => over(dst, src),
        }
    }

    pub(crate) fn apply_f32(self, dst: [f32; 4], src: [f32; 4]) -> [f32; 4] {
        match self {
            Self::Copy => src,
            Self::Over => over_f32(dst, src),
        }
    }
}

/// Source-over of premultiplied 8-bit pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    let sa = src[3];
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(sa);
    let mut out = [0u8; 4];
    for i in 0..4 {
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(src[i], dc);
    }
    out
}

/// Source-over of premultiplied floating-point pixels.
pub fn over_f32(dst: [f32; 4], src: [f32; 4]) -> [f32; 4] {
    let sa = src[3].clamp(0.0, 1.0);
    if sa <= 0.0 {
        return dst;
    }
    let inv = 1.0 - sa;
    let mut out = [0.0f32; 4];
    for i in 0..4 {
        out[i] = (src[i] + dst[i] * inv).min(1.0);
    }
    out
}

/// Source-over of one row of ARGB words onto another.
pub(crate) fn over_row_argb8(dst: &mut [u32], src: impl Iterator<Item = u32>) {
    for (d, s) in dst.iter_mut().zip(src) {
        let out = over(word_to_rgba(*d), word_to_rgba(s));
        *d = rgba_to_word(out);
    }
}

#[inline]
pub(crate) fn word_to_rgba(word: u32) -> PremulRgba8 {
    let [a, r, g, b] = word.to_be_bytes();
    [r, g, b, a]
}

#[inline]
pub(crate) fn rgba_to_word(px: PremulRgba8) -> u32 {
    let [r, g, b, a] = px;
    u32::from_be_bytes([a, r, g, b])
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
