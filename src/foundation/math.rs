pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Reverse alpha premultiplication of one 8-bit channel.
///
/// Fixed-point reciprocal with saturation: results that would exceed 255 clamp to 255.
/// `a == 0` returns `c` unchanged and `a == 255` is exact.
pub fn unpremultiply_u8(c: u8, a: u8) -> u8 {
    if a == 0 || a == 255 {
        return c;
    }
    let inv = (0xffu32 << 16) / u32::from(a);
    let scaled = u32::from(c) * inv;
    if scaled > (0xff << 16) {
        0xff
    } else {
        (scaled >> 16) as u8
    }
}

/// Un-premultiply a straight `[r, g, b, a]` float quad, `a == 0` passes RGB through.
pub fn unpremultiply_f32(px: [f32; 4]) -> [f32; 4] {
    let a = px[3];
    if a <= 0.0 {
        return px;
    }
    [
        (px[0] / a).min(1.0),
        (px[1] / a).min(1.0),
        (px[2] / a).min(1.0),
        a,
    ]
}

#[inline]
pub(crate) fn unorm8_to_f32(v: u8) -> f32 {
    f32::from(v) / 255.0
}

#[inline]
pub(crate) fn f32_to_unorm8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[inline]
pub(crate) fn f32_to_unorm16(v: f32) -> u16 {
    (v.clamp(0.0, 1.0) * 65535.0).round() as u16
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
