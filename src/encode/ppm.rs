use std::io::Write;

use crate::foundation::error::{MosaicError, MosaicResult};
use crate::render::canvas::Canvas;

/// Encode `canvas` as binary PPM: `P6\n<w> <h>\n255\n` then packed RGB triples.
///
/// Alpha is dropped without un-premultiplying.
pub fn write_ppm(canvas: &Canvas, sink: &mut dyn Write) -> MosaicResult<()> {
    let words = canvas.argb8();
    let mut out = Vec::with_capacity(16 + words.len() * 3);
    out.extend_from_slice(format!("P6\n{} {}\n255\n", canvas.width(), canvas.height()).as_bytes());
    for &w in words.iter() {
        out.extend_from_slice(&[(w >> 16) as u8, (w >> 8) as u8, w as u8]);
    }
    sink.write_all(&out).map_err(MosaicError::EncodeWrite)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ppm.rs"]
mod tests;
