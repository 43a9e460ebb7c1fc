use std::io::Write;

use crate::encode::EncodeOpts;
use crate::foundation::error::{MosaicError, MosaicResult};
use crate::layout::builder::Layout;
use crate::layout::selection::Selection;
use crate::pixel::buffer::CapturedFrame;
use crate::render::canvas::Canvas;
use crate::render::compositor::Compositor;

/// Select + attach + composite in one call.
///
/// This is the primary "one-shot" API when every frame is already at hand.
///
/// Pipeline:
/// 1. [`Compositor::select`]
/// 2. [`Compositor::attach`] for each `(output index, frame)` pair
/// 3. [`Compositor::composite`]
///
/// Returns a [`Canvas`] holding **premultiplied** pixels.
pub fn composite_frames(
    layout: Layout,
    selection: &Selection,
    frames: impl IntoIterator<Item = (usize, CapturedFrame)>,
) -> MosaicResult<Canvas> {
    let mut compositor = populated(layout, selection, frames)?;
    compositor.composite()?;
    compositor
        .into_canvas()
        .ok_or_else(|| MosaicError::validation("compositor produced no canvas"))
}

/// Like [`composite_frames`], then encode the canvas into `sink`.
pub fn capture_to_writer(
    layout: Layout,
    selection: &Selection,
    frames: impl IntoIterator<Item = (usize, CapturedFrame)>,
    opts: &EncodeOpts,
    sink: &mut dyn Write,
) -> MosaicResult<()> {
    let mut compositor = populated(layout, selection, frames)?;
    compositor.write(opts, sink)
}

fn populated(
    layout: Layout,
    selection: &Selection,
    frames: impl IntoIterator<Item = (usize, CapturedFrame)>,
) -> MosaicResult<Compositor> {
    let mut compositor = Compositor::new(layout);
    compositor.select(selection)?;
    for (index, frame) in frames {
        compositor.attach(index, frame)?;
    }
    Ok(compositor)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
