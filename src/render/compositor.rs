//! Compositing of captured outputs onto one canvas.

use std::io::Write;

use crate::encode::{EncodeOpts, write_canvas};
use crate::foundation::error::{MosaicError, MosaicResult};
use crate::foundation::geometry::Region;
use crate::foundation::math::f32_to_unorm8;
use crate::layout::builder::Layout;
use crate::layout::output::OutputDescriptor;
use crate::layout::selection::{ResolvedSelection, Selection};
use crate::pixel::buffer::CapturedFrame;
use crate::pixel::format::describe;
use crate::pixel::normalize::{NormalizedImage, normalize};
use crate::render::canvas::{Canvas, CanvasFormat, CanvasPixels};
use crate::render::composite::{Operator, over_row_argb8, rgba_to_word, word_to_rgba};
use crate::render::sample::{Resampler, SourceImage};
use crate::transform::affine::{
    bounding_region, build_output_transform, integer_translation, is_grid_aligned, map_corners,
};

/// Lifecycle of a [`Compositor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompositorState {
    /// No selection yet.
    Empty,
    /// Canvas box and scale are known.
    Sized,
    /// At least one required frame is attached.
    Populated,
    /// The canvas is painted.
    Composited,
    /// The canvas was handed to an encoder.
    Finalized,
}

/// How one output was painted.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputPaint {
    /// Index of the output in the layout.
    pub index: usize,
    /// Canvas pixels the output covers, clipped to the canvas.
    pub destination: Region,
    /// Every mapped buffer corner landed on a whole canvas pixel.
    pub grid_aligned: bool,
    /// The output's logical box intersects another output's.
    pub overlapping: bool,
    /// Operator used to paint it.
    pub operator: Operator,
}

/// Paints captured frames of a [`Layout`] onto a single canvas.
///
/// Drive it through its states in order: [`select`](Self::select), then
/// [`attach`](Self::attach) a frame for every required output, then
/// [`composite`](Self::composite) and finally [`write`](Self::write).
#[derive(Debug)]
pub struct Compositor {
    layout: Layout,
    state: CompositorState,
    selection: Option<ResolvedSelection>,
    frames: Vec<Option<CapturedFrame>>,
    canvas: Option<Canvas>,
    paints: Vec<OutputPaint>,
}

impl Compositor {
    /// Start an empty compositor over `layout`.
    pub fn new(layout: Layout) -> Self {
        let frames = vec![None; layout.outputs().len()];
        Self {
            layout,
            state: CompositorState::Empty,
            selection: None,
            frames,
            canvas: None,
            paints: Vec::new(),
        }
    }

    /// The layout being composited.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CompositorState {
        self.state
    }

    /// Resolved selection, once [`select`](Self::select) succeeded.
    pub fn selection(&self) -> Option<&ResolvedSelection> {
        self.selection.as_ref()
    }

    /// Resolve `selection` and size the canvas.
    pub fn select(&mut self, selection: &Selection) -> MosaicResult<&ResolvedSelection> {
        self.expect_state(&[CompositorState::Empty], "select")?;
        let resolved = selection.resolve(&self.layout)?;
        resolved.canvas_size()?;
        tracing::debug!(
            canvas_box = %resolved.canvas_box,
            scale = resolved.scale,
            required = resolved.required.len(),
            "selection resolved"
        );
        self.state = CompositorState::Sized;
        Ok(&*self.selection.insert(resolved))
    }

    /// Whether output `index` contributes to the canvas.
    pub fn is_required(&self, index: usize) -> bool {
        self.selection
            .as_ref()
            .is_some_and(|s| s.required.contains(&index))
    }

    /// Attach the captured frame of output `index`.
    ///
    /// Frames of outputs outside the selection are dropped. A frame is attached at most
    /// once and must match the output's physical size.
    pub fn attach(&mut self, index: usize, frame: CapturedFrame) -> MosaicResult<()> {
        self.expect_state(
            &[CompositorState::Sized, CompositorState::Populated],
            "attach",
        )?;
        let output = self.layout.outputs().get(index).ok_or_else(|| {
            MosaicError::validation(format!("no output at index {index}"))
        })?;
        if !self.is_required(index) {
            tracing::debug!(output = %output.label(), "output outside selection, frame dropped");
            return Ok(());
        }

        let geom = output.geometry();
        let (w, h) = (frame.buffer.width(), frame.buffer.height());
        if i64::from(w) != i64::from(geom.width) || i64::from(h) != i64::from(geom.height) {
            return Err(MosaicError::validation(format!(
                "frame for {} is {w}x{h}, output mode is {}x{}",
                output.label(),
                geom.width,
                geom.height
            )));
        }

        let slot = &mut self.frames[index];
        if slot.is_some() {
            return Err(MosaicError::validation(format!(
                "frame for {} already attached",
                output.label()
            )));
        }
        *slot = Some(frame);
        self.state = CompositorState::Populated;
        Ok(())
    }

    /// Attach a frame by output name.
    pub fn attach_named(&mut self, name: &str, frame: CapturedFrame) -> MosaicResult<()> {
        let (index, _) = self
            .layout
            .find(name)
            .ok_or_else(|| MosaicError::unknown_output(name))?;
        self.attach(index, frame)
    }

    /// Required outputs still waiting for a frame.
    pub fn pending(&self) -> Vec<usize> {
        let Some(selection) = &self.selection else {
            return Vec::new();
        };
        selection
            .required
            .iter()
            .copied()
            .filter(|&i| self.frames[i].is_none())
            .collect()
    }

    /// Paint every required output onto a fresh canvas.
    ///
    /// Fails without painting anything if a frame is missing or any frame's format is
    /// unsupported.
    #[tracing::instrument(skip(self))]
    pub fn composite(&mut self) -> MosaicResult<&Canvas> {
        self.expect_state(&[CompositorState::Populated], "composite")?;
        let pending = self.pending();
        if !pending.is_empty() {
            let names: Vec<String> = pending
                .iter()
                .map(|&i| self.layout.outputs()[i].label())
                .collect();
            return Err(MosaicError::validation(format!(
                "missing frames for {}",
                names.join(", ")
            )));
        }
        let Some(selection) = self.selection.clone() else {
            return Err(MosaicError::validation("composite called without a selection"));
        };

        let mut wide = false;
        for &i in &selection.required {
            if let Some(frame) = &self.frames[i] {
                wide |= describe(frame.buffer.format())?.is_wide();
            }
        }

        let (width, height) = selection.canvas_size()?;
        let format = if wide {
            CanvasFormat::RgbaF32
        } else {
            CanvasFormat::Argb8
        };
        tracing::info!(width, height, ?format, "allocating canvas");
        let mut canvas = Canvas::new(width, height, format)?;

        let origin = (selection.canvas_box.x, selection.canvas_box.y);
        let mut paints = Vec::with_capacity(selection.required.len());
        for &index in &selection.required {
            let Some(frame) = self.frames[index].take() else {
                continue;
            };
            let output = &self.layout.outputs()[index];
            let overlapping = self.layout.overlaps_other(index);
            let target = Target {
                index,
                output,
                overlapping,
            };
            if let Some(paint) = paint_output(&mut canvas, target, frame, origin, selection.scale)? {
                paints.push(paint);
            }
        }

        self.paints = paints;
        self.state = CompositorState::Composited;
        Ok(&*self.canvas.insert(canvas))
    }

    /// The painted canvas, once composited.
    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    /// Per-output painting decisions of the last composite.
    pub fn paints(&self) -> &[OutputPaint] {
        &self.paints
    }

    /// Composite if needed, then encode the canvas into `sink`.
    pub fn write(&mut self, opts: &EncodeOpts, sink: &mut dyn Write) -> MosaicResult<()> {
        if self.state == CompositorState::Populated {
            self.composite()?;
        }
        self.expect_state(&[CompositorState::Composited], "write")?;
        let Some(canvas) = &self.canvas else {
            return Err(MosaicError::validation("no canvas to write"));
        };
        write_canvas(canvas, opts, sink)?;
        self.state = CompositorState::Finalized;
        Ok(())
    }

    /// Give up the canvas.
    pub fn into_canvas(self) -> Option<Canvas> {
        self.canvas
    }

    fn expect_state(&self, allowed: &[CompositorState], op: &str) -> MosaicResult<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(MosaicError::validation(format!(
                "cannot {op} in state {:?}",
                self.state
            )))
        }
    }
}

struct Target<'a> {
    index: usize,
    output: &'a OutputDescriptor,
    overlapping: bool,
}

fn paint_output(
    canvas: &mut Canvas,
    target: Target<'_>,
    frame: CapturedFrame,
    origin: (i32, i32),
    scale: f64,
) -> MosaicResult<Option<OutputPaint>> {
    let Target {
        index,
        output,
        overlapping,
    } = target;
    let y_invert = frame.y_invert;
    let image = normalize(frame.buffer)?;

    let buffer_from_canvas = build_output_transform(output, y_invert, origin, scale);
    let canvas_from_buffer = buffer_from_canvas.inverse();
    let corners = map_corners(canvas_from_buffer, image.width(), image.height());
    let grid_aligned = is_grid_aligned(&corners);
    let operator = Operator::choose(grid_aligned, overlapping);

    let Some(destination) = clip(bounding_region(&corners), canvas) else {
        tracing::debug!(output = %output.label(), "output maps outside the canvas");
        return Ok(None);
    };
    tracing::debug!(
        output = %output.label(),
        %destination,
        grid_aligned,
        overlapping,
        ?operator,
        "painting output"
    );

    let stride = canvas.width() as usize;
    let translation = integer_translation(buffer_from_canvas);
    match (canvas.pixels_mut(), &image, translation) {
        (CanvasPixels::Argb8(dst), NormalizedImage::Argb8 { buffer, opaque }, Some((tx, ty))) => {
            for y in destination.y..destination.bottom() {
                let row = &mut dst[y as usize * stride..][destination.x as usize
                    ..destination.right() as usize];
                let sy = (i64::from(y) + ty) as u32;
                let sx0 = i64::from(destination.x) + tx;
                let src = (0..row.len() as i64).map(|dx| {
                    let word = buffer.word((sx0 + dx) as u32, sy);
                    if *opaque { word | 0xff00_0000 } else { word }
                });
                match operator {
                    Operator::Copy => row.iter_mut().zip(src).for_each(|(d, s)| *d = s),
                    Operator::Over => over_row_argb8(row, src),
                }
            }
        }
        (pixels, _, _) => {
            let resampler = Resampler::new(SourceImage::new(&image), buffer_from_canvas);
            tracing::debug!(subsamples = resampler.subsamples(), "resampling output");
            for y in destination.y..destination.bottom() {
                for x in destination.x..destination.right() {
                    let src = resampler.sample(x, y);
                    let at = y as usize * stride + x as usize;
                    match &mut *pixels {
                        CanvasPixels::Argb8(dst) => {
                            let out = operator.apply_rgba8(
                                word_to_rgba(dst[at]),
                                src.map(f32_to_unorm8),
                            );
                            dst[at] = rgba_to_word(out);
                        }
                        CanvasPixels::RgbaF32(dst) => {
                            dst[at] = operator.apply_f32(dst[at], src);
                        }
                    }
                }
            }
        }
    }

    Ok(Some(OutputPaint {
        index,
        destination,
        grid_aligned,
        overlapping,
        operator,
    }))
}

/// Intersection of `region` with the canvas rectangle, `None` when empty.
fn clip(region: Region, canvas: &Canvas) -> Option<Region> {
    let x0 = region.x.max(0);
    let y0 = region.y.max(0);
    let x1 = i64::from(region.x) + i64::from(region.width);
    let y1 = i64::from(region.y) + i64::from(region.height);
    let x1 = x1.min(i64::from(canvas.width())) as i32;
    let y1 = y1.min(i64::from(canvas.height())) as i32;
    (x1 > x0 && y1 > y0).then(|| Region::new(x0, y0, x1 - x0, y1 - y0))
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
