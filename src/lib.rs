//! Mosaic is the compositing and encoding core of a Wayland screenshot tool.
//!
//! It takes the frames captured from each output of a display layout, paints them onto a
//! single canvas in the compositor's logical coordinate space, and encodes the result as
//! PNG, JPEG or PPM.
//!
//! # Pipeline overview
//!
//! 1. **Describe**: build a [`Layout`] from [`OutputBuilder`]s (or a [`CaptureManifest`])
//! 2. **Select**: resolve a [`Selection`] (whole layout, a region, or one named output)
//! 3. **Populate**: attach one [`CapturedFrame`] per required output
//! 4. **Composite**: normalize each frame's pixel format, map it through its output
//!    transform and paint it with copy or source-over
//! 5. **Encode**: hand the [`Canvas`] to [`write_canvas`]
//!
//! [`Compositor`] drives steps 2 to 5 as an explicit state machine;
//! [`composite_frames`] and [`capture_to_writer`] do it in one call.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Single-threaded and synchronous**: no step blocks on anything but the sink.
//! - **Premultiplied alpha** on the canvas; encoders un-premultiply where needed.
//! - **All-or-nothing**: any error aborts the whole capture, nothing is retried.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod layout;
mod manifest;
mod pixel;
mod render;

/// Canvas encoders.
pub mod encode;
/// Output transforms and the canvas-to-buffer affine mapping.
pub mod transform;

pub use encode::{EncodeOpts, ImageFormat, write_canvas, write_to_path};
pub use foundation::error::{MosaicError, MosaicResult};
pub use foundation::geometry::{Region, union_extents};
pub use foundation::math::{unpremultiply_f32, unpremultiply_u8};
pub use layout::builder::{Layout, LayoutBuilder};
pub use layout::output::{OutputBuilder, OutputDescriptor};
pub use layout::selection::{ResolvedSelection, ScalePolicy, Selection};
pub use manifest::{CaptureManifest, ManifestFrame, ManifestOutput};
pub use pixel::buffer::{BYTES_PER_PIXEL, CapturedFrame, PixelBuffer};
pub use pixel::format::{Channel, Depth, FormatDescriptor, ShmFormat, describe};
pub use pixel::normalize::{NormalizedImage, WideImage, needs_wide_canvas, normalize};
pub use render::canvas::{Canvas, CanvasFormat, CanvasPixels};
pub use render::composite::{Operator, PremulRgba8, over, over_f32};
pub use render::compositor::{Compositor, CompositorState, OutputPaint};
pub use render::pipeline::{capture_to_writer, composite_frames};
pub use transform::output::OutputTransform;
