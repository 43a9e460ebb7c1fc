//! JSON description of a captured display layout.
//!
//! A manifest lists every output with its physical and (optionally) logical geometry,
//! plus the raw frame each output delivered. Frame paths are relative to the manifest.
//!
//! ```json
//! {
//!   "outputs": [
//!     {
//!       "name": "eDP-1", "x": 0, "y": 0, "width": 2880, "height": 1800,
//!       "transform": "normal", "scale": 2,
//!       "logical": { "x": 0, "y": 0, "width": 1440, "height": 900 },
//!       "frame": { "path": "edp1.raw", "format": "xrgb8888" }
//!     }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{MosaicError, MosaicResult};
use crate::foundation::geometry::Region;
use crate::layout::builder::{Layout, LayoutBuilder};
use crate::layout::output::OutputBuilder;
use crate::pixel::buffer::{BYTES_PER_PIXEL, CapturedFrame, PixelBuffer};
use crate::pixel::format::ShmFormat;
use crate::render::compositor::Compositor;
use crate::transform::output::OutputTransform;

/// Top-level manifest document.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaptureManifest {
    /// Outputs in enumeration order.
    pub outputs: Vec<ManifestOutput>,
    #[serde(skip)]
    base_dir: PathBuf,
}

/// One output entry.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestOutput {
    /// Connector name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Physical x position.
    #[serde(default)]
    pub x: i32,
    /// Physical y position.
    #[serde(default)]
    pub y: i32,
    /// Mode width in physical pixels.
    pub width: i32,
    /// Mode height in physical pixels.
    pub height: i32,
    /// Output transform.
    #[serde(default)]
    pub transform: OutputTransform,
    /// Integer output scale.
    #[serde(default = "default_scale")]
    pub scale: i32,
    /// Logical geometry, when the compositor reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical: Option<Region>,
    /// Captured frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<ManifestFrame>,
}

/// Raw frame file of an output.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestFrame {
    /// File with the raw pixel rows, relative to the manifest.
    pub path: PathBuf,
    /// Buffer format tag, e.g. `xrgb8888`, `AB24` or `0x1`.
    pub format: String,
    /// Buffer width; defaults to the output mode width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Buffer height; defaults to the output mode height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Bytes per row; defaults to tightly packed rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stride: Option<usize>,
    /// Rows are stored bottom-up.
    #[serde(default)]
    pub y_invert: bool,
}

fn default_scale() -> i32 {
    1
}

impl CaptureManifest {
    /// Manifest over `outputs`, frame paths relative to the working directory.
    pub fn new(outputs: Vec<ManifestOutput>) -> Self {
        Self {
            outputs,
            base_dir: PathBuf::new(),
        }
    }

    /// Parse a manifest whose frame paths resolve against `base_dir`.
    pub fn from_json_str(json: &str, base_dir: impl Into<PathBuf>) -> MosaicResult<Self> {
        let mut manifest: Self = serde_json::from_str(json)
            .map_err(|e| MosaicError::validation(format!("invalid capture manifest: {e}")))?;
        manifest.base_dir = base_dir.into();
        Ok(manifest)
    }

    /// Read and parse the manifest at `path`.
    pub fn load(path: &Path) -> MosaicResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read capture manifest {}", path.display()))?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Self::from_json_str(&json, base_dir)
    }

    /// Directory frame paths resolve against.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Build the output layout described by the manifest.
    pub fn layout(&self) -> MosaicResult<Layout> {
        let mut builder = LayoutBuilder::new();
        for out in &self.outputs {
            let mut b = OutputBuilder::new()
                .position(out.x, out.y)
                .mode(out.width, out.height)
                .transform(out.transform)
                .scale(out.scale);
            if let Some(name) = &out.name {
                b = b.name(name.clone());
            }
            if let Some(logical) = out.logical {
                b = b
                    .logical_position(logical.x, logical.y)
                    .logical_size(logical.width, logical.height);
            }
            builder.push_builder(b)?;
        }
        builder.finish()
    }

    /// Load the frame of output `index`, if it has one.
    pub fn load_frame(&self, index: usize) -> MosaicResult<Option<CapturedFrame>> {
        let out = self
            .outputs
            .get(index)
            .ok_or_else(|| MosaicError::validation(format!("no output at index {index}")))?;
        let Some(frame) = &out.frame else {
            return Ok(None);
        };

        let format: ShmFormat = frame.format.parse()?;
        let width = match frame.width {
            Some(w) => w,
            None => u32::try_from(out.width)
                .map_err(|_| MosaicError::validation("output width must be positive"))?,
        };
        let height = match frame.height {
            Some(h) => h,
            None => u32::try_from(out.height)
                .map_err(|_| MosaicError::validation("output height must be positive"))?,
        };
        let stride = frame
            .stride
            .unwrap_or(width as usize * BYTES_PER_PIXEL);

        let path = self.base_dir.join(&frame.path);
        let data = std::fs::read(&path)
            .with_context(|| format!("read frame {}", path.display()))?;
        tracing::debug!(path = %path.display(), %format, width, height, stride, "loaded frame");

        let buffer = PixelBuffer::new(width, height, stride, format, data)?;
        Ok(Some(CapturedFrame::new(buffer).with_y_invert(frame.y_invert)))
    }

    /// Load and attach the frame of every output the compositor's selection requires.
    pub fn attach_frames(&self, compositor: &mut Compositor) -> MosaicResult<()> {
        for index in compositor.pending() {
            let frame = self.load_frame(index)?.ok_or_else(|| {
                let label = self
                    .outputs
                    .get(index)
                    .and_then(|o| o.name.clone())
                    .unwrap_or_else(|| format!("#{index}"));
                MosaicError::validation(format!("output {label} has no captured frame"))
            })?;
            compositor.attach(index, frame)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/manifest/manifest.rs"]
mod tests;
