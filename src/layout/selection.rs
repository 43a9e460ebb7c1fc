use crate::foundation::error::{MosaicError, MosaicResult};
use crate::foundation::geometry::Region;
use crate::layout::builder::Layout;

/// How the canvas scale factor is chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ScalePolicy {
    /// Greatest logical scale among contributing outputs, never below 1.
    #[default]
    Greatest,
    /// Explicit positive factor.
    Fixed(f64),
}

/// What part of the layout to capture and at which scale.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    /// Logical crop box; `None` captures the whole layout.
    pub region: Option<Region>,
    /// Capture exactly one output by name. Takes precedence over `region`.
    pub output: Option<String>,
    /// Canvas scale policy.
    pub scale: ScalePolicy,
}

impl Selection {
    /// Capture everything at the greatest output scale.
    pub fn all() -> Self {
        Self::default()
    }

    /// Capture a logical region.
    pub fn region(region: Region) -> Self {
        Self {
            region: Some(region),
            ..Self::default()
        }
    }

    /// Capture a single output.
    pub fn output(name: impl Into<String>) -> Self {
        Self {
            output: Some(name.into()),
            ..Self::default()
        }
    }

    /// Override the scale policy.
    pub fn with_scale(mut self, scale: ScalePolicy) -> Self {
        self.scale = scale;
        self
    }

    /// Resolve against a layout: crop box, canvas box, scale and contributing outputs.
    pub fn resolve(&self, layout: &Layout) -> MosaicResult<ResolvedSelection> {
        let crop = match &self.output {
            Some(name) => {
                let (_, out) = layout
                    .find(name)
                    .ok_or_else(|| MosaicError::unknown_output(name.clone()))?;
                Some(out.logical_geometry())
            }
            None => self.region,
        };

        let required: Vec<usize> = layout
            .outputs()
            .iter()
            .enumerate()
            .filter(|(_, o)| crop.is_none_or(|c| c.intersects(o.logical_geometry())))
            .map(|(i, _)| i)
            .collect();
        if required.is_empty() {
            return Err(MosaicError::EmptySelection);
        }

        let scale = match self.scale {
            ScalePolicy::Fixed(s) => {
                if !s.is_finite() || s <= 0.0 {
                    return Err(MosaicError::validation(format!(
                        "scale must be a positive number, got {s}"
                    )));
                }
                s
            }
            ScalePolicy::Greatest => required
                .iter()
                .map(|&i| layout.outputs()[i].logical_scale())
                .fold(1.0, f64::max),
        };

        Ok(ResolvedSelection {
            crop,
            canvas_box: crop.unwrap_or_else(|| layout.extents()),
            scale,
            required,
        })
    }
}

/// Outcome of [`Selection::resolve`].
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedSelection {
    /// Crop box, if any.
    pub crop: Option<Region>,
    /// Logical box the canvas covers.
    pub canvas_box: Region,
    /// Canvas pixels per logical pixel.
    pub scale: f64,
    /// Indices of contributing outputs, in enumeration order.
    pub required: Vec<usize>,
}

impl ResolvedSelection {
    /// Canvas size in pixels.
    ///
    /// Fractional sizes are truncated. A size that truncates to zero is
    /// [`MosaicError::EmptySelection`].
    pub fn canvas_size(&self) -> MosaicResult<(u32, u32)> {
        let w = (f64::from(self.canvas_box.width) * self.scale) as i64;
        let h = (f64::from(self.canvas_box.height) * self.scale) as i64;
        if w <= 0 || h <= 0 {
            tracing::debug!(crop = %self.canvas_box, scale = self.scale, "canvas rounds to zero pixels");
            return Err(MosaicError::EmptySelection);
        }
        let w = u32::try_from(w)
            .map_err(|_| MosaicError::validation(format!("canvas width {w} is too large")))?;
        let h = u32::try_from(h)
            .map_err(|_| MosaicError::validation(format!("canvas height {h} is too large")))?;
        Ok((w, h))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/selection.rs"]
mod tests;
