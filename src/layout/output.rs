use crate::foundation::error::{MosaicError, MosaicResult};
use crate::foundation::geometry::Region;
use crate::transform::output::OutputTransform;

/// One capturable display as reported by the display server.
///
/// Immutable once built; use [`OutputBuilder`] to assemble it from the
/// incrementally delivered protocol events.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputDescriptor {
    name: Option<String>,
    geometry: Region,
    transform: OutputTransform,
    scale: i32,
    logical_geometry: Region,
    logical_scale: f64,
    logical_guessed: bool,
}

impl OutputDescriptor {
    /// Human-readable connector name (`DP-1`, `eDP-1`, ...), if advertised.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Physical position and buffer size (pre-transform) in pixels.
    pub fn geometry(&self) -> Region {
        self.geometry
    }

    /// Rotation/flip the server applies before presentation.
    pub fn transform(&self) -> OutputTransform {
        self.transform
    }

    /// Integer output scale.
    pub fn scale(&self) -> i32 {
        self.scale
    }

    /// Position and size in compositor space.
    pub fn logical_geometry(&self) -> Region {
        self.logical_geometry
    }

    /// Physical pixels per logical pixel, accounting for the transform.
    pub fn logical_scale(&self) -> f64 {
        self.logical_scale
    }

    /// Whether the logical geometry was derived locally instead of reported.
    pub fn logical_guessed(&self) -> bool {
        self.logical_guessed
    }

    /// Physical size after applying the output transform.
    pub fn transformed_size(&self) -> (i32, i32) {
        self.transform
            .apply_to_dimensions(self.geometry.width, self.geometry.height)
    }

    pub(crate) fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("output@{},{}", self.geometry.x, self.geometry.y),
        }
    }
}

/// Incremental builder for [`OutputDescriptor`].
///
/// Physical geometry arrives first, logical geometry (optional) after it.
#[derive(Clone, Debug)]
pub struct OutputBuilder {
    name: Option<String>,
    position: (i32, i32),
    mode: Option<(i32, i32)>,
    transform: OutputTransform,
    scale: i32,
    logical_position: Option<(i32, i32)>,
    logical_size: Option<(i32, i32)>,
}

impl Default for OutputBuilder {
    fn default() -> Self {
        Self {
            name: None,
            position: (0, 0),
            mode: None,
            transform: OutputTransform::Normal,
            scale: 1,
            logical_position: None,
            logical_size: None,
        }
    }
}

impl OutputBuilder {
    /// Start an output with no geometry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connector name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the physical position.
    pub fn position(mut self, x: i32, y: i32) -> Self {
        self.position = (x, y);
        self
    }

    /// Set the current mode size in physical pixels.
    pub fn mode(mut self, width: i32, height: i32) -> Self {
        self.mode = Some((width, height));
        self
    }

    /// Set the output transform.
    pub fn transform(mut self, transform: OutputTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the integer output scale.
    pub fn scale(mut self, scale: i32) -> Self {
        self.scale = scale;
        self
    }

    /// Set the reported logical position.
    pub fn logical_position(mut self, x: i32, y: i32) -> Self {
        self.logical_position = Some((x, y));
        self
    }

    /// Set the reported logical size.
    pub fn logical_size(mut self, width: i32, height: i32) -> Self {
        self.logical_size = Some((width, height));
        self
    }

    /// Validate and freeze the output.
    ///
    /// Without a reported logical size the layout is guessed from the physical
    /// geometry, the integer scale and the transform.
    pub fn build(self) -> MosaicResult<OutputDescriptor> {
        let (width, height) = self
            .mode
            .ok_or_else(|| MosaicError::validation("output has no current mode"))?;
        if width <= 0 || height <= 0 {
            return Err(MosaicError::validation(format!(
                "output mode must be positive, got {width}x{height}"
            )));
        }
        if self.scale < 1 {
            return Err(MosaicError::validation(format!(
                "output scale must be >= 1, got {}",
                self.scale
            )));
        }

        let geometry = Region::new(self.position.0, self.position.1, width, height);
        let (tw, _) = self.transform.apply_to_dimensions(width, height);

        let (logical_geometry, logical_scale, logical_guessed) = match self.logical_size {
            Some((lw, lh)) => {
                if lw <= 0 || lh <= 0 {
                    return Err(MosaicError::validation(format!(
                        "logical size must be positive, got {lw}x{lh}"
                    )));
                }
                let (lx, ly) = self.logical_position.unwrap_or(self.position);
                (
                    Region::new(lx, ly, lw, lh),
                    f64::from(tw) / f64::from(lw),
                    false,
                )
            }
            None => {
                let (lx, ly) = self.logical_position.unwrap_or(self.position);
                let (lw, lh) = self
                    .transform
                    .apply_to_dimensions(width / self.scale, height / self.scale);
                if lw == 0 || lh == 0 {
                    return Err(MosaicError::validation(format!(
                        "output mode {width}x{height} is smaller than scale {}",
                        self.scale
                    )));
                }
                tracing::warn!(
                    output = self.name.as_deref().unwrap_or("<unnamed>"),
                    "no logical geometry reported, guessing the output layout"
                );
                (
                    Region::new(lx, ly, lw, lh),
                    f64::from(self.scale),
                    true,
                )
            }
        };

        Ok(OutputDescriptor {
            name: self.name,
            geometry,
            transform: self.transform,
            scale: self.scale,
            logical_geometry,
            logical_scale,
            logical_guessed,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/output.rs"]
mod tests;
