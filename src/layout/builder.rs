use crate::foundation::error::{MosaicError, MosaicResult};
use crate::foundation::geometry::{Region, union_extents};
use crate::layout::output::{OutputBuilder, OutputDescriptor};

/// Append-only collection of outputs, frozen into a [`Layout`] before compositing.
#[derive(Clone, Debug, Default)]
pub struct LayoutBuilder {
    outputs: Vec<OutputDescriptor>,
}

impl LayoutBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an already built output.
    pub fn push(&mut self, output: OutputDescriptor) -> &mut Self {
        self.outputs.push(output);
        self
    }

    /// Build and append an output.
    pub fn push_builder(&mut self, output: OutputBuilder) -> MosaicResult<&mut Self> {
        self.outputs.push(output.build()?);
        Ok(self)
    }

    /// Number of outputs collected so far.
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Return `true` when no output was added.
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Freeze the layout.
    ///
    /// Fails when no output was added or when two outputs share a name.
    pub fn finish(self) -> MosaicResult<Layout> {
        if self.outputs.is_empty() {
            return Err(MosaicError::validation("layout has no outputs"));
        }
        for (i, a) in self.outputs.iter().enumerate() {
            let Some(name) = a.name() else { continue };
            if self.outputs[i + 1..].iter().any(|b| b.name() == Some(name)) {
                return Err(MosaicError::validation(format!(
                    "duplicate output name '{name}'"
                )));
            }
        }
        Ok(Layout {
            outputs: self.outputs,
        })
    }
}

/// Immutable, ordered set of outputs in enumeration order.
#[derive(Clone, Debug)]
pub struct Layout {
    outputs: Vec<OutputDescriptor>,
}

impl Layout {
    /// Outputs in enumeration order.
    pub fn outputs(&self) -> &[OutputDescriptor] {
        &self.outputs
    }

    /// Look an output up by name.
    pub fn find(&self, name: &str) -> Option<(usize, &OutputDescriptor)> {
        self.outputs
            .iter()
            .enumerate()
            .find(|(_, o)| o.name() == Some(name))
    }

    /// Bounding box of every output's logical geometry.
    pub fn extents(&self) -> Region {
        union_extents(self.outputs.iter().map(OutputDescriptor::logical_geometry))
            .unwrap_or_default()
    }

    /// Return `true` when output `index` shares area with any other output.
    pub fn overlaps_other(&self, index: usize) -> bool {
        let Some(this) = self.outputs.get(index) else {
            return false;
        };
        let geom = this.logical_geometry();
        self.outputs
            .iter()
            .enumerate()
            .any(|(i, o)| i != index && geom.intersects(o.logical_geometry()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/builder.rs"]
mod tests;
