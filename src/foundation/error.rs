use crate::pixel::format::ShmFormat;

/// Convenience result type used across mosaic.
pub type MosaicResult<T> = Result<T, MosaicError>;

/// Error taxonomy for the compositing and encoding pipeline.
///
/// Every variant is terminal for the current invocation; nothing in this crate retries.
#[derive(thiserror::Error, Debug)]
pub enum MosaicError {
    /// A geometry string did not match `<x>,<y> <w>x<h>`.
    #[error("malformed geometry: {0}")]
    MalformedGeometry(String),

    /// Output selection by name did not match any known output.
    #[error("unknown output '{0}'")]
    UnknownOutput(String),

    /// A captured buffer uses a pixel format the normalizer cannot handle.
    #[error("unsupported buffer format {0}")]
    UnsupportedFormat(ShmFormat),

    /// No output intersects the requested region.
    #[error("screenshot region is empty")]
    EmptySelection,

    /// The sink rejected encoded bytes (disk full, closed pipe, ...).
    #[error("failed to write encoded image: {0}")]
    EncodeWrite(#[source] std::io::Error),

    /// The encoder library failed for a reason other than I/O.
    #[error("encoding error: {0}")]
    Encode(String),

    /// Invalid caller-provided data or an operation issued in the wrong state.
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MosaicError {
    /// Build a [`MosaicError::MalformedGeometry`] value.
    pub fn malformed_geometry(msg: impl Into<String>) -> Self {
        Self::MalformedGeometry(msg.into())
    }

    /// Build a [`MosaicError::UnknownOutput`] value.
    pub fn unknown_output(name: impl Into<String>) -> Self {
        Self::UnknownOutput(name.into())
    }

    /// Build a [`MosaicError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`MosaicError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<image::ImageError> for MosaicError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(io) => Self::EncodeWrite(io),
            other => Self::Encode(other.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
