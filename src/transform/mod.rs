/// Canvas-to-buffer affine mapping and grid-alignment tests.
pub mod affine;
/// The eight output transforms.
pub mod output;
