//! Affine mapping between canvas pixels and output buffer pixels.

use kurbo::{Affine, Point, Vec2};

use crate::foundation::geometry::Region;
use crate::layout::output::OutputDescriptor;

/// Corner snapping tolerance when deciding grid alignment.
const GRID_EPSILON: f64 = 1e-6;

/// Build the transform from canvas pixel space to output buffer pixel space.
///
/// Composed in the output's local frame:
/// 1. translate by half the physical (pre-transform) buffer size
/// 2. rotate by the negated output rotation
/// 3. scale by transformed-physical / logical size, x times the flip sign, y negated when
///    the capture is y-inverted
/// 4. translate by minus half the logical size
/// 5. translate by minus the output's offset from `canvas_origin`
/// 6. scale by `1 / canvas_scale`
pub fn build_output_transform(
    output: &OutputDescriptor,
    y_invert: bool,
    canvas_origin: (i32, i32),
    canvas_scale: f64,
) -> Affine {
    let geometry = output.geometry();
    let logical = output.logical_geometry();
    let transform = output.transform();
    let (raw_w, raw_h) = output.transformed_size();

    let flip_y = if y_invert { -1.0 } else { 1.0 };
    let offset = Vec2::new(
        f64::from(logical.x) - f64::from(canvas_origin.0),
        f64::from(logical.y) - f64::from(canvas_origin.1),
    );

    Affine::translate(Vec2::new(
        f64::from(geometry.width) / 2.0,
        f64::from(geometry.height) / 2.0,
    )) * quarter_turn(transform.quarter_turns())
        * Affine::scale_non_uniform(
            f64::from(raw_w) / f64::from(logical.width) * transform.flip_sign(),
            f64::from(raw_h) / f64::from(logical.height) * flip_y,
        )
        * Affine::translate(Vec2::new(
            -f64::from(logical.width) / 2.0,
            -f64::from(logical.height) / 2.0,
        ))
        * Affine::translate(-offset)
        * Affine::scale(1.0 / canvas_scale)
}

/// Rotation by `-turns * 90deg` with exact coefficients.
///
/// `Affine::rotate` goes through `sin_cos`, whose results are off by an ulp for
/// quarter turns; that would defeat grid-alignment detection.
fn quarter_turn(turns: u8) -> Affine {
    let (sin, cos) = match turns % 4 {
        1 => (-1.0, 0.0),
        2 => (0.0, -1.0),
        3 => (1.0, 0.0),
        _ => (0.0, 1.0),
    };
    Affine::new([cos, sin, -sin, cos, 0.0, 0.0])
}

/// The four corners of a `width` x `height` rectangle at the origin, mapped through `affine`.
pub fn map_corners(affine: Affine, width: u32, height: u32) -> [Point; 4] {
    let (w, h) = (f64::from(width), f64::from(height));
    [
        affine * Point::new(0.0, 0.0),
        affine * Point::new(w, 0.0),
        affine * Point::new(0.0, h),
        affine * Point::new(w, h),
    ]
}

/// Integer bounding box of mapped corners: floor of the minimum, ceil of the maximum.
pub fn bounding_region(corners: &[Point; 4]) -> Region {
    let (mut x0, mut y0) = (f64::INFINITY, f64::INFINITY);
    let (mut x1, mut y1) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in corners {
        let (px, py) = (snap(p.x), snap(p.y));
        x0 = x0.min(px);
        y0 = y0.min(py);
        x1 = x1.max(px);
        y1 = y1.max(py);
    }
    let (x0, y0) = (x0.floor() as i32, y0.floor() as i32);
    let (x1, y1) = (x1.ceil() as i32, y1.ceil() as i32);
    Region::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
}

/// Whether every corner lands on an integer coordinate on both axes.
pub fn is_grid_aligned(corners: &[Point; 4]) -> bool {
    corners
        .iter()
        .all(|p| (p.x - p.x.round()).abs() < GRID_EPSILON && (p.y - p.y.round()).abs() < GRID_EPSILON)
}

/// Whether `affine` is a pure integer translation.
pub fn integer_translation(affine: Affine) -> Option<(i64, i64)> {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    let unit = (a - 1.0).abs() < GRID_EPSILON
        && b.abs() < GRID_EPSILON
        && c.abs() < GRID_EPSILON
        && (d - 1.0).abs() < GRID_EPSILON;
    let integral = (e - e.round()).abs() < GRID_EPSILON && (f - f.round()).abs() < GRID_EPSILON;
    (unit && integral).then(|| (e.round() as i64, f.round() as i64))
}

/// Source pixels covered by one canvas pixel along each canvas axis.
pub fn footprint(affine: Affine) -> (f64, f64) {
    let [a, b, c, d, _, _] = affine.as_coeffs();
    (a.hypot(b), c.hypot(d))
}

fn snap(v: f64) -> f64 {
    let r = v.round();
    if (v - r).abs() < GRID_EPSILON { r } else { v }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/affine.rs"]
mod tests;
