//! Resampling of normalized output images.

use kurbo::{Affine, Point};

use crate::foundation::math::unorm8_to_f32;
use crate::pixel::normalize::NormalizedImage;
use crate::render::composite::word_to_rgba;
use crate::transform::affine::footprint;

/// Upper bound on supersamples per axis when minifying.
const MAX_SUBSAMPLES: u32 = 8;

const TRANSPARENT: [f32; 4] = [0.0; 4];

/// Read-only view over a normalized image that yields premultiplied `[r, g, b, a]`.
pub(crate) struct SourceImage<'a> {
    image: &'a NormalizedImage,
    width: u32,
    height: u32,
    opaque: bool,
}

impl<'a> SourceImage<'a> {
    pub(crate) fn new(image: &'a NormalizedImage) -> Self {
        Self {
            image,
            width: image.width(),
            height: image.height(),
            opaque: image.is_opaque(),
        }
    }

    /// Texel at `(x, y)`, clamped to the image edges.
    pub(crate) fn fetch(&self, x: i64, y: i64) -> [f32; 4] {
        let x = x.clamp(0, i64::from(self.width) - 1) as u32;
        let y = y.clamp(0, i64::from(self.height) - 1) as u32;
        match self.image {
            NormalizedImage::Argb8 { buffer, .. } => {
                let [r, g, b, a] = word_to_rgba(buffer.word(x, y));
                let a = if self.opaque { 1.0 } else { unorm8_to_f32(a) };
                [unorm8_to_f32(r), unorm8_to_f32(g), unorm8_to_f32(b), a]
            }
            NormalizedImage::Wide(img) => {
                let mut px = img.pixels[y as usize * self.width as usize + x as usize];
                if self.opaque {
                    px[3] = 1.0;
                }
                px
            }
        }
    }

    /// Bilinear sample at buffer position `(u, v)`, pixel centers at half-integers.
    ///
    /// Positions outside the image rectangle are transparent; inside it, neighbours past
    /// the edge repeat the edge texel.
    pub(crate) fn bilinear(&self, u: f64, v: f64) -> [f32; 4] {
        if !(0.0..=f64::from(self.width)).contains(&u) || !(0.0..=f64::from(self.height)).contains(&v)
        {
            return TRANSPARENT;
        }
        let (x, y) = (u - 0.5, v - 0.5);
        let (x0, y0) = (x.floor(), y.floor());
        let (fx, fy) = ((x - x0) as f32, (y - y0) as f32);
        let (x0, y0) = (x0 as i64, y0 as i64);

        let p00 = self.fetch(x0, y0);
        if fx == 0.0 && fy == 0.0 {
            return p00;
        }
        let p10 = self.fetch(x0 + 1, y0);
        let p01 = self.fetch(x0, y0 + 1);
        let p11 = self.fetch(x0 + 1, y0 + 1);

        let mut out = [0.0f32; 4];
        for i in 0..4 {
            let top = p00[i] + (p10[i] - p00[i]) * fx;
            let bottom = p01[i] + (p11[i] - p01[i]) * fx;
            out[i] = top + (bottom - top) * fy;
        }
        out
    }
}

/// Maps canvas pixels to filtered source samples.
///
/// Magnification and unit scale use a single bilinear tap at the pixel center.
/// Minification averages an `n` x `n` grid of bilinear taps, `n` following the
/// source footprint of one canvas pixel.
pub(crate) struct Resampler<'a> {
    source: SourceImage<'a>,
    buffer_from_canvas: Affine,
    subsamples: u32,
}

impl<'a> Resampler<'a> {
    pub(crate) fn new(source: SourceImage<'a>, buffer_from_canvas: Affine) -> Self {
        let (fx, fy) = footprint(buffer_from_canvas);
        let reach = fx.max(fy);
        let subsamples = if reach.is_finite() && reach > 1.0 + 1e-6 {
            (reach.ceil() as u32).clamp(1, MAX_SUBSAMPLES)
        } else {
            1
        };
        Self {
            source,
            buffer_from_canvas,
            subsamples,
        }
    }

    pub(crate) fn subsamples(&self) -> u32 {
        self.subsamples
    }

    /// Filtered, premultiplied color of canvas pixel `(x, y)`.
    pub(crate) fn sample(&self, x: i32, y: i32) -> [f32; 4] {
        let n = self.subsamples;
        if n == 1 {
            let p = self.buffer_from_canvas * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            return self.source.bilinear(p.x, p.y);
        }

        let step = 1.0 / f64::from(n);
        let mut acc = [0.0f32; 4];
        for sy in 0..n {
            for sx in 0..n {
                let cx = f64::from(x) + (f64::from(sx) + 0.5) * step;
                let cy = f64::from(y) + (f64::from(sy) + 0.5) * step;
                let p = self.buffer_from_canvas * Point::new(cx, cy);
                let s = self.source.bilinear(p.x, p.y);
                for i in 0..4 {
                    acc[i] += s[i];
                }
            }
        }
        let inv = 1.0 / (n * n) as f32;
        acc.map(|c| c * inv)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/sample.rs"]
mod tests;
