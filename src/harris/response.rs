//! Harris cornerness from a structure tensor.
//!
//! Each pixel's tensor `[[a, b], [b, d]]` with `a = Ix²`, `d = Iy²`,
//! `b = Ix·Iy` scores `det - alpha * trace²`. Positive scores mark corners,
//! negative scores edges, values near zero flat regions.

use crate::image::Image;
use crate::tensor::StructureTensor;

/// Trace weight in the Harris score.
pub const HARRIS_ALPHA: f32 = 0.06;

#[inline]
fn score(a: f32, d: f32, b: f32) -> f32 {
    let det = a * d - b * b;
    let trace = a + d;
    det - HARRIS_ALPHA * trace * trace
}

/// Reduces a 3- or 5-channel tensor to a single-channel response map.
///
/// Only the spatial channels are read; temporal channels are ignored.
pub fn cornerness(tensor: &StructureTensor) -> Image {
    let s = tensor.image();
    let plane = s.width() * s.height();
    let mut response = Image::new(s.width(), s.height(), 1);
    let data = s.data();
    let (xx, rest) = data.split_at(plane);
    let (yy, rest) = rest.split_at(plane);
    let xy = &rest[..plane];
    fill_scores(xx, yy, xy, &mut response.data);
    response
}

#[cfg(not(feature = "simd"))]
fn fill_scores(xx: &[f32], yy: &[f32], xy: &[f32], out: &mut [f32]) {
    for (i, v) in out.iter_mut().enumerate() {
        *v = score(xx[i], yy[i], xy[i]);
    }
}

#[cfg(feature = "simd")]
fn fill_scores(xx: &[f32], yy: &[f32], xy: &[f32], out: &mut [f32]) {
    use wide::f32x8;

    const LANES: usize = 8;

    #[inline]
    fn load(slice: &[f32]) -> f32x8 {
        f32x8::from([
            slice[0], slice[1], slice[2], slice[3], slice[4], slice[5], slice[6], slice[7],
        ])
    }

    let alpha = f32x8::splat(HARRIS_ALPHA);
    let simd_end = out.len() / LANES * LANES;
    for base in (0..simd_end).step_by(LANES) {
        let a = load(&xx[base..]);
        let d = load(&yy[base..]);
        let b = load(&xy[base..]);
        let det = a * d - b * b;
        let trace = a + d;
        let r = det - alpha * trace * trace;
        out[base..base + LANES].copy_from_slice(&r.to_array());
    }
    for i in simd_end..out.len() {
        out[i] = score(xx[i], yy[i], xy[i]);
    }
}
