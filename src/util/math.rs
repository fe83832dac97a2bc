//! Numeric helpers shared by the filters and analyses.

/// Clamps a signed coordinate into `[0, len - 1]`.
///
/// `len` must be non-zero.
#[inline]
pub(crate) fn clamp_coord(v: isize, len: usize) -> usize {
    if v <= 0 {
        0
    } else {
        (v as usize).min(len - 1)
    }
}

/// Side of a Gaussian window for `sigma`: `ceil(6 * sigma)`, forced odd.
pub(crate) fn gaussian_side(sigma: f32) -> usize {
    let mut side = (6.0 * sigma).ceil() as usize;
    if side % 2 == 0 {
        side += 1;
    }
    side
}

/// Converts one HSV triple (all components in `[0, 1]`) to RGB.
pub(crate) fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> (f32, f32, f32) {
    if saturation == 0.0 {
        return (value, value, value);
    }
    let mut h = hue * 6.0;
    if h >= 6.0 {
        h = 0.0;
    }
    let sector = h.floor();
    let frac = h - sector;
    let p = value * (1.0 - saturation);
    let q = value * (1.0 - saturation * frac);
    let t = value * (1.0 - saturation * (1.0 - frac));
    match sector as i32 {
        0 => (value, t, p),
        1 => (q, value, p),
        2 => (p, value, t),
        3 => (p, q, value),
        4 => (t, p, value),
        _ => (value, p, q),
    }
}
