//! Velocity field overlays.

use crate::image::Image;
use crate::util::math::hsv_to_rgb;
use crate::util::{StructFlowError, StructFlowResult};
use std::f32::consts::TAU;

/// Draws a segment from `(x, y)` along `(dx, dy)`, colored by its direction.
fn draw_segment(image: &mut Image, x: f32, y: f32, dx: f32, dy: f32) {
    let hue = dy.atan2(dx) / TAU + 0.5;
    let (r, g, b) = hsv_to_rgb(hue, 1.0, 1.0);
    let len = (dx * dx + dy * dy).sqrt();
    let mut t = 0.0f32;
    while t < len {
        let xi = (x + dx * t / len) as isize;
        let yi = (y + dy * t / len) as isize;
        image.set(xi, yi, 0, r);
        image.set(xi, yi, 1, g);
        image.set(xi, yi, 2, b);
        t += 1.0;
    }
}

/// Overlays a velocity field on an RGB image.
///
/// Each field site becomes a segment starting at the center of its
/// `stride x stride` block, where `stride = image.width / field.width`, with
/// length `scale * |v|`. Segments longer than the image along an axis have
/// that component dropped.
///
/// # Errors
///
/// [`StructFlowError::UnsupportedChannels`] unless `image` has 3 channels and
/// `field` has at least 2.
pub fn draw_flow(image: &mut Image, field: &Image, scale: f32) -> StructFlowResult<()> {
    if image.channels() != 3 {
        return Err(StructFlowError::UnsupportedChannels {
            expected: "3",
            got: image.channels(),
        });
    }
    if field.channels() < 2 {
        return Err(StructFlowError::UnsupportedChannels {
            expected: "2 or more",
            got: field.channels(),
        });
    }
    if field.width() == 0 || field.height() == 0 {
        return Ok(());
    }
    let stride = (image.width() / field.width()).max(1);
    let (w, h) = (image.width() as f32, image.height() as f32);
    let offset = (stride - 1) / 2;

    for j in (offset..image.height()).step_by(stride) {
        for i in (offset..image.width()).step_by(stride) {
            let (fx, fy) = ((i / stride) as isize, (j / stride) as isize);
            let mut dx = scale * field.get(fx, fy, 0);
            let mut dy = scale * field.get(fx, fy, 1);
            if dx.abs() > w {
                dx = 0.0;
            }
            if dy.abs() > h {
                dy = 0.0;
            }
            draw_segment(image, i as f32, j as f32, dx, dy);
        }
    }
    Ok(())
}
