//! Summed-area tables and box means.
//!
//! Unlike the rest of the crate, lookups here treat coordinates before the
//! first row or column as zero rather than clamping, which is what makes the
//! four-corner box sum work at the top-left border.

use crate::image::Image;
use crate::trace::trace_span;
use crate::util::{StructFlowError, StructFlowResult};

/// Reads the table at `(x, y, c)`, substituting zero above or left of the image.
#[inline]
fn table_at(table: &Image, x: isize, y: isize, c: usize) -> f32 {
    if x < 0 || y < 0 {
        return 0.0;
    }
    table.at(x as usize, y as usize, c)
}

/// Builds `I` with `I[x, y] = sum over i <= x, j <= y of image[i, j]`, per channel.
pub fn integral_image(image: &Image) -> Image {
    let mut table = Image::new(image.width(), image.height(), image.channels());
    for c in 0..image.channels() {
        for y in 0..image.height() as isize {
            for x in 0..image.width() as isize {
                let value = image.at(x as usize, y as usize, c) + table_at(&table, x, y - 1, c)
                    + table_at(&table, x - 1, y, c)
                    - table_at(&table, x - 1, y - 1, c);
                let idx = table.index(x as usize, y as usize, c);
                table.data[idx] = value;
            }
        }
    }
    table
}

/// Mean over a `side x side` window centered on each pixel.
///
/// The window is clipped to the image and the sum is divided by the clipped
/// area, so borders average only the samples that exist.
pub fn box_filter(image: &Image, side: usize) -> StructFlowResult<Image> {
    if side == 0 {
        return Err(StructFlowError::InvalidParameter("box side must be positive"));
    }
    let _span = trace_span!("box_filter", side = side).entered();

    let table = integral_image(image);
    let mut out = Image::new(image.width(), image.height(), image.channels());
    if image.is_empty() {
        return Ok(out);
    }

    let offset = (side / 2) as isize;
    let max_x = image.width() as isize - 1;
    let max_y = image.height() as isize - 1;
    for y in 0..=max_y {
        let top = y - offset - 1;
        let bottom = (y + offset).min(max_y);
        let rows = bottom - (y - offset).max(0) + 1;
        for x in 0..=max_x {
            let left = x - offset - 1;
            let right = (x + offset).min(max_x);
            let cols = right - (x - offset).max(0) + 1;
            let area = (rows * cols) as f32;
            for c in 0..image.channels() {
                let sum = table_at(&table, right, bottom, c) - table_at(&table, left, bottom, c)
                    - table_at(&table, right, top, c)
                    + table_at(&table, left, top, c);
                let idx = out.index(x as usize, y as usize, c);
                out.data[idx] = sum / area;
            }
        }
    }
    Ok(out)
}
