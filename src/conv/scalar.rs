//! Scalar reference correlation.
//!
//! Each output row is produced independently into a row buffer laid out as
//! `row[z * width + x]`, so the parallel path can reuse the same per-row
//! routine and stay bit-identical.

use crate::conv::ChannelMode;
use crate::image::Image;
use crate::util::math::clamp_coord;

/// Correlates output row `y` into `row`.
///
/// `row.len()` must be `source.width() * out_channels`.
pub(crate) fn correlate_row(
    source: &Image,
    filter: &Image,
    mode: ChannelMode,
    y: usize,
    row: &mut [f32],
) {
    let width = source.width();
    let height = source.height();
    let x_pivot = (filter.width() / 2) as isize;
    let y_pivot = (filter.height() / 2) as isize;
    let shared_filter = filter.channels() == 1;

    row.fill(0.0);
    for z in 0..source.channels() {
        let fz = if shared_filter { 0 } else { z };
        let dst_z = match mode {
            ChannelMode::Preserve => z,
            ChannelMode::Fuse => 0,
        };
        for x in 0..width {
            let mut sum = 0.0f32;
            for j in 0..filter.height() {
                let sy = clamp_coord(y as isize - (y_pivot - j as isize), height);
                for i in 0..filter.width() {
                    let sx = clamp_coord(x as isize - (x_pivot - i as isize), width);
                    sum += source.at(sx, sy, z) * filter.at(i, j, fz);
                }
            }
            row[dst_z * width + x] += sum;
        }
    }
}

/// Copies a row buffer produced by [`correlate_row`] into `out`.
pub(crate) fn store_row(out: &mut Image, y: usize, row: &[f32]) {
    let width = out.width();
    for c in 0..out.channels() {
        let start = out.index(0, y, c);
        out.data[start..start + width].copy_from_slice(&row[c * width..(c + 1) * width]);
    }
}

/// Sequential correlation over every row.
pub(crate) fn correlate(source: &Image, filter: &Image, mode: ChannelMode, out: &mut Image) {
    let mut row = vec![0.0f32; out.width() * out.channels()];
    for y in 0..source.height() {
        correlate_row(source, filter, mode, y, &mut row);
        store_row(out, y, &row);
    }
}
