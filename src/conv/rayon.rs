//! Rayon-parallel correlation (feature-gated).
//!
//! Rows are correlated in parallel into private buffers and then stored
//! sequentially. Every output sample accumulates its taps in the same order
//! as the scalar path, so results are bit-identical.

use crate::conv::scalar::{correlate_row, store_row};
use crate::conv::{check_filter, output_channels, ChannelMode};
use crate::image::Image;
use crate::trace::trace_span;
use crate::util::StructFlowResult;
use rayon::prelude::*;

pub(crate) fn correlate_par(source: &Image, filter: &Image, mode: ChannelMode, out: &mut Image) {
    let row_len = out.width() * out.channels();
    let rows: Vec<Vec<f32>> = (0..source.height())
        .into_par_iter()
        .map(|y| {
            let mut row = vec![0.0f32; row_len];
            correlate_row(source, filter, mode, y, &mut row);
            row
        })
        .collect();

    for (y, row) in rows.iter().enumerate() {
        store_row(out, y, row);
    }
}

/// Row-parallel variant of [`crate::conv::convolve`].
pub fn convolve_par(source: &Image, filter: &Image, mode: ChannelMode) -> StructFlowResult<Image> {
    check_filter(source, filter)?;
    let _span = trace_span!(
        "convolve_par",
        width = source.width(),
        height = source.height(),
        taps = filter.width() * filter.height()
    )
    .entered();

    let mut out = Image::new(
        source.width(),
        source.height(),
        output_channels(source, mode),
    );
    correlate_par(source, filter, mode, &mut out);
    Ok(out)
}
