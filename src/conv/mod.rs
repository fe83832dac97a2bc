//! 2D correlation with edge-replicating borders.
//!
//! [`convolve`] slides a filter over the source without flipping it (this is
//! correlation). Taps that fall outside the source read the nearest edge
//! sample through [`Image::get`]'s clamping rule, so there is no padding step.
//!
//! The filter either has one channel, shared by every source channel, or
//! exactly as many channels as the source. With [`ChannelMode::Fuse`] the
//! per-channel sums are added together into a single output channel.

mod integral;
pub(crate) mod scalar;
pub(crate) mod sobel;

#[cfg(feature = "rayon")]
pub mod rayon;

pub use integral::{box_filter, integral_image};
pub use sobel::{colorize_sobel, gradients, sobel, SobelResponse};

use crate::filter::{gaussian_kernel_1d, transpose};
use crate::image::Image;
use crate::trace::trace_span;
use crate::util::{StructFlowError, StructFlowResult};

/// How source channels map onto output channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelMode {
    /// One output channel per source channel.
    Preserve,
    /// All channel responses summed into a single output channel.
    Fuse,
}

impl ChannelMode {
    /// `true` maps to [`ChannelMode::Preserve`], `false` to [`ChannelMode::Fuse`].
    pub fn from_preserve(preserve: bool) -> Self {
        if preserve {
            Self::Preserve
        } else {
            Self::Fuse
        }
    }
}

pub(crate) fn check_filter(source: &Image, filter: &Image) -> StructFlowResult<()> {
    if filter.channels() != 1 && filter.channels() != source.channels() {
        return Err(StructFlowError::ChannelMismatch {
            filter: filter.channels(),
            image: source.channels(),
        });
    }
    Ok(())
}

pub(crate) fn output_channels(source: &Image, mode: ChannelMode) -> usize {
    match mode {
        ChannelMode::Preserve => source.channels(),
        ChannelMode::Fuse => 1,
    }
}

/// Correlates `source` with `filter`.
///
/// The output has the source's width and height, and either the source's
/// channel count or one channel depending on `mode`.
///
/// # Errors
///
/// [`StructFlowError::ChannelMismatch`] when the filter channel count is
/// neither 1 nor the source channel count.
pub fn convolve(source: &Image, filter: &Image, mode: ChannelMode) -> StructFlowResult<Image> {
    convolve_with(source, filter, mode, false)
}

/// Dispatches to the parallel path when requested and compiled in.
pub(crate) fn convolve_with(
    source: &Image,
    filter: &Image,
    mode: ChannelMode,
    parallel: bool,
) -> StructFlowResult<Image> {
    check_filter(source, filter)?;
    let _span = trace_span!(
        "convolve",
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
    run_correlation(source, filter, mode, parallel, &mut out);
    Ok(out)
}

#[cfg(feature = "rayon")]
fn run_correlation(
    source: &Image,
    filter: &Image,
    mode: ChannelMode,
    parallel: bool,
    out: &mut Image,
) {
    if parallel {
        self::rayon::correlate_par(source, filter, mode, out);
    } else {
        scalar::correlate(source, filter, mode, out);
    }
}

#[cfg(not(feature = "rayon"))]
fn run_correlation(
    source: &Image,
    filter: &Image,
    mode: ChannelMode,
    _parallel: bool,
    out: &mut Image,
) {
    scalar::correlate(source, filter, mode, out);
}

/// Separable Gaussian blur: a row pass followed by a column pass.
///
/// Approximates `convolve(image, gaussian_kernel(sigma), Preserve)` but is not
/// bit-identical to it.
pub fn smooth(image: &Image, sigma: f32) -> StructFlowResult<Image> {
    smooth_with(image, sigma, false)
}

pub(crate) fn smooth_with(image: &Image, sigma: f32, parallel: bool) -> StructFlowResult<Image> {
    let row = gaussian_kernel_1d(sigma)?;
    let col = transpose(&row);
    let _span = trace_span!("smooth", sigma = sigma, taps = row.width()).entered();
    let horizontal = convolve_with(image, &row, ChannelMode::Preserve, parallel)?;
    convolve_with(&horizontal, &col, ChannelMode::Preserve, parallel)
}
