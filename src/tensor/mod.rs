//! Structure tensors built from Sobel gradients.
//!
//! A spatial tensor has three channels `[Ix², Iy², Ix·Iy]`; a spatio-temporal
//! tensor appends `[Ix·It, Iy·It]` where `It = current - previous`. Both keep
//! the source width and height.

use crate::conv::box_filter;
use crate::conv::sobel::gradients_with;
use crate::conv::{convolve_with, ChannelMode};
use crate::filter::gaussian_kernel;
use crate::image::Image;
use crate::trace::{trace_debug, trace_span};
use crate::util::{StructFlowError, StructFlowResult};
use std::borrow::Cow;

/// Channel layout of a [`StructureTensor`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TensorKind {
    /// `[Ix², Iy², Ix·Iy]`.
    Spatial,
    /// `[Ix², Iy², Ix·Iy, Ix·It, Iy·It]`.
    SpatioTemporal,
}

impl TensorKind {
    /// Number of channels for this layout.
    pub fn channels(self) -> usize {
        match self {
            TensorKind::Spatial => 3,
            TensorKind::SpatioTemporal => 5,
        }
    }
}

/// Per-pixel gradient outer products stored as a planar image.
#[derive(Clone, Debug, PartialEq)]
pub struct StructureTensor {
    image: Image,
    kind: TensorKind,
}

impl StructureTensor {
    /// Wraps an image with 3 or 5 channels.
    pub fn try_from_image(image: Image) -> StructFlowResult<Self> {
        let kind = match image.channels() {
            3 => TensorKind::Spatial,
            5 => TensorKind::SpatioTemporal,
            got => {
                return Err(StructFlowError::UnsupportedChannels {
                    expected: "3 or 5",
                    got,
                })
            }
        };
        Ok(Self { image, kind })
    }

    /// Channel layout.
    pub fn kind(&self) -> TensorKind {
        self.kind
    }

    /// Borrowed planar tensor channels.
    pub fn image(&self) -> &Image {
        &self.image
    }

    /// Consumes the tensor and returns its planar channels.
    pub fn into_image(self) -> Image {
        self.image
    }

    /// Tensor width in pixels.
    pub fn width(&self) -> usize {
        self.image.width()
    }

    /// Tensor height in pixels.
    pub fn height(&self) -> usize {
        self.image.height()
    }
}

/// Fills the gradient product planes shared by both tensor kinds.
fn gradient_products(ix: &Image, iy: &Image, channels: usize) -> Image {
    let plane = ix.len();
    let mut products = Image::new(ix.width(), ix.height(), channels);
    for (i, (&gx, &gy)) in ix.data().iter().zip(iy.data()).enumerate() {
        products.data[i] = gx * gx;
        products.data[i + plane] = gy * gy;
        products.data[i + 2 * plane] = gx * gy;
    }
    products
}

/// Spatial structure tensor smoothed with a 2D Gaussian of `sigma`.
pub fn structure_tensor(image: &Image, sigma: f32) -> StructFlowResult<StructureTensor> {
    structure_tensor_with(image, sigma, false)
}

pub(crate) fn structure_tensor_with(
    image: &Image,
    sigma: f32,
    parallel: bool,
) -> StructFlowResult<StructureTensor> {
    let _span = trace_span!(
        "structure_tensor",
        width = image.width(),
        height = image.height(),
        sigma = sigma
    )
    .entered();

    let window = gaussian_kernel(sigma)?;
    let (ix, iy) = gradients_with(image, parallel)?;
    let products = gradient_products(&ix, &iy, TensorKind::Spatial.channels());
    let smoothed = convolve_with(&products, &window, ChannelMode::Preserve, parallel)?;
    trace_debug!("structure_tensor_window", taps = window.width());
    Ok(StructureTensor {
        image: smoothed,
        kind: TensorKind::Spatial,
    })
}

/// Spatio-temporal structure tensor of `image` against `previous`.
///
/// RGB frames are reduced to grayscale first. When `window >= 2` every
/// channel is averaged over a `window x window` box (clipped at the
/// borders); `0` or `1` leaves the raw products.
///
/// # Errors
///
/// [`StructFlowError::ShapeMismatch`] when the frames differ in shape and
/// [`StructFlowError::UnsupportedChannels`] for channel-less frames.
pub fn time_structure_tensor(
    image: &Image,
    previous: &Image,
    window: usize,
) -> StructFlowResult<StructureTensor> {
    time_structure_tensor_with(image, previous, window, false)
}

pub(crate) fn time_structure_tensor_with(
    image: &Image,
    previous: &Image,
    window: usize,
    parallel: bool,
) -> StructFlowResult<StructureTensor> {
    image.ensure_same_shape(previous)?;
    if image.channels() == 0 {
        return Err(StructFlowError::UnsupportedChannels {
            expected: "1 or more",
            got: 0,
        });
    }
    let _span = trace_span!(
        "time_structure_tensor",
        width = image.width(),
        height = image.height(),
        window = window
    )
    .entered();

    let (current, previous): (Cow<'_, Image>, Cow<'_, Image>) = if image.channels() == 3 {
        (
            Cow::Owned(image.rgb_to_grayscale()?),
            Cow::Owned(previous.rgb_to_grayscale()?),
        )
    } else {
        (Cow::Borrowed(image), Cow::Borrowed(previous))
    };

    let (ix, iy) = gradients_with(&current, parallel)?;
    let mut products = gradient_products(&ix, &iy, TensorKind::SpatioTemporal.channels());
    let plane = ix.len();
    for i in 0..plane {
        // Temporal difference is taken on channel 0 of the (gray) frames.
        let it = current.data[i] - previous.data[i];
        products.data[i + 3 * plane] = ix.data[i] * it;
        products.data[i + 4 * plane] = iy.data[i] * it;
    }

    let image = if window >= 2 {
        box_filter(&products, window)?
    } else {
        products
    };
    Ok(StructureTensor {
        image,
        kind: TensorKind::SpatioTemporal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_image_has_zero_tensor() {
        let img = Image::from_fn(8, 8, 1, |_, _, _| 0.5);
        let t = structure_tensor(&img, 1.0).unwrap();
        assert_eq!(t.kind(), TensorKind::Spatial);
        assert_eq!(t.image().shape(), (8, 8, 3));
        assert!(t.image().data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn vertical_edge_has_no_y_energy() {
        let img = Image::from_fn(12, 12, 1, |x, _, _| if x < 6 { 0.0 } else { 1.0 });
        let t = structure_tensor(&img, 1.0).unwrap();
        let s = t.image();
        assert!(s.get(6, 6, 0) > 1.0);
        assert_eq!(s.get(6, 6, 1), 0.0);
        assert_eq!(s.get(6, 6, 2), 0.0);
    }

    #[test]
    fn try_from_image_checks_channels() {
        assert!(StructureTensor::try_from_image(Image::new(2, 2, 4)).is_err());
        let t = StructureTensor::try_from_image(Image::new(2, 2, 5)).unwrap();
        assert_eq!(t.kind(), TensorKind::SpatioTemporal);
    }

    #[test]
    fn time_tensor_temporal_channels() {
        let prev = Image::from_fn(6, 6, 1, |x, _, _| x as f32);
        let cur = Image::from_fn(6, 6, 1, |x, _, _| x as f32 + 0.5);
        let t = time_structure_tensor(&cur, &prev, 0).unwrap();
        let s = t.image();
        assert_eq!(s.channels(), 5);
        // Ix = 8 on the interior ramp, It = 0.5.
        assert_eq!(s.get(3, 3, 0), 64.0);
        assert_eq!(s.get(3, 3, 3), 4.0);
        assert_eq!(s.get(3, 3, 4), 0.0);
    }

    #[test]
    fn time_tensor_reduces_rgb() {
        let prev = Image::from_fn(5, 5, 3, |x, y, _| (x + y) as f32);
        let cur = Image::from_fn(5, 5, 3, |x, y, _| (x + y) as f32 + 1.0);
        let t = time_structure_tensor(&cur, &prev, 3).unwrap();
        assert_eq!(t.image().shape(), (5, 5, 5));
    }

    #[test]
    fn time_tensor_rejects_channel_less_frames() {
        let frame = Image::new(4, 4, 0);
        let err = time_structure_tensor(&frame, &frame, 3).unwrap_err();
        assert_eq!(
            err,
            StructFlowError::UnsupportedChannels {
                expected: "1 or more",
                got: 0,
            }
        );
    }

    #[test]
    fn time_tensor_rejects_shape_mismatch() {
        let err = time_structure_tensor(&Image::new(4, 4, 1), &Image::new(4, 5, 1), 0).unwrap_err();
        assert!(matches!(err, StructFlowError::ShapeMismatch { .. }));
    }
}
