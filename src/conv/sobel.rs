//! Sobel gradients, magnitude and orientation.

use crate::conv::{convolve_with, ChannelMode};
use crate::filter::{gx_kernel, gy_kernel};
use crate::image::Image;
use crate::util::math::hsv_to_rgb;
use crate::util::StructFlowResult;

/// Gradient magnitude and orientation maps, both single-channel.
#[derive(Clone, Debug)]
pub struct SobelResponse {
    /// `sqrt(gx² + gy²)` per pixel.
    pub magnitude: Image,
    /// `atan2(gy, gx)` per pixel, in radians.
    pub orientation: Image,
}

/// Horizontal and vertical Sobel responses, fused across channels.
pub fn gradients(image: &Image) -> StructFlowResult<(Image, Image)> {
    gradients_with(image, false)
}

pub(crate) fn gradients_with(image: &Image, parallel: bool) -> StructFlowResult<(Image, Image)> {
    let ix = convolve_with(image, &gx_kernel(), ChannelMode::Fuse, parallel)?;
    let iy = convolve_with(image, &gy_kernel(), ChannelMode::Fuse, parallel)?;
    Ok((ix, iy))
}

/// Computes gradient magnitude and orientation.
pub fn sobel(image: &Image) -> StructFlowResult<SobelResponse> {
    let (ix, iy) = gradients(image)?;
    let mut magnitude = Image::new(image.width(), image.height(), 1);
    let mut orientation = Image::new(image.width(), image.height(), 1);
    for (i, (&gx, &gy)) in ix.data().iter().zip(iy.data()).enumerate() {
        magnitude.data[i] = gx.hypot(gy);
        orientation.data[i] = gy.atan2(gx);
    }
    Ok(SobelResponse {
        magnitude,
        orientation,
    })
}

/// Renders gradients as RGB: orientation drives hue and saturation,
/// magnitude drives value. Both maps are min-max normalized first.
pub fn colorize_sobel(image: &Image) -> StructFlowResult<Image> {
    let SobelResponse {
        mut magnitude,
        mut orientation,
    } = sobel(image)?;
    magnitude.feature_normalize();
    orientation.feature_normalize();

    let plane = image.width() * image.height();
    let mut out = Image::new(image.width(), image.height(), 3);
    for i in 0..plane {
        let angle = orientation.data[i];
        let (r, g, b) = hsv_to_rgb(angle, angle, magnitude.data[i]);
        out.data[i] = r;
        out.data[i + plane] = g;
        out.data[i + 2 * plane] = b;
    }
    Ok(out)
}
