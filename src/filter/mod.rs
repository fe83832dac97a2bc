//! Filter kernel synthesis.
//!
//! Kernels are ordinary single-channel [`Image`]s whose center tap sits at
//! `(width / 2, height / 2)`. Gaussian kernels use a window side of
//! `ceil(6 * sigma)` forced odd, and are L1-normalized per channel.

use crate::image::Image;
use crate::util::math::gaussian_side;
use crate::util::{StructFlowError, StructFlowResult};
use std::f32::consts::TAU;

/// Response of [`gx_kernel`] to a unit-slope ramp.
///
/// Velocities solved from Sobel gradients are divided by this factor
/// relative to the true pixel displacement.
pub const SOBEL_GAIN: f32 = 8.0;

fn kernel_3x3(values: [f32; 9]) -> Image {
    Image {
        data: values.to_vec(),
        width: 3,
        height: 3,
        channels: 1,
    }
}

/// Divides every channel by its own sum so each channel sums to one.
///
/// A channel summing to exactly zero is set to zero.
pub fn l1_normalize(img: &mut Image) {
    for c in 0..img.channels() {
        if let Some(plane) = img.channel_mut(c) {
            let sum: f32 = plane.iter().sum();
            for v in plane.iter_mut() {
                *v = if sum == 0.0 { 0.0 } else { *v / sum };
            }
        }
    }
}

/// Square averaging kernel with every tap equal to `1 / side²`.
pub fn box_kernel(side: usize) -> StructFlowResult<Image> {
    if side == 0 {
        return Err(StructFlowError::InvalidParameter("box side must be positive"));
    }
    let value = 1.0 / (side * side) as f32;
    Ok(Image {
        data: vec![value; side * side],
        width: side,
        height: side,
        channels: 1,
    })
}

fn check_sigma(sigma: f32) -> StructFlowResult<()> {
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(StructFlowError::InvalidParameter(
            "sigma must be positive and finite",
        ));
    }
    Ok(())
}

/// Square 2D Gaussian kernel for `sigma`.
pub fn gaussian_kernel(sigma: f32) -> StructFlowResult<Image> {
    check_sigma(sigma)?;
    let side = gaussian_side(sigma);
    let offset = (side / 2) as isize;
    let two_var = 2.0 * sigma * sigma;
    let scale = 1.0 / (TAU * sigma * sigma);
    let mut kernel = Image::new(side, side, 1);
    for y in -offset..=offset {
        for x in -offset..=offset {
            let r2 = (x * x + y * y) as f32;
            kernel.set(x + offset, y + offset, 0, scale * (-r2 / two_var).exp());
        }
    }
    l1_normalize(&mut kernel);
    Ok(kernel)
}

/// Row (`side x 1`) Gaussian kernel for `sigma`.
///
/// Pair it with [`transpose`] for a separable blur.
pub fn gaussian_kernel_1d(sigma: f32) -> StructFlowResult<Image> {
    check_sigma(sigma)?;
    let side = gaussian_side(sigma);
    let offset = (side / 2) as isize;
    let two_var = 2.0 * sigma * sigma;
    let scale = 1.0 / (TAU * sigma * sigma);
    let data = (-offset..=offset)
        .map(|x| scale * (-((x * x) as f32) / two_var).exp())
        .collect();
    let mut kernel = Image {
        data,
        width: side,
        height: 1,
        channels: 1,
    };
    l1_normalize(&mut kernel);
    Ok(kernel)
}

/// Swaps the x and y axes of every channel.
pub fn transpose(img: &Image) -> Image {
    let mut out = Image::new(img.height(), img.width(), img.channels());
    for c in 0..img.channels() {
        for y in 0..img.height() {
            for x in 0..img.width() {
                let idx = out.index(y, x, c);
                out.data[idx] = img.at(x, y, c);
            }
        }
    }
    out
}

/// Horizontal Sobel derivative kernel.
pub fn gx_kernel() -> Image {
    kernel_3x3([-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0])
}

/// Vertical Sobel derivative kernel.
pub fn gy_kernel() -> Image {
    kernel_3x3([-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0])
}

/// Laplacian-style high-pass kernel.
pub fn highpass_kernel() -> Image {
    kernel_3x3([0.0, -1.0, 0.0, -1.0, 4.0, -1.0, 0.0, -1.0, 0.0])
}

/// Sharpening kernel (identity plus high-pass).
pub fn sharpen_kernel() -> Image {
    kernel_3x3([0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0])
}

/// Diagonal emboss kernel.
pub fn emboss_kernel() -> Image {
    kernel_3x3([-2.0, -1.0, 0.0, -1.0, 1.0, 1.0, 0.0, 1.0, 2.0])
}
