//! Element-wise image utilities.

use crate::image::Image;
use crate::util::{StructFlowError, StructFlowResult};

/// Luma weights for RGB to grayscale reduction.
const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

impl Image {
    /// Reduces a 3-channel RGB image to a single luma channel.
    pub fn rgb_to_grayscale(&self) -> StructFlowResult<Image> {
        if self.channels() != 3 {
            return Err(StructFlowError::UnsupportedChannels {
                expected: "3",
                got: self.channels(),
            });
        }
        let plane = self.width() * self.height();
        let mut gray = Image::new(self.width(), self.height(), 1);
        let data = self.data();
        for (i, out) in gray.data_mut().iter_mut().enumerate() {
            *out = LUMA_WEIGHTS[0] * data[i]
                + LUMA_WEIGHTS[1] * data[i + plane]
                + LUMA_WEIGHTS[2] * data[i + 2 * plane];
        }
        Ok(gray)
    }

    /// Sample-wise sum of two images of equal shape.
    pub fn add(&self, other: &Image) -> StructFlowResult<Image> {
        self.zip_with(other, |a, b| a + b)
    }

    /// Sample-wise difference `self - other` of two images of equal shape.
    pub fn sub(&self, other: &Image) -> StructFlowResult<Image> {
        self.zip_with(other, |a, b| a - b)
    }

    fn zip_with<F>(&self, other: &Image, f: F) -> StructFlowResult<Image>
    where
        F: Fn(f32, f32) -> f32,
    {
        self.ensure_same_shape(other)?;
        let mut out = self.clone();
        for (a, &b) in out.data_mut().iter_mut().zip(other.data()) {
            *a = f(*a, b);
        }
        Ok(out)
    }

    /// Clips every sample into `[0, 1]` in place.
    pub fn clamp_unit(&mut self) {
        for v in self.data_mut() {
            *v = v.clamp(0.0, 1.0);
        }
    }

    /// Clips every sample into `[-limit, limit]` in place.
    pub fn constrain(&mut self, limit: f32) {
        let limit = limit.abs();
        for v in self.data_mut() {
            *v = v.clamp(-limit, limit);
        }
    }

    /// Rescales all samples linearly so the minimum maps to 0 and the maximum to 1.
    ///
    /// A constant image has no range and becomes all zeros.
    pub fn feature_normalize(&mut self) {
        let Some(&first) = self.data().first() else {
            return;
        };
        let (min, max) = self
            .data()
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let range = max - min;
        for v in self.data_mut() {
            *v = if range > 0.0 { (*v - min) / range } else { 0.0 };
        }
    }
}
