//! Planar floating-point images with clamped access.
//!
//! `Image` stores `width * height * channels` samples channel-major: every
//! sample of channel 0, then channel 1, and so on. Within a channel samples are
//! row-major, so `(x, y, c)` lives at `y * width + x + c * width * height`.
//!
//! [`Image::get`] and [`Image::set`] accept signed coordinates and clamp each
//! one independently into range, which replicates edge samples past the
//! border. Filters and descriptors rely on this instead of padding.

use crate::util::math::clamp_coord;
use crate::util::{StructFlowError, StructFlowResult};

#[cfg(feature = "image-io")]
pub mod io;
mod ops;

/// Owned planar image of `f32` samples.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pub(crate) data: Vec<f32>,
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) channels: usize,
}

impl Image {
    /// Allocates a zero-filled image.
    pub fn new(width: usize, height: usize, channels: usize) -> Self {
        Self {
            data: vec![0.0; width * height * channels],
            width,
            height,
            channels,
        }
    }

    /// Wraps an existing planar buffer.
    pub fn from_vec(
        data: Vec<f32>,
        width: usize,
        height: usize,
        channels: usize,
    ) -> StructFlowResult<Self> {
        let needed = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(channels))
            .ok_or(StructFlowError::InvalidDimensions {
                width,
                height,
                channels,
            })?;
        if data.len() != needed {
            return Err(StructFlowError::BufferLengthMismatch {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Builds an image by evaluating `f(x, y, c)` at every sample.
    pub fn from_fn<F>(width: usize, height: usize, channels: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize, usize) -> f32,
    {
        let mut img = Self::new(width, height, channels);
        for c in 0..channels {
            for y in 0..height {
                for x in 0..width {
                    let idx = img.index(x, y, c);
                    img.data[idx] = f(x, y, c);
                }
            }
        }
        img
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the number of channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns `(width, height, channels)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.channels)
    }

    /// Total number of samples.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the image holds no samples.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the planar sample buffer.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Returns the planar sample buffer mutably.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consumes the image and returns its buffer.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    /// Returns the samples of channel `c`, row-major.
    pub fn channel(&self, c: usize) -> Option<&[f32]> {
        if c >= self.channels {
            return None;
        }
        let plane = self.width * self.height;
        self.data.get(c * plane..(c + 1) * plane)
    }

    /// Returns the samples of channel `c` mutably.
    pub fn channel_mut(&mut self, c: usize) -> Option<&mut [f32]> {
        if c >= self.channels {
            return None;
        }
        let plane = self.width * self.height;
        self.data.get_mut(c * plane..(c + 1) * plane)
    }

    /// Linear index of an in-range coordinate.
    #[inline]
    pub fn index(&self, x: usize, y: usize, c: usize) -> usize {
        y * self.width + x + c * self.width * self.height
    }

    /// Reads a sample, clamping each coordinate into range.
    ///
    /// An image with no samples reads as `0.0`.
    #[inline]
    pub fn get(&self, x: isize, y: isize, c: isize) -> f32 {
        if self.data.is_empty() {
            return 0.0;
        }
        let idx = self.index(
            clamp_coord(x, self.width),
            clamp_coord(y, self.height),
            clamp_coord(c, self.channels),
        );
        self.data[idx]
    }

    /// Writes a sample, clamping each coordinate into range.
    ///
    /// Writes to an image with no samples are dropped.
    #[inline]
    pub fn set(&mut self, x: isize, y: isize, c: isize, value: f32) {
        if self.data.is_empty() {
            return;
        }
        let idx = self.index(
            clamp_coord(x, self.width),
            clamp_coord(y, self.height),
            clamp_coord(c, self.channels),
        );
        self.data[idx] = value;
    }

    /// Reads an in-range sample without clamping.
    #[inline]
    pub(crate) fn at(&self, x: usize, y: usize, c: usize) -> f32 {
        self.data[self.index(x, y, c)]
    }

    /// Checks that `other` has the same shape.
    pub(crate) fn ensure_same_shape(&self, other: &Image) -> StructFlowResult<()> {
        if self.shape() != other.shape() {
            return Err(StructFlowError::ShapeMismatch {
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Image;
    use crate::util::StructFlowError;

    #[test]
    fn index_is_channel_major() {
        let img = Image::from_fn(3, 2, 2, |x, y, c| (c * 100 + y * 10 + x) as f32);
        assert_eq!(img.data()[0], 0.0);
        assert_eq!(img.data()[4], 11.0);
        assert_eq!(img.data()[6], 100.0);
        assert_eq!(img.channel(1).unwrap()[5], 112.0);
        assert!(img.channel(2).is_none());
    }

    #[test]
    fn get_clamps_each_axis_independently() {
        let img = Image::from_fn(4, 3, 2, |x, y, c| (c * 100 + y * 10 + x) as f32);
        assert_eq!(img.get(-3, 1, 0), 10.0);
        assert_eq!(img.get(7, -1, 0), 3.0);
        assert_eq!(img.get(2, 9, 5), 122.0);
        assert_eq!(img.get(-1, -1, -1), 0.0);
    }

    #[test]
    fn set_clamps_onto_edge() {
        let mut img = Image::new(2, 2, 1);
        img.set(5, -2, 0, 7.0);
        assert_eq!(img.get(1, 0, 0), 7.0);
    }

    #[test]
    fn empty_image_reads_zero() {
        let mut img = Image::new(0, 3, 1);
        assert!(img.is_empty());
        img.set(0, 0, 0, 1.0);
        assert_eq!(img.get(0, 0, 0), 0.0);
    }

    #[test]
    fn from_vec_rejects_wrong_length() {
        let err = Image::from_vec(vec![0.0; 5], 2, 2, 1).unwrap_err();
        assert_eq!(err, StructFlowError::BufferLengthMismatch { needed: 4, got: 5 });
    }
}
