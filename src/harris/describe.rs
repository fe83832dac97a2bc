//! Patch descriptors around keypoints.

use crate::image::Image;

/// Side of the square patch sampled for each descriptor.
pub const PATCH_SIDE: usize = 5;

/// Feature vector sampled around an integer image location.
#[derive(Clone, Debug, PartialEq)]
pub struct Descriptor {
    /// Column of the patch center.
    pub x: usize,
    /// Row of the patch center.
    pub y: usize,
    /// `PATCH_SIDE² * channels` center-subtracted samples.
    pub data: Vec<f32>,
}

impl Descriptor {
    /// Number of features.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when the descriptor holds no features.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Describes the pixel at linear index `index` (row-major within a channel).
///
/// For every channel the center value minus each sample of the surrounding
/// 5x5 patch is appended, column by column. Subtracting the center removes
/// a constant exposure offset. Patches past the border use clamped samples.
pub fn describe(image: &Image, index: usize) -> Descriptor {
    let x = index.checked_rem(image.width()).unwrap_or(0);
    let y = index.checked_div(image.width()).unwrap_or(0);
    let half = (PATCH_SIDE / 2) as isize;
    let (cx, cy) = (x as isize, y as isize);

    let mut data = Vec::with_capacity(PATCH_SIDE * PATCH_SIDE * image.channels());
    for c in 0..image.channels() as isize {
        let center = image.get(cx, cy, c);
        for dx in -half..=half {
            for dy in -half..=half {
                data.push(center - image.get(cx + dx, cy + dy, c));
            }
        }
    }
    Descriptor { x, y, data }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_scales_with_channels() {
        let img = Image::new(8, 8, 3);
        let d = describe(&img, 20);
        assert_eq!((d.x, d.y), (4, 2));
        assert_eq!(d.len(), 75);
    }

    #[test]
    fn exposure_offset_cancels() {
        let base = Image::from_fn(9, 9, 1, |x, y, _| (x * x + 3 * y) as f32);
        let bright = Image::from_fn(9, 9, 1, |x, y, _| (x * x + 3 * y) as f32 + 10.0);
        assert_eq!(describe(&base, 40), describe(&bright, 40));
    }

    #[test]
    fn center_entry_is_zero_and_order_is_column_major() {
        let img = Image::from_fn(9, 9, 1, |x, y, _| (10 * x + y) as f32);
        let d = describe(&img, 4 * 9 + 4);
        assert_eq!(d.data[12], 0.0);
        // First entry is offset (-2, -2), second (-2, -1).
        assert_eq!(d.data[0], 22.0);
        assert_eq!(d.data[1], 21.0);
        // Sixth entry starts the next column, offset (-1, -2).
        assert_eq!(d.data[5], 12.0);
    }

    #[test]
    fn corner_patch_uses_clamped_samples() {
        let img = Image::from_fn(4, 4, 1, |x, y, _| (x + 4 * y) as f32);
        let d = describe(&img, 0);
        assert_eq!(d.data[0], 0.0);
        assert_eq!(d.data[24], -10.0);
    }
}
