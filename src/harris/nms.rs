//! Windowed non-maximum suppression over a response map.

use crate::image::Image;

/// Value written over suppressed responses.
///
/// Far below any realistic score, so suppressed pixels never pass a
/// threshold, including thresholds at or below zero.
pub const NMS_SENTINEL: f32 = -999_999.0;

/// Suppresses every pixel that has a strictly greater neighbor within the
/// `(2 * radius + 1)²` window around it.
///
/// Equal neighbors do not suppress each other, so plateaus survive. Window
/// taps past the border read replicated edge values. Only channel 0 is read.
pub fn nms(response: &Image, radius: usize) -> Image {
    let mut out = Image::new(response.width(), response.height(), 1);
    if response.is_empty() {
        return out;
    }
    let r = radius as isize;
    for y in 0..response.height() as isize {
        for x in 0..response.width() as isize {
            let center = response.get(x, y, 0);
            let dominated = (-r..=r)
                .any(|dy| (-r..=r).any(|dx| response.get(x + dx, y + dy, 0) > center));
            out.set(x, y, 0, if dominated { NMS_SENTINEL } else { center });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_single_peak() {
        let mut img = Image::new(5, 5, 1);
        img.set(2, 2, 0, 3.0);
        img.set(3, 2, 0, 1.0);
        let out = nms(&img, 1);
        assert_eq!(out.get(2, 2, 0), 3.0);
        assert_eq!(out.get(3, 2, 0), NMS_SENTINEL);
        // Outside the peak's window zeros tie with zeros and survive.
        assert_eq!(out.get(0, 4, 0), 0.0);
    }

    #[test]
    fn plateau_survives() {
        let img = Image::from_fn(4, 4, 1, |_, _, _| 2.0);
        assert_eq!(nms(&img, 2), img);
    }

    #[test]
    fn radius_zero_is_identity() {
        let img = Image::from_fn(4, 3, 1, |x, y, _| (x * 3 + y) as f32);
        assert_eq!(nms(&img, 0), img);
    }

    #[test]
    fn border_compares_against_replicated_edge() {
        let img = Image::from_vec(vec![1.0, 2.0, 5.0], 3, 1, 1).unwrap();
        let out = nms(&img, 1);
        assert_eq!(out.data(), &[NMS_SENTINEL, NMS_SENTINEL, 5.0]);
    }
}
