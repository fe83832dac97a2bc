//! File loading and saving via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Samples are mapped
//! between `u8` and `[0, 1]` floats.

use crate::image::Image;
use crate::util::{StructFlowError, StructFlowResult};
use std::path::Path;

fn io_error(err: image::ImageError) -> StructFlowError {
    StructFlowError::ImageIo {
        reason: err.to_string(),
    }
}

/// Converts a dynamic image to a planar image, keeping RGB or gray layout.
pub fn from_dynamic_image(img: &image::DynamicImage) -> Image {
    if img.color().has_color() {
        let rgb = img.to_rgb8();
        let (width, height) = (rgb.width() as usize, rgb.height() as usize);
        let mut out = Image::new(width, height, 3);
        for (x, y, px) in rgb.enumerate_pixels() {
            for c in 0..3 {
                out.set(x as isize, y as isize, c as isize, px.0[c] as f32 / 255.0);
            }
        }
        out
    } else {
        let gray = img.to_luma8();
        let (width, height) = (gray.width() as usize, gray.height() as usize);
        let data = gray.as_raw().iter().map(|&v| v as f32 / 255.0).collect();
        Image {
            data,
            width,
            height,
            channels: 1,
        }
    }
}

/// Loads an image file as a planar RGB or grayscale image.
pub fn load_image<P: AsRef<Path>>(path: P) -> StructFlowResult<Image> {
    let img = image::open(path).map_err(io_error)?;
    Ok(from_dynamic_image(&img))
}

fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Saves a 1- or 3-channel image, clipping samples to `[0, 1]`.
pub fn save_image<P: AsRef<Path>>(img: &Image, path: P) -> StructFlowResult<()> {
    let (width, height) = (img.width() as u32, img.height() as u32);
    match img.channels() {
        1 => {
            let raw = img.data().iter().map(|&v| to_u8(v)).collect();
            let buf = image::GrayImage::from_raw(width, height, raw).ok_or(
                StructFlowError::InvalidDimensions {
                    width: img.width(),
                    height: img.height(),
                    channels: 1,
                },
            )?;
            buf.save(path).map_err(io_error)
        }
        3 => {
            let buf = image::RgbImage::from_fn(width, height, |x, y| {
                let (x, y) = (x as isize, y as isize);
                image::Rgb([
                    to_u8(img.get(x, y, 0)),
                    to_u8(img.get(x, y, 1)),
                    to_u8(img.get(x, y, 2)),
                ])
            });
            buf.save(path).map_err(io_error)
        }
        got => Err(StructFlowError::UnsupportedChannels {
            expected: "1 or 3",
            got,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn png_round_trip_keeps_layout() {
        let dir = std::env::temp_dir();
        let gray_path = dir.join(format!("structflow_io_gray_{}.png", std::process::id()));
        let rgb_path = dir.join(format!("structflow_io_rgb_{}.png", std::process::id()));

        let gray = Image::from_fn(5, 3, 1, |x, y, _| (x + 5 * y) as f32 / 14.0);
        save_image(&gray, &gray_path).unwrap();
        let back = load_image(&gray_path).unwrap();
        assert_eq!(back.shape(), (5, 3, 1));
        for (a, b) in gray.data().iter().zip(back.data()) {
            assert!((a - b).abs() <= 0.5 / 255.0 + 1e-6);
        }

        let rgb = Image::from_fn(4, 2, 3, |x, _, c| if c == 0 { x as f32 / 3.0 } else { 0.0 });
        save_image(&rgb, &rgb_path).unwrap();
        let back = load_image(&rgb_path).unwrap();
        assert_eq!(back.shape(), (4, 2, 3));
        assert_eq!(back.get(3, 1, 0), 1.0);
        assert_eq!(back.get(3, 1, 1), 0.0);

        let _ = std::fs::remove_file(gray_path);
        let _ = std::fs::remove_file(rgb_path);
    }

    #[test]
    fn save_rejects_two_channels() {
        let err = save_image(&Image::new(2, 2, 2), std::env::temp_dir().join("unused.png"))
            .unwrap_err();
        assert_eq!(
            err,
            StructFlowError::UnsupportedChannels {
                expected: "1 or 3",
                got: 2,
            }
        );
    }
}
