use structflow::filter::{
    box_kernel, emboss_kernel, gaussian_kernel, gaussian_kernel_1d, gx_kernel, gy_kernel,
    highpass_kernel, l1_normalize, sharpen_kernel, transpose, SOBEL_GAIN,
};
use structflow::{box_filter, convolve, integral_image, smooth, sobel, ChannelMode, Image};

fn checker(width: usize, height: usize) -> Image {
    Image::from_fn(width, height, 1, |x, y, _| ((x * 3 + y * 5) % 7) as f32 / 7.0)
}

#[test]
fn gaussian_windows_are_odd_and_normalized() {
    for (sigma, side) in [(0.5f32, 3usize), (1.0, 7), (2.0, 13), (1.2, 9)] {
        let k = gaussian_kernel(sigma).unwrap();
        assert_eq!((k.width(), k.height()), (side, side), "sigma {sigma}");
        let total: f32 = k.data().iter().sum();
        assert!((total - 1.0).abs() < 1e-5);

        let row = gaussian_kernel_1d(sigma).unwrap();
        assert_eq!((row.width(), row.height()), (side, 1));
        let total: f32 = row.data().iter().sum();
        assert!((total - 1.0).abs() < 1e-5);
    }
}

#[test]
fn gaussian_rejects_bad_sigma() {
    assert!(gaussian_kernel(0.0).is_err());
    assert!(gaussian_kernel(-1.0).is_err());
    assert!(gaussian_kernel_1d(f32::NAN).is_err());
}

#[test]
fn zero_sum_kernels_stay_zero_sum() {
    let mut hp = highpass_kernel();
    l1_normalize(&mut hp);
    assert!(hp.data().iter().all(|&v| v == 0.0));

    let mut sharp = sharpen_kernel();
    l1_normalize(&mut sharp);
    assert_eq!(sharp, sharpen_kernel());

    let total: f32 = emboss_kernel().data().iter().sum();
    assert_eq!(total, 1.0);
}

#[test]
fn sobel_pair_are_transposes() {
    assert_eq!(transpose(&gx_kernel()), gy_kernel());
}

#[test]
fn sobel_gain_on_unit_ramp() {
    let ramp = Image::from_fn(9, 9, 1, |x, _, _| x as f32);
    let gx = convolve(&ramp, &gx_kernel(), ChannelMode::Preserve).unwrap();
    assert_eq!(gx.get(4, 4, 0), SOBEL_GAIN);
    let resp = sobel(&ramp).unwrap();
    assert_eq!(resp.magnitude.get(4, 4, 0), SOBEL_GAIN);
}

#[test]
fn highpass_of_constant_is_zero() {
    let img = Image::from_fn(6, 5, 2, |_, _, c| 0.25 + c as f32 * 0.5);
    let out = convolve(&img, &highpass_kernel(), ChannelMode::Preserve).unwrap();
    assert!(out.data().iter().all(|&v| v == 0.0));
}

#[test]
fn box_filter_matches_box_kernel_in_the_interior() {
    let img = checker(12, 10);
    let fast = box_filter(&img, 3).unwrap();
    let slow = convolve(&img, &box_kernel(3).unwrap(), ChannelMode::Preserve).unwrap();
    for y in 1..9isize {
        for x in 1..11isize {
            assert!((fast.get(x, y, 0) - slow.get(x, y, 0)).abs() < 1e-5);
        }
    }
}

#[test]
fn box_filter_averages_clipped_window_at_corner() {
    let img = Image::from_fn(4, 4, 1, |x, y, _| (x + 4 * y) as f32);
    let out = box_filter(&img, 3).unwrap();
    // Top-left window covers (0..=1, 0..=1): 0, 1, 4, 5.
    assert!((out.get(0, 0, 0) - 2.5).abs() < 1e-6);
}

#[test]
fn integral_image_sums_prefix() {
    let img = Image::from_fn(3, 3, 1, |_, _, _| 1.0);
    let table = integral_image(&img);
    assert_eq!(table.get(2, 2, 0), 9.0);
    assert_eq!(table.get(1, 0, 0), 2.0);
    assert_eq!(table.get(0, 2, 0), 3.0);
}

#[test]
fn separable_smooth_approximates_2d_gaussian() {
    let img = checker(20, 16);
    let sep = smooth(&img, 1.5).unwrap();
    let full = convolve(&img, &gaussian_kernel(1.5).unwrap(), ChannelMode::Preserve).unwrap();
    for (a, b) in sep.data().iter().zip(full.data()) {
        assert!((a - b).abs() < 1e-4);
    }
}

#[test]
fn convolution_shape_law() {
    let img = checker(7, 5);
    let rgb = Image::from_fn(7, 5, 3, |x, y, c| img.get(x as isize, y as isize, 0) + c as f32);
    for filter in [box_kernel(2).unwrap(), gaussian_kernel(0.8).unwrap(), gx_kernel()] {
        let kept = convolve(&rgb, &filter, ChannelMode::Preserve).unwrap();
        assert_eq!(kept.shape(), rgb.shape());
        let fused = convolve(&rgb, &filter, ChannelMode::Fuse).unwrap();
        assert_eq!(fused.shape(), (7, 5, 1));
    }
}
