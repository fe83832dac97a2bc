use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use structflow::filter::gaussian_kernel;
use structflow::{
    convolve, optical_flow, smooth, ChannelMode, HarrisConfig, HarrisDetector, Image,
};

fn make_image(width: usize, height: usize, shift: usize) -> Image {
    Image::from_fn(width, height, 1, |x, y, _| {
        let x = x + shift;
        (((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF) as f32 / 255.0
    })
}

fn bench_filters(c: &mut Criterion) {
    let image = make_image(256, 256, 0);
    let window = gaussian_kernel(2.0).unwrap();

    c.bench_function("convolve_gaussian_2d_sigma2", |b| {
        b.iter(|| black_box(convolve(&image, &window, ChannelMode::Preserve).unwrap()));
    });
    c.bench_function("smooth_separable_sigma2", |b| {
        b.iter(|| black_box(smooth(&image, 2.0).unwrap()));
    });

    #[cfg(feature = "rayon")]
    c.bench_function("convolve_par_gaussian_2d_sigma2", |b| {
        b.iter(|| {
            black_box(
                structflow::conv::rayon::convolve_par(&image, &window, ChannelMode::Preserve)
                    .unwrap(),
            )
        });
    });
}

fn bench_harris(c: &mut Criterion) {
    let image = make_image(256, 256, 0);
    let detector = HarrisDetector::new(HarrisConfig {
        sigma: 2.0,
        threshold: 1.0,
        nms_radius: 3,
        ..HarrisConfig::default()
    })
    .unwrap();

    c.bench_function("harris_detect_256", |b| {
        b.iter(|| black_box(detector.detect(&image).unwrap()));
    });
}

fn bench_flow(c: &mut Criterion) {
    let previous = make_image(256, 256, 0);
    let current = make_image(256, 256, 1);

    c.bench_function("optical_flow_256_window15_stride8", |b| {
        b.iter(|| black_box(optical_flow(&current, &previous, 15, 8).unwrap()));
    });
}

criterion_group!(benches, bench_filters, bench_harris, bench_flow);
criterion_main!(benches);
