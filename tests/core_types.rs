use structflow::{Image, StructFlowError, StructureTensor, TensorKind};

#[test]
fn from_vec_rejects_wrong_length() {
    let err = Image::from_vec(vec![0.0; 5], 2, 2, 1).err().unwrap();
    assert_eq!(err, StructFlowError::BufferLengthMismatch { needed: 4, got: 5 });

    let err = Image::from_vec(vec![0.0; 4], 2, 2, 2).err().unwrap();
    assert_eq!(err, StructFlowError::BufferLengthMismatch { needed: 8, got: 4 });
}

#[test]
fn from_vec_rejects_overflowing_shape() {
    let err = Image::from_vec(Vec::new(), usize::MAX, 2, 1).err().unwrap();
    assert_eq!(
        err,
        StructFlowError::InvalidDimensions {
            width: usize::MAX,
            height: 2,
            channels: 1,
        }
    );
}

#[test]
fn planar_layout_matches_index_formula() {
    let data: Vec<f32> = (0..24).map(|v| v as f32).collect();
    let img = Image::from_vec(data, 4, 3, 2).unwrap();
    assert_eq!(img.shape(), (4, 3, 2));
    assert_eq!(img.index(1, 2, 1), 2 * 4 + 1 + 12);
    assert_eq!(img.get(1, 2, 1), 21.0);
    assert_eq!(img.channel(1).unwrap()[0], 12.0);
    assert!(img.channel(2).is_none());
}

#[test]
fn get_and_set_clamp_coordinates() {
    let mut img = Image::from_fn(3, 2, 1, |x, y, _| (x + 10 * y) as f32);
    assert_eq!(img.get(-4, -4, 0), 0.0);
    assert_eq!(img.get(9, 0, 0), 2.0);
    assert_eq!(img.get(1, 7, 0), 11.0);
    assert_eq!(img.get(1, 1, 5), 11.0);

    img.set(-1, 5, 0, 99.0);
    assert_eq!(img.get(0, 1, 0), 99.0);
}

#[test]
fn empty_image_reads_zero_and_ignores_writes() {
    let mut img = Image::new(0, 4, 1);
    assert!(img.is_empty());
    assert_eq!(img.get(0, 0, 0), 0.0);
    img.set(0, 0, 0, 1.0);
    assert!(img.data().is_empty());
}

#[test]
fn elementwise_ops_check_shapes() {
    let a = Image::from_fn(2, 2, 1, |x, _, _| x as f32);
    let b = Image::from_fn(2, 2, 1, |_, y, _| y as f32);
    assert_eq!(a.add(&b).unwrap().data(), &[0.0, 1.0, 1.0, 2.0]);
    assert_eq!(a.sub(&b).unwrap().data(), &[0.0, 1.0, -1.0, 0.0]);

    let err = a.add(&Image::new(2, 2, 3)).err().unwrap();
    assert_eq!(
        err,
        StructFlowError::ShapeMismatch {
            left: (2, 2, 1),
            right: (2, 2, 3),
        }
    );
}

#[test]
fn grayscale_requires_rgb() {
    let err = Image::new(2, 2, 1).rgb_to_grayscale().err().unwrap();
    assert_eq!(
        err,
        StructFlowError::UnsupportedChannels {
            expected: "3",
            got: 1,
        }
    );
    let white = Image::from_fn(2, 2, 3, |_, _, _| 1.0);
    let gray = white.rgb_to_grayscale().unwrap();
    assert!(gray.data().iter().all(|&v| (v - 1.0).abs() < 1e-6));
}

#[test]
fn structure_tensor_wrapper_reports_kind() {
    let t = StructureTensor::try_from_image(Image::new(3, 3, 5)).unwrap();
    assert_eq!(t.kind(), TensorKind::SpatioTemporal);
    assert_eq!((t.width(), t.height()), (3, 3));

    let err = StructureTensor::try_from_image(Image::new(3, 3, 2)).err().unwrap();
    assert_eq!(
        err,
        StructFlowError::UnsupportedChannels {
            expected: "3 or 5",
            got: 2,
        }
    );
}

#[test]
fn errors_render_readable_messages() {
    let err = StructFlowError::ChannelMismatch { filter: 2, image: 3 };
    assert_eq!(err.to_string(), "filter has 2 channels, expected 1 or 3");
}
