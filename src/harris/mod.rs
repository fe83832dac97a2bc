//! Harris corner detection and patch description.
//!
//! The pipeline runs structure tensor -> cornerness -> non-maximum
//! suppression, keeps every pixel whose suppressed response is at least the
//! threshold, and describes each in raster order.

mod describe;
mod nms;
mod response;

pub use describe::{describe, Descriptor, PATCH_SIDE};
pub use nms::{nms, NMS_SENTINEL};
pub use response::{cornerness, HARRIS_ALPHA};

use crate::image::Image;
use crate::tensor::structure_tensor_with;
use crate::trace::{trace_event, trace_span};
use crate::util::{StructFlowError, StructFlowResult};

/// Parameters for [`HarrisDetector`].
#[derive(Clone, Debug)]
pub struct HarrisConfig {
    /// Standard deviation of the Gaussian tensor window.
    pub sigma: f32,
    /// Minimum suppressed response kept (inclusive).
    pub threshold: f32,
    /// Half-width of the suppression window.
    pub nms_radius: usize,
    /// Use row-parallel convolution when the `rayon` feature is enabled.
    pub parallel: bool,
}

impl Default for HarrisConfig {
    fn default() -> Self {
        Self {
            sigma: 2.0,
            threshold: 50.0,
            nms_radius: 3,
            parallel: false,
        }
    }
}

impl HarrisConfig {
    /// Checks parameter ranges.
    pub fn validate(&self) -> StructFlowResult<()> {
        if !(self.sigma.is_finite() && self.sigma > 0.0) {
            return Err(StructFlowError::InvalidParameter(
                "sigma must be positive and finite",
            ));
        }
        if !self.threshold.is_finite() {
            return Err(StructFlowError::InvalidParameter("threshold must be finite"));
        }
        Ok(())
    }
}

/// Location and suppressed response of a detected corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keypoint {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
    /// Response after suppression.
    pub score: f32,
}

/// Harris corner detector over planar images.
#[derive(Clone, Debug, Default)]
pub struct HarrisDetector {
    cfg: HarrisConfig,
}

impl HarrisDetector {
    /// Creates a detector with validated parameters.
    pub fn new(cfg: HarrisConfig) -> StructFlowResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    /// Returns the detector configuration.
    pub fn config(&self) -> &HarrisConfig {
        &self.cfg
    }

    /// Cornerness map after non-maximum suppression.
    pub fn response_map(&self, image: &Image) -> StructFlowResult<Image> {
        let tensor = structure_tensor_with(image, self.cfg.sigma, self.cfg.parallel)?;
        let response = cornerness(&tensor);
        Ok(nms(&response, self.cfg.nms_radius))
    }

    /// Corner locations in raster order.
    pub fn keypoints(&self, image: &Image) -> StructFlowResult<Vec<Keypoint>> {
        let _span = trace_span!(
            "harris_detect",
            width = image.width(),
            height = image.height(),
            sigma = self.cfg.sigma
        )
        .entered();

        let suppressed = self.response_map(image)?;
        let width = suppressed.width();
        let keypoints: Vec<Keypoint> = suppressed
            .data()
            .iter()
            .enumerate()
            .filter(|&(_, &score)| score >= self.cfg.threshold)
            .map(|(i, &score)| Keypoint {
                x: i % width,
                y: i / width,
                score,
            })
            .collect();
        trace_event!("harris_keypoints", count = keypoints.len());
        Ok(keypoints)
    }

    /// Describes every detected corner, in raster order.
    pub fn detect(&self, image: &Image) -> StructFlowResult<Vec<Descriptor>> {
        Ok(describe_keypoints(image, &self.keypoints(image)?))
    }
}

/// Describes already detected keypoints, keeping their order.
pub fn describe_keypoints(image: &Image, keypoints: &[Keypoint]) -> Vec<Descriptor> {
    let width = image.width();
    keypoints
        .iter()
        .map(|kp| describe(image, kp.y * width + kp.x))
        .collect()
}

/// Runs Harris detection with explicit parameters and describes the corners.
pub fn harris_detect(
    image: &Image,
    sigma: f32,
    threshold: f32,
    nms_radius: usize,
) -> StructFlowResult<Vec<Descriptor>> {
    HarrisDetector::new(HarrisConfig {
        sigma,
        threshold,
        nms_radius,
        ..HarrisConfig::default()
    })?
    .detect(image)
}

/// Draws a 19-pixel cross at every descriptor location.
///
/// Channel 0 and 2 are set to 1 and channel 1 to 0 along the cross, so the
/// marks are magenta on RGB images.
pub fn mark_corners(image: &mut Image, descriptors: &[Descriptor]) {
    for d in descriptors {
        let (x, y) = (d.x as isize, d.y as isize);
        for i in -9..10 {
            for (c, v) in [(0, 1.0), (1, 0.0), (2, 1.0)] {
                image.set(x + i, y, c, v);
                image.set(x, y + i, c, v);
            }
        }
    }
}
