//! Lucas-Kanade optical flow between two frames.
//!
//! The pipeline builds a spatio-temporal structure tensor of the current
//! frame against the previous one, box-averages it, solves the 2x2 normal
//! equations on a strided grid, clips the result and finally blurs the
//! velocity field with a small Gaussian.
//!
//! Gradients come from the unnormalized Sobel pair, so velocities are in
//! units of `1 / SOBEL_GAIN` pixels per frame; multiply by
//! [`crate::filter::SOBEL_GAIN`] for pixel displacements.

mod draw;
mod velocity;

pub use draw::draw_flow;
pub use velocity::velocity_field;

use crate::conv::smooth_with;
use crate::image::Image;
use crate::tensor::time_structure_tensor_with;
use crate::trace::trace_span;
use crate::util::{StructFlowError, StructFlowResult};

/// Parameters for [`FlowEstimator`].
#[derive(Clone, Debug)]
pub struct FlowConfig {
    /// Side of the box window averaging the tensor; `0` or `1` disables it.
    pub smooth_window: usize,
    /// Spacing of velocity samples in source pixels.
    pub stride: usize,
    /// Velocity components are clipped to `[-max_speed, max_speed]`.
    pub max_speed: f32,
    /// Standard deviation of the final velocity blur.
    pub post_sigma: f32,
    /// Use row-parallel convolution when the `rayon` feature is enabled.
    pub parallel: bool,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            smooth_window: 15,
            stride: 8,
            max_speed: 6.0,
            post_sigma: 2.0,
            parallel: false,
        }
    }
}

impl FlowConfig {
    /// Checks parameter ranges.
    pub fn validate(&self) -> StructFlowResult<()> {
        if self.stride == 0 {
            return Err(StructFlowError::InvalidParameter("stride must be positive"));
        }
        if !(self.max_speed.is_finite() && self.max_speed >= 0.0) {
            return Err(StructFlowError::InvalidParameter(
                "max_speed must be finite and non-negative",
            ));
        }
        if !(self.post_sigma.is_finite() && self.post_sigma > 0.0) {
            return Err(StructFlowError::InvalidParameter(
                "post_sigma must be positive and finite",
            ));
        }
        Ok(())
    }
}

/// Dense-on-a-grid optical flow estimator.
#[derive(Clone, Debug, Default)]
pub struct FlowEstimator {
    cfg: FlowConfig,
}

impl FlowEstimator {
    /// Creates an estimator with validated parameters.
    pub fn new(cfg: FlowConfig) -> StructFlowResult<Self> {
        cfg.validate()?;
        Ok(Self { cfg })
    }

    /// Returns the estimator configuration.
    pub fn config(&self) -> &FlowConfig {
        &self.cfg
    }

    /// Velocity field of `current` relative to `previous`.
    ///
    /// Frames must share a shape and have 1 or 3 channels. The result is
    /// `floor(W / stride) x floor(H / stride)` with channels `[vx, vy]`.
    pub fn compute(&self, current: &Image, previous: &Image) -> StructFlowResult<Image> {
        let _span = trace_span!(
            "optical_flow",
            width = current.width(),
            height = current.height(),
            window = self.cfg.smooth_window,
            stride = self.cfg.stride
        )
        .entered();

        let tensor = time_structure_tensor_with(
            current,
            previous,
            self.cfg.smooth_window,
            self.cfg.parallel,
        )?;
        let mut field = velocity_field(&tensor, self.cfg.stride)?;
        field.constrain(self.cfg.max_speed);
        if field.is_empty() {
            return Ok(field);
        }
        smooth_with(&field, self.cfg.post_sigma, self.cfg.parallel)
    }
}

/// Optical flow with the default clip and blur.
///
/// # Errors
///
/// [`StructFlowError::ShapeMismatch`] for frames of different shape and
/// [`StructFlowError::InvalidParameter`] for a zero stride.
pub fn optical_flow(
    current: &Image,
    previous: &Image,
    smooth_window: usize,
    stride: usize,
) -> StructFlowResult<Image> {
    FlowEstimator::new(FlowConfig {
        smooth_window,
        stride,
        ..FlowConfig::default()
    })?
    .compute(current, previous)
}
