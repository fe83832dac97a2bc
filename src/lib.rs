//! StructFlow is a CPU image-structure toolkit built on planar `f32` images.
//!
//! It provides edge-replicating 2D correlation, Gaussian and Sobel filters,
//! structure tensors, Harris corner detection with patch descriptors, and
//! Lucas-Kanade optical flow. Row-parallel convolution is available through
//! the `rayon` feature and vectorized cornerness through `simd`.

pub mod conv;
pub mod filter;
pub mod flow;
pub mod harris;
pub mod image;
pub mod tensor;
mod trace;
pub mod util;

pub use conv::{box_filter, convolve, integral_image, smooth, sobel, ChannelMode, SobelResponse};
pub use flow::{draw_flow, optical_flow, velocity_field, FlowConfig, FlowEstimator};
pub use harris::{
    cornerness, describe, describe_keypoints, harris_detect, mark_corners, nms, Descriptor,
    HarrisConfig, HarrisDetector, Keypoint,
};
pub use image::Image;
pub use tensor::{structure_tensor, time_structure_tensor, StructureTensor, TensorKind};
pub use util::{StructFlowError, StructFlowResult};
