//! Per-site Lucas-Kanade solve on a spatio-temporal tensor.

use crate::image::Image;
use crate::tensor::{StructureTensor, TensorKind};
use crate::trace::{trace_event, trace_span};
use crate::util::{StructFlowError, StructFlowResult};

/// Solves `M v = -b` for one site, with `M = [[ixx, ixy], [ixy, iyy]]` and
/// `b = [ixt, iyt]`. A singular `M` yields zero velocity.
#[inline]
pub(crate) fn solve_site(ixx: f32, iyy: f32, ixy: f32, ixt: f32, iyt: f32) -> Option<(f32, f32)> {
    let det = ixx * iyy - ixy * ixy;
    if det == 0.0 {
        return None;
    }
    let (i00, i01, i10, i11) = (iyy / det, -ixy / det, -ixy / det, ixx / det);
    let vx = i00 * -ixt + i01 * -iyt;
    let vy = i10 * -ixt + i11 * -iyt;
    Some((vx, vy))
}

/// Solves for velocity at every `stride`-th pixel of a spatio-temporal tensor.
///
/// The output is `floor(W / stride) x floor(H / stride)` with channels
/// `[vx, vy]`. Output `(ox, oy)` samples the tensor at
/// `(ox * stride + (stride - 1) / 2, oy * stride + (stride - 1) / 2)`; a
/// trailing partial block of columns or rows is not sampled.
///
/// # Errors
///
/// [`StructFlowError::InvalidParameter`] for a zero stride and
/// [`StructFlowError::UnsupportedChannels`] for a spatial-only tensor.
pub fn velocity_field(tensor: &StructureTensor, stride: usize) -> StructFlowResult<Image> {
    if stride == 0 {
        return Err(StructFlowError::InvalidParameter("stride must be positive"));
    }
    if tensor.kind() != TensorKind::SpatioTemporal {
        return Err(StructFlowError::UnsupportedChannels {
            expected: "5",
            got: tensor.image().channels(),
        });
    }

    let s = tensor.image();
    let out_w = s.width() / stride;
    let out_h = s.height() / stride;
    let _span = trace_span!("velocity_field", width = out_w, height = out_h, stride = stride)
        .entered();

    let mut field = Image::new(out_w, out_h, 2);
    let plane = out_w * out_h;
    let offset = (stride - 1) / 2;
    let mut degenerate = 0usize;
    for oy in 0..out_h {
        let j = oy * stride + offset;
        for ox in 0..out_w {
            let i = ox * stride + offset;
            let solved = solve_site(
                s.at(i, j, 0),
                s.at(i, j, 1),
                s.at(i, j, 2),
                s.at(i, j, 3),
                s.at(i, j, 4),
            );
            let (vx, vy) = solved.unwrap_or_else(|| {
                degenerate += 1;
                (0.0, 0.0)
            });
            let idx = oy * out_w + ox;
            field.data[idx] = vx;
            field.data[idx + plane] = vy;
        }
    }
    trace_event!("velocity_field_solved", sites = plane, degenerate = degenerate);
    Ok(field)
}
