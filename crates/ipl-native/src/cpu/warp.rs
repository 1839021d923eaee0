//! Affine warp kernel.

use ipl_core::{Error, Result, Scalar};

use super::CpuBackend;
use super::buffer::{CpuBuffer, saturate};
use crate::backend::{AffineMatrix, NativeBuffer};
use crate::params::{Interpolation, WarpFlags};

/// Slack for coordinates that land on the border through rounding error.
const EDGE_EPS: f64 = 1e-6;

pub(super) fn warp_affine(
    backend: &CpuBackend,
    src: &CpuBuffer,
    dst: &mut CpuBuffer,
    matrix: &AffineMatrix,
    flags: WarpFlags,
    fill: Scalar,
) -> Result<()> {
    // Sampling walks destination pixels, so we need dst -> src.
    let inv = if flags.inverse_map {
        *matrix
    } else {
        matrix
            .invert()
            .ok_or_else(|| Error::backend("warp_affine", "matrix is singular"))?
    };

    let sw = src.size().width;
    let sh = src.size().height;
    let dw = dst.size().width as usize;
    let c = src.channels() as usize;
    let depth = dst.depth();
    let row_len = dst.row_len();
    let nearest = flags.interpolation == Interpolation::Nearest;
    let max_x = (sw - 1) as f64;
    let max_y = (sh - 1) as f64;

    backend.for_each_row(dst.data_mut(), row_len, |dy, row| {
        for dx in 0..dw {
            let (sx, sy) = inv.apply(dx as f64, dy as f64);
            let px = &mut row[dx * c..(dx + 1) * c];

            if !(sx >= -EDGE_EPS && sy >= -EDGE_EPS && sx <= max_x + EDGE_EPS && sy <= max_y + EDGE_EPS) {
                if flags.fill_outliers {
                    for (ch, out) in px.iter_mut().enumerate() {
                        *out = saturate(depth, fill[ch.min(3)]);
                    }
                }
                continue;
            }
            let sx = sx.clamp(0.0, max_x);
            let sy = sy.clamp(0.0, max_y);

            if nearest {
                let x = sx.round() as u32;
                let y = sy.round() as u32;
                for (ch, out) in px.iter_mut().enumerate() {
                    *out = src.sample(x.min(sw - 1), y.min(sh - 1), ch);
                }
                continue;
            }

            let x0 = sx.floor() as u32;
            let y0 = sy.floor() as u32;
            let x1 = (x0 + 1).min(sw - 1);
            let y1 = (y0 + 1).min(sh - 1);
            let fx = sx - x0 as f64;
            let fy = sy - y0 as f64;

            for (ch, out) in px.iter_mut().enumerate() {
                let top = src.sample(x0, y0, ch) * (1.0 - fx) + src.sample(x1, y0, ch) * fx;
                let bot = src.sample(x0, y1, ch) * (1.0 - fx) + src.sample(x1, y1, ch) * fx;
                *out = saturate(depth, top * (1.0 - fy) + bot * fy);
            }
        }
    });

    Ok(())
}
