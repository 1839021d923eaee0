//! Resize kernels.
//!
//! Nearest and bilinear sample directly; area, cubic and Lanczos run a
//! two-pass separable filter (horizontal then vertical) whose support widens
//! with the downscale factor.

use ipl_core::Size;

use super::CpuBackend;
use super::buffer::{CpuBuffer, saturate_all};
use crate::backend::NativeBuffer;
use crate::params::Interpolation;

pub(super) fn resize(backend: &CpuBackend, src: &CpuBuffer, dst: &mut CpuBuffer, interp: Interpolation) {
    match interp {
        Interpolation::Nearest => nearest(backend, src, dst),
        Interpolation::Linear => bilinear(backend, src, dst),
        Interpolation::Area | Interpolation::Cubic | Interpolation::Lanczos4 => {
            separable(backend, src, dst, interp)
        }
    }
    saturate_all(dst.depth(), dst.data_mut());
}

fn nearest(backend: &CpuBackend, src: &CpuBuffer, dst: &mut CpuBuffer) {
    let Size { width: sw, height: sh } = src.size();
    let Size { width: dw, height: dh } = dst.size();
    let c = src.channels() as usize;
    let row_len = dst.row_len();

    backend.for_each_row(dst.data_mut(), row_len, |dy, row| {
        let sy = ((dy as u64 * sh as u64) / dh as u64).min(sh as u64 - 1) as u32;
        for dx in 0..dw {
            let sx = ((dx as u64 * sw as u64) / dw as u64).min(sw as u64 - 1) as u32;
            let base = src.offset(sx, sy);
            row[dx as usize * c..(dx as usize + 1) * c].copy_from_slice(&src.data()[base..base + c]);
        }
    });
}

fn bilinear(backend: &CpuBackend, src: &CpuBuffer, dst: &mut CpuBuffer) {
    let Size { width: sw, height: sh } = src.size();
    let Size { width: dw, height: dh } = dst.size();
    let c = src.channels() as usize;
    let row_len = dst.row_len();

    let scale_x = sw as f64 / dw as f64;
    let scale_y = sh as f64 / dh as f64;

    backend.for_each_row(dst.data_mut(), row_len, |dy, row| {
        let fy = ((dy as f64 + 0.5) * scale_y - 0.5).clamp(0.0, (sh - 1) as f64);
        let y0 = fy.floor() as u32;
        let y1 = (y0 + 1).min(sh - 1);
        let wy = fy - y0 as f64;

        for dx in 0..dw {
            let fx = ((dx as f64 + 0.5) * scale_x - 0.5).clamp(0.0, (sw - 1) as f64);
            let x0 = fx.floor() as u32;
            let x1 = (x0 + 1).min(sw - 1);
            let wx = fx - x0 as f64;

            for ch in 0..c {
                let c00 = src.sample(x0, y0, ch);
                let c10 = src.sample(x1, y0, ch);
                let c01 = src.sample(x0, y1, ch);
                let c11 = src.sample(x1, y1, ch);

                let top = c00 + wx * (c10 - c00);
                let bot = c01 + wx * (c11 - c01);
                row[dx as usize * c + ch] = top + wy * (bot - top);
            }
        }
    });
}

/// Source taps and normalized weights for one output coordinate.
struct Taps {
    first: usize,
    weights: Vec<f64>,
}

fn taps(src_len: u32, dst_len: u32, interp: Interpolation) -> Vec<Taps> {
    let scale = src_len as f64 / dst_len as f64;
    let stretch = scale.max(1.0);
    let support = interp.support() * stretch;
    let last = src_len as isize - 1;

    (0..dst_len)
        .map(|d| {
            let center = (d as f64 + 0.5) * scale - 0.5;
            let lo = ((center - support).floor() as isize).clamp(0, last);
            let hi = ((center + support).ceil() as isize).clamp(0, last);
            let mut weights: Vec<f64> = (lo..=hi)
                .map(|s| interp.weight((s as f64 - center) / stretch))
                .collect();
            let sum: f64 = weights.iter().sum();
            if sum.abs() > f64::EPSILON {
                weights.iter_mut().for_each(|w| *w /= sum);
            } else {
                // Degenerate footprint: fall back to the nearest tap.
                weights.iter_mut().for_each(|w| *w = 0.0);
                let nearest = (center.round() as isize).clamp(lo, hi) - lo;
                weights[nearest as usize] = 1.0;
            }
            Taps {
                first: lo as usize,
                weights,
            }
        })
        .collect()
}

fn separable(backend: &CpuBackend, src: &CpuBuffer, dst: &mut CpuBuffer, interp: Interpolation) {
    let Size { width: sw, height: sh } = src.size();
    let Size { width: dw, height: dh } = dst.size();
    let c = src.channels() as usize;

    // Horizontal pass: sw x sh -> dw x sh
    let htaps = taps(sw, dw, interp);
    let temp_row = dw as usize * c;
    let mut temp = vec![0.0f64; temp_row * sh as usize];
    backend.for_each_row(&mut temp, temp_row, |y, row| {
        let src_row = &src.data()[y * src.row_len()..(y + 1) * src.row_len()];
        for (dx, t) in htaps.iter().enumerate() {
            for ch in 0..c {
                let acc: f64 = t
                    .weights
                    .iter()
                    .enumerate()
                    .map(|(i, w)| src_row[(t.first + i) * c + ch] * w)
                    .sum();
                row[dx * c + ch] = acc;
            }
        }
    });

    // Vertical pass: dw x sh -> dw x dh
    let vtaps = taps(sh, dh, interp);
    backend.for_each_row(dst.data_mut(), temp_row, |dy, row| {
        let t = &vtaps[dy];
        row.fill(0.0);
        for (i, w) in t.weights.iter().enumerate() {
            let src_row = &temp[(t.first + i) * temp_row..(t.first + i + 1) * temp_row];
            for (out, v) in row.iter_mut().zip(src_row) {
                *out += v * w;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_taps_normalized() {
        for interp in [Interpolation::Area, Interpolation::Cubic, Interpolation::Lanczos4] {
            for t in taps(64, 17, interp) {
                let sum: f64 = t.weights.iter().sum();
                assert_relative_eq!(sum, 1.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_taps_identity_scale() {
        for t in taps(8, 8, Interpolation::Cubic) {
            let peak = t
                .weights
                .iter()
                .cloned()
                .fold(f64::MIN, f64::max);
            assert_relative_eq!(peak, 1.0, epsilon = 1e-9);
        }
    }
}
