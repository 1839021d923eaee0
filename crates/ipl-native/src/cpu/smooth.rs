//! Smoothing kernels: Gaussian, box and median.
//!
//! Borders clamp to the nearest edge pixel. Gaussian and box filters run as
//! two 1D passes through an `f64` scratch plane.

use ipl_core::{Error, Result};

use super::CpuBackend;
use super::buffer::{CpuBuffer, saturate, saturate_all};
use crate::backend::NativeBuffer;
use crate::params::{SmoothKind, SmoothParams};

pub(super) fn smooth(
    backend: &CpuBackend,
    src: &CpuBuffer,
    dst: &mut CpuBuffer,
    params: &SmoothParams,
) -> Result<()> {
    let kw = params.aperture_width;
    let kh = if params.aperture_height == 0 { kw } else { params.aperture_height };
    if kw == 0 {
        return Err(Error::backend("smooth", "aperture must be positive"));
    }

    match params.kind {
        SmoothKind::Gaussian => {
            require_odd(kw, kh)?;
            let sx = if params.sigma_x > 0.0 { params.sigma_x } else { derived_sigma(kw) };
            let sy = if params.sigma_y > 0.0 {
                params.sigma_y
            } else if params.sigma_x > 0.0 {
                params.sigma_x
            } else {
                derived_sigma(kh)
            };
            let kx = gaussian_kernel(kw, sx);
            let ky = gaussian_kernel(kh, sy);
            separable(backend, src, dst, &kx, &ky);
        }
        SmoothKind::Blur => {
            let kx = vec![1.0 / kw as f64; kw as usize];
            let ky = vec![1.0 / kh as f64; kh as usize];
            separable(backend, src, dst, &kx, &ky);
        }
        SmoothKind::Median => {
            require_odd(kw, kh)?;
            median(backend, src, dst, kw as usize, kh as usize);
        }
    }
    Ok(())
}

fn require_odd(kw: u32, kh: u32) -> Result<()> {
    if kw % 2 == 0 || kh % 2 == 0 {
        return Err(Error::backend(
            "smooth",
            format!("aperture {kw}x{kh} must be odd"),
        ));
    }
    Ok(())
}

/// Sigma used when the caller passes zero.
#[inline]
pub(crate) fn derived_sigma(aperture: u32) -> f64 {
    0.3 * ((aperture as f64 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Normalized 1D Gaussian weights of length `n`.
pub(crate) fn gaussian_kernel(n: u32, sigma: f64) -> Vec<f64> {
    let half = (n / 2) as f64;
    let denom = 2.0 * sigma * sigma;
    let mut k: Vec<f64> = (0..n)
        .map(|i| {
            let d = i as f64 - half;
            (-(d * d) / denom).exp()
        })
        .collect();
    let sum: f64 = k.iter().sum();
    for w in &mut k {
        *w /= sum;
    }
    k
}

#[inline]
fn clamp_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

fn separable(backend: &CpuBackend, src: &CpuBuffer, dst: &mut CpuBuffer, kx: &[f64], ky: &[f64]) {
    let w = src.size().width as usize;
    let h = src.size().height as usize;
    let c = src.channels() as usize;
    let row_len = src.row_len();
    let ax = (kx.len() / 2) as isize;
    let ay = (ky.len() / 2) as isize;

    let mut temp = vec![0.0f64; row_len * h];
    backend.for_each_row(&mut temp, row_len, |y, row| {
        let src_row = &src.data()[y * row_len..(y + 1) * row_len];
        for x in 0..w {
            for ch in 0..c {
                let mut acc = 0.0;
                for (i, k) in kx.iter().enumerate() {
                    let sx = clamp_index(x as isize + i as isize - ax, w);
                    acc += src_row[sx * c + ch] * k;
                }
                row[x * c + ch] = acc;
            }
        }
    });

    backend.for_each_row(dst.data_mut(), row_len, |y, row| {
        row.fill(0.0);
        for (i, k) in ky.iter().enumerate() {
            let sy = clamp_index(y as isize + i as isize - ay, h);
            let src_row = &temp[sy * row_len..(sy + 1) * row_len];
            for (out, v) in row.iter_mut().zip(src_row) {
                *out += v * k;
            }
        }
    });

    saturate_all(dst.depth(), dst.data_mut());
}

fn median(backend: &CpuBackend, src: &CpuBuffer, dst: &mut CpuBuffer, kw: usize, kh: usize) {
    let w = src.size().width as usize;
    let h = src.size().height as usize;
    let c = src.channels() as usize;
    let depth = dst.depth();
    let row_len = src.row_len();
    let (rx, ry) = ((kw / 2) as isize, (kh / 2) as isize);
    let mid = kw * kh / 2;

    backend.for_each_row(dst.data_mut(), row_len, |y, row| {
        let mut window = Vec::with_capacity(kw * kh);
        for x in 0..w {
            for ch in 0..c {
                window.clear();
                for ky in -ry..=ry {
                    let sy = clamp_index(y as isize + ky, h);
                    for kx in -rx..=rx {
                        let sx = clamp_index(x as isize + kx, w);
                        window.push(src.data()[(sy * w + sx) * c + ch]);
                    }
                }
                window.sort_by(|a, b| a.total_cmp(b));
                row[x * c + ch] = saturate(depth, window[mid]);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gaussian_kernel_normalized_and_symmetric() {
        let k = gaussian_kernel(7, derived_sigma(7));
        assert_relative_eq!(k.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        for i in 0..3 {
            assert_relative_eq!(k[i], k[6 - i], epsilon = 1e-12);
        }
        assert!(k[3] > k[2]);
    }

    #[test]
    fn test_derived_sigma() {
        assert_relative_eq!(derived_sigma(3), 0.8);
        assert_relative_eq!(derived_sigma(5), 1.1, epsilon = 1e-12);
    }
}
