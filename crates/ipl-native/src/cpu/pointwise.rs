//! Per-pixel kernels: table lookup, channel split, color conversion, copy.

use ipl_core::encoding::IPL_DEPTH_8U;
use ipl_core::{Error, Result};

use super::CpuBackend;
use super::buffer::{CpuBuffer, saturate};
use crate::backend::NativeBuffer;
use crate::params::ColorConversion;

/// Luma weights in R, G, B order.
const LUMA: [f64; 3] = [0.299, 0.587, 0.114];

fn require_same_size(op: &'static str, a: &CpuBuffer, b: &CpuBuffer) -> Result<()> {
    if a.size() != b.size() {
        return Err(Error::backend(
            op,
            format!(
                "size mismatch: {}x{} vs {}x{}",
                a.size().width,
                a.size().height,
                b.size().width,
                b.size().height
            ),
        ));
    }
    Ok(())
}

pub(super) fn copy(src: &CpuBuffer, dst: &mut CpuBuffer) -> Result<()> {
    require_same_size("copy", src, dst)?;
    if src.native_type() != dst.native_type() {
        return Err(Error::backend(
            "copy",
            format!("type mismatch: {} vs {}", src.native_type(), dst.native_type()),
        ));
    }
    dst.data_mut().copy_from_slice(src.data());
    Ok(())
}

pub(super) fn lut(backend: &CpuBackend, src: &CpuBuffer, dst: &mut CpuBuffer, table: &CpuBuffer) -> Result<()> {
    if src.depth() != IPL_DEPTH_8U {
        return Err(Error::backend("lut", "source must be 8-bit unsigned"));
    }
    if table.size().area() != 256 {
        return Err(Error::backend(
            "lut",
            format!("table must hold 256 entries, got {}", table.size().area()),
        ));
    }
    let c = src.channels() as usize;
    let tc = table.channels() as usize;
    if tc != 1 && tc != c {
        return Err(Error::backend(
            "lut",
            format!("table has {tc} channels, source has {c}"),
        ));
    }
    require_same_size("lut", src, dst)?;
    if dst.channels() as usize != c || dst.depth() != table.depth() {
        return Err(Error::backend(
            "lut",
            format!("destination {} does not match table {}", dst.native_type(), table.native_type()),
        ));
    }

    let depth = dst.depth();
    let row_len = dst.row_len();
    let t = table.data();
    backend.for_each_row(dst.data_mut(), row_len, |y, row| {
        let src_row = &src.data()[y * row_len..(y + 1) * row_len];
        for (i, (out, v)) in row.iter_mut().zip(src_row).enumerate() {
            let ch = if tc == 1 { 0 } else { i % c };
            *out = saturate(depth, t[*v as usize * tc + ch]);
        }
    });
    Ok(())
}

pub(super) fn split(src: &CpuBuffer, dst: &mut [&mut CpuBuffer]) -> Result<()> {
    let c = src.channels() as usize;
    if dst.len() != c {
        return Err(Error::backend(
            "split",
            format!("{} destinations for {c} channels", dst.len()),
        ));
    }
    for d in dst.iter() {
        require_same_size("split", src, d)?;
        if d.channels() != 1 || d.depth() != src.depth() {
            return Err(Error::backend(
                "split",
                format!("destination {} is not single-channel {}", d.native_type(), src.native_type()),
            ));
        }
    }

    for (ch, d) in dst.iter_mut().enumerate() {
        for (out, px) in d.data_mut().iter_mut().zip(src.data().chunks_exact(c)) {
            *out = px[ch];
        }
    }
    Ok(())
}

pub(super) fn cvt_color(
    backend: &CpuBackend,
    src: &CpuBuffer,
    dst: &mut CpuBuffer,
    code: ColorConversion,
) -> Result<()> {
    require_same_size("cvt_color", src, dst)?;
    if src.channels() != code.src_channels() || dst.channels() != code.dst_channels() {
        return Err(Error::backend(
            "cvt_color",
            format!(
                "{code:?} needs {} -> {} channels, got {} -> {}",
                code.src_channels(),
                code.dst_channels(),
                src.channels(),
                dst.channels()
            ),
        ));
    }
    if src.depth() != dst.depth() {
        return Err(Error::backend("cvt_color", "source and destination depth differ"));
    }

    let sc = src.channels() as usize;
    let depth = dst.depth();
    let row_len = dst.row_len();
    let src_row_len = src.row_len();

    backend.for_each_row(dst.data_mut(), row_len, |y, row| {
        let src_row = &src.data()[y * src_row_len..(y + 1) * src_row_len];
        match code {
            ColorConversion::BgrToRgb | ColorConversion::RgbToBgr => {
                for (out, px) in row.chunks_exact_mut(3).zip(src_row.chunks_exact(3)) {
                    out[0] = px[2];
                    out[1] = px[1];
                    out[2] = px[0];
                }
            }
            ColorConversion::BgrToGray => {
                for (out, px) in row.iter_mut().zip(src_row.chunks_exact(sc)) {
                    *out = saturate(depth, LUMA[0] * px[2] + LUMA[1] * px[1] + LUMA[2] * px[0]);
                }
            }
            ColorConversion::RgbToGray => {
                for (out, px) in row.iter_mut().zip(src_row.chunks_exact(sc)) {
                    *out = saturate(depth, LUMA[0] * px[0] + LUMA[1] * px[1] + LUMA[2] * px[2]);
                }
            }
            ColorConversion::GrayToBgr | ColorConversion::GrayToRgb => {
                for (out, v) in row.chunks_exact_mut(3).zip(src_row) {
                    out.fill(*v);
                }
            }
        }
    });
    Ok(())
}
