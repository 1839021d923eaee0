//! File decoding through the `image` crate.

use std::path::Path;
use std::sync::Arc;

use ipl_core::encoding::IPL_DEPTH_8U;
use ipl_core::{Error, NativeType, Result, Size};

use super::buffer::{CpuBuffer, Ledger};
use crate::params::LoadMode;

/// Decodes `path` into an 8-bit buffer: BGR for [`LoadMode::Color`], one luma
/// channel for [`LoadMode::Grayscale`].
pub(super) fn load(ledger: &Arc<Ledger>, path: &Path, mode: LoadMode) -> Result<CpuBuffer> {
    let img = image::open(path)
        .map_err(|e| Error::resource_load(path.display().to_string(), e.to_string()))?;
    let size = Size::new(img.width(), img.height());
    if size.is_empty() {
        return Err(Error::resource_load(path.display().to_string(), "image is empty"));
    }

    match mode {
        LoadMode::Color => {
            let rgb = img.into_rgb8();
            let mut buf = CpuBuffer::zeroed(ledger, size, NativeType::new(IPL_DEPTH_8U, 3))?;
            for (out, px) in buf.data_mut().chunks_exact_mut(3).zip(rgb.pixels()) {
                let [r, g, b] = px.0;
                out[0] = b as f64;
                out[1] = g as f64;
                out[2] = r as f64;
            }
            Ok(buf)
        }
        LoadMode::Grayscale => {
            let gray = img.into_luma8();
            let mut buf = CpuBuffer::zeroed(ledger, size, NativeType::new(IPL_DEPTH_8U, 1))?;
            for (out, v) in buf.data_mut().iter_mut().zip(gray.as_raw()) {
                *out = *v as f64;
            }
            Ok(buf)
        }
    }
}
