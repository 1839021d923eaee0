//! In-process reference backend.
//!
//! Buffers live in RAM. Row loops fan out over the rayon pool when the
//! `parallel` feature is enabled and the image is tall enough. The backend
//! keeps an allocation ledger so callers and tests can verify that every
//! buffer it hands out comes back exactly once.
//!
//! # Usage
//!
//! ```rust
//! use ipl_core::{NativeType, Size};
//! use ipl_core::encoding::IPL_DEPTH_8U;
//! use ipl_native::{CpuBackend, NativeBackend};
//!
//! let backend = CpuBackend::new();
//! let buf = backend.create_image(Size::new(4, 4), NativeType::new(IPL_DEPTH_8U, 3)).unwrap();
//! assert_eq!(backend.live_buffers(), 1);
//! backend.release_image(buf);
//! assert_eq!(backend.live_buffers(), 0);
//! ```
//!
//! # Configuration
//!
//! [`CpuConfig::from_env`] reads:
//!
//! - `IPL_CPU_PARALLEL` - `0`/`false` disables row parallelism
//! - `IPL_CPU_MIN_PARALLEL_ROWS` - images with fewer rows run serially

mod buffer;
mod decode;
mod pointwise;
mod resample;
mod smooth;
mod warp;

use std::env;
use std::path::Path;
use std::sync::Arc;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, trace};

use ipl_core::encoding::{
    IPL_DEPTH_8S, IPL_DEPTH_8U, IPL_DEPTH_16S, IPL_DEPTH_16U, IPL_DEPTH_32F, IPL_DEPTH_32S,
    IPL_DEPTH_64F, MAX_CHANNELS,
};
use ipl_core::{Error, NativeType, Result, Scalar, Size};

pub use buffer::CpuBuffer;
use buffer::Ledger;

use crate::backend::{AffineMatrix, NativeBackend, NativeBuffer};
use crate::params::{ColorConversion, Interpolation, LoadMode, SmoothParams, WarpFlags};

/// Tuning knobs for [`CpuBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CpuConfig {
    /// Split row loops across the rayon pool.
    pub parallel: bool,
    /// Images with fewer rows than this run serially.
    pub min_parallel_rows: usize,
}

impl Default for CpuConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            min_parallel_rows: 64,
        }
    }
}

impl CpuConfig {
    /// Defaults overridden by `IPL_CPU_*` environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            parallel: env_parallel().unwrap_or(defaults.parallel),
            min_parallel_rows: env_min_parallel_rows().unwrap_or(defaults.min_parallel_rows),
        }
    }
}

fn env_parallel() -> Option<bool> {
    env::var("IPL_CPU_PARALLEL")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

fn env_min_parallel_rows() -> Option<usize> {
    env::var("IPL_CPU_MIN_PARALLEL_ROWS")
        .ok()
        .and_then(|v| v.parse().ok())
}

/// CPU implementation of [`NativeBackend`].
#[derive(Debug)]
pub struct CpuBackend {
    ledger: Arc<Ledger>,
    config: CpuConfig,
}

impl CpuBackend {
    /// Backend with [`CpuConfig::default`].
    pub fn new() -> Self {
        Self::with_config(CpuConfig::default())
    }

    /// Backend with explicit tuning.
    pub fn with_config(config: CpuConfig) -> Self {
        debug!(?config, "CPU backend created");
        Self {
            ledger: Arc::new(Ledger::default()),
            config,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> CpuConfig {
        self.config
    }

    /// Buffers allocated so far (including clones and decoded files).
    pub fn allocated(&self) -> u64 {
        self.ledger.allocated()
    }

    /// Buffers returned so far.
    pub fn released(&self) -> u64 {
        self.ledger.released()
    }

    /// Buffers currently outstanding.
    pub fn live_buffers(&self) -> u64 {
        self.allocated().saturating_sub(self.released())
    }

    /// Runs `f(row_index, row)` over `data` split into rows of `row_len`.
    pub(crate) fn for_each_row<F>(&self, data: &mut [f64], row_len: usize, f: F)
    where
        F: Fn(usize, &mut [f64]) + Send + Sync,
    {
        if row_len == 0 {
            return;
        }
        #[cfg(feature = "parallel")]
        {
            if self.config.parallel && data.len() / row_len >= self.config.min_parallel_rows {
                data.par_chunks_mut(row_len)
                    .enumerate()
                    .for_each(|(y, row)| f(y, row));
                return;
            }
        }
        data.chunks_mut(row_len)
            .enumerate()
            .for_each(|(y, row)| f(y, row));
    }

    fn check_depth(ty: NativeType) -> Result<()> {
        match ty.depth {
            IPL_DEPTH_8U | IPL_DEPTH_8S | IPL_DEPTH_16U | IPL_DEPTH_16S | IPL_DEPTH_32S
            | IPL_DEPTH_32F | IPL_DEPTH_64F
                if (1..=MAX_CHANNELS).contains(&ty.channels) =>
            {
                Ok(())
            }
            _ => Err(Error::backend(
                "create_image",
                format!("depth {:#x} with {} channels is not allocatable", ty.depth, ty.channels),
            )),
        }
    }

    fn element(op: &'static str, buffer: &CpuBuffer, row: u32, col: u32) -> Result<Scalar> {
        if !buffer.contains(col, row) {
            return Err(out_of_range(op, buffer, row, col));
        }
        let mut s = Scalar::default();
        for ch in 0..buffer.channels() as usize {
            s[ch] = buffer.sample(col, row, ch);
        }
        Ok(s)
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn out_of_range(op: &'static str, buffer: &CpuBuffer, row: u32, col: u32) -> Error {
    let size = buffer.size();
    Error::backend(
        op,
        format!("(row {row}, col {col}) outside {}x{}", size.width, size.height),
    )
}

impl NativeBackend for CpuBackend {
    type Buffer = CpuBuffer;

    fn name(&self) -> &'static str {
        "cpu"
    }

    fn create_image(&self, size: Size, ty: NativeType) -> Result<CpuBuffer> {
        if size.is_empty() {
            return Err(Error::invalid_dimensions(
                size.width,
                size.height,
                "width and height must be positive",
            ));
        }
        Self::check_depth(ty)?;
        let buf = CpuBuffer::zeroed(&self.ledger, size, ty)?;
        trace!(id = %buf.id(), width = size.width, height = size.height, ty = %ty, "create_image");
        Ok(buf)
    }

    fn release_image(&self, buffer: CpuBuffer) {
        trace!(id = %buffer.id(), "release_image");
        drop(buffer);
    }

    fn get_1d(&self, buffer: &CpuBuffer, index: u32) -> Result<Scalar> {
        let w = buffer.size().width;
        Self::element("get_1d", buffer, index / w, index % w)
    }

    fn get_2d(&self, buffer: &CpuBuffer, row: u32, col: u32) -> Result<Scalar> {
        Self::element("get_2d", buffer, row, col)
    }

    fn get_3d(&self, _buffer: &CpuBuffer, _i: u32, _j: u32, _k: u32) -> Result<Scalar> {
        Err(Error::backend("get_3d", "buffer is not three-dimensional"))
    }

    fn set_2d(&self, buffer: &mut CpuBuffer, row: u32, col: u32, value: Scalar) -> Result<()> {
        if !buffer.contains(col, row) {
            return Err(out_of_range("set_2d", buffer, row, col));
        }
        for ch in 0..buffer.channels() as usize {
            buffer.store(col, row, ch, value[ch]);
        }
        Ok(())
    }

    fn set_real_2d(&self, buffer: &mut CpuBuffer, row: u32, col: u32, value: f64) -> Result<()> {
        if buffer.channels() != 1 {
            return Err(Error::backend("set_real_2d", "buffer must be single-channel"));
        }
        if !buffer.contains(col, row) {
            return Err(out_of_range("set_real_2d", buffer, row, col));
        }
        buffer.store(col, row, 0, value);
        Ok(())
    }

    fn resize(&self, src: &CpuBuffer, dst: &mut CpuBuffer, interp: Interpolation) -> Result<()> {
        if src.native_type() != dst.native_type() {
            return Err(Error::backend(
                "resize",
                format!("type mismatch: {} vs {}", src.native_type(), dst.native_type()),
            ));
        }
        debug!(
            src = %src.id(), dst = %dst.id(),
            from_w = src.size().width, from_h = src.size().height,
            to_w = dst.size().width, to_h = dst.size().height,
            ?interp, "resize"
        );
        resample::resize(self, src, dst, interp);
        Ok(())
    }

    fn warp_affine(
        &self,
        src: &CpuBuffer,
        dst: &mut CpuBuffer,
        matrix: &AffineMatrix,
        flags: WarpFlags,
        fill: Scalar,
    ) -> Result<()> {
        if src.native_type() != dst.native_type() {
            return Err(Error::backend(
                "warp_affine",
                format!("type mismatch: {} vs {}", src.native_type(), dst.native_type()),
            ));
        }
        debug!(src = %src.id(), dst = %dst.id(), ?matrix, ?flags, "warp_affine");
        warp::warp_affine(self, src, dst, matrix, flags, fill)
    }

    fn smooth(&self, src: &CpuBuffer, dst: &mut CpuBuffer, params: &SmoothParams) -> Result<()> {
        if src.size() != dst.size() || src.native_type() != dst.native_type() {
            return Err(Error::backend("smooth", "source and destination differ in shape or type"));
        }
        debug!(src = %src.id(), dst = %dst.id(), ?params, "smooth");
        smooth::smooth(self, src, dst, params)
    }

    fn lut(&self, src: &CpuBuffer, dst: &mut CpuBuffer, table: &CpuBuffer) -> Result<()> {
        debug!(src = %src.id(), dst = %dst.id(), table = %table.id(), "lut");
        pointwise::lut(self, src, dst, table)
    }

    fn split(&self, src: &CpuBuffer, dst: &mut [&mut CpuBuffer]) -> Result<()> {
        debug!(src = %src.id(), planes = dst.len(), "split");
        pointwise::split(src, dst)
    }

    fn copy(&self, src: &CpuBuffer, dst: &mut CpuBuffer) -> Result<()> {
        trace!(src = %src.id(), dst = %dst.id(), "copy");
        pointwise::copy(src, dst)
    }

    fn clone_image(&self, src: &CpuBuffer) -> Result<CpuBuffer> {
        let buf = src.duplicate();
        trace!(src = %src.id(), id = %buf.id(), "clone_image");
        Ok(buf)
    }

    fn cvt_color(&self, src: &CpuBuffer, dst: &mut CpuBuffer, code: ColorConversion) -> Result<()> {
        debug!(src = %src.id(), dst = %dst.id(), ?code, "cvt_color");
        pointwise::cvt_color(self, src, dst, code)
    }

    fn load_image(&self, path: &Path, mode: LoadMode) -> Result<CpuBuffer> {
        let buf = decode::load(&self.ledger, path, mode)?;
        debug!(path = %path.display(), id = %buf.id(), ty = %buf.native_type(), ?mode, "load_image");
        Ok(buf)
    }
}
