//! CPU buffer storage and the allocation ledger.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use ipl_core::encoding::{
    IPL_DEPTH_8S, IPL_DEPTH_8U, IPL_DEPTH_16S, IPL_DEPTH_16U, IPL_DEPTH_32F, IPL_DEPTH_32S,
    IPL_DEPTH_64F,
};
use ipl_core::{Error, NativeType, Result, Size};

use crate::backend::{BufferId, NativeBuffer};

/// Allocation counters shared by a backend and every buffer it produced.
#[derive(Debug, Default)]
pub(crate) struct Ledger {
    next_id: AtomicU64,
    allocated: AtomicU64,
    released: AtomicU64,
}

impl Ledger {
    pub(crate) fn issue(&self) -> BufferId {
        self.allocated.fetch_add(1, Ordering::Relaxed);
        BufferId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    pub(crate) fn allocated(&self) -> u64 {
        self.allocated.load(Ordering::Relaxed)
    }

    pub(crate) fn released(&self) -> u64 {
        self.released.load(Ordering::Relaxed)
    }
}

/// Image buffer held in RAM.
///
/// Samples are kept widened to `f64`, interleaved, row-major. Every write
/// saturates to the buffer's depth, so an 8-bit unsigned buffer only ever
/// holds integers in `0..=255`.
pub struct CpuBuffer {
    id: BufferId,
    size: Size,
    ty: NativeType,
    data: Vec<f64>,
    ledger: Arc<Ledger>,
}

impl CpuBuffer {
    /// Allocates a zero-filled buffer.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidDimensions`] if the sample count overflows `usize`;
    /// [`Error::Backend`] if the memory cannot be reserved.
    pub(crate) fn zeroed(ledger: &Arc<Ledger>, size: Size, ty: NativeType) -> Result<Self> {
        let len = (size.width as usize)
            .checked_mul(size.height as usize)
            .and_then(|n| n.checked_mul(ty.channels as usize))
            .ok_or_else(|| {
                Error::invalid_dimensions(size.width, size.height, "sample count overflows")
            })?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|e| Error::backend("create_image", e.to_string()))?;
        data.resize(len, 0.0);
        Ok(Self {
            id: ledger.issue(),
            size,
            ty,
            data,
            ledger: Arc::clone(ledger),
        })
    }

    pub(crate) fn duplicate(&self) -> Self {
        Self {
            id: self.ledger.issue(),
            size: self.size,
            ty: self.ty,
            data: self.data.clone(),
            ledger: Arc::clone(&self.ledger),
        }
    }

    /// Interleaved samples.
    #[inline]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub(crate) fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Samples per row.
    #[inline]
    pub fn row_len(&self) -> usize {
        self.size.width as usize * self.ty.channels as usize
    }

    #[inline]
    pub(crate) fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.size.width as usize + x as usize) * self.ty.channels as usize
    }

    /// Sample at column `x`, row `y`, channel `c`. Coordinates must be in range.
    #[inline]
    pub fn sample(&self, x: u32, y: u32, c: usize) -> f64 {
        self.data[self.offset(x, y) + c]
    }

    /// Writes a sample, saturating to the buffer depth.
    #[inline]
    pub(crate) fn store(&mut self, x: u32, y: u32, c: usize, v: f64) {
        let i = self.offset(x, y) + c;
        self.data[i] = saturate(self.ty.depth, v);
    }

    /// Whether `(x, y)` lies inside the buffer.
    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.size.width && y < self.size.height
    }
}

impl NativeBuffer for CpuBuffer {
    fn id(&self) -> BufferId {
        self.id
    }

    fn size(&self) -> Size {
        self.size
    }

    fn native_type(&self) -> NativeType {
        self.ty
    }
}

impl Drop for CpuBuffer {
    fn drop(&mut self) {
        self.ledger.released.fetch_add(1, Ordering::Relaxed);
    }
}

impl std::fmt::Debug for CpuBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuBuffer")
            .field("id", &self.id)
            .field("size", &self.size)
            .field("type", &self.ty)
            .finish()
    }
}

/// Rounds and clamps `v` to what a buffer of `depth` can hold.
#[inline]
pub(crate) fn saturate(depth: u32, v: f64) -> f64 {
    let clamp_round = |lo: f64, hi: f64| v.round_ties_even().clamp(lo, hi);
    match depth {
        IPL_DEPTH_8U => clamp_round(0.0, u8::MAX as f64),
        IPL_DEPTH_8S => clamp_round(i8::MIN as f64, i8::MAX as f64),
        IPL_DEPTH_16U => clamp_round(0.0, u16::MAX as f64),
        IPL_DEPTH_16S => clamp_round(i16::MIN as f64, i16::MAX as f64),
        IPL_DEPTH_32S => clamp_round(i32::MIN as f64, i32::MAX as f64),
        IPL_DEPTH_32F => v as f32 as f64,
        IPL_DEPTH_64F => v,
        _ => v,
    }
}

/// Saturates a whole slice in place.
pub(crate) fn saturate_all(depth: u32, data: &mut [f64]) {
    if depth == IPL_DEPTH_64F {
        return;
    }
    for v in data {
        *v = saturate(depth, *v);
    }
}
