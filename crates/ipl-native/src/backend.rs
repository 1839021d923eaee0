//! Native backend abstraction.
//!
//! The backend owns buffer memory and performs all pixel math. Callers only
//! decide which primitive to run on which buffers.
//!
//! # Architecture
//!
//! ```text
//! ipl-image (Image, transforms)
//!     └── NativeBackend (allocate, release, primitives)
//!             ├── CpuBackend (in-process reference implementation)
//!             └── ... any other implementation of the trait
//! ```
//!
//! Buffers are plain owned values of the associated [`NativeBackend::Buffer`]
//! type. Handing one to [`NativeBackend::release_image`] consumes it, so a
//! buffer can only ever be released once.

use std::fmt;
use std::path::Path;

use ipl_core::{NativeType, Point2f, Result, Scalar, Size};

use crate::params::{ColorConversion, Interpolation, LoadMode, SmoothParams, WarpFlags};

/// Identity of a native buffer, stable for the buffer's lifetime.
///
/// Every allocation (including clones) yields a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u64);

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A native pixel buffer.
pub trait NativeBuffer: Send + Sync + 'static {
    /// Buffer identity.
    fn id(&self) -> BufferId;

    /// Width and height.
    fn size(&self) -> Size;

    /// Depth code and channel count.
    fn native_type(&self) -> NativeType;

    /// Depth code.
    fn depth(&self) -> u32 {
        self.native_type().depth
    }

    /// Channel count.
    fn channels(&self) -> u32 {
        self.native_type().channels
    }
}

/// 2x3 affine transform `[a b tx; c d ty]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMatrix(pub [[f64; 3]; 2]);

impl AffineMatrix {
    /// Identity transform.
    pub const IDENTITY: Self = Self([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);

    /// Maps a point through the transform.
    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let [[a, b, tx], [c, d, ty]] = self.0;
        (a * x + b * y + tx, c * x + d * y + ty)
    }

    /// Inverse transform, or `None` if the linear part is singular.
    pub fn invert(&self) -> Option<Self> {
        let [[a, b, tx], [c, d, ty]] = self.0;
        let det = a * d - b * c;
        if det.abs() < f64::EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        let (ia, ib, ic, id) = (d * inv, -b * inv, -c * inv, a * inv);
        Some(Self([
            [ia, ib, -(ia * tx + ib * ty)],
            [ic, id, -(ic * tx + id * ty)],
        ]))
    }
}

/// Native image primitives.
///
/// Shape and type agreement between operands is checked by the backend;
/// violations are [`ipl_core::Error::Backend`].
pub trait NativeBackend: Send + Sync {
    /// Backend-specific buffer type.
    type Buffer: NativeBuffer;

    /// Backend name.
    fn name(&self) -> &'static str;

    /// Allocates a zero-filled buffer.
    fn create_image(&self, size: Size, ty: NativeType) -> Result<Self::Buffer>;

    /// Returns a buffer to the backend.
    fn release_image(&self, buffer: Self::Buffer);

    /// Reads the element at a linear index.
    fn get_1d(&self, buffer: &Self::Buffer, index: u32) -> Result<Scalar>;

    /// Reads the element at `(row, col)`.
    fn get_2d(&self, buffer: &Self::Buffer, row: u32, col: u32) -> Result<Scalar>;

    /// Reads the element at a three-axis index.
    fn get_3d(&self, buffer: &Self::Buffer, i: u32, j: u32, k: u32) -> Result<Scalar>;

    /// Writes the element at `(row, col)`; only the first `channels` slots are used.
    fn set_2d(&self, buffer: &mut Self::Buffer, row: u32, col: u32, value: Scalar) -> Result<()>;

    /// Writes one value into a single-channel buffer at `(row, col)`.
    fn set_real_2d(&self, buffer: &mut Self::Buffer, row: u32, col: u32, value: f64) -> Result<()>;

    /// Resamples `src` into `dst`, whose size selects the output shape.
    fn resize(&self, src: &Self::Buffer, dst: &mut Self::Buffer, interp: Interpolation) -> Result<()>;

    /// Matrix rotating by `angle` degrees (counter-clockwise) about `center`
    /// with isotropic `scale`.
    fn rotation_matrix_2d(&self, center: Point2f, angle: f64, scale: f64) -> AffineMatrix {
        let (sin, cos) = angle.to_radians().sin_cos();
        let alpha = scale * cos;
        let beta = scale * sin;
        let (cx, cy) = (center.x as f64, center.y as f64);
        AffineMatrix([
            [alpha, beta, (1.0 - alpha) * cx - beta * cy],
            [-beta, alpha, beta * cx + (1.0 - alpha) * cy],
        ])
    }

    /// Applies an affine transform from `src` into `dst`.
    fn warp_affine(
        &self,
        src: &Self::Buffer,
        dst: &mut Self::Buffer,
        matrix: &AffineMatrix,
        flags: WarpFlags,
        fill: Scalar,
    ) -> Result<()>;

    /// Smooths `src` into `dst`.
    fn smooth(&self, src: &Self::Buffer, dst: &mut Self::Buffer, params: &SmoothParams) -> Result<()>;

    /// Maps every element of `src` through a 256-entry table.
    fn lut(&self, src: &Self::Buffer, dst: &mut Self::Buffer, table: &Self::Buffer) -> Result<()>;

    /// Scatters the channels of `src` into single-channel buffers.
    fn split(&self, src: &Self::Buffer, dst: &mut [&mut Self::Buffer]) -> Result<()>;

    /// Copies pixel data between buffers of identical shape and type.
    fn copy(&self, src: &Self::Buffer, dst: &mut Self::Buffer) -> Result<()>;

    /// Allocates an independent duplicate of `src`.
    fn clone_image(&self, src: &Self::Buffer) -> Result<Self::Buffer>;

    /// Converts between color layouts.
    fn cvt_color(&self, src: &Self::Buffer, dst: &mut Self::Buffer, code: ColorConversion) -> Result<()>;

    /// Decodes an image file into a new buffer.
    fn load_image(&self, path: &Path, mode: LoadMode) -> Result<Self::Buffer>;
}
