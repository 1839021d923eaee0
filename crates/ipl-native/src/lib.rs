//! # ipl-native
//!
//! The native backend seam: buffer allocation, release and the image
//! primitives the resource model is built on.
//!
//! - [`NativeBackend`] / [`NativeBuffer`] - the backend interface
//! - [`CpuBackend`] - in-process reference implementation with an
//!   allocation ledger
//! - [`params`] - interpolation, warp, smoothing, color and load options
//!
//! ## Feature Flags
//!
//! - `parallel` (default) - row-parallel CPU kernels via rayon
//! - `serde` - Serialization for parameter types and [`CpuConfig`]

#![warn(missing_docs)]

pub mod backend;
pub mod cpu;
pub mod params;

pub use backend::{AffineMatrix, BufferId, NativeBackend, NativeBuffer};
pub use cpu::{CpuBackend, CpuBuffer, CpuConfig};
pub use params::{ColorConversion, Interpolation, LoadMode, SmoothKind, SmoothParams, WarpFlags};
