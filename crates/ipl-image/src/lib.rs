//! # ipl-image
//!
//! Images whose pixels live in a native backend.
//!
//! [`Image`] owns exactly one native buffer (or none, as a placeholder),
//! caches its size and [`MatType`](ipl_core::MatType), and reuses the buffer
//! whenever an operation asks for the shape it already has. Transforms
//! decide the output shape and delegate pixel math to the
//! [`NativeBackend`](ipl_native::NativeBackend).
//!
//! ## Modules
//!
//! - [`resource`] - lifecycle: create, wrap, reinitialize, release, scalar access
//! - [`ops`] - resize, rotate, Gaussian blur, LUT, copy, split, color conversion
//! - [`pixel`] - color model and RGBA pixel access for generic consumers
//! - [`io`] / [`capture`] - glue for buffers produced by file and frame sources
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use ipl_core::{Size, format::CV_8UC3};
//! use ipl_image::{CpuImage, Lut};
//! use ipl_native::{CpuBackend, Interpolation};
//!
//! let backend = Arc::new(CpuBackend::new());
//! let img = CpuImage::create(&backend, Size::new(64, 64), CV_8UC3)?;
//!
//! let mut work = CpuImage::placeholder(&backend);
//! img.resize_to(&mut work, Size::new(32, 32), Interpolation::Linear)?;
//! let inverted = work.lut(&Lut::from_fn(|v| 255 - v))?;
//! assert_eq!(inverted.pixel_at(0, 0)?.to_rgba(), [255, 255, 255, 255]);
//! # Ok::<(), ipl_core::Error>(())
//! ```

#![warn(missing_docs)]

pub mod capture;
mod channels;
mod handle;
pub mod io;
pub mod ops;
pub mod pixel;
pub mod resource;

pub use capture::{Capture, FileSequence, FrameSource};
pub use channels::Channels;
pub use handle::NativeHandle;
pub use io::load_image;
pub use ops::Lut;
pub use pixel::{Color, ColorModel, PixelAccess, color_model_for};
pub use resource::{CpuImage, Image};
