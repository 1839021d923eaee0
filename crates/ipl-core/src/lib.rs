//! # ipl-core
//!
//! Core types for images whose pixels live in a native backend.
//!
//! This crate provides the foundational types used throughout the ipl workspace:
//!
//! - [`MatType`] - Pixel type descriptor and its named catalog ([`format`])
//! - [`NativeType`] - The backend's depth/channel encoding ([`encoding`])
//! - [`Size`], [`Rect`], [`Scalar`], [`Position`] - Geometry and value exchange
//! - [`Error`] - The error type shared by every ipl crate
//!
//! ## Crate Structure
//!
//! ```text
//! ipl-core (this crate)
//!    ^
//!    |
//!    +-- ipl-native (backend trait, CPU reference backend)
//!    +-- ipl-image  (Image resource model, transforms, pixel access)
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - Serialization for [`Size`], [`Rect`], [`Scalar`] and [`MatType`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod encoding;
pub mod error;
pub mod format;
pub mod geom;

pub use encoding::{NativeType, from_native, is_realizable, to_native};
pub use error::{Error, Result};
pub use format::{ElemKind, MatType};
pub use geom::{Point2f, Position, Rect, Scalar, Size};

/// Prelude module for convenient imports.
///
/// ```
/// use ipl_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::format::*;
    pub use crate::geom::{Point2f, Position, Rect, Scalar, Size};
}
