//! Error types shared by every ipl crate.
//!
//! All failure modes of the image resource model are recoverable and
//! surface as [`Error`] values. Nothing in the workspace aborts the process
//! over an unsupported pixel type or a placeholder image.
//!
//! # Categories
//!
//! - **Type errors**: [`UnsupportedType`](Error::UnsupportedType),
//!   [`UnrecognizedNativeType`](Error::UnrecognizedNativeType),
//!   [`UnsupportedChannelCount`](Error::UnsupportedChannelCount)
//! - **Lifecycle errors**: [`UninitializedUse`](Error::UninitializedUse)
//! - **Shape errors**: [`ChannelCountMismatch`](Error::ChannelCountMismatch),
//!   [`InvalidDimensions`](Error::InvalidDimensions)
//! - **Collaborator errors**: [`ResourceLoad`](Error::ResourceLoad),
//!   [`Backend`](Error::Backend)
//!
//! # Usage
//!
//! ```rust
//! use ipl_core::{Error, Result};
//!
//! fn require_channels(expected: usize, actual: usize) -> Result<()> {
//!     if expected != actual {
//!         return Err(Error::channel_count_mismatch(expected, actual));
//!     }
//!     Ok(())
//! }
//!
//! assert!(require_channels(3, 1).unwrap_err().is_shape_error());
//! ```

use thiserror::Error;

use crate::format::MatType;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the image resource model and the native backend.
#[derive(Debug, Error)]
pub enum Error {
    /// A requested or observed pixel type has no realization in the native
    /// backend's implemented subset.
    #[error("unsupported pixel type {ty}")]
    UnsupportedType {
        /// The offending type descriptor
        ty: MatType,
    },

    /// A native buffer reports a depth/channel pair outside the known catalog.
    #[error("unrecognized native type (depth {depth:#x}, {channels} channels)")]
    UnrecognizedNativeType {
        /// Native depth code
        depth: u32,
        /// Native channel count
        channels: u32,
    },

    /// A color model was requested for a channel count other than 1 or 3.
    #[error("unsupported channel count {0}: only 1 (gray) and 3 (color) are supported")]
    UnsupportedChannelCount(u32),

    /// An operation requiring a live native buffer ran on a placeholder.
    #[error("{op}: image is not initialized")]
    UninitializedUse {
        /// Operation that was attempted
        op: &'static str,
    },

    /// A destination channel sequence disagrees with the source channel count.
    #[error("channel count mismatch: expected {expected}, got {actual}")]
    ChannelCountMismatch {
        /// Channel count required by the operation
        expected: usize,
        /// Channel count supplied
        actual: usize,
    },

    /// A file or capture device could not produce a buffer.
    #[error("could not load {resource}: {reason}")]
    ResourceLoad {
        /// Path or device description
        resource: String,
        /// Failure reason
        reason: String,
    },

    /// Width or height is unusable for an allocation.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// The native backend rejected a call.
    #[error("native {op} failed: {reason}")]
    Backend {
        /// Native primitive name
        op: &'static str,
        /// Failure reason reported by the backend
        reason: String,
    },
}

impl Error {
    /// Creates an [`Error::UnsupportedType`] error.
    #[inline]
    pub fn unsupported_type(ty: MatType) -> Self {
        Self::UnsupportedType { ty }
    }

    /// Creates an [`Error::UnrecognizedNativeType`] error.
    #[inline]
    pub fn unrecognized_native_type(depth: u32, channels: u32) -> Self {
        Self::UnrecognizedNativeType { depth, channels }
    }

    /// Creates an [`Error::UninitializedUse`] error.
    #[inline]
    pub fn uninitialized(op: &'static str) -> Self {
        Self::UninitializedUse { op }
    }

    /// Creates an [`Error::ChannelCountMismatch`] error.
    #[inline]
    pub fn channel_count_mismatch(expected: usize, actual: usize) -> Self {
        Self::ChannelCountMismatch { expected, actual }
    }

    /// Creates an [`Error::ResourceLoad`] error.
    #[inline]
    pub fn resource_load(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ResourceLoad {
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::Backend`] error.
    #[inline]
    pub fn backend(op: &'static str, reason: impl Into<String>) -> Self {
        Self::Backend {
            op,
            reason: reason.into(),
        }
    }

    /// Returns `true` for pixel type and channel model errors.
    #[inline]
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedType { .. }
                | Self::UnrecognizedNativeType { .. }
                | Self::UnsupportedChannelCount(_)
        )
    }

    /// Returns `true` for shape disagreements between operands.
    #[inline]
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            Self::ChannelCountMismatch { .. } | Self::InvalidDimensions { .. }
        )
    }

    /// Returns `true` if a placeholder image was used.
    #[inline]
    pub fn is_uninitialized(&self) -> bool {
        matches!(self, Self::UninitializedUse { .. })
    }

    /// Returns `true` if an external collaborator failed to produce a buffer.
    #[inline]
    pub fn is_load_error(&self) -> bool {
        matches!(self, Self::ResourceLoad { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::CV_16SC2;

    #[test]
    fn test_unsupported_type_message() {
        let err = Error::unsupported_type(CV_16SC2);
        assert!(err.to_string().contains("CV_16SC2"));
        assert!(err.is_type_error());
    }

    #[test]
    fn test_uninitialized() {
        let err = Error::uninitialized("resize");
        assert_eq!(err.to_string(), "resize: image is not initialized");
        assert!(err.is_uninitialized());
        assert!(!err.is_type_error());
    }

    #[test]
    fn test_channel_count_mismatch() {
        let err = Error::channel_count_mismatch(3, 2);
        let msg = err.to_string();
        assert!(msg.contains("expected 3"));
        assert!(msg.contains("got 2"));
        assert!(err.is_shape_error());
    }

    #[test]
    fn test_resource_load() {
        let err = Error::resource_load("lena.png", "file not found");
        assert!(err.to_string().contains("lena.png"));
        assert!(err.is_load_error());
    }

    #[test]
    fn test_unrecognized_native_type_hex_depth() {
        let err = Error::unrecognized_native_type(0x8000_0008, 1);
        assert!(err.to_string().contains("0x80000008"));
    }
}
