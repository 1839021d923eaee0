//! Mapping between [`MatType`] descriptors and the native backend's own
//! depth/channel encoding.
//!
//! The native side describes a buffer with an IPL-style depth code (bit
//! count, with the top bit set for signed integers) and a channel count.
//! Both directions are total functions returning typed failures:
//!
//! - [`to_native`] realizes a descriptor. Only 8-bit unsigned descriptors are
//!   realizable today; everything else is [`Error::UnsupportedType`] and is
//!   never degraded to a nearby type.
//! - [`from_native`] decodes what a buffer reports. Pairs that name no
//!   catalog entry are [`Error::UnrecognizedNativeType`].
//!
//! ```rust
//! use ipl_core::encoding::{from_native, to_native, IPL_DEPTH_8U};
//! use ipl_core::format::CV_8UC3;
//!
//! let native = to_native(CV_8UC3).unwrap();
//! assert_eq!(native.depth, IPL_DEPTH_8U);
//! assert_eq!(from_native(native.depth, native.channels).unwrap(), CV_8UC3);
//! ```

use std::fmt;

use crate::format::{ElemKind, MatType};
use crate::{Error, Result};

/// Sign flag of native depth codes.
pub const IPL_DEPTH_SIGN: u32 = 0x8000_0000;
/// Native depth code: 8-bit unsigned.
pub const IPL_DEPTH_8U: u32 = 8;
/// Native depth code: 8-bit signed.
pub const IPL_DEPTH_8S: u32 = IPL_DEPTH_SIGN | 8;
/// Native depth code: 16-bit unsigned.
pub const IPL_DEPTH_16U: u32 = 16;
/// Native depth code: 16-bit signed.
pub const IPL_DEPTH_16S: u32 = IPL_DEPTH_SIGN | 16;
/// Native depth code: 32-bit signed.
pub const IPL_DEPTH_32S: u32 = IPL_DEPTH_SIGN | 32;
/// Native depth code: 32-bit float.
pub const IPL_DEPTH_32F: u32 = 32;
/// Native depth code: 64-bit float.
pub const IPL_DEPTH_64F: u32 = 64;

/// Largest channel count a native buffer may carry.
pub const MAX_CHANNELS: u32 = 4;

/// The native backend's description of a buffer's element layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeType {
    /// IPL-style depth code.
    pub depth: u32,
    /// Interleaved channel count.
    pub channels: u32,
}

impl NativeType {
    /// Creates a native type from raw codes.
    #[inline]
    pub const fn new(depth: u32, channels: u32) -> Self {
        Self { depth, channels }
    }

    /// Bits per element encoded in the depth code.
    #[inline]
    pub const fn bits(&self) -> u32 {
        self.depth & !IPL_DEPTH_SIGN
    }

    /// Whether the depth code carries the sign flag.
    #[inline]
    pub const fn is_signed(&self) -> bool {
        self.depth & IPL_DEPTH_SIGN != 0
    }

    /// Whether elements are IEEE floats.
    #[inline]
    pub const fn is_float(&self) -> bool {
        matches!(self.depth, IPL_DEPTH_32F | IPL_DEPTH_64F)
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_float() {
            'F'
        } else if self.is_signed() {
            'S'
        } else {
            'U'
        };
        write!(f, "IPL_DEPTH_{}{} x{}", self.bits(), kind, self.channels)
    }
}

/// Encodes a descriptor for the native backend.
///
/// # Errors
///
/// [`Error::UnsupportedType`] for any descriptor outside the realizable
/// subset (8-bit unsigned, 1 to 4 channels).
pub fn to_native(ty: MatType) -> Result<NativeType> {
    match ty {
        MatType {
            depth: 8,
            elem: ElemKind::Unsigned,
            channels: 1..=MAX_CHANNELS,
        } => Ok(NativeType::new(IPL_DEPTH_8U, ty.channels)),
        _ => Err(Error::unsupported_type(ty)),
    }
}

/// Decodes a native depth/channel pair into its catalog descriptor.
///
/// # Errors
///
/// [`Error::UnrecognizedNativeType`] if the pair names no catalog entry.
pub fn from_native(depth: u32, channels: u32) -> Result<MatType> {
    if !(1..=MAX_CHANNELS).contains(&channels) {
        return Err(Error::unrecognized_native_type(depth, channels));
    }
    let (bits, elem) = match depth {
        IPL_DEPTH_8U => (8, ElemKind::Unsigned),
        IPL_DEPTH_8S => (8, ElemKind::Signed),
        IPL_DEPTH_16U => (16, ElemKind::Unsigned),
        IPL_DEPTH_16S => (16, ElemKind::Signed),
        IPL_DEPTH_32S => (32, ElemKind::Signed),
        IPL_DEPTH_32F => (32, ElemKind::Float),
        IPL_DEPTH_64F => (64, ElemKind::Float),
        _ => return Err(Error::unrecognized_native_type(depth, channels)),
    };
    Ok(MatType::new(bits, elem, channels))
}

/// Whether [`to_native`] succeeds for `ty`.
#[inline]
pub fn is_realizable(ty: MatType) -> bool {
    to_native(ty).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::*;

    #[test]
    fn test_roundtrip_realizable() {
        for &ty in CATALOG.iter().filter(|t| is_realizable(**t)) {
            let native = to_native(ty).unwrap();
            assert_eq!(from_native(native.depth, native.channels).unwrap(), ty);
        }
    }

    #[test]
    fn test_realizable_subset() {
        let realizable: Vec<_> = CATALOG.iter().copied().filter(|t| is_realizable(*t)).collect();
        assert_eq!(realizable, vec![CV_8UC1, CV_8UC2, CV_8UC3, CV_8UC4]);
    }

    #[test]
    fn test_unsupported_never_degrades() {
        for ty in [CV_8SC1, CV_16UC3, CV_32FC1, CV_64FC4, CV_32UC1] {
            assert!(matches!(to_native(ty), Err(Error::UnsupportedType { ty: t }) if t == ty));
        }
        let five = CV_8UC1.with_channels(5);
        assert!(to_native(five).is_err());
    }

    #[test]
    fn test_from_native_catalog() {
        assert_eq!(from_native(IPL_DEPTH_16S, 2).unwrap(), CV_16SC2);
        assert_eq!(from_native(IPL_DEPTH_32F, 4).unwrap(), CV_32FC4);
        assert_eq!(from_native(IPL_DEPTH_8S, 1).unwrap(), CV_8SC1);
        for &(depth, ch) in &[(IPL_DEPTH_8U, 1), (IPL_DEPTH_64F, 3), (IPL_DEPTH_32S, 4)] {
            assert!(from_native(depth, ch).unwrap().is_cataloged());
        }
    }

    #[test]
    fn test_from_native_unrecognized() {
        assert!(matches!(
            from_native(12, 1),
            Err(Error::UnrecognizedNativeType { depth: 12, channels: 1 })
        ));
        assert!(matches!(
            from_native(IPL_DEPTH_8U, 0),
            Err(Error::UnrecognizedNativeType { .. })
        ));
        assert!(from_native(IPL_DEPTH_8U, 5).is_err());
    }

    #[test]
    fn test_native_type_display() {
        assert_eq!(NativeType::new(IPL_DEPTH_8U, 3).to_string(), "IPL_DEPTH_8U x3");
        assert_eq!(NativeType::new(IPL_DEPTH_16S, 1).to_string(), "IPL_DEPTH_16S x1");
        assert_eq!(NativeType::new(IPL_DEPTH_32F, 1).to_string(), "IPL_DEPTH_32F x1");
    }
}
