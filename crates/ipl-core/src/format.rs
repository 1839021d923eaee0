//! Pixel type descriptors.
//!
//! A [`MatType`] is an abstract `{depth, element kind, channel count}` triple.
//! The full catalog of named descriptors lives here as data ([`CATALOG`]);
//! which of them the native backend can actually realize is decided by
//! [`crate::encoding`], not by this module.
//!
//! # Usage
//!
//! ```rust
//! use ipl_core::format::{ElemKind, MatType, CV_8UC3};
//!
//! assert_eq!(CV_8UC3, MatType::new(8, ElemKind::Unsigned, 3));
//! assert_eq!(CV_8UC3.to_string(), "CV_8UC3");
//! assert_eq!(CV_8UC3.with_channels(1).to_string(), "CV_8UC1");
//! ```

use std::fmt;

/// Numeric interpretation of a single channel element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElemKind {
    /// Two's complement signed integer.
    Signed,
    /// Unsigned integer.
    Unsigned,
    /// IEEE 754 floating point.
    Float,
}

impl ElemKind {
    /// Single-letter code used in descriptor names (`S`, `U`, `F`).
    #[inline]
    pub const fn code(&self) -> char {
        match self {
            Self::Signed => 'S',
            Self::Unsigned => 'U',
            Self::Float => 'F',
        }
    }
}

/// Abstract pixel type: bit depth per channel, element kind, channel count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatType {
    /// Bits per channel element (8, 16, 32 or 64).
    pub depth: u32,
    /// Element interpretation.
    pub elem: ElemKind,
    /// Number of interleaved channels (1 to 4).
    pub channels: u32,
}

impl MatType {
    /// Creates a descriptor. No validation: use [`crate::encoding::to_native`]
    /// to find out whether the backend can realize it.
    #[inline]
    pub const fn new(depth: u32, elem: ElemKind, channels: u32) -> Self {
        Self {
            depth,
            elem,
            channels,
        }
    }

    /// Same depth and element kind with a different channel count.
    #[inline]
    pub const fn with_channels(self, channels: u32) -> Self {
        Self { channels, ..self }
    }

    /// Bytes needed for one channel element.
    #[inline]
    pub const fn bytes_per_channel(&self) -> usize {
        (self.depth / 8) as usize
    }

    /// Bytes needed for one pixel.
    #[inline]
    pub const fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_channel() * self.channels as usize
    }

    /// Whether this descriptor appears in [`CATALOG`].
    pub fn is_cataloged(&self) -> bool {
        CATALOG.contains(self)
    }
}

impl fmt::Display for MatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CV_{}{}C{}", self.depth, self.elem.code(), self.channels)
    }
}

macro_rules! mat_types {
    ($($name:ident = ($depth:expr, $elem:ident, $ch:expr);)*) => {
        $(
            #[doc = concat!("`", stringify!($name), "` descriptor.")]
            pub const $name: MatType = MatType::new($depth, ElemKind::$elem, $ch);
        )*

        /// Every named descriptor, in declaration order.
        pub const CATALOG: &[MatType] = &[$($name),*];
    };
}

mat_types! {
    CV_8UC1 = (8, Unsigned, 1);
    CV_8UC2 = (8, Unsigned, 2);
    CV_8UC3 = (8, Unsigned, 3);
    CV_8UC4 = (8, Unsigned, 4);
    CV_8SC1 = (8, Signed, 1);
    CV_8SC2 = (8, Signed, 2);
    CV_8SC3 = (8, Signed, 3);
    CV_8SC4 = (8, Signed, 4);

    CV_16UC1 = (16, Unsigned, 1);
    CV_16UC2 = (16, Unsigned, 2);
    CV_16UC3 = (16, Unsigned, 3);
    CV_16UC4 = (16, Unsigned, 4);
    CV_16SC1 = (16, Signed, 1);
    CV_16SC2 = (16, Signed, 2);
    CV_16SC3 = (16, Signed, 3);
    CV_16SC4 = (16, Signed, 4);

    CV_32UC1 = (32, Unsigned, 1);
    CV_32UC2 = (32, Unsigned, 2);
    CV_32UC3 = (32, Unsigned, 3);
    CV_32UC4 = (32, Unsigned, 4);
    CV_32SC1 = (32, Signed, 1);
    CV_32SC2 = (32, Signed, 2);
    CV_32SC3 = (32, Signed, 3);
    CV_32SC4 = (32, Signed, 4);
    CV_32FC1 = (32, Float, 1);
    CV_32FC2 = (32, Float, 2);
    CV_32FC3 = (32, Float, 3);
    CV_32FC4 = (32, Float, 4);

    CV_64FC1 = (64, Float, 1);
    CV_64FC2 = (64, Float, 2);
    CV_64FC3 = (64, Float, 3);
    CV_64FC4 = (64, Float, 4);
}
