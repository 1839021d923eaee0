//! Geometric and value types exchanged with the native backend.
//!
//! - [`Size`] - image width and height
//! - [`Rect`] - pixel rectangle, origin at the top-left corner
//! - [`Point2f`] - sub-pixel point (rotation centers)
//! - [`Scalar`] - four-slot per-pixel value, the universal exchange type
//! - [`Position`] - 1D/2D/3D element address for scalar reads

use std::ops::{Index, IndexMut};

/// Width/height pair in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Size {
    /// Creates a size.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either dimension is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered.
    #[inline]
    pub const fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl From<(u32, u32)> for Size {
    #[inline]
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// A rectangle defined by origin (x, y) and dimensions (width, height).
///
/// ```rust
/// use ipl_core::{Rect, Size};
///
/// let r = Rect::from_size(Size::new(640, 480));
/// assert_eq!((r.right(), r.bottom()), (640, 480));
/// assert!(r.contains(639, 479));
/// assert!(!r.contains(640, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// X coordinate of the left edge (inclusive)
    pub x: u32,
    /// Y coordinate of the top edge (inclusive)
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Creates a new rectangle with the given origin and dimensions.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle `[0, 0) x (width, height)` covering a whole image.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// X coordinate one past the right edge.
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Y coordinate one past the bottom edge.
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Dimensions of the rectangle.
    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Returns `true` if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns `true` if the point lies inside the rectangle.
    #[inline]
    pub const fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Sub-pixel 2D point.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2f {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point2f {
    /// Creates a point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Up to four channel values at one pixel location.
///
/// Always four slots regardless of the image's channel count; unused slots
/// are ignored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scalar(pub [f64; 4]);

impl Scalar {
    /// Creates a scalar from four slot values.
    #[inline]
    pub const fn new(v0: f64, v1: f64, v2: f64, v3: f64) -> Self {
        Self([v0, v1, v2, v3])
    }

    /// Scalar with every slot set to `v`.
    #[inline]
    pub const fn all(v: f64) -> Self {
        Self([v; 4])
    }

    /// Slot values.
    #[inline]
    pub const fn values(&self) -> [f64; 4] {
        self.0
    }
}

impl From<[f64; 4]> for Scalar {
    #[inline]
    fn from(v: [f64; 4]) -> Self {
        Self(v)
    }
}

impl Index<usize> for Scalar {
    type Output = f64;

    #[inline]
    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

impl IndexMut<usize> for Scalar {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut f64 {
        &mut self.0[i]
    }
}

/// Element address for scalar reads, matching the backend's 1D, 2D and 3D
/// addressing modes.
///
/// 2D addresses are `(row, column)`, the backend's storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// Linear element index.
    D1(u32),
    /// Row and column.
    D2(u32, u32),
    /// Three-axis index.
    D3(u32, u32, u32),
}

impl From<u32> for Position {
    #[inline]
    fn from(i: u32) -> Self {
        Self::D1(i)
    }
}

impl From<(u32, u32)> for Position {
    #[inline]
    fn from((row, col): (u32, u32)) -> Self {
        Self::D2(row, col)
    }
}

impl From<(u32, u32, u32)> for Position {
    #[inline]
    fn from((i, j, k): (u32, u32, u32)) -> Self {
        Self::D3(i, j, k)
    }
}
