//! Pixel accessor adapter.
//!
//! Generic consumers see an [`Image`] through a color model, a bounds
//! rectangle and per-pixel colors. The backend stores three-channel pixels
//! in BGR order; [`PixelAccess::pixel_at`] always hands out RGBA with an
//! opaque alpha.
//!
//! [`Image`] also implements [`image::GenericImageView`] with
//! `Pixel = Rgba<u8>`, so anything written against the `image` crate can
//! read it directly.

use image::{GenericImageView, Rgba};
use ipl_core::{Error, Rect, Result};
use ipl_native::NativeBackend;

use crate::Image;

/// Color model exposed to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorModel {
    /// One 8-bit luma channel.
    Gray,
    /// 8-bit RGBA with opaque alpha.
    Rgba,
}

/// Color model for a channel count.
///
/// # Errors
///
/// [`Error::UnsupportedChannelCount`] for anything other than 1 or 3.
pub fn color_model_for(channels: u32) -> Result<ColorModel> {
    match channels {
        1 => Ok(ColorModel::Gray),
        3 => Ok(ColorModel::Rgba),
        n => Err(Error::UnsupportedChannelCount(n)),
    }
}

/// A pixel as seen through the color model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Luma value.
    Gray(u8),
    /// Red, green, blue, alpha.
    Rgba([u8; 4]),
}

impl Color {
    /// 8-bit RGBA; gray expands to equal components.
    #[inline]
    pub fn to_rgba(self) -> [u8; 4] {
        match self {
            Self::Gray(v) => [v, v, v, u8::MAX],
            Self::Rgba(c) => c,
        }
    }

    /// 16-bit RGBA, each component scaled by `0x101`.
    #[inline]
    pub fn to_rgba16(self) -> [u16; 4] {
        self.to_rgba().map(|c| c as u16 * 0x101)
    }
}

/// Read-only pixel surface for generic image consumers.
pub trait PixelAccess {
    /// Color model derived from the channel count.
    fn color_model(&self) -> Result<ColorModel>;

    /// Color at column `x`, row `y`.
    fn pixel_at(&self, x: u32, y: u32) -> Result<Color>;

    /// `[0, 0) x (width, height)`.
    fn bounds(&self) -> Rect;
}

#[inline]
fn to_u8(v: f64) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

impl<B: NativeBackend> Image<B> {
    /// Color model derived from the channel count.
    ///
    /// # Errors
    ///
    /// [`Error::UninitializedUse`] on a placeholder.
    pub fn color_model(&self) -> Result<ColorModel> {
        let ty = self
            .mat_type()
            .ok_or_else(|| Error::uninitialized("color_model"))?;
        color_model_for(ty.channels)
    }

    /// Color at column `x`, row `y`, read as `scalar_at((y, x))`.
    ///
    /// Three-channel pixels are swapped from BGR storage to RGB and get an
    /// opaque alpha.
    pub fn pixel_at(&self, x: u32, y: u32) -> Result<Color> {
        let s = self.scalar_at((y, x))?;
        match self.color_model()? {
            ColorModel::Gray => Ok(Color::Gray(to_u8(s[0]))),
            ColorModel::Rgba => Ok(Color::Rgba([to_u8(s[2]), to_u8(s[1]), to_u8(s[0]), u8::MAX])),
        }
    }

    /// `[0, 0) x (width, height)` from the cached size.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.size())
    }
}

impl<B: NativeBackend> PixelAccess for Image<B> {
    fn color_model(&self) -> Result<ColorModel> {
        Image::color_model(self)
    }

    fn pixel_at(&self, x: u32, y: u32) -> Result<Color> {
        Image::pixel_at(self, x, y)
    }

    fn bounds(&self) -> Rect {
        Image::bounds(self)
    }
}

impl<B: NativeBackend> GenericImageView for Image<B> {
    type Pixel = Rgba<u8>;

    fn dimensions(&self) -> (u32, u32) {
        let size = self.size();
        (size.width, size.height)
    }

    /// # Panics
    ///
    /// If the image is a placeholder or `(x, y)` is out of bounds, matching
    /// the `image` crate's contract for `get_pixel`.
    fn get_pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        match self.pixel_at(x, y) {
            Ok(color) => Rgba(color.to_rgba()),
            Err(e) => panic!("get_pixel({x}, {y}): {e}"),
        }
    }
}
