//! Parameters passed to native primitives.

/// Interpolation used by resize and warp primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interpolation {
    /// Nearest neighbor.
    Nearest,
    /// Bilinear.
    #[default]
    Linear,
    /// Pixel area relation (box average when shrinking).
    Area,
    /// Bicubic over a 4x4 neighborhood.
    Cubic,
    /// Lanczos over an 8x8 neighborhood.
    Lanczos4,
}

impl Interpolation {
    /// Filter support radius in source pixels at scale 1.
    #[inline]
    pub fn support(&self) -> f64 {
        match self {
            Self::Nearest | Self::Area => 0.5,
            Self::Linear => 1.0,
            Self::Cubic => 2.0,
            Self::Lanczos4 => 4.0,
        }
    }

    /// Evaluates the filter kernel at distance `x`.
    #[inline]
    pub fn weight(&self, x: f64) -> f64 {
        let ax = x.abs();
        match self {
            Self::Nearest | Self::Area => {
                if ax <= 0.5 { 1.0 } else { 0.0 }
            }
            Self::Linear => {
                if ax < 1.0 { 1.0 - ax } else { 0.0 }
            }
            Self::Cubic => cubic_weight(ax),
            Self::Lanczos4 => lanczos_weight(ax, 4.0),
        }
    }
}

/// Keys cubic convolution with a = -0.75.
#[inline]
fn cubic_weight(ax: f64) -> f64 {
    const A: f64 = -0.75;
    if ax < 1.0 {
        ((A + 2.0) * ax - (A + 3.0)) * ax * ax + 1.0
    } else if ax < 2.0 {
        ((A * ax - 5.0 * A) * ax + 8.0 * A) * ax - 4.0 * A
    } else {
        0.0
    }
}

#[inline]
fn lanczos_weight(ax: f64, a: f64) -> f64 {
    if ax < 1e-12 {
        1.0
    } else if ax < a {
        let pi_x = std::f64::consts::PI * ax;
        let pi_x_a = pi_x / a;
        (pi_x.sin() / pi_x) * (pi_x_a.sin() / pi_x_a)
    } else {
        0.0
    }
}

/// Flags for the affine warp primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WarpFlags {
    /// Sampling used when reading the source.
    pub interpolation: Interpolation,
    /// Write the fill value where the source is not covered; otherwise those
    /// destination pixels are left untouched.
    pub fill_outliers: bool,
    /// The matrix maps destination to source instead of source to destination.
    pub inverse_map: bool,
}

impl Default for WarpFlags {
    fn default() -> Self {
        Self {
            interpolation: Interpolation::Linear,
            fill_outliers: true,
            inverse_map: false,
        }
    }
}

/// Smoothing kernel family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SmoothKind {
    /// Gaussian convolution.
    Gaussian,
    /// Normalized box filter.
    Blur,
    /// Median over the aperture.
    Median,
}

/// Parameters of the smoothing primitive.
///
/// Aperture sizes are in pixels and must be odd for [`SmoothKind::Gaussian`]
/// and [`SmoothKind::Median`]. A zero `aperture_height` means "same as width";
/// zero sigmas are derived from the aperture.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmoothParams {
    /// Kernel family.
    pub kind: SmoothKind,
    /// Aperture width.
    pub aperture_width: u32,
    /// Aperture height (0 = same as width).
    pub aperture_height: u32,
    /// Horizontal Gaussian sigma (0 = derived).
    pub sigma_x: f64,
    /// Vertical Gaussian sigma (0 = same as horizontal).
    pub sigma_y: f64,
}

impl SmoothParams {
    /// Square Gaussian aperture with derived sigmas.
    pub fn gaussian(aperture: u32) -> Self {
        Self {
            kind: SmoothKind::Gaussian,
            aperture_width: aperture,
            aperture_height: aperture,
            sigma_x: 0.0,
            sigma_y: 0.0,
        }
    }
}

/// Color conversion codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorConversion {
    /// Swap BGR to RGB.
    BgrToRgb,
    /// Swap RGB to BGR.
    RgbToBgr,
    /// BGR to single-channel luma.
    BgrToGray,
    /// RGB to single-channel luma.
    RgbToGray,
    /// Replicate gray into BGR.
    GrayToBgr,
    /// Replicate gray into RGB.
    GrayToRgb,
}

impl ColorConversion {
    /// Channel count the source must have.
    #[inline]
    pub const fn src_channels(&self) -> u32 {
        match self {
            Self::GrayToBgr | Self::GrayToRgb => 1,
            _ => 3,
        }
    }

    /// Channel count the conversion produces.
    #[inline]
    pub const fn dst_channels(&self) -> u32 {
        match self {
            Self::BgrToGray | Self::RgbToGray => 1,
            _ => 3,
        }
    }
}

/// How the file loader decodes color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LoadMode {
    /// Three channels in native (BGR) order.
    #[default]
    Color,
    /// One luma channel.
    Grayscale,
}
