use ipl_core::{Point2f, Result, Scalar};
use ipl_native::{Interpolation, NativeBackend, WarpFlags};
use tracing::debug;

use crate::resource::{Image, native_call};

impl<B: NativeBackend> Image<B> {
    /// Rotates by `angle` degrees counter-clockwise about the center into
    /// `dest`. Corners that leave the frame are cut off; uncovered pixels
    /// become zero.
    ///
    /// The center is `(width / 2, height / 2)` in integer pixels.
    pub fn rotate_to(&self, dest: &mut Image<B>, angle: f64) -> Result<()> {
        let src = self.live("rotate")?;
        let size = self.size();
        let center = Point2f::new((size.width / 2) as f32, (size.height / 2) as f32);
        let matrix = self.backend().rotation_matrix_2d(center, angle, 1.0);
        debug!(angle, cx = center.x, cy = center.y, "rotate");

        dest.reinitialize_as(self)?;
        let dst = dest.live_mut("rotate")?;
        let flags = WarpFlags {
            interpolation: Interpolation::Linear,
            fill_outliers: true,
            inverse_map: false,
        };
        native_call(
            "warp_affine",
            self.backend().warp_affine(src, dst, &matrix, flags, Scalar::all(0.0)),
        )
    }

    /// Rotated copy.
    pub fn rotate(&self, angle: f64) -> Result<Image<B>> {
        let mut out = self.sibling();
        self.rotate_to(&mut out, angle)?;
        Ok(out)
    }
}
