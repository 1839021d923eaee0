use ipl_core::Result;
use ipl_native::{NativeBackend, SmoothParams};
use tracing::debug;

use crate::resource::{Image, native_call};

impl<B: NativeBackend> Image<B> {
    /// Gaussian blur into `dest` with a square `radius` x `radius` aperture
    /// and sigma derived from it.
    ///
    /// # Errors
    ///
    /// The backend rejects even apertures.
    pub fn gaussian_blur_to(&self, dest: &mut Image<B>, radius: u32) -> Result<()> {
        let src = self.live("gaussian_blur")?;
        debug!(radius, "gaussian_blur");
        dest.reinitialize_as(self)?;
        let dst = dest.live_mut("gaussian_blur")?;
        native_call(
            "smooth",
            self.backend().smooth(src, dst, &SmoothParams::gaussian(radius)),
        )
    }

    /// Blurred copy.
    pub fn gaussian_blur(&self, radius: u32) -> Result<Image<B>> {
        let mut out = self.sibling();
        self.gaussian_blur_to(&mut out, radius)?;
        Ok(out)
    }
}
