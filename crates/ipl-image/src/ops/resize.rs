use ipl_core::{Result, Size};
use ipl_native::{Interpolation, NativeBackend};
use tracing::debug;

use crate::resource::{Image, native_call};

impl<B: NativeBackend> Image<B> {
    /// Resamples into `dest` at `size`, keeping the source type.
    ///
    /// # Errors
    ///
    /// [`UninitializedUse`](ipl_core::Error::UninitializedUse) if `self` is a
    /// placeholder; allocation or backend errors otherwise (a zero `size` is
    /// rejected by the allocation).
    pub fn resize_to(&self, dest: &mut Image<B>, size: Size, interp: Interpolation) -> Result<()> {
        let ty = self.require_type("resize")?;
        let src = self.live("resize")?;
        debug!(
            from_w = self.width(), from_h = self.height(),
            to_w = size.width, to_h = size.height, ?interp, "resize"
        );
        dest.reinitialize(size, ty)?;
        let dst = dest.live_mut("resize")?;
        native_call("resize", self.backend().resize(src, dst, interp))
    }

    /// Resampled copy at `size`.
    ///
    /// ```rust
    /// # use std::sync::Arc;
    /// # use ipl_core::{Size, format::CV_8UC3};
    /// # use ipl_image::CpuImage;
    /// # use ipl_native::{CpuBackend, Interpolation};
    /// let backend = Arc::new(CpuBackend::new());
    /// let img = CpuImage::create(&backend, Size::new(640, 400), CV_8UC3).unwrap();
    /// let small = img.resize(Size::new(320, 200), Interpolation::Area).unwrap();
    /// assert_eq!(small.size(), Size::new(320, 200));
    /// ```
    pub fn resize(&self, size: Size, interp: Interpolation) -> Result<Image<B>> {
        let mut out = self.sibling();
        self.resize_to(&mut out, size, interp)?;
        Ok(out)
    }
}
