use ipl_core::{Error, Result};
use ipl_native::NativeBackend;
use tracing::debug;

use crate::Channels;
use crate::resource::{Image, native_call};

impl<B: NativeBackend> Image<B> {
    /// Scatters each channel into the matching image of `dest`.
    ///
    /// Every destination is reshaped to the source size with one channel of
    /// the source depth.
    ///
    /// # Errors
    ///
    /// - [`Error::UninitializedUse`] if `self` is a placeholder
    /// - [`Error::ChannelCountMismatch`] if `dest.len()` differs from the
    ///   channel count; nothing in `dest` is touched
    pub fn split_to(&self, dest: &mut [Image<B>]) -> Result<()> {
        let ty = self.require_type("split")?;
        let src = self.live("split")?;
        let channels = ty.channels as usize;
        if dest.len() != channels {
            return Err(Error::channel_count_mismatch(channels, dest.len()));
        }
        debug!(channels, "split");

        let plane = ty.with_channels(1);
        for d in dest.iter_mut() {
            d.reinitialize(self.size(), plane)?;
        }
        let mut planes = dest
            .iter_mut()
            .map(|d| d.live_mut("split"))
            .collect::<Result<Vec<_>>>()?;
        native_call("split", self.backend().split(src, &mut planes))
    }

    /// One single-channel image per channel.
    ///
    /// ```rust
    /// # use std::sync::Arc;
    /// # use ipl_core::{Size, format::{CV_8UC1, CV_8UC3}};
    /// # use ipl_image::CpuImage;
    /// # use ipl_native::CpuBackend;
    /// let backend = Arc::new(CpuBackend::new());
    /// let img = CpuImage::create(&backend, Size::new(8, 8), CV_8UC3).unwrap();
    /// let planes = img.split().unwrap();
    /// assert_eq!(planes.len(), 3);
    /// assert!(planes.iter().all(|p| p.mat_type() == Some(CV_8UC1)));
    /// ```
    pub fn split(&self) -> Result<Channels<B>> {
        let ty = self.require_type("split")?;
        let mut planes: Vec<Image<B>> = (0..ty.channels).map(|_| self.sibling()).collect();
        self.split_to(&mut planes)?;
        Ok(Channels::new(planes))
    }
}
