use ipl_core::{Error, Result};
use ipl_native::{ColorConversion, NativeBackend};
use tracing::debug;

use crate::resource::{Image, native_call};

impl<B: NativeBackend> Image<B> {
    /// Converts between color layouts into `dest`.
    ///
    /// `dest` gets the source size and depth with the channel count the
    /// conversion produces.
    ///
    /// # Errors
    ///
    /// - [`Error::UninitializedUse`] if `self` is a placeholder
    /// - [`Error::ChannelCountMismatch`] if the source does not have the
    ///   channel count the conversion reads
    pub fn convert_color_to(&self, dest: &mut Image<B>, code: ColorConversion) -> Result<()> {
        let ty = self.require_type("convert_color")?;
        let src = self.live("convert_color")?;
        if ty.channels != code.src_channels() {
            return Err(Error::channel_count_mismatch(
                code.src_channels() as usize,
                ty.channels as usize,
            ));
        }
        debug!(?code, "convert_color");
        dest.reinitialize(self.size(), ty.with_channels(code.dst_channels()))?;
        let dst = dest.live_mut("convert_color")?;
        native_call("cvt_color", self.backend().cvt_color(src, dst, code))
    }

    /// Converted copy.
    pub fn convert_color(&self, code: ColorConversion) -> Result<Image<B>> {
        let mut out = self.sibling();
        self.convert_color_to(&mut out, code)?;
        Ok(out)
    }
}
