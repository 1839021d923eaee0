use ipl_core::Result;
use ipl_native::NativeBackend;
use tracing::trace;

use crate::resource::{Image, native_call};

impl<B: NativeBackend> Image<B> {
    /// Copies pixels into `dest`, reshaping it to match first.
    ///
    /// Use [`Image::duplicate`] for a brand-new independent image.
    pub fn copy_to(&self, dest: &mut Image<B>) -> Result<()> {
        let src = self.live("copy")?;
        dest.reinitialize_as(self)?;
        let dst = dest.live_mut("copy")?;
        trace!(src = ?self.buffer_id(), "copy");
        native_call("copy", self.backend().copy(src, dst))
    }
}
