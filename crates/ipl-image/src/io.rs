//! Loading images from disk.

use std::path::Path;
use std::sync::Arc;

use ipl_core::{Error, Result};
use ipl_native::{LoadMode, NativeBackend};
use tracing::{debug, warn};

use crate::Image;

/// Decodes `path` through the backend and wraps the result.
///
/// [`LoadMode::Color`] yields a three-channel image whose pixels read back as
/// RGB through [`Image::pixel_at`]; [`LoadMode::Grayscale`] a single-channel
/// one.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use ipl_image::load_image;
/// use ipl_native::{CpuBackend, LoadMode};
///
/// let backend = Arc::new(CpuBackend::new());
/// let img = load_image(&backend, "lena.png", LoadMode::Color)?;
/// println!("{:?}", img.pixel_at(30, 20)?);
/// # Ok::<(), ipl_core::Error>(())
/// ```
///
/// # Errors
///
/// [`Error::ResourceLoad`] if the file cannot be opened or decoded; type
/// errors from [`Image::wrap`] if the decoded buffer is unsupported.
pub fn load_image<B: NativeBackend>(
    backend: &Arc<B>,
    path: impl AsRef<Path>,
    mode: LoadMode,
) -> Result<Image<B>> {
    let path = path.as_ref();
    debug!(path = %path.display(), ?mode, "load_image");
    let buffer = backend.load_image(path, mode).map_err(|e| {
        warn!(path = %path.display(), error = %e, "could not open file");
        match e {
            Error::ResourceLoad { .. } => e,
            other => Error::resource_load(path.display().to_string(), other.to_string()),
        }
    })?;
    Image::wrap(backend, buffer)
}
