//! Frame capture.
//!
//! A [`FrameSource`] produces raw native buffers (a camera, a video decoder,
//! a replayed file list); [`Capture`] wraps each one into an [`Image`] the
//! caller owns.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ipl_image::{Capture, FileSequence};
//! use ipl_native::{CpuBackend, LoadMode};
//!
//! let backend = Arc::new(CpuBackend::new());
//! let frames = FileSequence::new(["f0.png", "f1.png"], LoadMode::Color);
//! let mut capture = Capture::open(&backend, frames);
//! while let Ok(frame) = capture.query_frame() {
//!     println!("{}x{}", frame.width(), frame.height());
//! }
//! ```

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use ipl_core::{Error, Result};
use ipl_native::{LoadMode, NativeBackend};
use tracing::{debug, trace};

use crate::Image;

/// Producer of raw frames.
pub trait FrameSource<B: NativeBackend> {
    /// Human-readable device name, used in errors.
    fn describe(&self) -> String;

    /// Grabs the next frame as a freshly allocated buffer.
    ///
    /// # Errors
    ///
    /// [`Error::ResourceLoad`] when no frame can be produced.
    fn grab(&mut self, backend: &B) -> Result<B::Buffer>;
}

/// Open capture device.
#[derive(Debug)]
pub struct Capture<B: NativeBackend, S> {
    backend: Arc<B>,
    source: S,
    frames: u64,
}

impl<B: NativeBackend, S: FrameSource<B>> Capture<B, S> {
    /// Starts capturing from `source`.
    pub fn open(backend: &Arc<B>, source: S) -> Self {
        debug!(source = %source.describe(), "capture opened");
        Self {
            backend: Arc::clone(backend),
            source,
            frames: 0,
        }
    }

    /// Grabs and wraps the next frame. The caller owns the result.
    ///
    /// # Errors
    ///
    /// [`Error::ResourceLoad`] if the source has no frame; type errors from
    /// [`Image::wrap`] for unsupported frame formats.
    pub fn query_frame(&mut self) -> Result<Image<B>> {
        let buffer = self.source.grab(&self.backend).map_err(|e| match e {
            Error::ResourceLoad { .. } => e,
            other => Error::resource_load(self.source.describe(), other.to_string()),
        })?;
        let frame = Image::wrap(&self.backend, buffer)?;
        self.frames += 1;
        trace!(frame = self.frames, id = ?frame.buffer_id(), "frame captured");
        Ok(frame)
    }

    /// Frames delivered so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Gives back the source.
    pub fn into_source(self) -> S {
        self.source
    }
}

/// Frame source replaying image files in order.
#[derive(Debug, Clone)]
pub struct FileSequence {
    paths: VecDeque<PathBuf>,
    mode: LoadMode,
}

impl FileSequence {
    /// Sequence over `paths`, decoded with `mode`.
    pub fn new<P: Into<PathBuf>>(paths: impl IntoIterator<Item = P>, mode: LoadMode) -> Self {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            mode,
        }
    }

    /// Frames not yet delivered.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.paths.len()
    }
}

impl<B: NativeBackend> FrameSource<B> for FileSequence {
    fn describe(&self) -> String {
        format!("file sequence ({} remaining)", self.paths.len())
    }

    fn grab(&mut self, backend: &B) -> Result<B::Buffer> {
        let path = self
            .paths
            .pop_front()
            .ok_or_else(|| Error::resource_load("file sequence", "no more frames"))?;
        backend.load_image(&path, self.mode)
    }
}
