//! Exclusive owner of one native buffer.
//!
//! A [`NativeHandle`] is either live (owns a buffer plus the cached size and
//! type read from it) or empty. Every path that gives up a buffer goes
//! through [`NativeHandle::release`], and `Drop` calls it too, so a buffer is
//! returned to its backend exactly once no matter how the owner goes away.

use std::fmt;
use std::sync::Arc;

use ipl_core::{MatType, Size};
use ipl_native::{BufferId, NativeBackend, NativeBuffer};
use tracing::trace;

/// Owning wrapper around an optional native buffer.
pub struct NativeHandle<B: NativeBackend> {
    backend: Arc<B>,
    buffer: Option<B::Buffer>,
    size: Size,
    ty: Option<MatType>,
}

impl<B: NativeBackend> NativeHandle<B> {
    /// Handle that owns nothing.
    pub fn empty(backend: Arc<B>) -> Self {
        Self {
            backend,
            buffer: None,
            size: Size::default(),
            ty: None,
        }
    }

    /// Takes ownership of `buffer`, recording `ty` as its decoded type.
    pub(crate) fn adopt(backend: Arc<B>, buffer: B::Buffer, ty: MatType) -> Self {
        let mut handle = Self::empty(backend);
        handle.replace(buffer, ty);
        handle
    }

    /// Installs `buffer`, releasing whatever was owned before.
    pub(crate) fn replace(&mut self, buffer: B::Buffer, ty: MatType) {
        self.release();
        self.size = buffer.size();
        self.ty = Some(ty);
        self.buffer = Some(buffer);
    }

    /// Returns the buffer to the backend. No-op when empty.
    pub fn release(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            trace!(id = %buffer.id(), backend = self.backend.name(), "releasing native buffer");
            self.backend.release_image(buffer);
        }
        self.size = Size::default();
        self.ty = None;
    }

    /// Whether a buffer is owned.
    #[inline]
    pub fn is_live(&self) -> bool {
        self.buffer.is_some()
    }

    /// Cached size; zero when empty.
    #[inline]
    pub fn size(&self) -> Size {
        self.size
    }

    /// Cached type; `None` when empty.
    #[inline]
    pub fn mat_type(&self) -> Option<MatType> {
        self.ty
    }

    /// Owned buffer, if any.
    #[inline]
    pub fn buffer(&self) -> Option<&B::Buffer> {
        self.buffer.as_ref()
    }

    /// Owned buffer, mutably.
    #[inline]
    pub fn buffer_mut(&mut self) -> Option<&mut B::Buffer> {
        self.buffer.as_mut()
    }

    /// Identity of the owned buffer.
    #[inline]
    pub fn id(&self) -> Option<BufferId> {
        self.buffer.as_ref().map(NativeBuffer::id)
    }

    /// Backend the buffer belongs to.
    #[inline]
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }
}

impl<B: NativeBackend> Drop for NativeHandle<B> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<B: NativeBackend> fmt::Debug for NativeHandle<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeHandle")
            .field("backend", &self.backend.name())
            .field("id", &self.id())
            .field("size", &self.size)
            .field("type", &self.ty)
            .finish()
    }
}
