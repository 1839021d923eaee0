//! The [`Image`] resource model.
//!
//! An image is either initialized (owns one native buffer with a known size
//! and [`MatType`]) or a placeholder. Placeholders exist so that `*_to`
//! operations have somewhere to write: any destination is brought to the
//! required shape by [`Image::reinitialize`], which keeps the current buffer
//! when it already matches and reallocates otherwise.
//!
//! # Lifecycle
//!
//! ```text
//! placeholder ──reinitialize──► initialized ──release──► placeholder
//!                                   │   ▲
//!                                   └───┘ reinitialize (same shape: no-op,
//!                                         otherwise release + allocate)
//! ```
//!
//! Dropping an image releases its buffer, so explicit [`Image::release`] is
//! only needed to free memory early. Releasing twice is harmless.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use ipl_core::{Size, format::CV_8UC3};
//! use ipl_image::{CpuImage, Image};
//! use ipl_native::CpuBackend;
//!
//! let backend = Arc::new(CpuBackend::new());
//! let mut img: CpuImage = Image::placeholder(&backend);
//! img.reinitialize(Size::new(64, 48), CV_8UC3).unwrap();
//! let id = img.buffer_id();
//! img.reinitialize(Size::new(64, 48), CV_8UC3).unwrap();
//! assert_eq!(img.buffer_id(), id);
//! ```

use std::fmt;
use std::sync::Arc;

use ipl_core::encoding::{from_native, to_native};
use ipl_core::{Error, MatType, Position, Result, Scalar, Size};
use ipl_native::{BufferId, CpuBackend, NativeBackend, NativeBuffer};
use tracing::{trace, warn};

use crate::handle::NativeHandle;
use crate::pixel::color_model_for;

/// Image whose pixels live in a native backend.
///
/// Not internally synchronized: mutation through `&mut self` is the only
/// way to change an image, so concurrent writers need their own locking.
pub struct Image<B: NativeBackend> {
    handle: NativeHandle<B>,
}

/// Image backed by the in-process CPU backend.
pub type CpuImage = Image<CpuBackend>;

impl<B: NativeBackend> Image<B> {
    /// Uninitialized image with zero size.
    pub fn placeholder(backend: &Arc<B>) -> Self {
        Self {
            handle: NativeHandle::empty(Arc::clone(backend)),
        }
    }

    /// Allocates a zero-filled image.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] if `size` has a zero side
    /// - [`Error::UnsupportedType`] if `ty` is not realizable
    /// - [`Error::UnsupportedChannelCount`] unless `ty` has 1 or 3 channels
    /// - whatever the backend reports for the allocation itself
    pub fn create(backend: &Arc<B>, size: Size, ty: MatType) -> Result<Self> {
        let mut img = Self::placeholder(backend);
        img.reinitialize(size, ty)?;
        Ok(img)
    }

    /// Takes ownership of a buffer the backend produced (a decoded file, a
    /// captured frame) and infers size and type from it.
    ///
    /// On failure the buffer is released before returning.
    ///
    /// # Errors
    ///
    /// - [`Error::UnrecognizedNativeType`] if the depth/channel pair names no
    ///   catalog entry
    /// - [`Error::UnsupportedType`] if it names one outside the realizable subset
    /// - [`Error::UnsupportedChannelCount`] unless the buffer has 1 or 3 channels
    pub fn wrap(backend: &Arc<B>, buffer: B::Buffer) -> Result<Self> {
        match Self::decode_type(&buffer) {
            Ok(ty) => {
                trace!(id = %buffer.id(), %ty, "wrapping native buffer");
                Ok(Self {
                    handle: NativeHandle::adopt(Arc::clone(backend), buffer, ty),
                })
            }
            Err(e) => {
                warn!(id = %buffer.id(), native = %buffer.native_type(), error = %e, "rejecting native buffer");
                backend.release_image(buffer);
                Err(e)
            }
        }
    }

    fn decode_type(buffer: &B::Buffer) -> Result<MatType> {
        let native = buffer.native_type();
        let ty = from_native(native.depth, native.channels)?;
        to_native(ty)?;
        color_model_for(ty.channels)?;
        Ok(ty)
    }

    /// Adopts a buffer whose type is already known.
    pub(crate) fn from_parts(backend: &Arc<B>, buffer: B::Buffer, ty: MatType) -> Self {
        Self {
            handle: NativeHandle::adopt(Arc::clone(backend), buffer, ty),
        }
    }

    /// Brings the image to `size` and `ty`.
    ///
    /// When the image is initialized with exactly that size and type the
    /// current buffer is kept. Otherwise the current buffer (if any) is
    /// released first and a fresh one allocated; if that allocation fails the
    /// image is left as a placeholder.
    ///
    /// # Errors
    ///
    /// As for [`Image::create`]. Shape and type checks run before anything is
    /// released.
    pub fn reinitialize(&mut self, size: Size, ty: MatType) -> Result<()> {
        if self.is_initialized() && self.size() == size && self.mat_type() == Some(ty) {
            trace!(id = ?self.buffer_id(), width = size.width, height = size.height, %ty, "reusing native buffer");
            return Ok(());
        }

        if size.is_empty() {
            return Err(Error::invalid_dimensions(
                size.width,
                size.height,
                "width and height must be positive",
            ));
        }
        let native = to_native(ty)?;
        color_model_for(ty.channels)?;

        self.handle.release();
        let buffer = self.backend().create_image(size, native).inspect_err(|e| {
            warn!(width = size.width, height = size.height, %ty, error = %e, "native allocation failed");
        })?;
        trace!(id = %buffer.id(), width = size.width, height = size.height, %ty, "allocated native buffer");
        self.handle.replace(buffer, ty);
        Ok(())
    }

    /// [`Image::reinitialize`] to the size and type of `reference`.
    ///
    /// # Errors
    ///
    /// [`Error::UninitializedUse`] if `reference` is a placeholder.
    pub fn reinitialize_as(&mut self, reference: &Image<B>) -> Result<()> {
        let ty = reference.require_type("reinitialize_as")?;
        self.reinitialize(reference.size(), ty)
    }

    /// Returns the buffer to the backend. Safe to call on a placeholder.
    pub fn release(&mut self) {
        self.handle.release();
    }

    /// Whether a native buffer is owned.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.handle.is_live()
    }

    /// Cached size; zero for a placeholder.
    #[inline]
    pub fn size(&self) -> Size {
        self.handle.size()
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.size().width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.size().height
    }

    /// Cached type; `None` for a placeholder.
    #[inline]
    pub fn mat_type(&self) -> Option<MatType> {
        self.handle.mat_type()
    }

    /// Channel count; zero for a placeholder.
    #[inline]
    pub fn channels(&self) -> u32 {
        self.mat_type().map_or(0, |t| t.channels)
    }

    /// Backend the image allocates from.
    #[inline]
    pub fn backend(&self) -> &Arc<B> {
        self.handle.backend()
    }

    /// Identity of the owned buffer, stable until it is released.
    #[inline]
    pub fn buffer_id(&self) -> Option<BufferId> {
        self.handle.id()
    }

    /// The native buffer, for backend calls outside this crate's operations.
    ///
    /// # Errors
    ///
    /// [`Error::UninitializedUse`] on a placeholder.
    pub fn native(&self) -> Result<&B::Buffer> {
        self.live("native")
    }

    /// Mutable access to the native buffer.
    ///
    /// # Errors
    ///
    /// [`Error::UninitializedUse`] on a placeholder.
    pub fn native_mut(&mut self) -> Result<&mut B::Buffer> {
        self.live_mut("native_mut")
    }

    /// Reads the element at `pos`: a linear index, `(row, col)` or a
    /// three-axis index. Bounds are checked by the backend.
    ///
    /// ```rust
    /// # use std::sync::Arc;
    /// # use ipl_core::{Size, format::CV_8UC1};
    /// # use ipl_image::CpuImage;
    /// # use ipl_native::CpuBackend;
    /// let backend = Arc::new(CpuBackend::new());
    /// let img = CpuImage::create(&backend, Size::new(4, 4), CV_8UC1).unwrap();
    /// assert_eq!(img.scalar_at((1, 2)).unwrap()[0], 0.0);
    /// assert_eq!(img.scalar_at(6u32).unwrap(), img.scalar_at((1, 2)).unwrap());
    /// ```
    ///
    /// # Errors
    ///
    /// [`Error::UninitializedUse`] on a placeholder; backend errors otherwise.
    pub fn scalar_at(&self, pos: impl Into<Position>) -> Result<Scalar> {
        let buf = self.live("scalar_at")?;
        let backend = self.backend();
        match pos.into() {
            Position::D1(i) => backend.get_1d(buf, i),
            Position::D2(row, col) => backend.get_2d(buf, row, col),
            Position::D3(i, j, k) => backend.get_3d(buf, i, j, k),
        }
    }

    /// Writes the element at `(row, col)`.
    ///
    /// # Errors
    ///
    /// [`Error::UninitializedUse`] on a placeholder; backend errors otherwise.
    pub fn set_scalar_at(&mut self, row: u32, col: u32, value: Scalar) -> Result<()> {
        let backend = Arc::clone(self.backend());
        let buf = self.live_mut("set_scalar_at")?;
        backend.set_2d(buf, row, col, value)
    }

    /// Independent copy with its own buffer.
    ///
    /// # Errors
    ///
    /// [`Error::UninitializedUse`] on a placeholder.
    pub fn duplicate(&self) -> Result<Image<B>> {
        let ty = self.require_type("duplicate")?;
        let src = self.live("duplicate")?;
        let buffer = native_call("clone_image", self.backend().clone_image(src))?;
        trace!(src = %src.id(), id = %buffer.id(), "duplicated image");
        Ok(Self::from_parts(self.backend(), buffer, ty))
    }

    /// Fresh placeholder sharing this image's backend.
    #[inline]
    pub(crate) fn sibling(&self) -> Image<B> {
        Self::placeholder(self.backend())
    }

    pub(crate) fn live(&self, op: &'static str) -> Result<&B::Buffer> {
        self.handle.buffer().ok_or_else(|| Error::uninitialized(op))
    }

    pub(crate) fn live_mut(&mut self, op: &'static str) -> Result<&mut B::Buffer> {
        self.handle.buffer_mut().ok_or_else(|| Error::uninitialized(op))
    }

    pub(crate) fn require_type(&self, op: &'static str) -> Result<MatType> {
        self.mat_type().ok_or_else(|| Error::uninitialized(op))
    }
}

/// Logs and passes through a failed native call.
pub(crate) fn native_call<T>(op: &'static str, result: Result<T>) -> Result<T> {
    result.inspect_err(|e| warn!(op = op, error = %e, "native call failed"))
}

impl<B: NativeBackend> fmt::Debug for Image<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("initialized", &self.is_initialized())
            .field("handle", &self.handle)
            .finish()
    }
}
