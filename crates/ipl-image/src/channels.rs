//! Owned sequence of single-channel planes.

use std::ops::{Deref, DerefMut};

use ipl_native::NativeBackend;

use crate::Image;

/// Planes produced by [`Image::split`], one per source channel in storage
/// order. Dropping the sequence releases every plane.
#[derive(Debug)]
pub struct Channels<B: NativeBackend> {
    planes: Vec<Image<B>>,
}

impl<B: NativeBackend> Channels<B> {
    /// Wraps already-built planes.
    pub fn new(planes: Vec<Image<B>>) -> Self {
        Self { planes }
    }

    /// Releases every plane; the planes stay as placeholders.
    pub fn release(&mut self) {
        for plane in &mut self.planes {
            plane.release();
        }
    }

    /// Unwraps into the plane vector.
    pub fn into_inner(self) -> Vec<Image<B>> {
        self.planes
    }
}

impl<B: NativeBackend> Deref for Channels<B> {
    type Target = [Image<B>];

    fn deref(&self) -> &[Image<B>] {
        &self.planes
    }
}

impl<B: NativeBackend> DerefMut for Channels<B> {
    fn deref_mut(&mut self) -> &mut [Image<B>] {
        &mut self.planes
    }
}

impl<B: NativeBackend> IntoIterator for Channels<B> {
    type Item = Image<B>;
    type IntoIter = std::vec::IntoIter<Image<B>>;

    fn into_iter(self) -> Self::IntoIter {
        self.planes.into_iter()
    }
}

impl<'a, B: NativeBackend> IntoIterator for &'a Channels<B> {
    type Item = &'a Image<B>;
    type IntoIter = std::slice::Iter<'a, Image<B>>;

    fn into_iter(self) -> Self::IntoIter {
        self.planes.iter()
    }
}
