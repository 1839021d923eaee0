//! Lookup-table remap.

use ipl_core::format::CV_8UC1;
use ipl_core::{Error, Result, Scalar, Size};
use ipl_native::NativeBackend;
use tracing::{debug, trace};

use crate::resource::{Image, native_call};

/// 256-entry lookup tables, either one shared by every channel or one per
/// channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lut {
    tables: Vec<[u8; 256]>,
}

impl Lut {
    /// One table applied to every channel.
    pub fn uniform(table: [u8; 256]) -> Self {
        Self { tables: vec![table] }
    }

    /// One table per channel, in storage order.
    pub fn per_channel(tables: Vec<[u8; 256]>) -> Self {
        Self { tables }
    }

    /// Maps every value to itself.
    pub fn identity() -> Self {
        Self::from_fn(|v| v)
    }

    /// Uniform table built from `f`.
    ///
    /// ```rust
    /// use ipl_image::Lut;
    ///
    /// let invert = Lut::from_fn(|v| 255 - v);
    /// assert_eq!(invert.table(0)[10], 245);
    /// ```
    pub fn from_fn(f: impl Fn(u8) -> u8) -> Self {
        Self::uniform(std::array::from_fn(|i| f(i as u8)))
    }

    /// Number of tables.
    #[inline]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no table is present.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Table `i`.
    ///
    /// # Panics
    ///
    /// If `i >= self.len()`.
    #[inline]
    pub fn table(&self, i: usize) -> &[u8; 256] {
        &self.tables[i]
    }
}

impl<B: NativeBackend> Image<B> {
    /// Remaps every element through `lut` into `dest`.
    ///
    /// A uniform table becomes a temporary 1x256 single-channel native
    /// table; a per-channel table a 1x256 table with one channel per source
    /// channel. The temporary is released before returning on every path.
    ///
    /// # Errors
    ///
    /// - [`Error::UninitializedUse`] if `self` is a placeholder
    /// - [`Error::ChannelCountMismatch`] if a per-channel table count differs
    ///   from the source channel count; `dest` is not touched
    pub fn lut_to(&self, dest: &mut Image<B>, lut: &Lut) -> Result<()> {
        let ty = self.require_type("lut")?;
        let src = self.live("lut")?;
        let channels = ty.channels as usize;
        if lut.len() != 1 && lut.len() != channels {
            return Err(Error::channel_count_mismatch(channels, lut.len()));
        }
        debug!(tables = lut.len(), channels, "lut");

        let mut table = Image::create(
            self.backend(),
            Size::new(256, 1),
            CV_8UC1.with_channels(lut.len() as u32),
        )?;
        trace!(id = ?table.buffer_id(), "temporary lookup table");
        for i in 0..256u32 {
            let mut value = Scalar::default();
            for (c, t) in lut.tables.iter().enumerate() {
                value[c] = t[i as usize] as f64;
            }
            table.set_scalar_at(0, i, value)?;
        }

        dest.reinitialize_as(self)?;
        let dst = dest.live_mut("lut")?;
        native_call("lut", self.backend().lut(src, dst, table.live("lut")?))
    }

    /// Remapped copy.
    pub fn lut(&self, lut: &Lut) -> Result<Image<B>> {
        let mut out = self.sibling();
        self.lut_to(&mut out, lut)?;
        Ok(out)
    }
}
