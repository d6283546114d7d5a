//! Read-only static assets.
//!
//! Assets are provisioned into flash as a packed image (see [`image`]) and
//! served by the [`resolver`]. Nothing here writes to storage at runtime.

pub mod content_type;
pub mod flash;
pub mod image;
pub mod resolver;

use core::fmt;

pub use content_type::content_type_for;
pub use flash::FlashAssetStore;
pub use image::{ImageError, image_len, write_image};
pub use resolver::{AssetLookup, normalize_path, serve_asset};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// The asset image has not been mounted
    NotMounted,
    DriverError,
    InvalidMagicHeader,
    InvalidData,
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::NotMounted => write!(f, "storage not mounted"),
            StorageError::DriverError => write!(f, "storage driver error"),
            StorageError::InvalidMagicHeader => write!(f, "invalid asset image header"),
            StorageError::InvalidData => write!(f, "invalid asset image data"),
        }
    }
}

/// Location of one asset's bytes inside the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetEntry {
    pub offset: u32,
    pub len: u32,
}

/// A read-only asset store.
pub trait AssetStore {
    /// Look up an asset by its absolute path.
    fn find(&mut self, path: &str) -> Result<Option<AssetEntry>, StorageError>;

    /// Read asset bytes starting at `pos` (relative to the asset start).
    ///
    /// Returns the number of bytes read, `0` at the end of the asset.
    fn read_at(
        &mut self,
        entry: &AssetEntry,
        pos: u32,
        buf: &mut [u8],
    ) -> Result<usize, StorageError>;

    /// Open an asset for sequential reading.
    fn open(&mut self, path: &str) -> Result<Option<AssetFile<'_, Self>>, StorageError>
    where
        Self: Sized,
    {
        Ok(self.find(path)?.map(|entry| AssetFile::new(self, entry)))
    }
}

/// An open asset.
///
/// Holds the store borrowed until dropped, so at most one asset is open at a
/// time.
pub struct AssetFile<'a, S: AssetStore> {
    store: &'a mut S,
    entry: AssetEntry,
    pos: u32,
}

impl<'a, S: AssetStore> AssetFile<'a, S> {
    fn new(store: &'a mut S, entry: AssetEntry) -> Self {
        Self {
            store,
            entry,
            pos: 0,
        }
    }

    /// Total size of the asset in bytes.
    pub fn size(&self) -> u32 {
        self.entry.len
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> u32 {
        self.entry.len.saturating_sub(self.pos)
    }

    /// Read the next chunk. Returns `0` once the whole asset was read.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, StorageError> {
        if self.remaining() == 0 || buf.is_empty() {
            return Ok(0);
        }
        let n = self.store.read_at(&self.entry, self.pos, buf)?;
        self.pos += u32::try_from(n).map_err(|_| StorageError::InvalidData)?;
        Ok(n)
    }
}
