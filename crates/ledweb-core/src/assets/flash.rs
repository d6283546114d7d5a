use embedded_storage::ReadStorage;
use log::info;

use super::{
    AssetEntry,
    AssetStore,
    StorageError,
    image::{ENTRY_FIXED_SIZE, IMAGE_HEADER_SIZE, MAGIC_HEADER, MAX_PATH_LEN},
};

/// Asset store reading a packed image from a flash region.
///
/// Every read stays inside `base..base + size`. Lookups fail with
/// [`StorageError::NotMounted`] until [`FlashAssetStore::mount`] succeeds.
pub struct FlashAssetStore<S> {
    storage: S,
    base: u32,
    size: u32,
    count: Option<u16>,
}

impl<S: ReadStorage> FlashAssetStore<S> {
    pub const fn new(storage: S, base: u32, size: u32) -> Self {
        Self {
            storage,
            base,
            size,
            count: None,
        }
    }

    /// Validate the image header.
    ///
    /// Returns the number of stored assets.
    pub fn mount(&mut self) -> Result<u16, StorageError> {
        self.count = None;

        let mut header = [0u8; IMAGE_HEADER_SIZE];
        self.read_raw(0, &mut header)?;
        let magic = u16::from_le_bytes([header[0], header[1]]);
        if magic != MAGIC_HEADER {
            return Err(StorageError::InvalidMagicHeader);
        }
        let count = u16::from_le_bytes([header[2], header[3]]);

        self.count = Some(count);
        info!("assets: mounted image with {} entries", count);
        Ok(count)
    }

    pub fn is_mounted(&self) -> bool {
        self.count.is_some()
    }

    fn read_raw(&mut self, offset: u32, buf: &mut [u8]) -> Result<(), StorageError> {
        let len = u32::try_from(buf.len()).map_err(|_| StorageError::InvalidData)?;
        let end = offset.checked_add(len).ok_or(StorageError::InvalidData)?;
        if end > self.size {
            return Err(StorageError::InvalidData);
        }
        self.storage
            .read(self.base + offset, buf)
            .map_err(|_| StorageError::DriverError)
    }
}

impl<S: ReadStorage> AssetStore for FlashAssetStore<S> {
    fn find(&mut self, path: &str) -> Result<Option<AssetEntry>, StorageError> {
        let count = self.count.ok_or(StorageError::NotMounted)?;
        if path.is_empty() || path.len() > MAX_PATH_LEN {
            return Ok(None);
        }

        let mut cursor = IMAGE_HEADER_SIZE as u32;
        let mut record_buf = [0u8; MAX_PATH_LEN + ENTRY_FIXED_SIZE - 1];
        for _ in 0..count {
            let mut path_len = [0u8; 1];
            self.read_raw(cursor, &mut path_len)?;
            let path_len = usize::from(path_len[0]);
            if path_len == 0 || path_len > MAX_PATH_LEN {
                return Err(StorageError::InvalidData);
            }

            let record = &mut record_buf[..path_len + ENTRY_FIXED_SIZE - 1];
            self.read_raw(cursor + 1, record)?;
            cursor += 1 + record.len() as u32;

            if &record[..path_len] != path.as_bytes() {
                continue;
            }
            let location = &record[path_len..];
            let offset = u32::from_le_bytes([location[0], location[1], location[2], location[3]]);
            let len = u32::from_le_bytes([location[4], location[5], location[6], location[7]]);
            if offset.checked_add(len).is_none_or(|end| end > self.size) {
                return Err(StorageError::InvalidData);
            }
            return Ok(Some(AssetEntry { offset, len }));
        }
        Ok(None)
    }

    fn read_at(
        &mut self,
        entry: &AssetEntry,
        pos: u32,
        buf: &mut [u8],
    ) -> Result<usize, StorageError> {
        if self.count.is_none() {
            return Err(StorageError::NotMounted);
        }
        let remaining = entry.len.saturating_sub(pos) as usize;
        let n = buf.len().min(remaining);
        if n == 0 {
            return Ok(0);
        }
        self.read_raw(entry.offset + pos, &mut buf[..n])?;
        Ok(n)
    }
}
