//! Packed asset image.
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! magic: u16 = 0xA55E
//! count: u16
//! count x { path_len: u8, path: [u8; path_len], data_offset: u32, data_len: u32 }
//! data blobs
//! ```
//!
//! `data_offset` is counted from the start of the image.

use core::fmt;

pub const MAGIC_HEADER: u16 = 0xA55E;
pub const IMAGE_HEADER_SIZE: usize = 4;
pub const MAX_PATH_LEN: usize = 64;
/// Entry size without the path bytes.
pub const ENTRY_FIXED_SIZE: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageError {
    BufferTooSmall,
    PathTooLong,
    EmptyPath,
    TooManyEntries,
    AssetTooLarge,
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::BufferTooSmall => write!(f, "output buffer too small"),
            ImageError::PathTooLong => write!(f, "asset path longer than {} bytes", MAX_PATH_LEN),
            ImageError::EmptyPath => write!(f, "empty asset path"),
            ImageError::TooManyEntries => write!(f, "too many assets"),
            ImageError::AssetTooLarge => write!(f, "image larger than 4 GiB"),
        }
    }
}

fn check_path(path: &str) -> Result<(), ImageError> {
    if path.is_empty() {
        return Err(ImageError::EmptyPath);
    }
    if path.len() > MAX_PATH_LEN {
        return Err(ImageError::PathTooLong);
    }
    Ok(())
}

fn table_len(entries: &[(&str, &[u8])]) -> usize {
    entries
        .iter()
        .map(|(path, _)| ENTRY_FIXED_SIZE + path.len())
        .sum()
}

/// Size of the image holding `entries`.
pub fn image_len(entries: &[(&str, &[u8])]) -> Result<usize, ImageError> {
    if entries.len() > usize::from(u16::MAX) {
        return Err(ImageError::TooManyEntries);
    }
    for (path, _) in entries {
        check_path(path)?;
    }
    let data_len: usize = entries.iter().map(|(_, data)| data.len()).sum();
    let len = IMAGE_HEADER_SIZE + table_len(entries) + data_len;
    if u32::try_from(len).is_err() {
        return Err(ImageError::AssetTooLarge);
    }
    Ok(len)
}

/// Pack `entries` into `out`.
///
/// Returns the number of bytes written. Entry order is kept, so lookups
/// find the first of duplicate paths.
pub fn write_image(entries: &[(&str, &[u8])], out: &mut [u8]) -> Result<usize, ImageError> {
    let total = image_len(entries)?;
    if out.len() < total {
        return Err(ImageError::BufferTooSmall);
    }

    // Both fit, checked by image_len
    let count = entries.len() as u16;
    out[..2].copy_from_slice(&MAGIC_HEADER.to_le_bytes());
    out[2..IMAGE_HEADER_SIZE].copy_from_slice(&count.to_le_bytes());

    let mut cursor = IMAGE_HEADER_SIZE;
    let mut data_offset = IMAGE_HEADER_SIZE + table_len(entries);
    for (path, data) in entries {
        out[cursor] = path.len() as u8;
        cursor += 1;
        out[cursor..cursor + path.len()].copy_from_slice(path.as_bytes());
        cursor += path.len();
        out[cursor..cursor + 4].copy_from_slice(&(data_offset as u32).to_le_bytes());
        out[cursor + 4..cursor + 8].copy_from_slice(&(data.len() as u32).to_le_bytes());
        cursor += 8;

        out[data_offset..data_offset + data.len()].copy_from_slice(data);
        data_offset += data.len();
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_first_entry_layout() {
        let mut out = [0u8; 64];
        let len = write_image(&[("/a", b"xyz")], &mut out).unwrap();
        assert_eq!(len, IMAGE_HEADER_SIZE + ENTRY_FIXED_SIZE + 2 + 3);
        assert_eq!(&out[..4], &[0x5E, 0xA5, 1, 0]);
        assert_eq!(out[4], 2);
        assert_eq!(&out[5..7], b"/a");
        assert_eq!(&out[7..11], &15u32.to_le_bytes());
        assert_eq!(&out[11..15], &3u32.to_le_bytes());
        assert_eq!(&out[15..18], b"xyz");
    }

    #[test]
    fn rejects_bad_paths_and_small_buffers() {
        let long = [b'a'; MAX_PATH_LEN + 1];
        let long = core::str::from_utf8(&long).unwrap();
        let mut out = [0u8; 256];
        assert_eq!(write_image(&[("", b"")], &mut out), Err(ImageError::EmptyPath));
        assert_eq!(write_image(&[(long, b"")], &mut out), Err(ImageError::PathTooLong));
        assert_eq!(
            write_image(&[("/index.html", b"hello")], &mut out[..10]),
            Err(ImageError::BufferTooSmall)
        );
    }

    #[test]
    fn empty_image() {
        let mut out = [0u8; 4];
        assert_eq!(write_image(&[], &mut out), Ok(4));
        assert_eq!(out, [0x5E, 0xA5, 0, 0]);
    }
}
