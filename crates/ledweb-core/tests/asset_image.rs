//! Flash asset store over packed images.

mod common;

use common::{MemoryFlash, build_image, mounted_store};
use ledweb_core::assets::{AssetEntry, AssetStore, FlashAssetStore, StorageError};

const INDEX: &[u8] = b"<html><body>index</body></html>";
const STYLE: &[u8] = b"body { color: red; }";

fn read_all<S: AssetStore>(store: &mut S, path: &str, chunk: usize) -> Vec<u8> {
    let mut file = store.open(path).unwrap().expect("asset present");
    let mut out = Vec::new();
    let mut buf = vec![0u8; chunk];
    loop {
        let n = file.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        out.extend_from_slice(&buf[..n]);
    }
    assert_eq!(file.remaining(), 0);
    out
}

// -----------------------------------------------------------------------------
// Mounting
// -----------------------------------------------------------------------------

#[test]
fn mount_reports_entry_count() {
    let image = build_image(&[("/index.html", INDEX), ("/style.css", STYLE)]);
    let size = image.len() as u32;
    let mut store = FlashAssetStore::new(MemoryFlash::new(image), 0, size);

    assert!(!store.is_mounted());
    assert_eq!(store.mount(), Ok(2));
    assert!(store.is_mounted());
}

#[test]
fn lookups_before_mount_fail() {
    let image = build_image(&[("/index.html", INDEX)]);
    let size = image.len() as u32;
    let mut store = FlashAssetStore::new(MemoryFlash::new(image), 0, size);

    assert_eq!(store.find("/index.html"), Err(StorageError::NotMounted));
    assert!(matches!(store.open("/index.html"), Err(StorageError::NotMounted)));
}

#[test]
fn erased_flash_has_no_image() {
    let mut store = FlashAssetStore::new(MemoryFlash::new(vec![0xFF; 4096]), 0, 4096);
    assert_eq!(store.mount(), Err(StorageError::InvalidMagicHeader));
    assert!(!store.is_mounted());
}

#[test]
fn driver_failure_on_mount() {
    let image = build_image(&[("/index.html", INDEX)]);
    let size = image.len() as u32;
    let mut flash = MemoryFlash::new(image);
    flash.fail_reads = true;
    let mut store = FlashAssetStore::new(flash, 0, size);
    assert_eq!(store.mount(), Err(StorageError::DriverError));
}

#[test]
fn region_too_small_for_header() {
    let mut store = FlashAssetStore::new(MemoryFlash::new(vec![0; 16]), 0, 2);
    assert_eq!(store.mount(), Err(StorageError::InvalidData));
}

// -----------------------------------------------------------------------------
// Lookup and reading
// -----------------------------------------------------------------------------

#[test]
fn find_locates_every_asset() {
    let mut store = mounted_store(&[("/index.html", INDEX), ("/style.css", STYLE)]);

    let index = store.find("/index.html").unwrap().unwrap();
    let style = store.find("/style.css").unwrap().unwrap();
    assert_eq!(index.len, INDEX.len() as u32);
    assert_eq!(style.len, STYLE.len() as u32);
    assert_eq!(style.offset, index.offset + index.len);
}

#[test]
fn find_misses_unknown_paths() {
    let mut store = mounted_store(&[("/index.html", INDEX)]);
    assert_eq!(store.find("/index.htm"), Ok(None));
    assert_eq!(store.find("index.html"), Ok(None));
    assert_eq!(store.find(""), Ok(None));
    assert_eq!(store.find(&"/x".repeat(40)), Ok(None));
}

#[test]
fn first_duplicate_wins() {
    let mut store = mounted_store(&[("/a.txt", b"first".as_slice()), ("/a.txt", b"second".as_slice())]);
    assert_eq!(read_all(&mut store, "/a.txt", 64), b"first");
}

#[test]
fn reads_whole_asset_in_small_chunks() {
    let big: Vec<u8> = (0..3000u32).map(|i| (i % 251) as u8).collect();
    let mut store = mounted_store(&[("/index.html", INDEX), ("/big.bin", big.as_slice())]);

    assert_eq!(read_all(&mut store, "/big.bin", 7), big);
    assert_eq!(read_all(&mut store, "/index.html", 1024), INDEX);
}

#[test]
fn empty_asset_is_found_and_empty() {
    let mut store = mounted_store(&[("/empty.txt", b"".as_slice())]);
    let file = store.open("/empty.txt").unwrap().unwrap();
    assert_eq!(file.size(), 0);
    assert_eq!(read_all(&mut store, "/empty.txt", 16), b"");
}

#[test]
fn image_at_partition_offset() {
    const BASE: usize = 0x2000;
    let image = build_image(&[("/index.html", INDEX)]);
    let size = image.len() as u32;
    let flash = MemoryFlash::with_image_at(BASE, &image);
    let mut store = FlashAssetStore::new(flash, BASE as u32, size);

    store.mount().unwrap();
    assert_eq!(read_all(&mut store, "/index.html", 16), INDEX);
}

#[test]
fn entry_pointing_outside_region_is_invalid() {
    let mut image = build_image(&[("/index.html", INDEX)]);
    // data_len of the only entry
    let len_at = 4 + 1 + "/index.html".len() + 4;
    image[len_at..len_at + 4].copy_from_slice(&u32::MAX.to_le_bytes());
    let size = image.len() as u32;
    let mut store = FlashAssetStore::new(MemoryFlash::new(image), 0, size);
    store.mount().unwrap();

    assert_eq!(store.find("/index.html"), Err(StorageError::InvalidData));
}

#[test]
fn zero_length_path_is_invalid() {
    let mut image = build_image(&[("/a", b"x".as_slice())]);
    image[4] = 0;
    let size = image.len() as u32;
    let mut store = FlashAssetStore::new(MemoryFlash::new(image), 0, size);
    store.mount().unwrap();

    assert_eq!(store.find("/a"), Err(StorageError::InvalidData));
}

#[test]
fn read_past_end_returns_nothing() {
    let mut store = mounted_store(&[("/a", b"abc".as_slice())]);
    let found = store.find("/a").unwrap().unwrap();
    let entry = AssetEntry {
        offset: found.offset,
        len: 3,
    };
    let mut buf = [0u8; 8];
    assert_eq!(store.read_at(&entry, 3, &mut buf), Ok(0));
    assert_eq!(store.read_at(&entry, 1, &mut buf), Ok(2));
    assert_eq!(&buf[..2], b"bc");
}
