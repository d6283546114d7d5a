use esp_bootloader_esp_idf::partitions::{
    DataPartitionSubType,
    PARTITION_TABLE_MAX_LEN,
    PartitionType,
    read_partition_table,
};
use esp_hal::peripherals::FLASH;
use esp_storage::FlashStorage;
use ledweb_core::assets::{FlashAssetStore, StorageError};
use log::{info, warn};

pub(crate) type FlashAssets = FlashAssetStore<FlashStorage<'static>>;

/// Locate the asset partition and mount the image stored in it.
///
/// A missing partition or image is logged and leaves the store unmounted;
/// asset requests are then answered with `503`.
pub(crate) fn init_asset_store(flash: FLASH<'static>) -> FlashAssets {
    let mut flash = FlashStorage::new(flash);

    let (offset, size) = match find_asset_partition(&mut flash) {
        Ok(region) => region,
        Err(err) => {
            warn!("assets: partition lookup failed: {}", err);
            (0, 0)
        }
    };
    info!("assets: partition at {:#x}, {} bytes", offset, size);

    let mut store = FlashAssetStore::new(flash, offset, size);
    if let Err(err) = store.mount() {
        warn!("assets: failed to mount: {}", err);
    }
    store
}

fn find_asset_partition(flash: &mut FlashStorage<'static>) -> Result<(u32, u32), StorageError> {
    let mut buffer = [0u8; PARTITION_TABLE_MAX_LEN];
    let table =
        read_partition_table(flash, &mut buffer).map_err(|_| StorageError::DriverError)?;
    let entry = table
        .find_partition(PartitionType::Data(DataPartitionSubType::Spiffs))
        .map_err(|_| StorageError::InvalidData)?
        .ok_or(StorageError::NotMounted)?;
    Ok((entry.offset(), entry.len()))
}
