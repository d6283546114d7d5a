use embedded_io_async::{Read, Write};
use heapless::String;
use log::info;

use super::{AssetStore, StorageError, content_type::content_type_for};
use crate::http::{
    ContentHeaders,
    Error,
    HttpConnection,
    ResponseHeaders,
    connection::STREAM_CHUNK_SIZE,
};

/// Longest request path the resolver looks up.
pub const MAX_REQUEST_PATH: usize = 128;

pub type AssetPath = String<MAX_REQUEST_PATH>;

/// Outcome of an asset request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetLookup {
    /// The asset was streamed to the client
    Served,
    /// No such asset; nothing was written
    NotFound,
    /// The store could not be queried; nothing was written
    StorageUnavailable(StorageError),
}

/// Rewrite a directory path to the default document.
///
/// Any path ending with `/` is replaced by `/` + `default_document`, once.
/// Returns `None` when the result does not fit an [`AssetPath`].
pub fn normalize_path(path: &str, default_document: &str) -> Option<AssetPath> {
    let mut normalized = AssetPath::new();
    if path.ends_with('/') {
        normalized.push('/').ok()?;
        normalized.push_str(default_document).ok()?;
    } else {
        normalized.push_str(path).ok()?;
    }
    Some(normalized)
}

/// Stream the asset at `path` with its inferred content type.
///
/// Only [`AssetLookup::Served`] writes a response; the caller answers the
/// other outcomes. A storage failure after the headers went out is
/// returned as an error and the connection should be dropped.
pub async fn serve_asset<S: AssetStore, T: Read + Write>(
    conn: &mut HttpConnection<'_, T>,
    store: &mut S,
    path: &str,
    default_document: &str,
) -> Result<AssetLookup, Error> {
    info!("http: request {:?} {}", conn.method(), path);

    let Some(path) = normalize_path(path, default_document) else {
        return Ok(AssetLookup::NotFound);
    };
    let content_type = content_type_for(&path);

    let mut file = match store.open(&path) {
        Ok(Some(file)) => file,
        Ok(None) => return Ok(AssetLookup::NotFound),
        Err(err) => return Ok(AssetLookup::StorageUnavailable(err)),
    };

    let headers = ResponseHeaders::success()
        .with_content(ContentHeaders::new(content_type).with_length(file.size() as usize));
    conn.write_headers(&headers).await?;

    let mut chunk = [0u8; STREAM_CHUNK_SIZE];
    loop {
        let n = file.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        conn.write_all(&chunk[..n]).await?;
    }

    Ok(AssetLookup::Served)
}
