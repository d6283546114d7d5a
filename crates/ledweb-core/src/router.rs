use embedded_io_async::{Read, Write};
use log::warn;

use crate::{
    assets::{
        AssetStore,
        resolver::{AssetLookup, AssetPath, serve_asset},
    },
    config::HttpSettings,
    control::{DutyOutput, LedPair, handle_led_control},
    http::{ContentType, HttpConnection, HttpHandler, HttpResult},
};

/// Request dispatcher.
///
/// Owns everything a request may touch: the asset store, the LED channels
/// and the settings. The control path is matched exactly, every other
/// request goes to the assets.
pub struct Router<S, O> {
    assets: S,
    leds: LedPair<O>,
    settings: HttpSettings,
}

impl<S: AssetStore, O: DutyOutput> Router<S, O> {
    pub const fn new(assets: S, leds: LedPair<O>, settings: HttpSettings) -> Self {
        Self {
            assets,
            leds,
            settings,
        }
    }

    pub fn leds(&self) -> &LedPair<O> {
        &self.leds
    }
}

impl<S: AssetStore, O: DutyOutput> HttpHandler for Router<S, O> {
    async fn handle_request<T: Read + Write>(
        &mut self,
        conn: &mut HttpConnection<'_, T>,
    ) -> HttpResult {
        let mut path = AssetPath::new();
        if path.push_str(conn.path()).is_err() {
            return serve_404(conn).await;
        }

        if path == self.settings.control_path {
            return handle_led_control(conn, &mut self.leds, &self.settings).await;
        }

        let default_document = self.settings.default_document;
        match serve_asset(conn, &mut self.assets, &path, default_document).await? {
            AssetLookup::Served => Ok(()),
            AssetLookup::NotFound => serve_404(conn).await,
            AssetLookup::StorageUnavailable(err) => {
                warn!("http: storage unavailable: {}", err);
                serve_503(conn).await
            }
        }
    }
}

async fn serve_404<T: Read + Write>(conn: &mut HttpConnection<'_, T>) -> HttpResult {
    conn.write_text(404, ContentType::TextPlain, b"404 Not Found")
        .await
}

async fn serve_503<T: Read + Write>(conn: &mut HttpConnection<'_, T>) -> HttpResult {
    conn.write_text(503, ContentType::TextPlain, b"503 Service Unavailable")
        .await
}
