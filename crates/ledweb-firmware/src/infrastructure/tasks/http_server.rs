use embassy_net::{Stack, tcp::TcpSocket};
use embassy_time::Duration;
use ledweb_core::{Router, http::serve_connection};
use log::{info, warn};

use crate::infrastructure::{
    config,
    drivers::{FlashAssets, LedcOutput},
};

const RX_BUFFER_SIZE: usize = 2048;
const TX_BUFFER_SIZE: usize = 4096;

pub(crate) type AppRouter = Router<FlashAssets, LedcOutput>;

/// HTTP server task
///
/// Serves one connection at a time; every request runs to completion
/// before the next one is accepted.
#[embassy_executor::task]
pub(crate) async fn http_server_task(stack: Stack<'static>, router: &'static mut AppRouter) {
    let mut rx_buffer = [0u8; RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TX_BUFFER_SIZE];
    let port = config::NETWORK.http_port;
    info!("http: listening on port {}", port);

    loop {
        let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);
        socket.set_timeout(Some(Duration::from_secs(
            config::NETWORK.socket_timeout_secs,
        )));

        if let Err(err) = socket.accept(port).await {
            warn!("http: accept error: {:?}", err);
            continue;
        }

        if let Err(err) = serve_connection(router, &mut socket).await {
            warn!("http: connection error: {}", err);
        }

        socket.close();
        if let Err(err) = socket.flush().await {
            warn!("http: flush error: {:?}", err);
        }
    }
}
