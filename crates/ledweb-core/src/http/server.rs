use embedded_io_async::{Read, Write};

use super::{HttpResult, connection::HttpConnection};

pub trait HttpHandler {
    #[allow(async_fn_in_trait)]
    async fn handle_request<T: Read + Write>(
        &mut self,
        conn: &mut HttpConnection<'_, T>,
    ) -> HttpResult;
}

/// Serve one request on an accepted socket.
///
/// Reads the request head, runs the handler to completion and returns. The
/// socket stays open; closing it is up to the caller.
pub async fn serve_connection<H: HttpHandler, T: Read + Write>(
    handler: &mut H,
    socket: &mut T,
) -> HttpResult {
    let mut conn = HttpConnection::from_socket(socket).await?;
    handler.handle_request(&mut conn).await
}
