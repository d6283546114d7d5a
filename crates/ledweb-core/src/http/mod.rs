pub mod connection;
pub mod headers;
pub mod request;
pub mod server;

use core::fmt;

use embedded_io::ErrorKind;

pub use connection::HttpConnection;
pub use headers::{ContentHeaders, ContentType, HttpMethod, ResponseHeaders, StatusCode};
pub use server::{HttpHandler, serve_connection};

use crate::assets::StorageError;

#[derive(Debug)]
pub enum Error {
    /// Peer closed or reset the connection
    Closed,
    /// Other transport failure
    Io,
    /// Malformed request head or body
    Parse,
    /// Nothing was received
    NoData,
    BodyTooLarge,
    FormatHeaders,
    /// Asset storage failed while streaming
    Storage(StorageError),
}

impl Error {
    /// Map a transport error.
    pub fn io<E: embedded_io::Error>(err: E) -> Self {
        match err.kind() {
            ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected
            | ErrorKind::BrokenPipe => Error::Closed,
            _ => Error::Io,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Closed => write!(f, "connection closed"),
            Error::Io => write!(f, "transport error"),
            Error::Parse => write!(f, "malformed request"),
            Error::NoData => write!(f, "no data"),
            Error::BodyTooLarge => write!(f, "request body too large"),
            Error::FormatHeaders => write!(f, "response does not fit its buffer"),
            Error::Storage(e) => write!(f, "storage error: {}", e),
        }
    }
}

impl From<core::fmt::Error> for Error {
    fn from(_error: core::fmt::Error) -> Self {
        Error::FormatHeaders
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Error::Storage(err)
    }
}

pub type HttpResult = Result<(), Error>;
