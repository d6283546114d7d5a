use core::ops::Range;

use embedded_io_async::{Read, Write};
use heapless::{String, Vec};

use super::{
    Error,
    HttpResult,
    headers::{
        ContentHeaders,
        ContentType,
        HttpMethod,
        ResponseHeaders,
        StatusCode,
        TargetWriter as _,
        find_content_length,
        is_form_encoded,
        parse_request_line,
        read_heading,
    },
    request::{self, ArgValue},
};

pub const HEADER_BUFFER_SIZE: usize = 1024;
pub const BODY_BUFFER_SIZE: usize = 1024;
const RESPONSE_HEAD_SIZE: usize = 256;
const BODY_RX_CHUNK_SIZE: usize = 256;
pub const STREAM_CHUNK_SIZE: usize = 1024;

/// HTTP connection context
///
/// Borrows the transport for the lifetime of one request; the caller
/// closes it afterwards.
pub struct HttpConnection<'a, T> {
    method: HttpMethod,
    target: Range<usize>,
    path_end: usize,
    header_end: usize,
    content_length: u32,
    form_body: bool,
    body_loaded: bool,

    socket: &'a mut T,
    header_buf: Vec<u8, HEADER_BUFFER_SIZE>,
    body_buf: Vec<u8, BODY_BUFFER_SIZE>,
}

impl<'a, T: Read + Write> HttpConnection<'a, T> {
    /// Read the request head from a socket.
    pub async fn from_socket(socket: &'a mut T) -> Result<Self, Error> {
        let mut header_buf = Vec::<u8, HEADER_BUFFER_SIZE>::new();
        let _ = header_buf.resize_default(HEADER_BUFFER_SIZE);
        let (header_end, header_len) = read_heading(header_buf.as_mut_slice(), socket)
            .await
            .map_err(Error::io)?;
        if header_len == 0 {
            return Err(Error::NoData);
        }
        header_buf.truncate(header_len);

        // The body may be binary, only the head must be UTF-8
        let header_str =
            core::str::from_utf8(&header_buf[..header_end]).map_err(|_| Error::Parse)?;
        let line = parse_request_line(header_str).ok_or(Error::Parse)?;
        let rest_headers = &header_str[line.headers_start..];
        let content_length = find_content_length(rest_headers).unwrap_or(0);
        let form_body = is_form_encoded(rest_headers);
        let path_end = header_str[line.target.clone()]
            .find('?')
            .map_or(line.target.end, |pos| line.target.start + pos);

        Ok(Self {
            method: line.method,
            target: line.target,
            path_end,
            header_end,
            content_length,
            form_body,
            body_loaded: false,
            socket,
            header_buf,
            body_buf: Vec::new(),
        })
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Request path without the query string.
    pub fn path(&self) -> &str {
        self.head_str(self.target.start..self.path_end)
    }

    /// Raw query string, if the target has one.
    pub fn query(&self) -> Option<&str> {
        (self.path_end < self.target.end)
            .then(|| self.head_str(self.path_end + 1..self.target.end))
    }

    /// Get a decoded request argument.
    ///
    /// The query string is searched first, then an url-encoded form body.
    pub async fn arg(&mut self, name: &str) -> Result<Option<ArgValue>, Error> {
        if let Some(raw) = self.query().and_then(|query| request::find_arg(query, name)) {
            return Ok(Some(request::url_decode(raw)));
        }
        if !self.form_body || self.content_length == 0 {
            return Ok(None);
        }
        let body = self.read_body().await?;
        let body = core::str::from_utf8(body).map_err(|_| Error::Parse)?;
        Ok(request::find_arg(body, name).map(request::url_decode))
    }

    /// Write the headers to the connection
    pub async fn write_headers(&mut self, headers: &ResponseHeaders) -> HttpResult {
        let mut head = String::<RESPONSE_HEAD_SIZE>::new();
        headers.write_to(&mut head)?;
        self.write_all(head.as_bytes()).await
    }

    /// Write the body to the connection
    pub async fn write_body(&mut self, body: &[u8]) -> HttpResult {
        for chunk in body.chunks(STREAM_CHUNK_SIZE) {
            self.write_all(chunk).await?;
        }
        Ok(())
    }

    /// Write a complete response with a small fixed body.
    pub async fn write_text(
        &mut self,
        status: StatusCode,
        content_type: ContentType,
        body: &[u8],
    ) -> HttpResult {
        let headers = ResponseHeaders::from_code(status)
            .with_content(ContentHeaders::new(content_type).with_length(body.len()));
        self.write_headers(&headers).await?;
        self.write_body(body).await
    }

    /// Write raw bytes and flush them.
    pub async fn write_all(&mut self, buf: &[u8]) -> HttpResult {
        self.socket.write_all(buf).await.map_err(Error::io)?;
        self.socket.flush().await.map_err(Error::io)?;
        Ok(())
    }

    fn head_str(&self, range: Range<usize>) -> &str {
        self.header_buf
            .get(range)
            .and_then(|bytes| core::str::from_utf8(bytes).ok())
            .unwrap_or("")
    }

    /// Read the request body
    async fn read_body(&mut self) -> Result<&[u8], Error> {
        if self.body_loaded {
            return Ok(self.body_buf.as_slice());
        }
        if self.content_length == 0 {
            return Err(Error::NoData);
        }
        let content_length = self.content_length as usize;
        if content_length > BODY_BUFFER_SIZE {
            return Err(Error::BodyTooLarge);
        }

        self.body_buf.clear();

        if self.header_buf.len() > self.header_end {
            let tail = &self.header_buf[self.header_end..];
            let take = tail.len().min(content_length);
            self.body_buf
                .extend_from_slice(&tail[..take])
                .map_err(|_| Error::BodyTooLarge)?;
        }

        // Read remaining body
        while self.body_buf.len() < content_length {
            let mut buf = [0u8; BODY_RX_CHUNK_SIZE];
            let want = (content_length - self.body_buf.len()).min(BODY_RX_CHUNK_SIZE);
            let n = self.socket.read(&mut buf[..want]).await.map_err(Error::io)?;
            if n == 0 {
                break;
            }
            self.body_buf
                .extend_from_slice(&buf[..n])
                .map_err(|_| Error::BodyTooLarge)?;
        }

        self.body_loaded = true;
        Ok(self.body_buf.as_slice())
    }
}
