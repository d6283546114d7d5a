use core::{fmt::Write, ops::Range};

use embedded_io_async::Read;

pub type StatusCode = u16;

fn reason_phrase(code: StatusCode) -> &'static str {
    match code {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        413 => "Request Entity Too Large",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// HTTP Content Type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    TextHtml,
    TextCss,
    JavaScript,
    Png,
    Gif,
    Jpeg,
    Icon,
    TextXml,
    Pdf,
    Zip,
    Gzip,
    TextPlain,
}

impl ContentType {
    /// Convert the content type to a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::TextHtml => "text/html",
            ContentType::TextCss => "text/css",
            ContentType::JavaScript => "application/javascript",
            ContentType::Png => "image/png",
            ContentType::Gif => "image/gif",
            ContentType::Jpeg => "image/jpeg",
            ContentType::Icon => "image/x-icon",
            ContentType::TextXml => "text/xml",
            ContentType::Pdf => "application/x-pdf",
            ContentType::Zip => "application/x-zip",
            ContentType::Gzip => "application/x-gzip",
            ContentType::TextPlain => "text/plain",
        }
    }
}

/// HTTP socket connection policy.
#[derive(Debug)]
pub(super) enum ConnectionPolicy {
    Close,
}

impl ConnectionPolicy {
    /// Convert the connection type to a string.
    pub(super) fn as_str(&self) -> &'static str {
        match self {
            ConnectionPolicy::Close => "close",
        }
    }
}

pub(super) trait TargetWriter {
    fn write_to(&self, writer: &mut impl Write) -> Result<(), core::fmt::Error>;
}

/// HTTP Content Headers.
#[derive(Debug)]
pub struct ContentHeaders {
    content_type: ContentType,
    content_length: Option<usize>,
}

impl ContentHeaders {
    /// Create a new content headers with a content type.
    pub const fn new(content_type: ContentType) -> Self {
        Self {
            content_type,
            content_length: None,
        }
    }

    /// Set the content length.
    #[must_use]
    pub const fn with_length(mut self, length: usize) -> Self {
        self.content_length = Some(length);
        self
    }
}

impl TargetWriter for ContentHeaders {
    fn write_to(&self, writer: &mut impl Write) -> Result<(), core::fmt::Error> {
        write!(writer, "Content-Type: {}\r\n", self.content_type.as_str())?;
        if let Some(content_length) = self.content_length {
            write!(writer, "Content-Length: {}\r\n", content_length)?;
        }
        Ok(())
    }
}

/// Response Headers.
#[derive(Debug)]
pub struct ResponseHeaders {
    status: StatusCode,
    connection: ConnectionPolicy,
    content: Option<ContentHeaders>,
}

impl ResponseHeaders {
    /// Create empty response headers with a status code.
    pub const fn from_code(code: StatusCode) -> Self {
        Self {
            status: code,
            content: None,
            connection: ConnectionPolicy::Close,
        }
    }

    /// Set the success status code.
    pub const fn success() -> Self {
        Self::from_code(200)
    }

    /// Set the content headers.
    #[must_use]
    pub const fn with_content(mut self, content: ContentHeaders) -> Self {
        self.content = Some(content);
        self
    }
}

impl TargetWriter for ResponseHeaders {
    /// Write the response headers to a writer.
    fn write_to(&self, writer: &mut impl Write) -> Result<(), core::fmt::Error> {
        let reason = reason_phrase(self.status);
        write!(writer, "HTTP/1.1 {} {}\r\n", self.status, reason)?;
        if let Some(content) = &self.content {
            content.write_to(writer)?;
        }

        write!(writer, "Connection: {}\r\n", self.connection.as_str())?;
        write!(writer, "\r\n")?;
        Ok(())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    pub(super) fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            "PATCH" => HttpMethod::Patch,
            "OPTIONS" => HttpMethod::Options,
            "HEAD" => HttpMethod::Head,
            _ => return None,
        })
    }
}

/// Parsed request line.
///
/// `target` indexes into the header string the line was parsed from.
#[derive(Debug, PartialEq, Eq)]
pub(super) struct RequestLine {
    pub method: HttpMethod,
    pub target: Range<usize>,
    pub headers_start: usize,
}

/// Parse the request line from the header string.
pub(super) fn parse_request_line(header_str: &str) -> Option<RequestLine> {
    let line_end = header_str.find("\r\n").unwrap_or(header_str.len());
    let line = &header_str[..line_end];

    let method_end = line.find(' ')?;
    let method = HttpMethod::parse(&line[..method_end])?;

    let rest = &line[method_end..];
    let target_start = method_end + (rest.len() - rest.trim_start_matches(' ').len());
    let target_len = line[target_start..]
        .find(' ')
        .unwrap_or(line.len() - target_start);
    if target_len == 0 {
        return None;
    }

    Some(RequestLine {
        method,
        target: target_start..target_start + target_len,
        headers_start: (line_end + 2).min(header_str.len()),
    })
}

/// Read the start line and headers from the socket.
///
/// Returns the position of the end of the headers and the length of the headers.
/// If the headers are not found, returns (0, 0).
pub(super) async fn read_heading<T: Read>(
    buf: &mut [u8],
    socket: &mut T,
) -> Result<(usize, usize), T::Error> {
    let mut header_len = 0;
    let mut header_end = None;
    loop {
        let n = socket.read(&mut buf[header_len..]).await?;
        if n == 0 {
            if header_len == 0 {
                return Ok((0, 0));
            }
            break;
        }
        header_len += n;
        // Check for end of headers
        if let Some(pos) = buf[..header_len].windows(4).position(|w| w == b"\r\n\r\n") {
            header_end = Some(pos + 4);
            break;
        }
        if header_len >= buf.len() {
            break;
        }
    }

    let header_end = header_end.unwrap_or(header_len);

    Ok((header_end, header_len))
}

/// Find a header value by case-insensitive name.
pub(super) fn find_header<'a>(headers: &'a str, name: &str) -> Option<&'a str> {
    headers.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
    })
}

/// Find the content length in the header string.
///
/// Returns the content length if found, otherwise None.
pub(super) fn find_content_length(headers: &str) -> Option<u32> {
    find_header(headers, "content-length")?.parse::<u32>().ok()
}

/// Whether the request body is an url-encoded form.
pub(super) fn is_form_encoded(headers: &str) -> bool {
    const FORM: &str = "application/x-www-form-urlencoded";
    find_header(headers, "content-type").is_some_and(|value| {
        value
            .get(..FORM.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(FORM))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_line_with_query() {
        let head = "GET /LED-Control?ledPwm=12 HTTP/1.1\r\nHost: x\r\n\r\n";
        let line = parse_request_line(head).unwrap();
        assert_eq!(line.method, HttpMethod::Get);
        assert_eq!(&head[line.target.clone()], "/LED-Control?ledPwm=12");
        assert_eq!(&head[line.headers_start..], "Host: x\r\n\r\n");
    }

    #[test]
    fn request_line_without_crlf() {
        let line = parse_request_line("POST /form").unwrap();
        assert_eq!(line.method, HttpMethod::Post);
        assert_eq!(line.target, 5..10);
        assert_eq!(line.headers_start, 10);
    }

    #[test]
    fn request_line_rejects_unknown_method_and_missing_target() {
        assert!(parse_request_line("BREW /pot HTTP/1.1\r\n").is_none());
        assert!(parse_request_line("GET\r\n").is_none());
        assert!(parse_request_line("").is_none());
    }

    #[test]
    fn header_lookup_ignores_case() {
        let headers = "Host: device\r\ncontent-LENGTH:  17 \r\nContent-Type: application/x-www-form-urlencoded; charset=UTF-8\r\n";
        assert_eq!(find_content_length(headers), Some(17));
        assert!(is_form_encoded(headers));
        assert_eq!(find_header(headers, "accept"), None);
    }

    #[test]
    fn response_head_format() {
        let mut out = heapless::String::<128>::new();
        ResponseHeaders::from_code(404)
            .with_content(ContentHeaders::new(ContentType::TextPlain).with_length(13))
            .write_to(&mut out)
            .unwrap();
        assert_eq!(
            out.as_str(),
            "HTTP/1.1 404 Not Found\r\nContent-Type: text/plain\r\nContent-Length: 13\r\nConnection: close\r\n\r\n"
        );
    }
}
