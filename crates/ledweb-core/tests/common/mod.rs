//! Shared fakes for the integration tests.
#![allow(dead_code)]

use std::convert::Infallible;

use embassy_futures::block_on;
use embedded_storage::ReadStorage;
use ledweb_core::{
    DutyOutput,
    HttpSettings,
    LedPair,
    Router,
    assets::{AssetStore, FlashAssetStore, image_len, write_image},
    http::serve_connection,
};

// -----------------------------------------------------------------------------
// Transport
// -----------------------------------------------------------------------------

/// In-memory socket: reads come from `input`, writes land in `output`.
pub struct MockSocket {
    input: Vec<u8>,
    read_pos: usize,
    /// Largest chunk handed out by one read
    max_read: usize,
    pub output: Vec<u8>,
}

impl MockSocket {
    pub fn new(input: &[u8]) -> Self {
        Self {
            input: input.to_vec(),
            read_pos: 0,
            max_read: usize::MAX,
            output: Vec::new(),
        }
    }

    /// Deliver the input in chunks of at most `max_read` bytes.
    pub fn chunked(mut self, max_read: usize) -> Self {
        self.max_read = max_read;
        self
    }
}

impl embedded_io::ErrorType for MockSocket {
    type Error = Infallible;
}

impl embedded_io_async::Read for MockSocket {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let left = &self.input[self.read_pos..];
        let n = left.len().min(buf.len()).min(self.max_read);
        buf[..n].copy_from_slice(&left[..n]);
        self.read_pos += n;
        Ok(n)
    }
}

impl embedded_io_async::Write for MockSocket {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Storage
// -----------------------------------------------------------------------------

/// Flash backed by a byte vector.
pub struct MemoryFlash {
    data: Vec<u8>,
    pub fail_reads: bool,
    pub reads: usize,
}

impl MemoryFlash {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            fail_reads: false,
            reads: 0,
        }
    }

    /// Image at `base` inside otherwise erased flash.
    pub fn with_image_at(base: usize, image: &[u8]) -> Self {
        let mut data = vec![0xFF; base + image.len() + 16];
        data[base..base + image.len()].copy_from_slice(image);
        Self::new(data)
    }
}

impl ReadStorage for MemoryFlash {
    type Error = ();

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        self.reads += 1;
        if self.fail_reads {
            return Err(());
        }
        let start = offset as usize;
        let source = self.data.get(start..start + bytes.len()).ok_or(())?;
        bytes.copy_from_slice(source);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.data.len()
    }
}

pub fn build_image(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut image = vec![0u8; image_len(entries).unwrap()];
    let written = write_image(entries, &mut image).unwrap();
    assert_eq!(written, image.len());
    image
}

pub fn mounted_store(entries: &[(&str, &[u8])]) -> FlashAssetStore<MemoryFlash> {
    let image = build_image(entries);
    let size = image.len() as u32;
    let mut store = FlashAssetStore::new(MemoryFlash::new(image), 0, size);
    store.mount().unwrap();
    store
}

// -----------------------------------------------------------------------------
// PWM
// -----------------------------------------------------------------------------

/// Output remembering every duty written to it.
#[derive(Debug, Default)]
pub struct RecordingOutput {
    pub writes: Vec<i32>,
}

impl RecordingOutput {
    pub fn duty(&self) -> Option<i32> {
        self.writes.last().copied()
    }
}

impl DutyOutput for RecordingOutput {
    fn write_duty(&mut self, duty: i32) {
        self.writes.push(duty);
    }

    fn max_duty(&self) -> u32 {
        255
    }
}

pub fn leds() -> LedPair<RecordingOutput> {
    LedPair::new(RecordingOutput::default(), RecordingOutput::default())
}

pub fn router<S: AssetStore>(
    assets: S,
    settings: HttpSettings,
) -> Router<S, RecordingOutput> {
    Router::new(assets, leds(), settings)
}

// -----------------------------------------------------------------------------
// Responses
// -----------------------------------------------------------------------------

#[derive(Debug)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn parse(raw: &[u8]) -> Self {
        let split = raw
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("response head");
        let head = std::str::from_utf8(&raw[..split]).expect("utf-8 head");
        let mut lines = head.split("\r\n");
        let status_line = lines.next().unwrap();
        let status = status_line
            .split(' ')
            .nth(1)
            .and_then(|code| code.parse().ok())
            .expect("status code");
        let headers = lines
            .map(|line| {
                let (key, value) = line.split_once(':').expect("header line");
                (key.trim().to_string(), value.trim().to_string())
            })
            .collect();
        Self {
            status,
            headers,
            body: raw[split + 4..].to_vec(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    pub fn body_str(&self) -> &str {
        std::str::from_utf8(&self.body).expect("utf-8 body")
    }
}

/// Run one raw request through a router and parse the answer.
pub fn send<S: AssetStore>(router: &mut Router<S, RecordingOutput>, request: &str) -> Response {
    let mut socket = MockSocket::new(request.as_bytes());
    block_on(serve_connection(router, &mut socket)).expect("request handled");
    Response::parse(&socket.output)
}

pub fn get(path: &str) -> String {
    format!("GET {} HTTP/1.1\r\nHost: led.local\r\n\r\n", path)
}
