//! Request target and argument helpers.

use heapless::Vec;

use super::connection::{BODY_BUFFER_SIZE, HEADER_BUFFER_SIZE};

/// Maximum decoded length of a request argument.
///
/// Decoding never grows a value, so an argument that fits in the request
/// head or body buffer is kept whole.
pub const MAX_ARG_LEN: usize = if HEADER_BUFFER_SIZE > BODY_BUFFER_SIZE {
    HEADER_BUFFER_SIZE
} else {
    BODY_BUFFER_SIZE
};

/// A decoded request argument value.
pub type ArgValue = Vec<u8, MAX_ARG_LEN>;

/// Find the raw (still encoded) value of `name` in an url-encoded list.
///
/// The first occurrence wins. A key without `=` has an empty value.
pub fn find_arg<'a>(encoded: &'a str, name: &str) -> Option<&'a str> {
    encoded
        .split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Decode an url-encoded value: `+` is a space and `%XX` a raw byte.
///
/// Malformed escapes are copied as is.
pub fn url_decode(raw: &str) -> ArgValue {
    let mut out = ArgValue::new();
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let byte = match bytes[i] {
            b'+' => b' ',
            b'%' => match (
                bytes.get(i + 1).copied().and_then(hex_value),
                bytes.get(i + 2).copied().and_then(hex_value),
            ) {
                (Some(high), Some(low)) => {
                    i += 2;
                    (high << 4) | low
                }
                _ => b'%',
            },
            other => other,
        };
        if out.push(byte).is_err() {
            break;
        }
        i += 1;
    }
    out
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}
