//! LED PWM control endpoint.

use embedded_io_async::{Read, Write};
use heapless::Vec;
use log::info;

use crate::{
    config::{DutyPolicy, HttpSettings},
    http::{ContentType, Error, HttpConnection, HttpResult, request::MAX_ARG_LEN},
};

const BODY_PREFIX: &[u8] = b"Led PWM: ";
const LINK_PREFIX: &[u8] = b"<p><a href=\"";
const LINK_SUFFIX: &[u8] = b"\"><-LED Page</a></p>";
/// Longest back link the confirmation page has room for.
const MAX_BACK_LINK_LEN: usize = 128;
const BODY_SIZE: usize =
    BODY_PREFIX.len() + MAX_ARG_LEN + LINK_PREFIX.len() + MAX_BACK_LINK_LEN + LINK_SUFFIX.len();

/// A PWM output channel.
pub trait DutyOutput {
    /// Drive the channel with a raw duty value.
    ///
    /// Values the peripheral cannot represent are saturated by the driver:
    /// negative is off, `max_duty()` and above is fully on.
    fn write_duty(&mut self, duty: i32);

    /// Duty value that drives the channel fully on.
    fn max_duty(&self) -> u32;
}

/// The two LED channels, always driven with the same duty.
pub struct LedPair<O> {
    first: O,
    second: O,
}

impl<O: DutyOutput> LedPair<O> {
    pub const fn new(first: O, second: O) -> Self {
        Self { first, second }
    }

    /// Write the same duty to both channels.
    pub fn apply(&mut self, duty: i32) {
        self.first.write_duty(duty);
        self.second.write_duty(duty);
    }

    /// Drive both channels fully on.
    pub fn full_on(&mut self) {
        let max = i32::try_from(self.max_duty()).unwrap_or(i32::MAX);
        self.apply(max);
    }

    pub fn max_duty(&self) -> u32 {
        self.first.max_duty().min(self.second.max_duty())
    }

    pub fn outputs(&self) -> (&O, &O) {
        (&self.first, &self.second)
    }
}

/// Parse a duty value the way C `atol` does.
///
/// Leading whitespace and one sign are skipped, then the longest run of
/// decimal digits is read. No digits give `0`; overflow saturates.
pub fn parse_duty(raw: &[u8]) -> i32 {
    let mut digits = raw
        .iter()
        .skip_while(|byte| matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c))
        .peekable();

    let negative = match digits.peek() {
        Some(b'-') => {
            digits.next();
            true
        }
        Some(b'+') => {
            digits.next();
            false
        }
        _ => false,
    };

    let mut value: i64 = 0;
    for byte in digits.take_while(|byte| byte.is_ascii_digit()) {
        value = (value * 10 + i64::from(byte - b'0')).min(i64::from(i32::MAX) + 1);
    }
    if negative {
        value = -value;
    }
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Build the confirmation page.
///
/// Fails with [`Error::FormatHeaders`] when the back link is longer than
/// [`MAX_BACK_LINK_LEN`].
fn render_body(raw: &[u8], back_link: &str) -> Result<Vec<u8, BODY_SIZE>, Error> {
    let mut body = Vec::new();
    for part in [BODY_PREFIX, raw, LINK_PREFIX, back_link.as_bytes(), LINK_SUFFIX] {
        body.extend_from_slice(part).map_err(|()| Error::FormatHeaders)?;
    }
    Ok(body)
}

/// Handle a request to the control path.
///
/// Reads the duty argument, applies it to both channels and answers with a
/// confirmation page echoing the argument.
pub async fn handle_led_control<T: Read + Write, O: DutyOutput>(
    conn: &mut HttpConnection<'_, T>,
    leds: &mut LedPair<O>,
    settings: &HttpSettings,
) -> HttpResult {
    let raw = conn.arg(settings.control_arg).await?.unwrap_or_default();
    let duty = parse_duty(&raw);

    let in_range = u32::try_from(duty).is_ok_and(|duty| duty <= leds.max_duty());
    if settings.duty_policy == DutyPolicy::Reject && !in_range {
        info!("control: rejected duty {}", duty);
        return conn
            .write_text(400, ContentType::TextPlain, b"400 Bad Request")
            .await;
    }

    // Rendered first so a bad back link leaves the channels untouched
    let body = render_body(&raw, settings.back_link)?;

    leds.apply(duty);
    info!("control: led pwm {}", duty);

    conn.write_text(200, ContentType::TextHtml, &body).await
}
