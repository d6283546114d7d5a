use esp_hal::{
    gpio::{DriveMode, interconnect::PeripheralOutput},
    ledc::{
        LSGlobalClkSource,
        Ledc,
        LowSpeed,
        channel::{self, ChannelHW as _, ChannelIFace as _},
        timer::{self, TimerIFace as _},
    },
    peripherals::LEDC,
    time::Rate,
};
use ledweb_core::{DutyOutput, LedPair};
use static_cell::StaticCell;

use crate::infrastructure::config;

/// Largest duty accepted by the API; the 8 bit timer is fully on at 256.
const MAX_DUTY: u32 = 255;
const FULL_ON_DUTY: u32 = 256;

#[derive(Debug)]
pub(crate) enum PwmError {
    Timer(timer::Error),
    Channel(channel::Error),
}

impl core::fmt::Display for PwmError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PwmError::Timer(err) => write!(f, "timer setup failed: {:?}", err),
            PwmError::Channel(err) => write!(f, "channel setup failed: {:?}", err),
        }
    }
}

impl From<timer::Error> for PwmError {
    fn from(err: timer::Error) -> Self {
        PwmError::Timer(err)
    }
}

impl From<channel::Error> for PwmError {
    fn from(err: channel::Error) -> Self {
        PwmError::Channel(err)
    }
}

/// One LEDC low speed channel.
pub(crate) struct LedcOutput {
    channel: channel::Channel<'static, LowSpeed>,
}

/// Map a requested duty onto the duty register.
///
/// Negative values switch the output off, `MAX_DUTY` and above keep it
/// high for the whole period.
fn hw_duty(duty: i32) -> u32 {
    match u32::try_from(duty) {
        Err(_) => 0,
        Ok(duty) if duty >= MAX_DUTY => FULL_ON_DUTY,
        Ok(duty) => duty,
    }
}

impl DutyOutput for LedcOutput {
    fn write_duty(&mut self, duty: i32) {
        self.channel.set_duty_hw(hw_duty(duty));
    }

    fn max_duty(&self) -> u32 {
        MAX_DUTY
    }
}

static LEDC_TIMER: StaticCell<timer::Timer<'static, LowSpeed>> = StaticCell::new();

/// Set up timer 0 at the configured frequency with 8 bit resolution and
/// attach channels 0 and 1 to the LED pins.
pub(crate) fn init_leds(
    ledc: LEDC<'static>,
    first_pin: impl PeripheralOutput<'static>,
    second_pin: impl PeripheralOutput<'static>,
) -> Result<LedPair<LedcOutput>, PwmError> {
    let mut ledc = Ledc::new(ledc);
    ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);

    let lstimer = LEDC_TIMER.init(ledc.timer::<LowSpeed>(timer::Number::Timer0));
    lstimer.configure(timer::config::Config {
        duty: timer::config::Duty::Duty8Bit,
        clock_source: timer::LSClockSource::APBClk,
        frequency: Rate::from_khz(config::PWM.frequency_khz),
    })?;
    let lstimer: &'static timer::Timer<'static, LowSpeed> = lstimer;

    let channel_config = || channel::config::Config {
        timer: lstimer,
        duty_pct: 0,
        drive_mode: DriveMode::PushPull,
    };
    let mut first = ledc.channel(channel::Number::Channel0, first_pin);
    first.configure(channel_config())?;
    let mut second = ledc.channel(channel::Number::Channel1, second_pin);
    second.configure(channel_config())?;

    Ok(LedPair::new(
        LedcOutput { channel: first },
        LedcOutput { channel: second },
    ))
}
