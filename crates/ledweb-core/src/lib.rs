#![no_std]

//! Request handling core of the LED web firmware.
//!
//! Everything here is hardware-agnostic and runs on the host in tests:
//! - `http` - request parsing and response framing over any
//!   `embedded-io-async` transport
//! - `assets` - the packed asset image, the flash-backed store and the
//!   path resolver
//! - `control` - the LED PWM control endpoint
//! - `router` - route dispatch between the control endpoint and assets
//! - `wifi` - known network selection
//!
//! The firmware crate supplies the transport, flash and PWM peripherals.

pub mod assets;
pub mod config;
pub mod control;
pub mod http;
pub mod router;
pub mod wifi;

pub use config::{DutyPolicy, HttpSettings};
pub use control::{DutyOutput, LedPair};
pub use router::Router;
