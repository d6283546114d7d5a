//! Hardware side of the firmware: peripheral drivers and background tasks.

pub(crate) mod config;
pub(crate) mod drivers;
pub(crate) mod tasks;
