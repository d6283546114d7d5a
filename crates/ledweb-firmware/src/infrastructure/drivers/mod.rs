mod assets;
mod network;
mod pwm;

pub(crate) use assets::{FlashAssets, init_asset_store};
pub(crate) use network::init_network_stack;
pub(crate) use pwm::{LedcOutput, init_leds};
