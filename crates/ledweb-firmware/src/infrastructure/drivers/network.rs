use core::str::FromStr;

use embassy_net::{DhcpConfig, Runner, Stack, StackResources};
use esp_hal::{peripherals::WIFI, rng::Rng};
use esp_radio::wifi::{Config as WifiConfig, WifiController, WifiDevice};
use heapless::String;
use static_cell::StaticCell;

use crate::infrastructure::config;

const MAX_CONNECTIONS: usize = 4;

static RADIO: StaticCell<esp_radio::Controller<'static>> = StaticCell::new();
static NETWORK_RESOURCES: StaticCell<StackResources<MAX_CONNECTIONS>> = StaticCell::new();

pub(crate) fn init_network_stack(
    wifi_device: WIFI<'static>,
) -> (
    Stack<'static>,
    Runner<'static, WifiDevice<'static>>,
    WifiController<'static>,
) {
    let esp_radio_ctrl = &*RADIO.init(esp_radio::init().expect("radio init"));
    let (controller, interfaces) =
        esp_radio::wifi::new(esp_radio_ctrl, wifi_device, WifiConfig::default())
            .expect("wifi init");

    let mut dhcp_config = DhcpConfig::default();
    dhcp_config.hostname = String::from_str(config::NETWORK.hostname).ok();
    let net_config = embassy_net::Config::dhcpv4(dhcp_config);

    let network_resources = NETWORK_RESOURCES.init(StackResources::new());
    let (stack, runner) =
        embassy_net::new(interfaces.sta, net_config, network_resources, get_seed());

    (stack, runner, controller)
}

fn get_seed() -> u64 {
    let rng = Rng::new();
    (u64::from(rng.random()) << 32) | u64::from(rng.random())
}
