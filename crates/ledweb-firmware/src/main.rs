#![no_std]
#![no_main]

mod infrastructure;

use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};
use esp_alloc as _;
use esp_backtrace as _;
use esp_hal::{clock::CpuClock, timer::timg::TimerGroup};
use heapless::Vec;
use ledweb_core::{
    HttpSettings,
    Router,
    wifi::{WifiCredentials, known_networks},
};
use log::info;

use crate::infrastructure::{
    config,
    drivers::{init_asset_store, init_leds, init_network_stack},
    tasks::{AppRouter, http_server_task, network_runner_task, wifi_connection_task},
};

esp_bootloader_esp_idf::esp_app_desc!();

// Create a static cell for a given type and value
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        #[deny(unused_attributes)]
        let x = STATIC_CELL.uninit().write(($val));
        x
    }};
}

#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    esp_println::logger::init_logger_from_env();
    esp_println::println!("ledweb {}", config::BUILD_VERSION);

    // Initialize hardware
    let hal_config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(hal_config);

    // Radio buffers live on the heap
    esp_alloc::heap_allocator!(size: 72 * 1024);

    // Start rtos
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // LEDs are fully on until the first control request
    let (first_pin, second_pin) = led_gpios!(peripherals);
    let mut leds = init_leds(peripherals.LEDC, first_pin, second_pin)
        .unwrap_or_else(|err| panic!("ledc: {}", err));
    leds.full_on();

    // Initialize network stack and spawn network tasks
    let networks: &'static [WifiCredentials] = mk_static!(
        Vec<WifiCredentials, 4>,
        known_networks(&config::WIFI_NETWORKS)
    );
    let (stack, runner, controller) = init_network_stack(peripherals.WIFI);
    spawner
        .spawn(wifi_connection_task(controller, networks))
        .ok();
    spawner.spawn(network_runner_task(runner)).ok();

    stack.wait_config_up().await;
    if let Some(ip) = stack.config_v4() {
        info!("network: ip address {}", ip.address);
    }

    let assets = init_asset_store(peripherals.FLASH);

    let router = mk_static!(
        AppRouter,
        Router::new(assets, leds, HttpSettings::DEFAULT)
    );
    spawner.spawn(http_server_task(stack, router)).ok();

    loop {
        Timer::after(Duration::from_secs(5)).await;
    }
}
