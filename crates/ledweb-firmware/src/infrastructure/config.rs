pub(crate) struct NetworkConfig {
    pub hostname: &'static str,
    pub http_port: u16,
    pub socket_timeout_secs: u64,
}

pub(crate) struct PwmConfig {
    pub frequency_khz: u32,
}

pub(crate) const BUILD_VERSION: &str = env!("BUILD_VERSION");

/// Known Wi-Fi networks as `(ssid, password)`; empty SSIDs are unused slots.
pub(crate) const WIFI_NETWORKS: [(&str, &str); 4] = [
    (env!("WIFI_SSID"), env!("WIFI_PASSWORD")),
    (or_empty(option_env!("WIFI_SSID_2")), or_empty(option_env!("WIFI_PASSWORD_2"))),
    (or_empty(option_env!("WIFI_SSID_3")), or_empty(option_env!("WIFI_PASSWORD_3"))),
    (or_empty(option_env!("WIFI_SSID_4")), or_empty(option_env!("WIFI_PASSWORD_4"))),
];

pub(crate) const NETWORK: NetworkConfig = NetworkConfig {
    hostname: "ledweb",
    http_port: 80,
    socket_timeout_secs: 30,
};

pub(crate) const PWM: PwmConfig = PwmConfig { frequency_khz: 1 };

const fn or_empty(value: Option<&'static str>) -> &'static str {
    match value {
        Some(value) => value,
        None => "",
    }
}

/// LED output pins, both driven with the same duty.
#[macro_export]
macro_rules! led_gpios {
    ($p:expr) => {
        ($p.GPIO10, $p.GPIO11)
    };
}
