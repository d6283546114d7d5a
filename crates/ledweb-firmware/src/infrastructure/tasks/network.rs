use embassy_net::Runner;
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{
    AuthMethod,
    ClientConfig,
    ModeConfig,
    ScanConfig,
    WifiController,
    WifiDevice,
    WifiEvent,
    WifiStaState,
};
use ledweb_core::wifi::{WifiCredentials, select_network};
use log::{info, warn};

const RECONNECT_DELAY: Duration = Duration::from_millis(2000);
const RETRY_DELAY: Duration = Duration::from_millis(5000);

fn client_config(network: &WifiCredentials) -> ModeConfig {
    let config = ClientConfig::default().with_ssid(network.ssid.as_str().into());
    let config = if network.is_open() {
        config.with_auth_method(AuthMethod::None)
    } else {
        config.with_password(network.password.as_str().into())
    };
    ModeConfig::Client(config)
}

/// Scan and pick the strongest known network in range.
///
/// Falls back to the first configured network when none is visible, which
/// also covers hidden SSIDs.
async fn choose_network<'a>(
    controller: &mut WifiController<'static>,
    networks: &'a [WifiCredentials],
) -> Option<&'a WifiCredentials> {
    match controller.scan_with_config_async(ScanConfig::default()).await {
        Ok(access_points) => {
            let visible = access_points
                .iter()
                .map(|ap| (ap.ssid.as_str(), ap.signal_strength));
            if let Some(network) = select_network(networks, visible) {
                return Some(network);
            }
            warn!("network: no known network in range");
        }
        Err(err) => warn!("network: scan failed: {:?}", err),
    }
    networks.first()
}

/// Background task keeping the station connected
///
/// Joins the strongest configured network and reconnects whenever the link
/// drops.
#[embassy_executor::task]
pub(crate) async fn wifi_connection_task(
    mut controller: WifiController<'static>,
    networks: &'static [WifiCredentials],
) {
    loop {
        // Wait until we're no longer connected
        if esp_radio::wifi::sta_state() == WifiStaState::Connected {
            controller.wait_for_event(WifiEvent::StaDisconnected).await;
            warn!("network: disconnected");
            Timer::after(RECONNECT_DELAY).await;
        }
        if !matches!(controller.is_started(), Ok(true)) {
            let idle = ModeConfig::Client(ClientConfig::default());
            if let Err(err) = controller.set_config(&idle) {
                warn!("network: failed to configure station: {:?}", err);
                Timer::after(RETRY_DELAY).await;
                continue;
            }
            if let Err(err) = controller.start_async().await {
                warn!("network: failed to start station: {:?}", err);
                Timer::after(RETRY_DELAY).await;
                continue;
            }
        }

        let Some(network) = choose_network(&mut controller, networks).await else {
            warn!("network: no networks configured");
            Timer::after(RETRY_DELAY).await;
            continue;
        };
        if let Err(err) = controller.set_config(&client_config(network)) {
            warn!("network: failed to configure {}: {:?}", network.ssid, err);
            Timer::after(RETRY_DELAY).await;
            continue;
        }

        info!("network: connecting to {}", network.ssid);
        match controller.connect_async().await {
            Ok(()) => info!("network: connected to {}", network.ssid),
            Err(err) => {
                warn!("network: error connecting: {:?}", err);
                Timer::after(RETRY_DELAY).await;
            }
        }
    }
}

/// Background task for running the network stack
#[embassy_executor::task]
pub(crate) async fn network_runner_task(mut runner: Runner<'static, WifiDevice<'static>>) {
    runner.run().await;
}
