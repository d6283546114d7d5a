//! Known Wi-Fi network selection.

use heapless::{String, Vec};

pub const MAX_SSID_LEN: usize = 32;
pub const MAX_PASSWORD_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiCredentials {
    pub ssid: String<MAX_SSID_LEN>,
    pub password: String<MAX_PASSWORD_LEN>,
}

impl WifiCredentials {
    /// Returns `None` for an empty SSID or values that do not fit.
    pub fn new(ssid: &str, password: &str) -> Option<Self> {
        if ssid.is_empty() {
            return None;
        }
        let mut credentials = Self {
            ssid: String::new(),
            password: String::new(),
        };
        credentials.ssid.push_str(ssid).ok()?;
        credentials.password.push_str(password).ok()?;
        Some(credentials)
    }

    /// Whether the network needs no password.
    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

/// Collect configured `(ssid, password)` pairs, skipping unusable ones.
pub fn known_networks<const N: usize>(configured: &[(&str, &str)]) -> Vec<WifiCredentials, N> {
    configured
        .iter()
        .filter_map(|(ssid, password)| WifiCredentials::new(ssid, password))
        .take(N)
        .collect()
}

/// Pick the network to join from a scan.
///
/// `visible` yields `(ssid, rssi)` pairs. The known network with the
/// strongest signal wins; on equal signal the one configured first.
pub fn select_network<'a, I, V>(
    known: &'a [WifiCredentials],
    visible: I,
) -> Option<&'a WifiCredentials>
where
    I: IntoIterator<Item = (V, i8)>,
    V: AsRef<str>,
{
    let mut best: Option<(usize, i8)> = None;
    for (ssid, rssi) in visible {
        let Some(index) = known
            .iter()
            .position(|network| network.ssid == ssid.as_ref())
        else {
            continue;
        };
        let better = match best {
            None => true,
            Some((best_index, best_rssi)) => {
                rssi > best_rssi || (rssi == best_rssi && index < best_index)
            }
        };
        if better {
            best = Some((index, rssi));
        }
    }
    best.map(|(index, _)| &known[index])
}
