use crate::firmware::types::TopicConfig;

pub const DEFAULT_PUBLISH_TOPIC: &str = "esp32/home/lamp/santi";
pub const DEFAULT_SUBSCRIBE_TOPIC: &str = "esp32/home/lamp/dani";

/// SoftAP name used by the library-provided auto-connect flow at boot.
pub const STARTUP_AP_NAME: &str = "ESP32_AP";
/// SoftAP name for the on-demand reconfiguration portal.
pub const PORTAL_AP_NAME: &str = "OnDemandAP";

/// Content-agnostic trigger payload; the peer reacts to arrival, not content.
pub const PUBLISH_PAYLOAD: &[u8] = b"hola";

/// Broker TCP port. The host is deployment-specific and comes from the
/// `MQTT_HOST` build-time environment variable.
pub const BROKER_PORT: u16 = 1883;

/// Broker identity for the messaging transport. The broker password is
/// empty; channel security is delegated to the transport deployment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusIdentity {
    pub client_id: &'static str,
    pub username: &'static str,
}

impl BusIdentity {
    pub const fn defaults() -> Self {
        Self {
            client_id: "ESP32Client",
            username: "",
        }
    }
}

/// Tunables for the touch/link controller. Calibrated touch thresholds vary
/// per board (observed 40-60), so the threshold is a field here rather than
/// a constant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Raw readings below this count as contact.
    pub touch_threshold: u16,
    pub debounce_window_ms: u64,
    pub long_press_ms: u64,
    pub extended_press_ms: u64,
    pub echo_min_interval_ms: u64,
    pub reconnect_backoff_ms: u64,
    pub reconnect_max_attempts: u32,
    pub startup_assoc_window_ms: u64,
    pub startup_assoc_poll_ms: u64,
    pub portal_timeout_ms: u64,
}

impl ControllerConfig {
    pub const fn defaults() -> Self {
        Self {
            touch_threshold: 40,
            debounce_window_ms: 50,
            long_press_ms: 1_000,
            extended_press_ms: 3_000,
            echo_min_interval_ms: 3_000,
            reconnect_backoff_ms: 5_000,
            reconnect_max_attempts: 7,
            startup_assoc_window_ms: 5_000,
            startup_assoc_poll_ms: 500,
            portal_timeout_ms: 180_000,
        }
    }

    pub const fn sanitized(self) -> Self {
        let touch_threshold = clamp_u16(self.touch_threshold, 1, 1_000);
        let debounce_window_ms = clamp_u64(self.debounce_window_ms, 10, 500);
        let long_press_ms = clamp_u64(self.long_press_ms, 200, 10_000);
        let mut extended_press_ms = clamp_u64(self.extended_press_ms, 500, 30_000);
        if extended_press_ms < long_press_ms {
            extended_press_ms = long_press_ms;
        }
        let echo_min_interval_ms = clamp_u64(self.echo_min_interval_ms, 100, 60_000);
        let reconnect_backoff_ms = clamp_u64(self.reconnect_backoff_ms, 100, 60_000);
        let reconnect_max_attempts = clamp_u32(self.reconnect_max_attempts, 1, 32);
        let startup_assoc_window_ms = clamp_u64(self.startup_assoc_window_ms, 1_000, 60_000);
        let mut startup_assoc_poll_ms = clamp_u64(self.startup_assoc_poll_ms, 50, 5_000);
        if startup_assoc_poll_ms > startup_assoc_window_ms {
            startup_assoc_poll_ms = startup_assoc_window_ms;
        }
        let portal_timeout_ms = clamp_u64(self.portal_timeout_ms, 10_000, 600_000);
        Self {
            touch_threshold,
            debounce_window_ms,
            long_press_ms,
            extended_press_ms,
            echo_min_interval_ms,
            reconnect_backoff_ms,
            reconnect_max_attempts,
            startup_assoc_window_ms,
            startup_assoc_poll_ms,
            portal_timeout_ms,
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::defaults()
    }
}

pub fn default_topics() -> TopicConfig {
    TopicConfig::new(DEFAULT_PUBLISH_TOPIC, DEFAULT_SUBSCRIBE_TOPIC)
}

const fn clamp_u16(value: u16, min: u16, max: u16) -> u16 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

const fn clamp_u32(value: u32, min: u32, max: u32) -> u32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

const fn clamp_u64(value: u64, min: u64, max: u64) -> u64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
