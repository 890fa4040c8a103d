use core::sync::atomic::{AtomicU32, Ordering};

static GESTURE_TAPS: AtomicU32 = AtomicU32::new(0);
static GESTURE_LONG_PRESSES: AtomicU32 = AtomicU32::new(0);
static GESTURE_EXTENDED_PRESSES: AtomicU32 = AtomicU32::new(0);
static BUS_DIAL_ATTEMPTS: AtomicU32 = AtomicU32::new(0);
static BUS_DIAL_FAILURES: AtomicU32 = AtomicU32::new(0);
static BUS_CYCLES_EXHAUSTED: AtomicU32 = AtomicU32::new(0);
static BUS_SUBSCRIBE_FAILURES: AtomicU32 = AtomicU32::new(0);
static BUS_PUBLISHES: AtomicU32 = AtomicU32::new(0);
static BUS_PUBLISH_FAILURES: AtomicU32 = AtomicU32::new(0);
static INBOUND_MESSAGES: AtomicU32 = AtomicU32::new(0);
static ECHOES_FIRED: AtomicU32 = AtomicU32::new(0);
static ECHOES_CANCELLED: AtomicU32 = AtomicU32::new(0);
static PORTAL_RUNS: AtomicU32 = AtomicU32::new(0);
static PORTAL_TIMEOUTS: AtomicU32 = AtomicU32::new(0);
static MODE_ONLINE_TRANSITIONS: AtomicU32 = AtomicU32::new(0);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(not(feature = "esp-hal-runtime"), allow(dead_code))]
pub(crate) struct TelemetrySnapshot {
    pub(crate) gesture_taps: u32,
    pub(crate) gesture_long_presses: u32,
    pub(crate) gesture_extended_presses: u32,
    pub(crate) bus_dial_attempts: u32,
    pub(crate) bus_dial_failures: u32,
    pub(crate) bus_cycles_exhausted: u32,
    pub(crate) bus_subscribe_failures: u32,
    pub(crate) bus_publishes: u32,
    pub(crate) bus_publish_failures: u32,
    pub(crate) inbound_messages: u32,
    pub(crate) echoes_fired: u32,
    pub(crate) echoes_cancelled: u32,
    pub(crate) portal_runs: u32,
    pub(crate) portal_timeouts: u32,
    pub(crate) mode_online_transitions: u32,
}

#[cfg_attr(not(feature = "esp-hal-runtime"), allow(dead_code))]
pub(crate) fn snapshot() -> TelemetrySnapshot {
    TelemetrySnapshot {
        gesture_taps: GESTURE_TAPS.load(Ordering::Relaxed),
        gesture_long_presses: GESTURE_LONG_PRESSES.load(Ordering::Relaxed),
        gesture_extended_presses: GESTURE_EXTENDED_PRESSES.load(Ordering::Relaxed),
        bus_dial_attempts: BUS_DIAL_ATTEMPTS.load(Ordering::Relaxed),
        bus_dial_failures: BUS_DIAL_FAILURES.load(Ordering::Relaxed),
        bus_cycles_exhausted: BUS_CYCLES_EXHAUSTED.load(Ordering::Relaxed),
        bus_subscribe_failures: BUS_SUBSCRIBE_FAILURES.load(Ordering::Relaxed),
        bus_publishes: BUS_PUBLISHES.load(Ordering::Relaxed),
        bus_publish_failures: BUS_PUBLISH_FAILURES.load(Ordering::Relaxed),
        inbound_messages: INBOUND_MESSAGES.load(Ordering::Relaxed),
        echoes_fired: ECHOES_FIRED.load(Ordering::Relaxed),
        echoes_cancelled: ECHOES_CANCELLED.load(Ordering::Relaxed),
        portal_runs: PORTAL_RUNS.load(Ordering::Relaxed),
        portal_timeouts: PORTAL_TIMEOUTS.load(Ordering::Relaxed),
        mode_online_transitions: MODE_ONLINE_TRANSITIONS.load(Ordering::Relaxed),
    }
}

pub(crate) fn record_tap() {
    GESTURE_TAPS.fetch_add(1, Ordering::Relaxed);
    #[cfg(feature = "telemetry-defmt")]
    defmt::trace!("telemetry gesture_tap");
}

pub(crate) fn record_long_press() {
    GESTURE_LONG_PRESSES.fetch_add(1, Ordering::Relaxed);
    #[cfg(feature = "telemetry-defmt")]
    defmt::info!("telemetry gesture_long_press");
}

pub(crate) fn record_extended_press() {
    GESTURE_EXTENDED_PRESSES.fetch_add(1, Ordering::Relaxed);
    #[cfg(feature = "telemetry-defmt")]
    defmt::info!("telemetry gesture_extended_press");
}

#[cfg_attr(not(feature = "telemetry-defmt"), allow(unused_variables))]
pub(crate) fn record_bus_dial_attempt(attempt: u32) {
    BUS_DIAL_ATTEMPTS.fetch_add(1, Ordering::Relaxed);
    #[cfg(feature = "telemetry-defmt")]
    defmt::debug!("telemetry bus_dial_attempt n={=u32}", attempt);
}

pub(crate) fn record_bus_dial_failure() {
    BUS_DIAL_FAILURES.fetch_add(1, Ordering::Relaxed);
    #[cfg(feature = "telemetry-defmt")]
    defmt::warn!("telemetry bus_dial_failure");
}

pub(crate) fn record_bus_cycle_exhausted() {
    BUS_CYCLES_EXHAUSTED.fetch_add(1, Ordering::Relaxed);
    #[cfg(feature = "telemetry-defmt")]
    defmt::warn!("telemetry bus_cycle_exhausted");
}

pub(crate) fn record_bus_subscribe_failure() {
    BUS_SUBSCRIBE_FAILURES.fetch_add(1, Ordering::Relaxed);
    #[cfg(feature = "telemetry-defmt")]
    defmt::warn!("telemetry bus_subscribe_failure");
}

pub(crate) fn record_bus_publish(ok: bool) {
    if ok {
        BUS_PUBLISHES.fetch_add(1, Ordering::Relaxed);
    } else {
        BUS_PUBLISH_FAILURES.fetch_add(1, Ordering::Relaxed);
    }
    #[cfg(feature = "telemetry-defmt")]
    defmt::debug!("telemetry bus_publish ok={=bool}", ok);
}

pub(crate) fn record_inbound_message() {
    INBOUND_MESSAGES.fetch_add(1, Ordering::Relaxed);
    #[cfg(feature = "telemetry-defmt")]
    defmt::trace!("telemetry inbound_message");
}

pub(crate) fn record_echo_fired() {
    ECHOES_FIRED.fetch_add(1, Ordering::Relaxed);
    #[cfg(feature = "telemetry-defmt")]
    defmt::debug!("telemetry echo_fired");
}

pub(crate) fn record_echo_cancelled() {
    ECHOES_CANCELLED.fetch_add(1, Ordering::Relaxed);
    #[cfg(feature = "telemetry-defmt")]
    defmt::debug!("telemetry echo_cancelled");
}

pub(crate) fn record_portal_run() {
    PORTAL_RUNS.fetch_add(1, Ordering::Relaxed);
    #[cfg(feature = "telemetry-defmt")]
    defmt::info!("telemetry portal_run");
}

pub(crate) fn record_portal_timeout() {
    PORTAL_TIMEOUTS.fetch_add(1, Ordering::Relaxed);
    #[cfg(feature = "telemetry-defmt")]
    defmt::warn!("telemetry portal_timeout");
}

pub(crate) fn record_mode_online() {
    MODE_ONLINE_TRANSITIONS.fetch_add(1, Ordering::Relaxed);
    #[cfg(feature = "telemetry-defmt")]
    defmt::info!("telemetry mode_online");
}
