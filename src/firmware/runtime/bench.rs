//! Bench collaborators used when the radio stack is compiled out. They let
//! the gesture/echo paths run on bare hardware with every bus interaction
//! visible on the UART, the same way a log-only publisher stands in for a
//! broker during bring-up.

use esp_println::println;

use crate::firmware::lamp::Actuator;
use crate::firmware::link::portal::{ConfigPortal, PortalPoll};
use crate::firmware::link::{MessageBus, NetworkLink};
use crate::firmware::types::TopicConfig;

use super::channels::NETWORK_CONNECTED;
use core::sync::atomic::Ordering;

pub(crate) struct AtomicNetwork;

impl NetworkLink for AtomicNetwork {
    fn is_connected(&self) -> bool {
        NETWORK_CONNECTED.load(Ordering::Relaxed)
    }
}

/// Log-only bus: reports connected so the online paths are exercised, prints
/// every publish instead of sending it.
#[cfg(not(feature = "net-mqtt"))]
pub(crate) struct LoggerBus;

#[cfg(not(feature = "net-mqtt"))]
impl MessageBus for LoggerBus {
    fn is_connected(&self) -> bool {
        true
    }

    fn connect(&mut self, client_id: &str, _username: &str) -> bool {
        println!("bus(log): connect client_id={client_id}");
        true
    }

    fn subscribe(&mut self, topic: &str) -> bool {
        println!("bus(log): subscribe topic={topic}");
        true
    }

    fn publish(&mut self, topic: &str, payload: &[u8]) -> bool {
        println!("bus(log): publish topic={topic} len={}", payload.len());
        true
    }
}

/// Placeholder for the captive-portal collaborator: the session resolves on
/// the next poll with the topic pair unchanged. The real portal flow plugs
/// in behind `ConfigPortal` without touching the controller.
pub(crate) struct ImmediatePortal {
    active: bool,
}

impl ImmediatePortal {
    pub(crate) const fn new() -> Self {
        Self { active: false }
    }
}

impl ConfigPortal for ImmediatePortal {
    fn begin(&mut self, ap_name: &str, prefill: &TopicConfig) -> bool {
        println!(
            "portal: open ap={ap_name} publish={} subscribe={}",
            prefill.publish_topic.as_str(),
            prefill.subscribe_topic.as_str()
        );
        self.active = true;
        true
    }

    fn poll(&mut self, _now_ms: u64) -> PortalPoll {
        if self.active {
            self.active = false;
            PortalPoll::Done { topics: None }
        } else {
            PortalPoll::Pending
        }
    }

    fn cancel(&mut self) {
        self.active = false;
    }
}

/// LED sink driven by the controller's single toggle path.
pub(crate) struct LedActuator {
    led: esp_hal::gpio::Output<'static>,
}

impl LedActuator {
    pub(crate) fn new(led: esp_hal::gpio::Output<'static>) -> Self {
        Self { led }
    }
}

impl Actuator for LedActuator {
    fn set_on(&mut self, on: bool) {
        if on {
            self.led.set_high();
        } else {
            self.led.set_low();
        }
    }
}
