use core::sync::atomic::AtomicBool;

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};
use heapless::{String, Vec};

use crate::firmware::types::TOPIC_MAX;

pub(crate) const PAYLOAD_MAX: usize = 64;

/// Inbound delivery, truncated for the mailbox; the controller only reacts
/// to arrival.
#[derive(Clone, Debug)]
pub(crate) struct InboundMessage {
    pub(crate) topic: String<TOPIC_MAX>,
    pub(crate) payload: Vec<u8, PAYLOAD_MAX>,
}

/// Transport -> control-loop mailbox. The transport side only enqueues; the
/// control loop drains once per tick, keeping all state mutation on the tick
/// path.
pub(crate) static INBOUND_MESSAGES: Channel<CriticalSectionRawMutex, InboundMessage, 4> =
    Channel::new();

#[cfg(feature = "net-mqtt")]
#[derive(Clone, Debug)]
pub(crate) enum BusCommand {
    Dial,
    Subscribe {
        topic: String<TOPIC_MAX>,
    },
    Publish {
        topic: String<TOPIC_MAX>,
        payload: Vec<u8, PAYLOAD_MAX>,
    },
}

#[cfg(feature = "net-mqtt")]
pub(crate) static BUS_COMMANDS: Channel<CriticalSectionRawMutex, BusCommand, 8> = Channel::new();

#[cfg(feature = "net-mqtt")]
pub(crate) static BUS_CONNECTED: AtomicBool = AtomicBool::new(false);

pub(crate) static NETWORK_CONNECTED: AtomicBool = AtomicBool::new(false);
