use crate::firmware::config::BusIdentity;
use crate::firmware::link::MessageBus;
use crate::firmware::telemetry;
use crate::firmware::types::TopicConfig;

/// Bounded-retry (re)connection to the message broker. Each cycle dials at
/// most `max_attempts` times with a fixed backoff between attempts; an
/// exhausted cycle is abandoned and a fresh cycle (attempt counter back at
/// zero) starts on the next invocation while the link is still down. The
/// caller invokes this every tick, so outer retry is unbounded in wall-clock
/// time even though each cycle is bounded.
///
/// Never touches the connectivity mode.
#[derive(Clone, Copy, Debug)]
pub struct Reconnector {
    backoff_ms: u64,
    max_attempts: u32,
    attempts: u32,
    next_attempt_at_ms: Option<u64>,
}

impl Reconnector {
    pub const fn new(backoff_ms: u64, max_attempts: u32) -> Self {
        Self {
            backoff_ms,
            max_attempts,
            attempts: 0,
            next_attempt_at_ms: None,
        }
    }

    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Clears any in-flight cycle so the next invocation dials immediately,
    /// e.g. after the portal rewrote the topic pair.
    pub fn reset_cycle(&mut self) {
        self.attempts = 0;
        self.next_attempt_at_ms = None;
    }

    /// Returns true iff the link is connected when the call returns. When
    /// already connected this is a pure no-op: no re-dial, no re-subscribe.
    /// Otherwise advances the current cycle by at most one attempt; on a
    /// successful dial it subscribes to the current `topics.subscribe_topic`.
    pub fn ensure_connected(
        &mut self,
        now_ms: u64,
        bus: &mut dyn MessageBus,
        identity: BusIdentity,
        topics: &TopicConfig,
    ) -> bool {
        if bus.is_connected() {
            self.reset_cycle();
            return true;
        }
        if self.attempts >= self.max_attempts {
            // Cycle exhausted; abandon it. The next invocation starts over.
            telemetry::record_bus_cycle_exhausted();
            self.reset_cycle();
            return false;
        }
        if let Some(at) = self.next_attempt_at_ms {
            if now_ms < at {
                return false;
            }
        }

        self.attempts += 1;
        telemetry::record_bus_dial_attempt(self.attempts);
        if bus.connect(identity.client_id, identity.username) {
            if !bus.subscribe(topics.subscribe_topic.as_str()) {
                // Connection stands; inbound echoes are lost until the next
                // reconnect cycle.
                telemetry::record_bus_subscribe_failure();
            }
            self.reset_cycle();
            return true;
        }
        telemetry::record_bus_dial_failure();
        self.next_attempt_at_ms = Some(now_ms.saturating_add(self.backoff_ms));
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::firmware::types::TopicConfig;

    struct ScriptedBus {
        connected: bool,
        accept_dial: bool,
        dials: std::vec::Vec<(std::string::String, std::string::String)>,
        subscriptions: std::vec::Vec<std::string::String>,
    }

    impl ScriptedBus {
        fn new(accept_dial: bool) -> Self {
            Self {
                connected: false,
                accept_dial,
                dials: std::vec::Vec::new(),
                subscriptions: std::vec::Vec::new(),
            }
        }
    }

    impl MessageBus for ScriptedBus {
        fn is_connected(&self) -> bool {
            self.connected
        }

        fn connect(&mut self, client_id: &str, username: &str) -> bool {
            self.dials.push((client_id.into(), username.into()));
            self.connected = self.accept_dial;
            self.connected
        }

        fn subscribe(&mut self, topic: &str) -> bool {
            self.subscriptions.push(topic.into());
            true
        }

        fn publish(&mut self, _topic: &str, _payload: &[u8]) -> bool {
            true
        }
    }

    fn topics() -> TopicConfig {
        TopicConfig::new("lamp/out", "lamp/in")
    }

    #[test]
    fn connected_link_is_a_no_op() {
        let mut bus = ScriptedBus::new(true);
        bus.connected = true;
        let mut reconnect = Reconnector::new(5_000, 7);

        assert!(reconnect.ensure_connected(0, &mut bus, BusIdentity::defaults(), &topics()));
        assert!(reconnect.ensure_connected(20, &mut bus, BusIdentity::defaults(), &topics()));
        assert!(bus.dials.is_empty());
        assert!(bus.subscriptions.is_empty());
    }

    #[test]
    fn successful_dial_subscribes_to_current_topic() {
        let mut bus = ScriptedBus::new(true);
        let mut reconnect = Reconnector::new(5_000, 7);

        assert!(reconnect.ensure_connected(0, &mut bus, BusIdentity::defaults(), &topics()));
        assert_eq!(bus.dials.len(), 1);
        assert_eq!(bus.dials[0].0, "ESP32Client");
        assert_eq!(bus.subscriptions, std::vec![std::string::String::from("lamp/in")]);
        assert_eq!(reconnect.attempts(), 0);
    }

    #[test]
    fn reconnect_after_topic_change_subscribes_to_new_topic_only() {
        let mut bus = ScriptedBus::new(true);
        let mut reconnect = Reconnector::new(5_000, 7);
        assert!(reconnect.ensure_connected(0, &mut bus, BusIdentity::defaults(), &topics()));

        bus.connected = false;
        let updated = TopicConfig::new("lamp/out", "lamp/in-v2");
        reconnect.reset_cycle();
        assert!(reconnect.ensure_connected(10_000, &mut bus, BusIdentity::defaults(), &updated));
        assert_eq!(
            bus.subscriptions,
            std::vec![
                std::string::String::from("lamp/in"),
                std::string::String::from("lamp/in-v2")
            ]
        );
    }

    #[test]
    fn attempts_are_spaced_by_backoff() {
        let mut bus = ScriptedBus::new(false);
        let mut reconnect = Reconnector::new(5_000, 7);

        assert!(!reconnect.ensure_connected(0, &mut bus, BusIdentity::defaults(), &topics()));
        assert_eq!(bus.dials.len(), 1);
        // Calls inside the backoff window do not dial.
        assert!(!reconnect.ensure_connected(100, &mut bus, BusIdentity::defaults(), &topics()));
        assert!(!reconnect.ensure_connected(4_999, &mut bus, BusIdentity::defaults(), &topics()));
        assert_eq!(bus.dials.len(), 1);
        assert!(!reconnect.ensure_connected(5_000, &mut bus, BusIdentity::defaults(), &topics()));
        assert_eq!(bus.dials.len(), 2);
    }

    #[test]
    fn cycle_exhausts_after_max_attempts_then_restarts_from_zero() {
        let mut bus = ScriptedBus::new(false);
        let mut reconnect = Reconnector::new(5_000, 7);

        let mut now_ms = 0;
        for _ in 0..7 {
            assert!(!reconnect.ensure_connected(
                now_ms,
                &mut bus,
                BusIdentity::defaults(),
                &topics()
            ));
            now_ms += 5_000;
        }
        assert_eq!(bus.dials.len(), 7);
        assert_eq!(reconnect.attempts(), 7);

        // The exhausted invocation abandons the cycle without dialing.
        assert!(!reconnect.ensure_connected(now_ms, &mut bus, BusIdentity::defaults(), &topics()));
        assert_eq!(bus.dials.len(), 7);
        assert_eq!(reconnect.attempts(), 0);

        // Next outer invocation starts a fresh cycle immediately.
        assert!(!reconnect.ensure_connected(
            now_ms + 20,
            &mut bus,
            BusIdentity::defaults(),
            &topics()
        ));
        assert_eq!(bus.dials.len(), 8);
        assert_eq!(reconnect.attempts(), 1);
    }
}
