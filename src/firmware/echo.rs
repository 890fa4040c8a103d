use crate::firmware::telemetry;

/// Throttles remote-originated toggles. Two paired devices relaying each
/// other's toggles through the broker would otherwise oscillate as fast as
/// the link allows; the minimum interval keeps the loop at a human-observable
/// cadence.
#[derive(Clone, Copy, Debug)]
pub struct EchoScheduler {
    min_interval_ms: u64,
    pending: bool,
    last_echo_ms: u64,
}

impl EchoScheduler {
    pub const fn new(min_interval_ms: u64) -> Self {
        Self {
            min_interval_ms,
            pending: false,
            last_echo_ms: 0,
        }
    }

    /// Called for every inbound delivery on the subscribed topic. Payload
    /// and topic are not inspected; arrival is the whole signal. Safe to call
    /// from the transport's delivery path: it only sets a flag consumed on a
    /// later tick.
    pub fn notify(&mut self) {
        self.pending = true;
    }

    /// Drops a queued echo; a local gesture takes priority over it.
    pub fn cancel(&mut self) {
        if self.pending {
            self.pending = false;
            telemetry::record_echo_cancelled();
        }
    }

    pub const fn pending(&self) -> bool {
        self.pending
    }

    /// Returns true exactly when the caller should toggle the actuator.
    pub fn maybe_fire(&mut self, now_ms: u64) -> bool {
        if !self.pending || now_ms.saturating_sub(self.last_echo_ms) < self.min_interval_ms {
            return false;
        }
        self.pending = false;
        self.last_echo_ms = now_ms;
        telemetry::record_echo_fired();
        true
    }
}
