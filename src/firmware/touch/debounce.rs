use crate::firmware::types::ContactEdge;

/// Raw capacitive readings oscillate near the threshold. A transition is
/// accepted only when the debounce window has elapsed since the last accepted
/// transition, so the classifier never sees a contact episode recreated by
/// electrical noise. Emits at most one edge per call.
#[derive(Clone, Copy, Debug)]
pub struct ContactDebouncer {
    window_ms: u64,
    stable_contact: bool,
    last_edge_ms: Option<u64>,
}

impl ContactDebouncer {
    pub const fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            stable_contact: false,
            last_edge_ms: None,
        }
    }

    pub fn update(&mut self, now_ms: u64, raw_contact: bool) -> Option<ContactEdge> {
        if raw_contact == self.stable_contact {
            return None;
        }
        if let Some(last) = self.last_edge_ms {
            if now_ms.saturating_sub(last) < self.window_ms {
                return None;
            }
        }
        self.stable_contact = raw_contact;
        self.last_edge_ms = Some(now_ms);
        Some(if raw_contact {
            ContactEdge::Start
        } else {
            ContactEdge::End
        })
    }

    pub const fn stable_contact(&self) -> bool {
        self.stable_contact
    }
}
