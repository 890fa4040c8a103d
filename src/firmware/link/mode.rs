use crate::firmware::telemetry;
use crate::firmware::types::LinkMode;

/// Owns the online/offline flag. `Offline -> Online` happens only through
/// the portal success path; a lost messaging link never drops the mode back
/// to offline, the reconnector just keeps retrying. Availability is favored
/// over fast-fail here.
#[derive(Clone, Copy, Debug)]
pub struct LinkModeController {
    mode: LinkMode,
}

impl LinkModeController {
    pub const fn new(initial: LinkMode) -> Self {
        Self { mode: initial }
    }

    pub const fn mode(&self) -> LinkMode {
        self.mode
    }

    pub fn set_online(&mut self) {
        if matches!(self.mode, LinkMode::Offline) {
            self.mode = LinkMode::Online;
            telemetry::record_mode_online();
        }
    }
}

/// Bounded startup window for the initial network association. Polled at the
/// runtime's cadence until it resolves to the initial mode.
#[derive(Clone, Copy, Debug)]
pub struct StartupAssociation {
    deadline_ms: u64,
}

impl StartupAssociation {
    pub const fn new(now_ms: u64, window_ms: u64) -> Self {
        Self {
            deadline_ms: now_ms.saturating_add(window_ms),
        }
    }

    pub fn poll(&self, now_ms: u64, associated: bool) -> Option<LinkMode> {
        if associated {
            Some(LinkMode::Online)
        } else if now_ms >= self.deadline_ms {
            Some(LinkMode::Offline)
        } else {
            None
        }
    }
}
