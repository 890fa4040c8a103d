use crate::firmware::types::TopicConfig;

/// Result of polling an in-flight portal session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PortalPoll {
    Pending,
    /// The portal flow finished (user saved, user aborted, or the
    /// collaborator gave up). `topics` carries the edited pair when the user
    /// changed it. Whether the network came up is read from the network
    /// link afterwards, not reported here.
    Done { topics: Option<TopicConfig> },
}

/// On-demand reconfiguration portal collaborator. The captive-portal
/// procedure itself (SoftAP, DNS catch-all, form serving) is library
/// territory; the controller only starts it with the current topic pair as
/// pre-filled parameters and polls until it resolves. The controller
/// enforces the session deadline and cancels an overdue session.
pub trait ConfigPortal {
    /// Returns false when the session cannot start; the gesture is then
    /// dropped and the device stays in its current mode.
    fn begin(&mut self, ap_name: &str, prefill: &TopicConfig) -> bool;

    fn poll(&mut self, now_ms: u64) -> PortalPoll;

    fn cancel(&mut self);
}
