pub mod mode;
pub mod portal;
pub mod reconnect;

/// Network-association collaborator (the auto-connect/captive-portal library
/// owns the actual procedure).
pub trait NetworkLink {
    fn is_connected(&self) -> bool;
}

/// Messaging transport collaborator. Connect/publish/subscribe are
/// best-effort primitives; delivery of inbound messages reaches the
/// controller through its own mailbox path.
pub trait MessageBus {
    fn is_connected(&self) -> bool;
    fn connect(&mut self, client_id: &str, username: &str) -> bool;
    fn subscribe(&mut self, topic: &str) -> bool;
    fn publish(&mut self, topic: &str, payload: &[u8]) -> bool;
}
