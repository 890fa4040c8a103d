use heapless::String;

/// Topic identifiers are bounded to what the reconfiguration portal's
/// two editable fields can carry.
pub const TOPIC_MAX: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactEdge {
    Start,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureKind {
    Tap,
    LongPress,
    ExtendedLongPress,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureEvent {
    pub kind: GestureKind,
    pub t_ms: u64,
    pub held_ms: u16,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkMode {
    Online,
    Offline,
}

impl LinkMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

/// Publish/subscribe topic pair. Two paired devices use mirrored
/// configurations: one device's publish topic is its peer's subscribe
/// topic and vice versa.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopicConfig {
    pub publish_topic: String<TOPIC_MAX>,
    pub subscribe_topic: String<TOPIC_MAX>,
}

impl TopicConfig {
    pub fn new(publish_topic: &str, subscribe_topic: &str) -> Self {
        Self {
            publish_topic: bounded_topic(publish_topic),
            subscribe_topic: bounded_topic(subscribe_topic),
        }
    }

    /// The peer device's view of this pair.
    pub fn swapped(&self) -> Self {
        Self {
            publish_topic: self.subscribe_topic.clone(),
            subscribe_topic: self.publish_topic.clone(),
        }
    }
}

/// Truncates at the topic bound instead of failing; the portal collaborator
/// already enforces the 64-byte field limit on user input.
pub fn bounded_topic(raw: &str) -> String<TOPIC_MAX> {
    let mut out = String::new();
    for ch in raw.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}
