use super::TouchPipeline;
use crate::firmware::config::ControllerConfig;
use crate::firmware::types::{GestureKind, LinkMode};

const CONTACT: u16 = 10;
const RELEASED: u16 = 75;

fn pipeline() -> TouchPipeline {
    TouchPipeline::new(&ControllerConfig::defaults())
}

fn drain_kinds(
    output: super::gesture::GestureOutput,
    out: &mut std::vec::Vec<(u64, GestureKind)>,
) {
    for event in output.events.into_iter().flatten() {
        out.push((event.t_ms, event.kind));
    }
}

#[test]
fn tap_fires_once_at_contact_start() {
    let mut touch = pipeline();
    let mut events = std::vec::Vec::new();

    for tick in 0..10u64 {
        let raw = if tick < 5 { CONTACT } else { RELEASED };
        drain_kinds(touch.tick(tick * 20, raw, LinkMode::Online), &mut events);
    }

    assert_eq!(events, std::vec![(0, GestureKind::Tap)]);
}

#[test]
fn online_hold_fires_tap_then_long_press() {
    // Scenario: contact held 1200 ms while online.
    let mut touch = pipeline();
    let mut events = std::vec::Vec::new();

    let mut now_ms = 0;
    while now_ms <= 1_200 {
        drain_kinds(touch.tick(now_ms, CONTACT, LinkMode::Online), &mut events);
        now_ms += 20;
    }
    drain_kinds(touch.tick(now_ms, RELEASED, LinkMode::Online), &mut events);

    assert_eq!(
        events,
        std::vec![(0, GestureKind::Tap), (1_000, GestureKind::LongPress)]
    );
}

#[test]
fn offline_hold_fires_tap_then_extended_press_only() {
    // Scenario: contact held 3200 ms while offline.
    let mut touch = pipeline();
    let mut events = std::vec::Vec::new();

    let mut now_ms = 0;
    while now_ms <= 3_200 {
        drain_kinds(touch.tick(now_ms, CONTACT, LinkMode::Offline), &mut events);
        now_ms += 20;
    }
    drain_kinds(touch.tick(now_ms, RELEASED, LinkMode::Offline), &mut events);

    assert_eq!(
        events,
        std::vec![
            (0, GestureKind::Tap),
            (3_000, GestureKind::ExtendedLongPress)
        ]
    );
}

#[test]
fn offline_hold_never_fires_long_press() {
    let mut touch = pipeline();
    let mut events = std::vec::Vec::new();

    for tick in 0..200u64 {
        drain_kinds(touch.tick(tick * 20, CONTACT, LinkMode::Offline), &mut events);
    }

    assert!(!events
        .iter()
        .any(|(_, kind)| matches!(kind, GestureKind::LongPress)));
}

#[test]
fn mode_flip_mid_episode_can_fire_both_tiers_once_each() {
    // Online past the 1s mark, then the mode flips offline while the same
    // contact is held past the 3s mark. Each tier keeps its own fired flag.
    let mut touch = pipeline();
    let mut events = std::vec::Vec::new();

    let mut now_ms = 0;
    while now_ms <= 1_500 {
        drain_kinds(touch.tick(now_ms, CONTACT, LinkMode::Online), &mut events);
        now_ms += 20;
    }
    while now_ms <= 3_500 {
        drain_kinds(touch.tick(now_ms, CONTACT, LinkMode::Offline), &mut events);
        now_ms += 20;
    }

    let long_presses = events
        .iter()
        .filter(|(_, kind)| matches!(kind, GestureKind::LongPress))
        .count();
    let extended = events
        .iter()
        .filter(|(_, kind)| matches!(kind, GestureKind::ExtendedLongPress))
        .count();
    assert_eq!(long_presses, 1);
    assert_eq!(extended, 1);
}

#[test]
fn tier_flags_reset_between_episodes() {
    let mut touch = pipeline();
    let mut events = std::vec::Vec::new();

    // First episode: held past the long-press mark.
    let mut now_ms = 0;
    while now_ms <= 1_100 {
        drain_kinds(touch.tick(now_ms, CONTACT, LinkMode::Online), &mut events);
        now_ms += 20;
    }
    drain_kinds(touch.tick(now_ms, RELEASED, LinkMode::Online), &mut events);

    // Second episode after a quiet gap: both tap and long press fire again.
    now_ms += 500;
    let second_start = now_ms;
    while now_ms <= second_start + 1_100 {
        drain_kinds(touch.tick(now_ms, CONTACT, LinkMode::Online), &mut events);
        now_ms += 20;
    }

    let taps = events
        .iter()
        .filter(|(_, kind)| matches!(kind, GestureKind::Tap))
        .count();
    let long_presses = events
        .iter()
        .filter(|(_, kind)| matches!(kind, GestureKind::LongPress))
        .count();
    assert_eq!(taps, 2);
    assert_eq!(long_presses, 2);
}

#[test]
fn events_report_held_duration() {
    // The tap carries zero hold; the long press reports the time since
    // contact start at the moment its tier fires.
    let mut touch = pipeline();
    let mut events = std::vec::Vec::new();

    let mut now_ms = 0;
    while now_ms <= 1_200 {
        for event in touch
            .tick(now_ms, CONTACT, LinkMode::Online)
            .events
            .into_iter()
            .flatten()
        {
            events.push(event);
        }
        now_ms += 20;
    }

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].kind, GestureKind::Tap);
    assert_eq!(events[0].held_ms, 0);
    assert_eq!(events[1].kind, GestureKind::LongPress);
    assert_eq!(events[1].held_ms, 1_000);
}

#[test]
fn brief_dropout_does_not_recreate_the_episode() {
    // A single 10 ms dropout right after contact start is inside the debounce
    // window and must not end or restart the episode.
    let mut touch = pipeline();
    let mut events = std::vec::Vec::new();

    drain_kinds(touch.tick(0, CONTACT, LinkMode::Online), &mut events);
    drain_kinds(touch.tick(10, RELEASED, LinkMode::Online), &mut events);
    for tick in 2..60u64 {
        drain_kinds(touch.tick(tick * 10, CONTACT, LinkMode::Online), &mut events);
    }

    let taps = events
        .iter()
        .filter(|(_, kind)| matches!(kind, GestureKind::Tap))
        .count();
    assert_eq!(taps, 1);
}
