use crate::firmware::config::{BusIdentity, ControllerConfig, PORTAL_AP_NAME, PUBLISH_PAYLOAD};
use crate::firmware::echo::EchoScheduler;
use crate::firmware::lamp::{Actuator, LampState};
use crate::firmware::link::mode::LinkModeController;
use crate::firmware::link::portal::{ConfigPortal, PortalPoll};
use crate::firmware::link::reconnect::Reconnector;
use crate::firmware::link::{MessageBus, NetworkLink};
use crate::firmware::telemetry;
use crate::firmware::touch::TouchPipeline;
use crate::firmware::types::{GestureKind, LinkMode, TopicConfig};

/// External collaborators, lent to the controller for one tick at a time.
pub struct Services<'a> {
    pub network: &'a mut dyn NetworkLink,
    pub bus: &'a mut dyn MessageBus,
    pub portal: &'a mut dyn ConfigPortal,
    pub actuator: &'a mut dyn Actuator,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Running,
    /// A portal session is in flight; gesture, messaging and echo processing
    /// are suspended until it resolves or times out.
    AwaitingPortal { started_ms: u64 },
}

/// The single owned context for all mutable controller state (lamp flag,
/// mode flag, topic strings, retry counters, echo timer), written only from
/// the tick path. The one asynchronously-invoked entry point is
/// `notify_inbound`, which is confined to flag-setting.
pub struct Controller {
    config: ControllerConfig,
    identity: BusIdentity,
    topics: TopicConfig,
    mode: LinkModeController,
    touch: TouchPipeline,
    reconnect: Reconnector,
    echo: EchoScheduler,
    lamp: LampState,
    phase: Phase,
}

impl Controller {
    pub fn new(
        config: ControllerConfig,
        identity: BusIdentity,
        topics: TopicConfig,
        initial_mode: LinkMode,
    ) -> Self {
        let config = config.sanitized();
        Self {
            config,
            identity,
            topics,
            mode: LinkModeController::new(initial_mode),
            touch: TouchPipeline::new(&config),
            reconnect: Reconnector::new(config.reconnect_backoff_ms, config.reconnect_max_attempts),
            echo: EchoScheduler::new(config.echo_min_interval_ms),
            lamp: LampState::new(),
            phase: Phase::Running,
        }
    }

    pub const fn mode(&self) -> LinkMode {
        self.mode.mode()
    }

    pub const fn topics(&self) -> &TopicConfig {
        &self.topics
    }

    pub const fn lamp_is_on(&self) -> bool {
        self.lamp.is_on()
    }

    pub const fn awaiting_portal(&self) -> bool {
        matches!(self.phase, Phase::AwaitingPortal { .. })
    }

    /// Inbound delivery callback. Any message on the subscribed topic queues
    /// an echo; content is not inspected. Must stay flag-setting only; the
    /// toggle happens from a later tick.
    pub fn notify_inbound(&mut self, _topic: &str, _payload: &[u8]) {
        telemetry::record_inbound_message();
        self.echo.notify();
    }

    /// One cooperative pass: touch sampling, gesture side effects, link
    /// upkeep, echo drain.
    pub fn tick(&mut self, now_ms: u64, raw_touch: u16, services: &mut Services<'_>) {
        if let Phase::AwaitingPortal { started_ms } = self.phase {
            self.poll_portal(now_ms, started_ms, services);
            return;
        }

        let output = self.touch.tick(now_ms, raw_touch, self.mode.mode());
        for event in output.events.into_iter().flatten() {
            self.apply_gesture(now_ms, event.kind, services);
        }

        if matches!(self.mode.mode(), LinkMode::Online) {
            self.reconnect
                .ensure_connected(now_ms, services.bus, self.identity, &self.topics);
            if self.echo.maybe_fire(now_ms) {
                let on = self.lamp.toggle();
                services.actuator.set_on(on);
            }
        }
    }

    fn apply_gesture(&mut self, now_ms: u64, kind: GestureKind, services: &mut Services<'_>) {
        match kind {
            GestureKind::Tap => {
                telemetry::record_tap();
                let on = self.lamp.toggle();
                services.actuator.set_on(on);
                // A queued remote echo loses to the local gesture.
                self.echo.cancel();
            }
            GestureKind::LongPress => {
                telemetry::record_long_press();
                // Best-effort trigger to the peer; a failed publish is
                // dropped, not retried within this episode.
                if services.bus.is_connected() {
                    let ok = services
                        .bus
                        .publish(self.topics.publish_topic.as_str(), PUBLISH_PAYLOAD);
                    telemetry::record_bus_publish(ok);
                }
            }
            GestureKind::ExtendedLongPress => {
                telemetry::record_extended_press();
                if services.portal.begin(PORTAL_AP_NAME, &self.topics) {
                    telemetry::record_portal_run();
                    self.phase = Phase::AwaitingPortal { started_ms: now_ms };
                }
            }
        }
    }

    fn poll_portal(&mut self, now_ms: u64, started_ms: u64, services: &mut Services<'_>) {
        if now_ms.saturating_sub(started_ms) >= self.config.portal_timeout_ms {
            services.portal.cancel();
            telemetry::record_portal_timeout();
            self.finish_portal(None, services);
            return;
        }
        match services.portal.poll(now_ms) {
            PortalPoll::Pending => {}
            PortalPoll::Done { topics } => self.finish_portal(topics, services),
        }
    }

    fn finish_portal(&mut self, topics: Option<TopicConfig>, services: &mut Services<'_>) {
        if let Some(topics) = topics {
            self.topics = topics;
        }
        if services.network.is_connected() {
            self.mode.set_online();
            // Dial with the (possibly updated) topic pair right away.
            self.reconnect.reset_cycle();
        }
        self.phase = Phase::Running;
    }
}
