use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use crate::firmware::types::{ContactEdge, GestureEvent, GestureKind, LinkMode};

#[derive(Clone, Copy, Debug)]
pub struct GestureConfig {
    pub long_press_ms: u64,
    pub extended_press_ms: u64,
}

#[derive(Clone, Copy, Debug)]
enum GestureHsmEvent {
    Sample {
        now_ms: u64,
        edge: Option<ContactEdge>,
        mode: LinkMode,
    },
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GestureOutput {
    pub events: [Option<GestureEvent>; 2],
}

#[derive(Clone, Copy, Debug, Default)]
struct DispatchContext {
    events: [Option<GestureEvent>; 2],
}

impl DispatchContext {
    fn emit(&mut self, event: GestureEvent) {
        for slot in &mut self.events {
            if slot.is_none() {
                *slot = Some(event);
                return;
            }
        }
    }

    fn finish(self) -> GestureOutput {
        GestureOutput {
            events: self.events,
        }
    }
}

pub struct GestureEngine {
    machine: statig::blocking::StateMachine<GestureHsm>,
}

impl GestureEngine {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            machine: GestureHsm::new(config).state_machine(),
        }
    }

    pub fn tick(
        &mut self,
        now_ms: u64,
        edge: Option<ContactEdge>,
        mode: LinkMode,
    ) -> GestureOutput {
        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&GestureHsmEvent::Sample { now_ms, edge, mode }, &mut context);
        context.finish()
    }
}

/// One contact episode at a time. `Tap` fires exactly once at contact start;
/// the duration tiers each fire at most once per episode and are gated on
/// opposite connectivity modes, so both can only fire if the mode flips while
/// the contact is held.
struct GestureHsm {
    config: GestureConfig,
    start_ms: u64,
    long_fired: bool,
    extended_fired: bool,
}

impl GestureHsm {
    fn new(config: GestureConfig) -> Self {
        Self {
            config,
            start_ms: 0,
            long_fired: false,
            extended_fired: false,
        }
    }

    fn begin_episode(&mut self, now_ms: u64) {
        self.start_ms = now_ms;
        self.long_fired = false;
        self.extended_fired = false;
    }

    fn clear_episode(&mut self) {
        self.long_fired = false;
        self.extended_fired = false;
    }

    fn held_ms(&self, now_ms: u64) -> u16 {
        now_ms.saturating_sub(self.start_ms).min(u16::MAX as u64) as u16
    }

    fn emit(&self, context: &mut DispatchContext, kind: GestureKind, now_ms: u64) {
        context.emit(GestureEvent {
            kind,
            t_ms: now_ms,
            held_ms: self.held_ms(now_ms),
        });
    }
}

#[state_machine(initial = "State::idle()")]
impl GestureHsm {
    #[state]
    fn idle(&mut self, context: &mut DispatchContext, event: &GestureHsmEvent) -> Outcome<State> {
        match event {
            GestureHsmEvent::Sample { now_ms, edge, .. } => {
                if matches!(edge, Some(ContactEdge::Start)) {
                    self.begin_episode(*now_ms);
                    self.emit(context, GestureKind::Tap, *now_ms);
                    return Transition(State::contact());
                }
                Handled
            }
        }
    }

    #[state]
    fn contact(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureHsmEvent,
    ) -> Outcome<State> {
        match event {
            GestureHsmEvent::Sample { now_ms, edge, mode } => {
                if matches!(edge, Some(ContactEdge::End)) {
                    self.clear_episode();
                    return Transition(State::idle());
                }
                let held = now_ms.saturating_sub(self.start_ms);
                if !self.long_fired
                    && held >= self.config.long_press_ms
                    && matches!(mode, LinkMode::Online)
                {
                    self.long_fired = true;
                    self.emit(context, GestureKind::LongPress, *now_ms);
                }
                if !self.extended_fired
                    && held >= self.config.extended_press_ms
                    && matches!(mode, LinkMode::Offline)
                {
                    self.extended_fired = true;
                    self.emit(context, GestureKind::ExtendedLongPress, *now_ms);
                }
                Handled
            }
        }
    }
}
