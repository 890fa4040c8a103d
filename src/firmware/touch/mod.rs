pub mod debounce;
pub mod gesture;
pub mod sampler;

#[cfg(test)]
mod tests;

use crate::firmware::config::ControllerConfig;
use crate::firmware::types::LinkMode;

use debounce::ContactDebouncer;
use gesture::{GestureConfig, GestureEngine, GestureOutput};
use sampler::ContactSampler;

/// Raw reading -> contact -> debounced edge -> gesture events, one pass per
/// tick.
pub struct TouchPipeline {
    sampler: ContactSampler,
    debounce: ContactDebouncer,
    engine: GestureEngine,
}

impl TouchPipeline {
    pub fn new(config: &ControllerConfig) -> Self {
        Self {
            sampler: ContactSampler::new(config.touch_threshold),
            debounce: ContactDebouncer::new(config.debounce_window_ms),
            engine: GestureEngine::new(GestureConfig {
                long_press_ms: config.long_press_ms,
                extended_press_ms: config.extended_press_ms,
            }),
        }
    }

    pub fn tick(&mut self, now_ms: u64, raw_reading: u16, mode: LinkMode) -> GestureOutput {
        let contact = self.sampler.classify(raw_reading);
        let edge = self.debounce.update(now_ms, contact);
        self.engine.tick(now_ms, edge, mode)
    }
}
