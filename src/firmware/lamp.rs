/// Output seam for the physical actuator (LED pin in the firmware runtime).
pub trait Actuator {
    fn set_on(&mut self, on: bool);
}

/// Actuator state lives here for the process lifetime; `toggle` is the only
/// mutation path, shared by local gestures and remote echoes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LampState {
    is_on: bool,
}

impl LampState {
    pub const fn new() -> Self {
        Self { is_on: false }
    }

    pub fn toggle(&mut self) -> bool {
        self.is_on = !self.is_on;
        self.is_on
    }

    pub const fn is_on(&self) -> bool {
        self.is_on
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_reports_new_state() {
        let mut lamp = LampState::new();
        assert!(!lamp.is_on());
        assert!(lamp.toggle());
        assert!(lamp.is_on());
        assert!(!lamp.toggle());
        assert!(!lamp.is_on());
    }
}
