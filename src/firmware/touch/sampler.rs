/// Classifies one raw capacitive reading per tick. ESP32 touch readings sink
/// toward zero on contact, so contact is "below threshold".
#[derive(Clone, Copy, Debug)]
pub struct ContactSampler {
    threshold: u16,
}

impl ContactSampler {
    pub const fn new(threshold: u16) -> Self {
        Self { threshold }
    }

    pub const fn classify(&self, raw: u16) -> bool {
        raw < self.threshold
    }

    pub const fn threshold(&self) -> u16 {
        self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readings_below_threshold_are_contact() {
        let sampler = ContactSampler::new(40);
        assert!(sampler.classify(0));
        assert!(sampler.classify(39));
        assert!(!sampler.classify(40));
        assert!(!sampler.classify(80));
    }
}
