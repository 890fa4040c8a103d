use esp_hal::peripherals::GPIO32;
use esp_hal::touch::{Touch, TouchPad};

/// One raw capacitive reading per tick.
pub(crate) trait TouchProbe {
    fn read_raw(&mut self) -> u16;
}

/// Touch pad T9 / GPIO32, the sensor wire on this board.
pub(crate) struct PadProbe {
    pad: TouchPad<'static, GPIO32<'static>>,
    last_raw: u16,
}

impl PadProbe {
    pub(crate) fn new(touch: &'static Touch<'static>, pin: GPIO32<'static>) -> Self {
        Self {
            pad: TouchPad::new(pin, touch),
            last_raw: u16::MAX,
        }
    }
}

impl TouchProbe for PadProbe {
    fn read_raw(&mut self) -> u16 {
        // Keep the previous reading while a continuous-mode measurement is
        // still in flight; a missing sample must not read as contact.
        if let Some(raw) = self.pad.read() {
            self.last_raw = raw;
        }
        self.last_raw
    }
}
