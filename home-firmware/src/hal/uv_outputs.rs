// Schaltausgänge der UV-Box: Relais der UV-Röhren und Display-Beleuchtung

use esp_hal::gpio::Output;
use home_core::uvbox::UvOutputs;

pub struct GpioUvOutputs {
    trigger: Output<'static>,
    backlight: Output<'static>,
}

impl GpioUvOutputs {
    pub fn new(trigger: Output<'static>, backlight: Output<'static>) -> Self {
        Self { trigger, backlight }
    }
}

impl UvOutputs for GpioUvOutputs {
    fn set_trigger(&mut self, on: bool) {
        self.trigger.set_level(on.into());
    }

    // Beleuchtung ist low-aktiv
    fn set_backlight(&mut self, on: bool) {
        self.backlight.set_level((!on).into());
    }
}
