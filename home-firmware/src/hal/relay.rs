// Relais der Steckdose (aktiv-high)

use esp_hal::gpio::Output;
use home_core::socket::SwitchOutput;

pub struct GpioRelay {
    pin: Output<'static>,
}

impl GpioRelay {
    pub fn new(pin: Output<'static>) -> Self {
        Self { pin }
    }
}

impl SwitchOutput for GpioRelay {
    fn set(&mut self, on: bool) {
        if on {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }
}
