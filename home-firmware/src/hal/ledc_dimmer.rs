// LEDC PWM-Ausgänge für LED-Streifen und Lichter
//
// Ein gemeinsamer Low-Speed-Timer (13 Bit, 5 kHz), ein Kanal pro Streifen.
// Die Überblendung rechnet home-core (`Dimmer`), hier wird nur der
// Duty-Wert in die Hardware geschrieben.

use esp_hal::gpio::interconnect::PeripheralOutput;
use esp_hal::ledc::channel::{self, ChannelHW, ChannelIFace};
use esp_hal::ledc::timer::{self, TimerIFace};
use esp_hal::ledc::{LSGlobalClkSource, Ledc, LowSpeed};
use esp_hal::time::Rate;
use heapless::Vec;
use home_core::{DimmerOutput, LedError};

use crate::config::{PWM_CHANNELS, PWM_FREQUENCY_KHZ};

/// Auflösung des PWM-Timers
const DUTY_BITS: u32 = 13;

/// Fehler beim Einrichten der LEDC-Hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedcError {
    Timer,
    Channel,
    TooManyChannels,
}

impl defmt::Format for LedcError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            LedcError::Timer => defmt::write!(fmt, "LEDC timer setup failed"),
            LedcError::Channel => defmt::write!(fmt, "LEDC channel setup failed"),
            LedcError::TooManyChannels => defmt::write!(fmt, "Too many PWM channels"),
        }
    }
}

/// Stellt den globalen Takt ein und konfiguriert Timer 0
pub fn configure_timer(ledc: &mut Ledc<'static>) -> Result<timer::Timer<'static, LowSpeed>, LedcError> {
    ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);

    let mut pwm_timer = ledc.timer::<LowSpeed>(timer::Number::Timer0);
    pwm_timer
        .configure(timer::config::Config {
            duty: timer::config::Duty::Duty13Bit,
            clock_source: timer::LSClockSource::APBClk,
            frequency: Rate::from_khz(PWM_FREQUENCY_KHZ),
        })
        .map_err(|_| LedcError::Timer)?;
    Ok(pwm_timer)
}

/// PWM-Ausgänge eines Images, `N` Kanäle
pub struct LedcDimmer<const N: usize = PWM_CHANNELS> {
    ledc: &'static Ledc<'static>,
    pwm_timer: &'static timer::Timer<'static, LowSpeed>,
    channels: Vec<channel::Channel<'static, LowSpeed>, N>,
}

impl<const N: usize> LedcDimmer<N> {
    pub fn new(ledc: &'static Ledc<'static>, pwm_timer: &'static timer::Timer<'static, LowSpeed>) -> Self {
        Self {
            ledc,
            pwm_timer,
            channels: Vec::new(),
        }
    }

    /// Hängt den nächsten Kanal an (startet dunkel)
    ///
    /// Die Reihenfolge der Aufrufe bestimmt die Kanal-Nummer.
    pub fn add_channel(
        &mut self,
        number: channel::Number,
        pin: impl PeripheralOutput<'static>,
    ) -> Result<(), LedcError> {
        let mut pwm_channel = self.ledc.channel(number, pin);
        pwm_channel
            .configure(channel::config::Config {
                timer: self.pwm_timer,
                duty_pct: 0,
                pin_config: channel::config::PinConfig::PushPull,
            })
            .map_err(|_| LedcError::Channel)?;

        self.channels
            .push(pwm_channel)
            .map_err(|_| LedcError::TooManyChannels)
    }
}

impl<const N: usize> DimmerOutput for LedcDimmer<N> {
    fn max_duty(&self) -> u32 {
        (1 << DUTY_BITS) - 1
    }

    fn set_duty(&mut self, channel: usize, duty: u32) -> Result<(), LedError> {
        let pwm_channel = self.channels.get(channel).ok_or(LedError::InvalidChannel)?;
        pwm_channel.set_duty_hw(duty.min(self.max_duty()));
        Ok(())
    }
}
