//! Software-Überblendung für PWM-Kanäle
//!
//! Die Hardware-Fade-Engine des LEDC wird nicht genutzt; stattdessen
//! läuft pro Kanal eine Rampe, die in festen Ticks Richtung Ziel läuft.

use crate::traits::{DimmerOutput, LedError};

/// Helligkeit (0-100 %) → Duty-Wert
///
/// Werte über 100 % werden begrenzt.
///
/// # Beispiele
///
/// ```
/// # use home_core::brightness_to_duty;
/// assert_eq!(brightness_to_duty(50, 8191), 4095);
/// ```
pub fn brightness_to_duty(percent: u8, max_duty: u32) -> u32 {
    u32::from(percent.min(100)) * max_duty / 100
}

/// Rampe von einem Duty-Wert zu einem Ziel
///
/// Pro Tick bewegt sich der Wert um `step`, überschreitet das Ziel nie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FadeRamp {
    current: u32,
    target: u32,
    step: u32,
}

impl FadeRamp {
    pub const fn new(current: u32) -> Self {
        Self {
            current,
            target: current,
            step: 0,
        }
    }

    /// Startet eine neue Rampe ab dem aktuellen Wert
    ///
    /// `duration_ms == 0` springt beim nächsten Tick direkt aufs Ziel.
    pub fn start(&mut self, target: u32, duration_ms: u32, tick_ms: u32) {
        let distance = self.current.abs_diff(target);
        let ticks = (duration_ms / tick_ms.max(1)).max(1);
        self.target = target;
        self.step = distance.div_ceil(ticks).max(1);
    }

    /// Nächster Wert, `None` wenn das Ziel bereits erreicht ist
    pub fn advance(&mut self) -> Option<u32> {
        if self.current == self.target {
            return None;
        }
        self.current = if self.current < self.target {
            (self.current + self.step).min(self.target)
        } else {
            self.current.saturating_sub(self.step).max(self.target)
        };
        Some(self.current)
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn is_done(&self) -> bool {
        self.current == self.target
    }
}

/// Rampen für alle Kanäle eines `DimmerOutput`
pub struct Dimmer<D: DimmerOutput, const N: usize> {
    output: D,
    ramps: [FadeRamp; N],
    tick_ms: u32,
}

impl<D: DimmerOutput, const N: usize> Dimmer<D, N> {
    pub fn new(output: D, tick_ms: u32) -> Self {
        Self {
            output,
            ramps: [FadeRamp::new(0); N],
            tick_ms,
        }
    }

    /// Startet eine Überblendung auf `percent`
    pub fn fade_to(&mut self, channel: usize, percent: u8, duration_ms: u32) -> Result<(), LedError> {
        let target = brightness_to_duty(percent, self.output.max_duty());
        let ramp = self.ramps.get_mut(channel).ok_or(LedError::InvalidChannel)?;
        ramp.start(target, duration_ms, self.tick_ms);
        Ok(())
    }

    /// Ein Tick für alle Rampen
    ///
    /// Gibt zurück, ob noch eine Rampe läuft.
    pub fn step(&mut self) -> Result<bool, LedError> {
        let mut active = false;
        for (channel, ramp) in self.ramps.iter_mut().enumerate() {
            if let Some(duty) = ramp.advance() {
                self.output.set_duty(channel, duty)?;
            }
            active |= !ramp.is_done();
        }
        Ok(active)
    }

    pub fn duty(&self, channel: usize) -> Option<u32> {
        self.ramps.get(channel).map(FadeRamp::current)
    }

    pub fn output(&self) -> &D {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brightness_to_duty() {
        assert_eq!(brightness_to_duty(0, 8191), 0);
        assert_eq!(brightness_to_duty(100, 8191), 8191);
        assert_eq!(brightness_to_duty(20, 8191), 1638);
        assert_eq!(brightness_to_duty(250, 8191), 8191);
    }

    #[test]
    fn test_ramp_reaches_target_without_overshoot() {
        let mut ramp = FadeRamp::new(0);
        ramp.start(100, 1000, 300);
        // 3 Ticks → Schritt 34
        assert_eq!(ramp.advance(), Some(34));
        assert_eq!(ramp.advance(), Some(68));
        assert_eq!(ramp.advance(), Some(100));
        assert_eq!(ramp.advance(), None);
        assert!(ramp.is_done());
    }

    #[test]
    fn test_ramp_down() {
        let mut ramp = FadeRamp::new(10);
        ramp.start(0, 40, 20);
        assert_eq!(ramp.advance(), Some(5));
        assert_eq!(ramp.advance(), Some(0));
        assert_eq!(ramp.advance(), None);
    }

    #[test]
    fn test_zero_duration_jumps() {
        let mut ramp = FadeRamp::new(0);
        ramp.start(8191, 0, 20);
        assert_eq!(ramp.advance(), Some(8191));
    }

    #[test]
    fn test_retarget_mid_fade() {
        let mut ramp = FadeRamp::new(0);
        ramp.start(1000, 100, 10);
        ramp.advance();
        ramp.advance();
        assert_eq!(ramp.current(), 200);
        ramp.start(0, 20, 10);
        assert_eq!(ramp.advance(), Some(100));
        assert_eq!(ramp.advance(), Some(0));
    }
}
