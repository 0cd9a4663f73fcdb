//! Status-LED Muster
//!
//! Die Onboard-LED zeigt den Gerätezustand: langsames Blinken ohne
//! Konfiguration, schnelles Blinken beim Verbinden, aus im Normalbetrieb.

use rgb::RGB8;

/// Halbe Periode langsames Blinken
pub const SLOW_BLINK_MS: u32 = 1000;
/// Halbe Periode schnelles Blinken
pub const FAST_BLINK_MS: u32 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusPattern {
    Off,
    On,
    SlowBlink,
    FastBlink,
}

/// Betriebszustand eines Geräts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceMode {
    /// Keine WLAN-Zugangsdaten vorhanden
    Unconfigured,
    Connecting,
    Normal,
}

impl StatusPattern {
    /// Muster für einen Gerätezustand
    ///
    /// `active` signalisiert im Normalbetrieb ein lokales Ereignis
    /// (z.B. erkannte Bewegung) durch Dauerlicht.
    pub const fn for_mode(mode: DeviceMode, active: bool) -> Self {
        match mode {
            DeviceMode::Unconfigured => StatusPattern::SlowBlink,
            DeviceMode::Connecting => StatusPattern::FastBlink,
            DeviceMode::Normal if active => StatusPattern::On,
            DeviceMode::Normal => StatusPattern::Off,
        }
    }

    const fn half_period_ms(self) -> Option<u32> {
        match self {
            StatusPattern::SlowBlink => Some(SLOW_BLINK_MS),
            StatusPattern::FastBlink => Some(FAST_BLINK_MS),
            StatusPattern::Off | StatusPattern::On => None,
        }
    }
}

/// Ein Zustand der LED
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusFrame {
    pub color: RGB8,
    /// Wie lange der Zustand gilt; `None` = bis zum nächsten Musterwechsel
    pub hold_ms: Option<u32>,
}

/// Erzeugt die Frames eines Musters
pub struct StatusBlinker {
    pattern: StatusPattern,
    color: RGB8,
    lit: bool,
}

impl StatusBlinker {
    pub const fn new(color: RGB8) -> Self {
        Self {
            pattern: StatusPattern::Off,
            color,
            lit: false,
        }
    }

    pub fn pattern(&self) -> StatusPattern {
        self.pattern
    }

    /// Setzt ein neues Muster; Blinken beginnt mit "an"
    ///
    /// Gibt zurück, ob sich das Muster geändert hat.
    pub fn apply(&mut self, pattern: StatusPattern) -> bool {
        if pattern == self.pattern {
            return false;
        }
        self.pattern = pattern;
        self.lit = false;
        true
    }

    pub fn next_frame(&mut self) -> StatusFrame {
        let hold_ms = self.pattern.half_period_ms();
        self.lit = match self.pattern {
            StatusPattern::Off => false,
            StatusPattern::On => true,
            StatusPattern::SlowBlink | StatusPattern::FastBlink => !self.lit,
        };

        StatusFrame {
            color: if self.lit { self.color } else { RGB8::default() },
            hold_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREEN: RGB8 = RGB8 { r: 0, g: 10, b: 0 };

    #[test]
    fn test_mode_mapping() {
        assert_eq!(
            StatusPattern::for_mode(DeviceMode::Unconfigured, false),
            StatusPattern::SlowBlink
        );
        assert_eq!(
            StatusPattern::for_mode(DeviceMode::Connecting, true),
            StatusPattern::FastBlink
        );
        assert_eq!(StatusPattern::for_mode(DeviceMode::Normal, true), StatusPattern::On);
        assert_eq!(StatusPattern::for_mode(DeviceMode::Normal, false), StatusPattern::Off);
    }

    #[test]
    fn test_fast_blink_alternates() {
        let mut blinker = StatusBlinker::new(GREEN);
        assert!(blinker.apply(StatusPattern::FastBlink));

        let first = blinker.next_frame();
        let second = blinker.next_frame();
        assert_eq!(first.color, GREEN);
        assert_eq!(first.hold_ms, Some(250));
        assert_eq!(second.color, RGB8::default());
    }

    #[test]
    fn test_solid_patterns_hold_forever() {
        let mut blinker = StatusBlinker::new(GREEN);
        blinker.apply(StatusPattern::On);
        assert_eq!(
            blinker.next_frame(),
            StatusFrame {
                color: GREEN,
                hold_ms: None
            }
        );
        assert!(!blinker.apply(StatusPattern::On));
    }
}
