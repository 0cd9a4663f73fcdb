// Belichtungszeit als Stunden/Minuten/Sekunden

use core::fmt;

/// Obergrenze jedes Feldes (auch der Stunden)
pub const MAX_FIELD: u8 = 59;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerValue {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl TimerValue {
    pub const ZERO: Self = Self {
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Zerlegt eine gespeicherte Sekundenzahl
    ///
    /// Jedes Feld wird auf 59 begrenzt, ein gelöschtes EEPROM
    /// (0xFFFFFFFF) ergibt also 59:28:15.
    pub fn from_secs(total: u32) -> Self {
        let hours = total / 3600;
        let minutes = total / 60 - hours * 60;
        let seconds = total % 60;
        let clamp = |value: u32| value.min(u32::from(MAX_FIELD)) as u8;

        Self {
            hours: clamp(hours),
            minutes: clamp(minutes),
            seconds: clamp(seconds),
        }
    }

    pub fn as_secs(&self) -> u32 {
        u32::from(self.seconds) + u32::from(self.minutes) * 60 + u32::from(self.hours) * 3600
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Zählt eine Sekunde herunter
    ///
    /// Gibt `false` zurück, wenn bereits 00:00:00 erreicht war.
    pub fn tick(&mut self) -> bool {
        if self.seconds > 0 {
            self.seconds -= 1;
        } else if self.minutes > 0 {
            self.minutes -= 1;
            self.seconds = 59;
        } else if self.hours > 0 {
            self.hours -= 1;
            self.minutes = 59;
            self.seconds = 59;
        } else {
            return false;
        }
        true
    }

    pub fn field(&self, field: TimerField) -> u8 {
        match field {
            TimerField::Seconds => self.seconds,
            TimerField::Minutes => self.minutes,
            TimerField::Hours => self.hours,
        }
    }

    fn field_mut(&mut self, field: TimerField) -> &mut u8 {
        match field {
            TimerField::Seconds => &mut self.seconds,
            TimerField::Minutes => &mut self.minutes,
            TimerField::Hours => &mut self.hours,
        }
    }

    /// +1 mit Überlauf 59 → 0
    pub fn increment(&mut self, field: TimerField) {
        let value = self.field_mut(field);
        *value = if *value >= MAX_FIELD { 0 } else { *value + 1 };
    }

    /// -1 mit Unterlauf 0 → 59
    pub fn decrement(&mut self, field: TimerField) {
        let value = self.field_mut(field);
        *value = if *value == 0 { MAX_FIELD } else { *value - 1 };
    }
}

/// Format: `hh:mm:ss`
impl fmt::Display for TimerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// Bearbeitetes Feld im Timer-Editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerField {
    Seconds,
    Minutes,
    Hours,
}

impl TimerField {
    pub const fn label(self) -> &'static str {
        match self {
            TimerField::Seconds => "Seconds",
            TimerField::Minutes => "Minutes",
            TimerField::Hours => "Hours",
        }
    }

    /// Nächstgrößere Einheit, `None` bei Stunden
    pub const fn larger(self) -> Option<Self> {
        match self {
            TimerField::Seconds => Some(TimerField::Minutes),
            TimerField::Minutes => Some(TimerField::Hours),
            TimerField::Hours => None,
        }
    }

    /// Nächstkleinere Einheit, `None` bei Sekunden
    pub const fn smaller(self) -> Option<Self> {
        match self {
            TimerField::Seconds => None,
            TimerField::Minutes => Some(TimerField::Seconds),
            TimerField::Hours => Some(TimerField::Minutes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_secs_splits_fields() {
        let value = TimerValue::from_secs(3 * 3600 + 25 * 60 + 7);
        assert_eq!(
            value,
            TimerValue {
                hours: 3,
                minutes: 25,
                seconds: 7
            }
        );
        assert_eq!(value.as_secs(), 12_307);
    }

    #[test]
    fn test_from_secs_clamps_hours() {
        let value = TimerValue::from_secs(100 * 3600);
        assert_eq!(value.hours, 59);
        assert_eq!(value.minutes, 0);
    }

    #[test]
    fn test_tick_borrows() {
        let mut value = TimerValue {
            hours: 1,
            minutes: 0,
            seconds: 0,
        };
        assert!(value.tick());
        assert_eq!(
            value,
            TimerValue {
                hours: 0,
                minutes: 59,
                seconds: 59
            }
        );

        let mut zero = TimerValue::ZERO;
        assert!(!zero.tick());
        assert!(zero.is_zero());
    }

    #[test]
    fn test_wraparound() {
        let mut value = TimerValue::ZERO;
        value.decrement(TimerField::Minutes);
        assert_eq!(value.minutes, 59);
        value.increment(TimerField::Minutes);
        assert_eq!(value.minutes, 0);
    }
}
