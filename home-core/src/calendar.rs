//! Kalender-Umrechnung: Unix-Sekunden → Datum und Uhrzeit
//!
//! Proleptischer Gregorianischer Kalender, UTC plus fester Offset.
//! Keine Sommerzeit-Regeln.

use core::fmt;

const SECS_PER_DAY: u64 = 86_400;

/// Tage vom 0000-03-01 bis 1970-01-01
const DAYS_TO_UNIX_EPOCH: u64 = 719_468;
const DAYS_PER_ERA: u64 = 146_097;

/// Zerlegter Zeitpunkt
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateTime {
    /// Zerlegt Unix-Sekunden (UTC)
    ///
    /// Gültig bis 9999-12-31; darüber hinaus ist `year` undefiniert.
    pub fn from_unix(secs: u64) -> Self {
        let days = secs / SECS_PER_DAY;
        let rem = secs % SECS_PER_DAY;
        let (year, month, day) = civil_from_days(days);

        Self {
            year,
            month,
            day,
            hour: (rem / 3600) as u8,
            minute: (rem % 3600 / 60) as u8,
            second: (rem % 60) as u8,
        }
    }

    /// Zerlegt Unix-Sekunden mit festem Zeitzonen-Offset
    ///
    /// Ergebnisse vor der Epoche werden auf 1970-01-01 00:00:00 begrenzt.
    pub fn from_unix_with_offset(secs: u64, offset_secs: i32) -> Self {
        let shifted = if offset_secs >= 0 {
            secs.saturating_add(offset_secs as u64)
        } else {
            secs.saturating_sub(offset_secs.unsigned_abs() as u64)
        };
        Self::from_unix(shifted)
    }
}

/// Tage seit 1970-01-01 → (Jahr, Monat, Tag)
///
/// Rechnet in 400-Jahres-Zyklen mit Jahresbeginn am 1. März, damit der
/// Schalttag am Ende des Zyklus-Jahres liegt.
fn civil_from_days(days: u64) -> (u16, u8, u8) {
    let z = days + DAYS_TO_UNIX_EPOCH;
    let era = z / DAYS_PER_ERA;
    let doe = z - era * DAYS_PER_ERA;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + u64::from(month <= 2);

    (year as u16, month as u8, day as u8)
}

/// Schaltjahr nach Gregorianischer Regel
pub const fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Anzahl Tage im Monat (1-12), 0 für ungültige Monate
pub const fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

/// Format: `dd.mm.yyyy hh:mm:ss`
impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}.{:02}.{:04} {:02}:{:02}:{:02}",
            self.day, self.month, self.year, self.hour, self.minute, self.second
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DateTime {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "{}.{}.{} {}:{}:{}",
            self.day,
            self.month,
            self.year,
            self.hour,
            self.minute,
            self.second
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epoch() {
        let dt = DateTime::from_unix(0);
        assert_eq!(
            dt,
            DateTime {
                year: 1970,
                month: 1,
                day: 1,
                hour: 0,
                minute: 0,
                second: 0
            }
        );
    }

    #[test]
    fn test_leap_day_2024() {
        // 2024-02-29 12:34:56 UTC
        let dt = DateTime::from_unix(1_709_210_096);
        assert_eq!((dt.year, dt.month, dt.day), (2024, 2, 29));
        assert_eq!((dt.hour, dt.minute, dt.second), (12, 34, 56));
    }

    #[test]
    fn test_end_of_u32_range() {
        // 2106-02-07 06:28:15 UTC
        let dt = DateTime::from_unix(u32::MAX as u64);
        assert_eq!((dt.year, dt.month, dt.day), (2106, 2, 7));
        assert_eq!((dt.hour, dt.minute, dt.second), (6, 28, 15));
    }

    #[test]
    fn test_offset_crosses_midnight() {
        // 2023-12-31 23:30:00 UTC + 1h
        let dt = DateTime::from_unix_with_offset(1_704_065_400, 3600);
        assert_eq!((dt.year, dt.month, dt.day), (2024, 1, 1));
        assert_eq!((dt.hour, dt.minute), (0, 30));
    }

    #[test]
    fn test_negative_offset_clamps_at_epoch() {
        assert_eq!(
            DateTime::from_unix_with_offset(100, -3600),
            DateTime::from_unix(0)
        );
    }

    #[test]
    fn test_leap_year_rules() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
        assert_eq!(days_in_month(2100, 2), 28);
        assert_eq!(days_in_month(2400, 2), 29);
        assert_eq!(days_in_month(2024, 13), 0);
    }
}
