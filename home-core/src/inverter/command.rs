// Befehle an den Wechselrichter und ihre Kodierung

use core::fmt::Write;

use heapless::{String, Vec};

use crate::calendar::{DateTime, days_in_month};
use crate::crc::frame_crc;

/// Längster Frame: `QEDyyyymmdd` + 2 CRC-Bytes + `\r`
pub const MAX_FRAME_LEN: usize = 16;

/// Wird vor jeder Abfrage gesendet, Antworten werden verworfen
pub const HELLO_SEQUENCE: [Command; 3] = [Command::Qpi, Command::Qmn, Command::Qid];

/// Ausgangs-Priorität (QPIRI Feld 16 / Befehl POPxx)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputPriority {
    /// Netz zuerst
    Utility,
    /// Solar → Netz → Batterie ("SUB")
    SolarFirst,
    /// Solar → Batterie → Netz ("SBU")
    Sbu,
}

impl OutputPriority {
    pub const fn code(self) -> u8 {
        match self {
            OutputPriority::Utility => 0,
            OutputPriority::SolarFirst => 1,
            OutputPriority::Sbu => 2,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(OutputPriority::Utility),
            1 => Some(OutputPriority::SolarFirst),
            2 => Some(OutputPriority::Sbu),
            _ => None,
        }
    }

    /// Bezeichnung für die HTTP-API
    pub const fn label(self) -> &'static str {
        match self {
            OutputPriority::Utility => "utility",
            OutputPriority::SolarFirst => "sub",
            OutputPriority::Sbu => "sbu",
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for OutputPriority {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.label())
    }
}

/// Zeitraum einer Energie-Abfrage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyPeriod {
    Total,
    Year(u16),
    Month { year: u16, month: u8 },
    Day { year: u16, month: u8, day: u8 },
}

impl EnergyPeriod {
    /// Parst `yyyy`, `yyyymm` oder `yyyymmdd`
    ///
    /// Monat und Tag werden gegen den Kalender geprüft.
    pub fn parse_compact(digits: &str) -> Option<Self> {
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let year: u16 = digits.get(0..4)?.parse().ok()?;
        let period = match digits.len() {
            4 => EnergyPeriod::Year(year),
            6 => EnergyPeriod::Month {
                year,
                month: digits[4..6].parse().ok()?,
            },
            8 => EnergyPeriod::Day {
                year,
                month: digits[4..6].parse().ok()?,
                day: digits[6..8].parse().ok()?,
            },
            _ => return None,
        };

        match period {
            EnergyPeriod::Month { month, .. } if !(1..=12).contains(&month) => None,
            EnergyPeriod::Day { year, month, day }
                if day == 0 || day > days_in_month(year, month) =>
            {
                None
            }
            valid => Some(valid),
        }
    }

    pub const fn command(self) -> Command {
        match self {
            EnergyPeriod::Total => Command::Qet,
            EnergyPeriod::Year(year) => Command::Qey { year },
            EnergyPeriod::Month { year, month } => Command::Qem { year, month },
            EnergyPeriod::Day { year, month, day } => Command::Qed { year, month, day },
        }
    }

    /// Jahr, Monat und Tag des Zeitpunkts
    pub fn of_date(date: &DateTime) -> [EnergyPeriod; 3] {
        [
            EnergyPeriod::Year(date.year),
            EnergyPeriod::Month {
                year: date.year,
                month: date.month,
            },
            EnergyPeriod::Day {
                year: date.year,
                month: date.month,
                day: date.day,
            },
        ]
    }
}

/// Befehl an den Wechselrichter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Protokoll-ID
    Qpi,
    /// Modellname
    Qmn,
    /// Seriennummer
    Qid,
    /// Allgemeiner Status (Spannungen, Leistungen, Batterie)
    Qpigs,
    /// Nennwerte und Einstellungen
    Qpiri,
    /// Erzeugte Energie gesamt
    Qet,
    Qey { year: u16 },
    Qem { year: u16, month: u8 },
    Qed { year: u16, month: u8, day: u8 },
    SetOutputPriority(OutputPriority),
}

impl Command {
    /// ASCII-Befehl ohne CRC und `\r`
    pub fn payload(&self) -> String<12> {
        let mut text = String::new();
        // Kapazität reicht für QEDyyyymmdd, Jahre sind vierstellig
        let _ = match *self {
            Command::Qpi => text.write_str("QPI"),
            Command::Qmn => text.write_str("QMN"),
            Command::Qid => text.write_str("QID"),
            Command::Qpigs => text.write_str("QPIGS"),
            Command::Qpiri => text.write_str("QPIRI"),
            Command::Qet => text.write_str("QET"),
            Command::Qey { year } => write!(text, "QEY{:04}", year % 10_000),
            Command::Qem { year, month } => write!(text, "QEM{:04}{:02}", year % 10_000, month),
            Command::Qed { year, month, day } => {
                write!(text, "QED{:04}{:02}{:02}", year % 10_000, month, day)
            }
            Command::SetOutputPriority(priority) => write!(text, "POP{:02}", priority.code()),
        };
        text
    }

    /// Kompletter Frame: Befehl + CRC (High-Byte zuerst) + `\r`
    pub fn encode(&self) -> Vec<u8, MAX_FRAME_LEN> {
        let payload = self.payload();
        let mut frame = Vec::new();
        let _ = frame.extend_from_slice(payload.as_bytes());
        let _ = frame.extend_from_slice(&frame_crc(payload.as_bytes()));
        let _ = frame.push(b'\r');
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_qpigs_matches_known_frame() {
        assert_eq!(
            Command::Qpigs.encode().as_slice(),
            &[0x51, 0x50, 0x49, 0x47, 0x53, 0xB7, 0xA9, 0x0D]
        );
    }

    #[test]
    fn test_hello_frames() {
        assert_eq!(Command::Qpi.encode().as_slice(), &[0x51, 0x50, 0x49, 0xBE, 0xAC, 0x0D]);
        assert_eq!(Command::Qmn.encode().as_slice(), &[0x51, 0x4D, 0x4E, 0xBB, 0x64, 0x0D]);
        assert_eq!(Command::Qid.encode().as_slice(), &[0x51, 0x49, 0x44, 0xD6, 0xEA, 0x0D]);
    }

    #[test]
    fn test_date_queries_zero_padded() {
        assert_eq!(Command::Qem { year: 2024, month: 1 }.payload().as_str(), "QEM202401");
        assert_eq!(
            Command::Qed {
                year: 2024,
                month: 1,
                day: 5
            }
            .payload()
            .as_str(),
            "QED20240105"
        );
    }

    #[test]
    fn test_date_query_crc() {
        let frame = Command::Qed {
            year: 2024,
            month: 1,
            day: 15,
        }
        .encode();
        assert_eq!(&frame[..11], b"QED20240115");
        assert_eq!(&frame[11..], &[0x85, 0x00, 0x0D]);
    }

    #[test]
    fn test_output_priority_command() {
        assert_eq!(
            Command::SetOutputPriority(OutputPriority::Sbu).payload().as_str(),
            "POP02"
        );
        // CRC 0xE20A: das Low-Byte 0x0A wird zu 0x0B
        assert_eq!(
            &Command::SetOutputPriority(OutputPriority::Sbu).encode()[5..],
            &[0xE2, 0x0B, 0x0D]
        );
    }

    #[test]
    fn test_parse_compact_period() {
        assert_eq!(EnergyPeriod::parse_compact("2024"), Some(EnergyPeriod::Year(2024)));
        assert_eq!(
            EnergyPeriod::parse_compact("202402"),
            Some(EnergyPeriod::Month {
                year: 2024,
                month: 2
            })
        );
        assert_eq!(
            EnergyPeriod::parse_compact("20240229"),
            Some(EnergyPeriod::Day {
                year: 2024,
                month: 2,
                day: 29
            })
        );
        assert_eq!(EnergyPeriod::parse_compact("20230229"), None);
        assert_eq!(EnergyPeriod::parse_compact("202413"), None);
        assert_eq!(EnergyPeriod::parse_compact("2024-1"), None);
        assert_eq!(EnergyPeriod::parse_compact("20241"), None);
    }
}
