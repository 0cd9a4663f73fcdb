//! Wechselrichter-Protokoll (Voltronic/Axpert-kompatibel)
//!
//! ASCII-Befehle mit CRC16 und `\r`, Antworten der Form `(<daten><crc>\r`.
//! Die Felder einer Antwort sind durch Leerzeichen getrennt und werden
//! über feste Positionen ausgewertet.

mod client;
mod command;
mod response;

pub use client::{EnergyStatistics, Inverter, RESPONSE_BUFFER_SIZE};
pub use command::{Command, EnergyPeriod, HELLO_SEQUENCE, MAX_FRAME_LEN, OutputPriority};
pub use response::{
    FRAME_END, FrameAssembler, GeneralStatus, is_ack, parse_energy, parse_frame,
    parse_output_priority,
};

/// Fehler-Typ für Wechselrichter-Kommunikation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InverterError {
    /// Serielle Schnittstelle meldet Fehler
    Io,
    /// Keine (vollständige) Antwort innerhalb der Wartezeit
    Timeout,
    /// Antwort länger als der Empfangspuffer
    Overflow,
    /// CRC der Antwort stimmt nicht
    Crc,
    /// Antwort passt nicht zum erwarteten Format
    Malformed,
    /// Wechselrichter hat den Befehl abgelehnt
    Nak,
}

#[cfg(feature = "defmt")]
impl defmt::Format for InverterError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            InverterError::Io => defmt::write!(fmt, "Serial I/O error"),
            InverterError::Timeout => defmt::write!(fmt, "Response timeout"),
            InverterError::Overflow => defmt::write!(fmt, "Response too long"),
            InverterError::Crc => defmt::write!(fmt, "CRC mismatch"),
            InverterError::Malformed => defmt::write!(fmt, "Malformed response"),
            InverterError::Nak => defmt::write!(fmt, "NAK"),
        }
    }
}
