//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware-Zugriff
//! ohne konkrete Implementierung.

use rgb::RGB8;

use crate::inverter::InverterError;
use crate::motion::{MotionReport, ReportError};

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedError {
    WriteFailed,
    InvalidChannel,
}

/// Trait für SmartLED Hardware-Zugriff
///
/// Abstrahiert den Zugriff auf RGB LEDs (WS2812/Neopixel).
///
/// # Implementierungen
/// - **Production:** RmtLedWriter (ESP32 RMT Peripheral)
/// - **Testing:** MockLedWriter (in-memory Mock)
pub trait SmartLedWriter: Send {
    /// Schreibt eine RGB-Farbe auf die LED
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn write(&mut self, color: RGB8) -> Result<(), LedError>;
}

/// Trait für PWM-gedimmte LED-Streifen
///
/// Ein Kanal entspricht einem Ausgang (GPIO) des LEDC-Peripherals.
pub trait DimmerOutput {
    /// Maximaler Duty-Wert (13 Bit → 8191)
    fn max_duty(&self) -> u32;

    /// Setzt den Duty-Wert eines Kanals
    ///
    /// Gibt `LedError::InvalidChannel` zurück wenn der Kanal nicht existiert.
    fn set_duty(&mut self, channel: usize, duty: u32) -> Result<(), LedError>;
}

/// Fehler-Typ für Byte-Speicher (EEPROM)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Speicher-Kapazität erschöpft
    Full,
    /// Slot wurde nie registriert
    UnknownSlot,
    /// Datenlänge passt nicht zum Slot
    SizeMismatch,
    /// Hardware-Zugriff fehlgeschlagen
    Io,
}

/// Trait für adressierbaren Byte-Speicher
///
/// # Implementierungen
/// - **Production:** I²C EEPROM (24Cxx)
/// - **Testing:** RAM-Array
pub trait ByteStore {
    fn read(&mut self, addr: u16, buf: &mut [u8]) -> Result<(), StorageError>;
    fn write(&mut self, addr: u16, data: &[u8]) -> Result<(), StorageError>;
}

/// Serielle Verbindung zum Wechselrichter
///
/// `read_frame` liest bis einschließlich `\r` und liefert die Anzahl Bytes.
/// Die Firmware-Implementierung bricht nach einem Timeout mit
/// `InverterError::Timeout` ab.
#[allow(async_fn_in_trait)]
pub trait InverterLink {
    async fn write_all(&mut self, data: &[u8]) -> Result<(), InverterError>;
    async fn read_frame(&mut self, buf: &mut [u8]) -> Result<usize, InverterError>;
}

/// Transport für Bewegungsmeldungen an den LED-Server
#[allow(async_fn_in_trait)]
pub trait ReportTransport {
    /// Sendet eine Meldung; ein Fehler führt zu einem neuen Versuch
    async fn send(&mut self, report: &MotionReport) -> Result<(), ReportError>;

    /// Wartet zwischen zwei Versuchen
    async fn pause(&mut self, delay_ms: u32);
}
