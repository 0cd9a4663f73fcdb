//! Home Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert Traits, Protokolle und die Zustandsautomaten
//! der einzelnen Geräte (LED-Server, Bewegungsmelder,
//! Wechselrichter-Bridge, Steckdose, Lichtsteuerung, UV-Box).

#![no_std]

pub mod automation;
pub mod boot;
pub mod calendar;
pub mod crc;
pub mod dimmer;
pub mod http;
pub mod inverter;
pub mod lights;
pub mod motion;
pub mod sntp;
pub mod socket;
pub mod status;
pub mod storage;
pub mod traits;
pub mod uvbox;

// Re-exports für einfachen Zugriff
pub use calendar::DateTime;
pub use crc::crc16_xmodem;
pub use dimmer::brightness_to_duty;
pub use traits::{
    ByteStore, DimmerOutput, InverterLink, LedError, ReportTransport, SmartLedWriter, StorageError,
};

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for LedError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            LedError::WriteFailed => defmt::write!(fmt, "LED write failed"),
            LedError::InvalidChannel => defmt::write!(fmt, "Invalid PWM channel"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StorageError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            StorageError::Full => defmt::write!(fmt, "Storage full"),
            StorageError::UnknownSlot => defmt::write!(fmt, "Unknown slot"),
            StorageError::SizeMismatch => defmt::write!(fmt, "Slot size mismatch"),
            StorageError::Io => defmt::write!(fmt, "Storage I/O error"),
        }
    }
}
