//! SNTP (RFC 4330) Client-Paket und Zeitbasis
//!
//! Nur das Nötigste: Anfrage bauen, Transmit-Timestamp auslesen.

use crate::calendar::DateTime;

/// Größe eines SNTP-Pakets ohne Extensions
pub const SNTP_PACKET_LEN: usize = 48;

/// Standard-Port des NTP-Servers
pub const SNTP_PORT: u16 = 123;

/// Sekunden zwischen 1900-01-01 (NTP) und 1970-01-01 (Unix)
pub const NTP_UNIX_OFFSET: u64 = 2_208_988_800;

/// Offset des Transmit-Timestamps (Sekunden-Anteil) im Paket
const TRANSMIT_TIMESTAMP_OFFSET: usize = 40;

const MODE_CLIENT: u8 = 3;
const MODE_SERVER: u8 = 4;
const VERSION: u8 = 4;

/// Fehler beim Auswerten einer SNTP-Antwort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SntpError {
    /// Paket kürzer als 48 Bytes
    Truncated,
    /// Antwort stammt nicht von einem Server
    NotServer,
    /// Stratum 0: Server verweigert Auskunft
    KissOfDeath,
    /// Server hat keinen Zeitstempel gesetzt
    NoTime,
}

#[cfg(feature = "defmt")]
impl defmt::Format for SntpError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            SntpError::Truncated => defmt::write!(fmt, "Packet truncated"),
            SntpError::NotServer => defmt::write!(fmt, "Not a server response"),
            SntpError::KissOfDeath => defmt::write!(fmt, "Kiss-o'-Death"),
            SntpError::NoTime => defmt::write!(fmt, "No transmit timestamp"),
        }
    }
}

/// Baut eine Client-Anfrage (LI=0, VN=4, Mode=3)
pub fn build_request() -> [u8; SNTP_PACKET_LEN] {
    let mut packet = [0u8; SNTP_PACKET_LEN];
    packet[0] = (VERSION << 3) | MODE_CLIENT;
    packet
}

/// Liest die Serverzeit als Unix-Sekunden
///
/// Zeitstempel ab Februar 2036 (NTP-Ära 1) werden korrekt fortgesetzt.
pub fn parse_response(packet: &[u8]) -> Result<u64, SntpError> {
    if packet.len() < SNTP_PACKET_LEN {
        return Err(SntpError::Truncated);
    }
    if packet[0] & 0x07 != MODE_SERVER {
        return Err(SntpError::NotServer);
    }
    if packet[1] == 0 {
        return Err(SntpError::KissOfDeath);
    }

    let mut secs = [0u8; 4];
    secs.copy_from_slice(&packet[TRANSMIT_TIMESTAMP_OFFSET..TRANSMIT_TIMESTAMP_OFFSET + 4]);
    let ntp_secs = u32::from_be_bytes(secs) as u64;
    if ntp_secs == 0 {
        return Err(SntpError::NoTime);
    }

    if ntp_secs >= NTP_UNIX_OFFSET {
        Ok(ntp_secs - NTP_UNIX_OFFSET)
    } else {
        Ok(ntp_secs + (1u64 << 32) - NTP_UNIX_OFFSET)
    }
}

/// Verknüpft eine Unix-Zeit mit der Laufzeit seit Boot
///
/// Zwischen zwei Synchronisationen läuft die Uhr mit dem
/// monotonen Timer weiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBase {
    unix_secs: u64,
    uptime_ms: u64,
}

impl TimeBase {
    pub const fn new(unix_secs: u64, uptime_ms: u64) -> Self {
        Self {
            unix_secs,
            uptime_ms,
        }
    }

    /// Aktuelle Unix-Sekunden für die gegebene Laufzeit
    pub fn unix_now(&self, uptime_ms: u64) -> u64 {
        self.unix_secs + uptime_ms.saturating_sub(self.uptime_ms) / 1000
    }

    /// Aktuelle Ortszeit mit festem Offset
    pub fn local_now(&self, uptime_ms: u64, offset_secs: i32) -> DateTime {
        DateTime::from_unix_with_offset(self.unix_now(uptime_ms), offset_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_packet(ntp_secs: u32) -> [u8; SNTP_PACKET_LEN] {
        let mut packet = [0u8; SNTP_PACKET_LEN];
        packet[0] = (VERSION << 3) | MODE_SERVER;
        packet[1] = 2;
        packet[40..44].copy_from_slice(&ntp_secs.to_be_bytes());
        packet
    }

    #[test]
    fn test_request_header() {
        let request = build_request();
        assert_eq!(request[0], 0x23);
        assert!(request[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_parse_server_time() {
        // 2024-01-01 00:00:00 UTC
        let packet = server_packet((1_704_067_200 + NTP_UNIX_OFFSET) as u32);
        assert_eq!(parse_response(&packet), Ok(1_704_067_200));
    }

    #[test]
    fn test_parse_era_rollover() {
        // 2036-02-07 06:28:16 UTC ist NTP-Sekunde 0 der Ära 1
        let packet = server_packet(1);
        assert_eq!(parse_response(&packet), Ok(2_085_978_497));
    }

    #[test]
    fn test_reject_invalid_packets() {
        assert_eq!(parse_response(&[0u8; 12]), Err(SntpError::Truncated));

        let mut packet = server_packet(1000);
        packet[0] = 0x23;
        assert_eq!(parse_response(&packet), Err(SntpError::NotServer));

        let mut packet = server_packet(1000);
        packet[1] = 0;
        assert_eq!(parse_response(&packet), Err(SntpError::KissOfDeath));

        assert_eq!(parse_response(&server_packet(0)), Err(SntpError::NoTime));
    }

    #[test]
    fn test_time_base_advances_with_uptime() {
        let base = TimeBase::new(1_000, 5_000);
        assert_eq!(base.unix_now(5_000), 1_000);
        assert_eq!(base.unix_now(65_999), 1_060);
        assert_eq!(base.unix_now(1_000), 1_000);
    }
}
