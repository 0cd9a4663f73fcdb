//! CRC16 für das Wechselrichter-Protokoll
//!
//! CRC-16/XMODEM: Polynom 0x1021, Startwert 0, keine Reflexion.

/// Berechnet CRC-16/XMODEM über die Bytes
///
/// # Beispiele
///
/// ```
/// # use home_core::crc16_xmodem;
/// assert_eq!(crc16_xmodem(b"QPIGS"), 0xB7A9);
/// ```
pub fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// CRC-Bytes wie sie auf der Leitung stehen (High-Byte zuerst)
///
/// Die Steuerzeichen `(`, `\r` und `\n` dürfen im Frame nicht als
/// CRC-Byte auftauchen; der Wechselrichter erhöht sie dann um eins.
pub fn frame_crc(payload: &[u8]) -> [u8; 2] {
    let [hi, lo] = crc16_xmodem(payload).to_be_bytes();
    [escape_crc_byte(hi), escape_crc_byte(lo)]
}

fn escape_crc_byte(byte: u8) -> u8 {
    match byte {
        b'(' | b'\r' | b'\n' => byte + 1,
        other => other,
    }
}
