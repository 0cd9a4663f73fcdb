// Antworten des Wechselrichters auswerten

use super::InverterError;
use super::command::OutputPriority;
use crate::crc::frame_crc;

/// Entfernt `(`, CRC und `\r` und liefert den Datenteil
///
/// Einige Firmware-Stände senden keine CRC; endet der Frame auf zwei
/// druckbaren Zeichen, die nicht als CRC passen, wird er ohne CRC
/// akzeptiert. `NAK` wird als Fehler gemeldet.
pub fn parse_frame(raw: &[u8]) -> Result<&str, InverterError> {
    let body = match raw {
        [body @ .., b'\r'] => body,
        _ => return Err(InverterError::Malformed),
    };
    if body.first() != Some(&b'(') {
        return Err(InverterError::Malformed);
    }

    let data = match body.len() {
        n if n >= 3 && frame_crc(&body[..n - 2]) == body[n - 2..] => &body[1..n - 2],
        n if n >= 3 && !body[n - 2..].iter().all(|b| (0x20..0x7F).contains(b)) => {
            return Err(InverterError::Crc);
        }
        _ => &body[1..],
    };

    let text = core::str::from_utf8(data).map_err(|_| InverterError::Malformed)?;
    if text == "NAK" {
        return Err(InverterError::Nak);
    }
    Ok(text)
}

/// Ende eines Frames
pub const FRAME_END: u8 = b'\r';

/// Sammelt stückweise empfangene Bytes bis einschließlich `\r`
///
/// Die Bytes liegen im Puffer des Aufrufers; `push` meldet, wie viele
/// neue Bytes hinter `filled()` eingetroffen sind.
#[derive(Debug, Default)]
pub struct FrameAssembler {
    len: usize,
}

impl FrameAssembler {
    pub const fn new() -> Self {
        Self { len: 0 }
    }

    /// Bereits belegte Bytes; hier schreibt der nächste Lesevorgang hin
    pub fn filled(&self) -> usize {
        self.len
    }

    /// Gibt die Frame-Länge zurück, sobald `\r` empfangen wurde
    ///
    /// Ein voller Puffer ohne `\r` ergibt `InverterError::Overflow`.
    pub fn push(&mut self, buf: &[u8], received: usize) -> Result<Option<usize>, InverterError> {
        let start = self.len;
        self.len = (start + received).min(buf.len());

        if let Some(pos) = buf[start..self.len].iter().position(|&b| b == FRAME_END) {
            return Ok(Some(start + pos + 1));
        }
        if self.len == buf.len() {
            return Err(InverterError::Overflow);
        }
        Ok(None)
    }
}

/// Bestätigung eines Setz-Befehls
pub fn is_ack(data: &str) -> bool {
    data == "ACK"
}

/// Energiewert (Wh) aus QET/QEY/QEM/QED
///
/// Ausgewertet werden die ersten acht Ziffern.
pub fn parse_energy(data: &str) -> Result<u32, InverterError> {
    let digits = data.get(..8).unwrap_or(data);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(InverterError::Malformed);
    }
    digits.parse().map_err(|_| InverterError::Malformed)
}

/// Ausgangs-Priorität aus der QPIRI-Antwort (Feld 16)
pub fn parse_output_priority(data: &str) -> Result<OutputPriority, InverterError> {
    data.split(' ')
        .nth(16)
        .and_then(|field| field.parse::<u8>().ok())
        .and_then(OutputPriority::from_code)
        .ok_or(InverterError::Malformed)
}

/// Allgemeiner Status aus der QPIGS-Antwort
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeneralStatus {
    pub grid_voltage: f32,
    pub grid_frequency: f32,
    pub ac_output_voltage: f32,
    pub ac_output_frequency: f32,
    pub ac_output_apparent_power: u16,
    pub ac_output_active_power: u16,
    pub output_load_percent: u16,
    pub bus_voltage: u16,
    pub battery_voltage: f32,
    pub battery_charging_current: u16,
    pub battery_capacity: u16,
    pub heat_sink_temperature: i16,
    pub pv_input_current: f32,
    pub pv_input_voltage: f32,
    pub scc_battery_voltage: f32,
    pub battery_discharge_current: u16,
    /// Statusbits b7..b0 (Feld 16, acht Zeichen `0`/`1`)
    pub device_status: u8,
    /// PV-Ladeleistung (Feld 19, nicht bei allen Geräten vorhanden)
    pub pv_charging_power: u16,
}

/// Anzahl Pflichtfelder der QPIGS-Antwort
const QPIGS_REQUIRED_FIELDS: usize = 17;
const QPIGS_MAX_FIELDS: usize = 21;

impl GeneralStatus {
    pub fn parse(data: &str) -> Result<Self, InverterError> {
        let mut fields: [&str; QPIGS_MAX_FIELDS] = [""; QPIGS_MAX_FIELDS];
        let mut count = 0;
        for (slot, field) in fields.iter_mut().zip(data.split(' ')) {
            *slot = field;
            count += 1;
        }
        if count < QPIGS_REQUIRED_FIELDS {
            return Err(InverterError::Malformed);
        }

        Ok(Self {
            grid_voltage: num(fields[0])?,
            grid_frequency: num(fields[1])?,
            ac_output_voltage: num(fields[2])?,
            ac_output_frequency: num(fields[3])?,
            ac_output_apparent_power: num(fields[4])?,
            ac_output_active_power: num(fields[5])?,
            output_load_percent: num(fields[6])?,
            bus_voltage: num(fields[7])?,
            battery_voltage: num(fields[8])?,
            battery_charging_current: num(fields[9])?,
            battery_capacity: num(fields[10])?,
            heat_sink_temperature: num(fields[11])?,
            pv_input_current: num(fields[12])?,
            pv_input_voltage: num(fields[13])?,
            scc_battery_voltage: num(fields[14])?,
            battery_discharge_current: num(fields[15])?,
            device_status: u8::from_str_radix(fields[16], 2)
                .map_err(|_| InverterError::Malformed)?,
            pv_charging_power: num(fields[19]).unwrap_or(0),
        })
    }

    /// Batterie wird gerade geladen (Statusbit b2)
    pub fn is_charging(&self) -> bool {
        self.device_status & 0b0000_0100 != 0
    }
}

fn num<T: core::str::FromStr>(field: &str) -> Result<T, InverterError> {
    field.parse().map_err(|_| InverterError::Malformed)
}
