//! Steckdosen-Steuerung nach PV-Leistung
//!
//! Die Steckdose fragt zyklisch `/params` der Wechselrichter-Bridge ab
//! (rohe QPIGS-Antwort) und schaltet ihr Relais mit Hysterese.
//! Aus bleibt aus, bis die Einschaltbedingung erfüllt ist; an bleibt an,
//! bis die Ausschaltbedingung erfüllt ist.

/// QPIGS-Feld: Ausgangs-Wirkleistung (W)
const FIELD_ACTIVE_POWER: usize = 5;
/// QPIGS-Feld: PV-Eingangsspannung (V)
const FIELD_PV_VOLTAGE: usize = 13;
/// QPIGS-Feld: PV-Ladeleistung (W)
const FIELD_PV_POWER: usize = 19;

/// Ab dieser PV-Spannung wird immer eingeschaltet
pub const PV_FULL_SUN_VOLTS: u16 = 260;

/// Werte einer `/params`-Abfrage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PvReading {
    /// Ganze Volt (Nachkommastellen abgeschnitten)
    pub pv_voltage: u16,
    pub pv_power: u16,
    pub active_power: u16,
}

/// Ganzzahliger Anteil eines Feldes wie `0187` oder `250.5`
fn integer_field(field: &str) -> Option<u16> {
    let integer = field.split('.').next()?;
    if integer.is_empty() || !integer.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    integer.parse().ok()
}

/// Liest die benötigten Felder aus der `/params`-Antwort
///
/// Ein führendes `(` aus dem Rohframe wird toleriert.
pub fn parse_params(text: &str) -> Option<PvReading> {
    let text = text.trim().trim_start_matches('(');
    let field = |index: usize| text.split_ascii_whitespace().nth(index).and_then(integer_field);

    Some(PvReading {
        pv_voltage: field(FIELD_PV_VOLTAGE)?,
        pv_power: field(FIELD_PV_POWER)?,
        active_power: field(FIELD_ACTIVE_POWER)?,
    })
}

/// Schaltverhalten der Steckdose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchMode {
    /// Verbraucher für Überschuss: ein ab 260 V oder über 120 V mit mehr
    /// als 10 W, aus unter 260 V bei weniger als 10 W
    Surplus,
    /// Großverbraucher: ein ab 260 V, aus sobald die PV-Leistung mehr als
    /// 100 W unter der Ausgangsleistung liegt
    HighPower,
}

impl SwitchMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            SwitchMode::Surplus => "surplus",
            SwitchMode::HighPower => "high-power",
        }
    }

    pub fn should_switch_on(self, reading: &PvReading) -> bool {
        match self {
            SwitchMode::Surplus => {
                reading.pv_voltage >= PV_FULL_SUN_VOLTS
                    || (reading.pv_voltage > 120 && reading.pv_power > 10)
            }
            SwitchMode::HighPower => reading.pv_voltage >= PV_FULL_SUN_VOLTS,
        }
    }

    pub fn should_switch_off(self, reading: &PvReading) -> bool {
        match self {
            SwitchMode::Surplus => reading.pv_voltage < PV_FULL_SUN_VOLTS && reading.pv_power < 10,
            SwitchMode::HighPower => reading.pv_power < reading.active_power.saturating_sub(100),
        }
    }
}

/// Warum die letzte Abfrage keine Messung geliefert hat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollError {
    /// Bridge nicht erreichbar oder Fehlerstatus
    Unreachable,
    /// Antwort ohne verwertbare Felder
    Malformed,
    /// Eigenes WLAN getrennt
    ConnectionLost,
}

impl PollError {
    pub const fn as_str(self) -> &'static str {
        match self {
            PollError::Unreachable => "Unable to connect",
            PollError::Malformed => "Invalid params",
            PollError::ConnectionLost => "Connection lost",
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PollError {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.as_str())
    }
}

/// Relais der Steckdose
pub trait SwitchOutput {
    fn set(&mut self, on: bool);
}

pub struct SocketController<O: SwitchOutput> {
    mode: SwitchMode,
    output: O,
    is_on: bool,
    reading: Option<PvReading>,
    error: Option<PollError>,
}

impl<O: SwitchOutput> SocketController<O> {
    /// Startet ausgeschaltet
    pub fn new(mode: SwitchMode, mut output: O) -> Self {
        output.set(false);
        Self {
            mode,
            output,
            is_on: false,
            reading: None,
            error: None,
        }
    }

    fn switch(&mut self, on: bool) -> bool {
        if on == self.is_on {
            return false;
        }
        self.is_on = on;
        self.output.set(on);
        true
    }

    /// `GET /on`, `GET /off`; die nächste Messung kann wieder umschalten
    pub fn set_manual(&mut self, on: bool) -> bool {
        self.switch(on)
    }

    /// Neue Messung, gibt zurück ob umgeschaltet wurde
    pub fn on_reading(&mut self, reading: PvReading) -> bool {
        self.reading = Some(reading);
        self.error = None;

        if self.is_on {
            self.mode.should_switch_off(&reading) && self.switch(false)
        } else {
            self.mode.should_switch_on(&reading) && self.switch(true)
        }
    }

    /// Fehlgeschlagene Abfrage, gibt zurück ob umgeschaltet wurde
    ///
    /// Ohne WLAN schaltet jede Steckdose ab, ohne Messwerte nur der
    /// Großverbraucher.
    pub fn on_error(&mut self, error: PollError) -> bool {
        self.error = Some(error);
        match (error, self.mode) {
            (PollError::ConnectionLost, _) | (_, SwitchMode::HighPower) => self.switch(false),
            _ => false,
        }
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }

    pub fn mode(&self) -> SwitchMode {
        self.mode
    }

    pub fn last_reading(&self) -> Option<PvReading> {
        self.reading
    }

    /// Text für die Statusseite
    pub fn status(&self) -> &'static str {
        match self.error {
            Some(error) => error.as_str(),
            None if self.is_on => "OK",
            None => "low pv input",
        }
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_field() {
        assert_eq!(integer_field("250.5"), Some(250));
        assert_eq!(integer_field("0187"), Some(187));
        assert_eq!(integer_field("-12"), None);
        assert_eq!(integer_field(".5"), None);
    }

    #[test]
    fn test_high_power_off_threshold_saturates() {
        let reading = PvReading {
            pv_voltage: 200,
            pv_power: 0,
            active_power: 60,
        };
        assert!(!SwitchMode::HighPower.should_switch_off(&reading));
    }
}
