// JSON-Protokoll der HTTP-APIs
// LED-Server, Wechselrichter, Steckdose, Bewegungsmelder und Lichtsteuerung

use heapless::{String, Vec};
use home_core::automation::{AutomationSettings, MAX_ITEMS};
use home_core::inverter::{EnergyStatistics, GeneralStatus};
use home_core::lights::{Light, MAX_LIGHTS};
use home_core::motion::{MotionEvent, MotionStatus, ReportOutcome};
use home_core::socket::{PvReading, SocketController, SwitchOutput};
use serde::{Deserialize, Serialize};

// ============================================================================
// LED-Server
// ============================================================================

/// `POST /api/control`
///
/// Item wahlweise über Namen oder Index; `item` hat Vorrang.
/// `state` ist `"on"`/`"off"` oder `true`/`false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlRequest {
    pub item: Option<String<32>>,
    pub item_index: Option<usize>,
    pub on: bool,
    pub brightness: Option<u8>,
}

/// Rohform von `ControlRequest`, `S` ist der JSON-Typ von `state`
#[derive(Deserialize)]
struct ControlFields<S> {
    #[serde(default)]
    item: Option<String<32>>,
    #[serde(default)]
    item_index: Option<usize>,
    state: S,
    #[serde(default)]
    brightness: Option<u8>,
}

impl<S> ControlFields<S> {
    fn into_request(self, on: bool) -> ControlRequest {
        ControlRequest {
            item: self.item,
            item_index: self.item_index,
            on,
            brightness: self.brightness,
        }
    }
}

fn switch_state(state: &str) -> Option<bool> {
    match state {
        "on" => Some(true),
        "off" => Some(false),
        _ => None,
    }
}

impl ControlRequest {
    /// Liest den Request-Body
    ///
    /// serde-json-core kennt kein `deserialize_any`, deshalb wird erst mit
    /// Bool und dann mit Text für `state` gelesen.
    pub fn from_json(body: &[u8]) -> Option<Self> {
        if let Ok((fields, _)) = serde_json_core::from_slice::<ControlFields<bool>>(body) {
            let on = fields.state;
            return Some(fields.into_request(on));
        }

        let (fields, _) = serde_json_core::from_slice::<ControlFields<String<8>>>(body).ok()?;
        let on = switch_state(&fields.state)?;
        Some(fields.into_request(on))
    }
}

/// `POST /api/motionSensor`
///
/// `state` ist `true`/`false` oder eine Zahl (ungleich 0 = Bewegung).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotionRequest {
    pub sensor: String<32>,
    pub detected: bool,
}

#[derive(Deserialize)]
struct MotionFields<S> {
    sensor: String<32>,
    state: S,
}

impl MotionRequest {
    pub fn from_json(body: &[u8]) -> Option<Self> {
        if let Ok((fields, _)) = serde_json_core::from_slice::<MotionFields<bool>>(body) {
            return Some(Self {
                sensor: fields.sensor,
                detected: fields.state,
            });
        }

        let (fields, _) = serde_json_core::from_slice::<MotionFields<i64>>(body).ok()?;
        Some(Self {
            sensor: fields.sensor,
            detected: fields.state != 0,
        })
    }
}

/// Ein Eintrag in `GET /api/status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemStatus {
    pub name: &'static str,
    pub is_on: bool,
    pub brightness: u8,
    pub control_mode: &'static str,
}

/// `GET /api/status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusResponse {
    pub items: Vec<ItemStatus, MAX_ITEMS>,
}

/// `GET`/`POST /api/settings`
///
/// Beim Schreiben sind alle Felder optional, fehlende Werte bleiben
/// unverändert. `brightness` enthält einen Wert pro Item.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SettingsBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_timer: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_timer: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fade_timer: Option<u32>,
    #[serde(default)]
    pub brightness: Vec<u8, MAX_ITEMS>,
}

impl SettingsBody {
    pub fn from_settings(settings: &AutomationSettings, item_count: usize) -> Self {
        let mut brightness = Vec::new();
        for value in settings.item_brightness.iter().take(item_count) {
            let _ = brightness.push(*value);
        }
        Self {
            auto_timer: Some(settings.automation_timer_secs),
            manual_timer: Some(settings.manual_override_hours),
            fade_timer: Some(settings.fade_duration_secs),
            brightness,
        }
    }

    /// Überträgt die gesetzten Felder auf bestehende Einstellungen
    pub fn apply_to(&self, mut settings: AutomationSettings) -> AutomationSettings {
        if let Some(secs) = self.auto_timer {
            settings.automation_timer_secs = secs;
        }
        if let Some(hours) = self.manual_timer {
            settings.manual_override_hours = hours;
        }
        if let Some(secs) = self.fade_timer {
            settings.fade_duration_secs = secs;
        }
        for (target, value) in settings.item_brightness.iter_mut().zip(self.brightness.iter()) {
            *target = *value;
        }
        settings
    }
}

// ============================================================================
// Wechselrichter
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PvParams {
    pub voltage: f32,
    pub amp: f32,
    pub watt: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatteryParams {
    pub voltage: f32,
    pub discharge: u16,
    pub charging: u16,
    pub soc: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AcParams {
    pub voltage: f32,
    pub hz: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PowerParams {
    pub apparent: u16,
    pub active: u16,
}

/// `GET /api/params`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParamsResponse {
    pub pv: PvParams,
    pub acu: BatteryParams,
    pub load: u16,
    pub ac: AcParams,
    pub ac_out: AcParams,
    pub power: PowerParams,
    pub temp: i16,
    pub v_bus: u16,
}

impl From<&GeneralStatus> for ParamsResponse {
    fn from(status: &GeneralStatus) -> Self {
        Self {
            pv: PvParams {
                voltage: status.pv_input_voltage,
                amp: status.pv_input_current,
                watt: status.pv_charging_power,
            },
            acu: BatteryParams {
                voltage: status.battery_voltage,
                discharge: status.battery_discharge_current,
                charging: status.battery_charging_current,
                soc: status.battery_capacity,
            },
            load: status.output_load_percent,
            ac: AcParams {
                voltage: status.grid_voltage,
                hz: status.grid_frequency,
            },
            ac_out: AcParams {
                voltage: status.ac_output_voltage,
                hz: status.ac_output_frequency,
            },
            power: PowerParams {
                apparent: status.ac_output_apparent_power,
                active: status.ac_output_active_power,
            },
            temp: status.heat_sink_temperature,
            v_bus: status.bus_voltage,
        }
    }
}

/// `GET /api/stats`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsResponse {
    pub year: u32,
    pub month: u32,
    pub day: u32,
    pub total: u32,
}

impl From<&EnergyStatistics> for StatsResponse {
    fn from(stats: &EnergyStatistics) -> Self {
        Self {
            year: stats.year,
            month: stats.month,
            day: stats.day,
            total: stats.total,
        }
    }
}

/// `GET /api/qem/<yyyymm>`, `GET /api/qed/<yyyymmdd>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnergyValue {
    pub value: u32,
}

// ============================================================================
// Steckdose
// ============================================================================

/// `GET /api/status` der Steckdose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SocketStatusResponse {
    pub name: &'static str,
    pub is_on: bool,
    pub mode: &'static str,
    pub status: &'static str,
    pub reading: Option<ReadingValue>,
}

/// Letzte Messung der Wechselrichter-Bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReadingValue {
    pub pv_voltage: u16,
    pub pv_power: u16,
    pub active_power: u16,
}

impl From<PvReading> for ReadingValue {
    fn from(reading: PvReading) -> Self {
        Self {
            pv_voltage: reading.pv_voltage,
            pv_power: reading.pv_power,
            active_power: reading.active_power,
        }
    }
}

impl SocketStatusResponse {
    pub fn new<O: SwitchOutput>(name: &'static str, socket: &SocketController<O>) -> Self {
        Self {
            name,
            is_on: socket.is_on(),
            mode: socket.mode().as_str(),
            status: socket.status(),
            reading: socket.last_reading().map(ReadingValue::from),
        }
    }
}

// ============================================================================
// Bewegungsmelder
// ============================================================================

/// Ergebnis der letzten Meldung an den LED-Server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportValue {
    pub event: &'static str,
    pub delivered: bool,
    /// Anzahl Versuche bei Erfolg
    pub attempts: Option<u8>,
    pub error: Option<&'static str>,
}

impl From<ReportOutcome> for ReportValue {
    fn from(outcome: ReportOutcome) -> Self {
        let event = match outcome.event {
            MotionEvent::Detected => "detected",
            MotionEvent::Cleared => "cleared",
        };
        match outcome.result {
            Ok(attempts) => Self {
                event,
                delivered: true,
                attempts: Some(attempts),
                error: None,
            },
            Err(e) => Self {
                event,
                delivered: false,
                attempts: None,
                error: Some(e.as_str()),
            },
        }
    }
}

/// `GET /api/status` des Bewegungsmelders
///
/// `status` ist 1 bei Bewegung, sonst 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MotionStatusResponse {
    pub name: &'static str,
    pub status: u8,
    pub detections: u32,
    pub last_report: Option<ReportValue>,
}

impl MotionStatusResponse {
    pub fn new(name: &'static str, status: &MotionStatus) -> Self {
        Self {
            name,
            status: status.is_active() as u8,
            detections: status.detections(),
            last_report: status.last_report().map(ReportValue::from),
        }
    }
}

// ============================================================================
// Lichtsteuerung
// ============================================================================

/// `POST /onoff`, `/brightness`, `/auto`
///
/// `id` zählt ab 1, `value` ist 0/1 bzw. die Helligkeit in Prozent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LightRequest {
    pub id: usize,
    pub value: u8,
}

impl LightRequest {
    /// Index des Lichts, `None` für `id` 0
    pub fn index(&self) -> Option<usize> {
        self.id.checked_sub(1)
    }
}

/// Ein Eintrag in `GET /api/status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LightStatus {
    pub id: usize,
    pub name: &'static str,
    pub brightness: u8,
    pub on: bool,
    pub auto: bool,
    /// Aktuelle Zielhelligkeit nach Automatik bzw. Schalter
    pub level: u8,
}

/// `GET /api/status` der Lichtsteuerung
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LightsStatusResponse {
    /// Uhrzeit per SNTP gesetzt
    pub clock: bool,
    pub lights: Vec<LightStatus, MAX_LIGHTS>,
}

impl LightsStatusResponse {
    pub fn new(clock: bool, names: &[&'static str], lights: &[Light], levels: &[u8]) -> Self {
        let lights = lights
            .iter()
            .zip(levels)
            .enumerate()
            .map(|(index, (light, level))| LightStatus {
                id: index + 1,
                name: names.get(index).copied().unwrap_or(""),
                brightness: light.brightness,
                on: light.on,
                auto: light.auto,
                level: *level,
            })
            .collect();
        Self { clock, lights }
    }
}
