//! PIR-Bewegungsmelder: Flankenerkennung und Meldung an den LED-Server

use heapless::String;

use crate::traits::ReportTransport;

/// Maximale Länge eines Sensornamens
pub const SENSOR_NAME_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionEvent {
    /// LOW → HIGH
    Detected,
    /// HIGH → LOW
    Cleared,
}

impl MotionEvent {
    /// Wert für das `state`-Feld der Meldung
    pub const fn state(self) -> u8 {
        match self {
            MotionEvent::Detected => 1,
            MotionEvent::Cleared => 0,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for MotionEvent {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            MotionEvent::Detected => defmt::write!(fmt, "motion detected"),
            MotionEvent::Cleared => defmt::write!(fmt, "motion cleared"),
        }
    }
}

/// Erkennt Pegelwechsel des Sensorausgangs
///
/// Startzustand ist LOW (keine Bewegung).
#[derive(Debug, Default)]
pub struct MotionDetector {
    level: bool,
}

impl MotionDetector {
    pub const fn new() -> Self {
        Self { level: false }
    }

    pub fn is_active(&self) -> bool {
        self.level
    }

    /// Liefert ein Ereignis nur bei Pegelwechsel
    pub fn update(&mut self, level: bool) -> Option<MotionEvent> {
        if level == self.level {
            return None;
        }
        self.level = level;
        Some(if level {
            MotionEvent::Detected
        } else {
            MotionEvent::Cleared
        })
    }
}

/// Meldung an `POST /api/motionSensor`
///
/// JSON: `{"sensor":"<name>","state":1}`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MotionReport {
    pub sensor: String<SENSOR_NAME_LEN>,
    pub state: u8,
}

impl MotionReport {
    /// Zu lange Namen werden abgeschnitten
    pub fn new(sensor: &str, event: MotionEvent) -> Self {
        let mut name = String::new();
        for c in sensor.chars() {
            if name.push(c).is_err() {
                break;
            }
        }
        Self {
            sensor: name,
            state: event.state(),
        }
    }
}

/// Fehler beim Senden einer Meldung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportError {
    /// Kein Ziel konfiguriert
    NoHost,
    /// Hostname nicht auflösbar
    Dns,
    /// Verbindung oder Übertragung fehlgeschlagen
    Connection,
    /// Server antwortet mit Fehlerstatus
    Status(u16),
    /// Alle Versuche fehlgeschlagen
    Exhausted,
}

impl ReportError {
    /// Kurztext für die Statusseite (ohne Statuscode)
    pub const fn as_str(self) -> &'static str {
        match self {
            ReportError::NoHost => "no host",
            ReportError::Dns => "dns",
            ReportError::Connection => "connection",
            ReportError::Status(_) => "http status",
            ReportError::Exhausted => "exhausted",
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ReportError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ReportError::NoHost => defmt::write!(fmt, "No host configured"),
            ReportError::Dns => defmt::write!(fmt, "DNS failed"),
            ReportError::Connection => defmt::write!(fmt, "Connection failed"),
            ReportError::Status(code) => defmt::write!(fmt, "HTTP status {}", code),
            ReportError::Exhausted => defmt::write!(fmt, "All attempts failed"),
        }
    }
}

/// Wiederholungs-Strategie: feste Anzahl Versuche mit fester Pause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u8,
    pub delay_ms: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            delay_ms: 5000,
        }
    }
}

/// Sendet eine Meldung mit Wiederholungen
///
/// Gibt die Nummer des erfolgreichen Versuchs (ab 1) zurück.
/// `ReportError::NoHost` wird nicht wiederholt.
pub async fn deliver<T: ReportTransport>(
    transport: &mut T,
    report: &MotionReport,
    policy: RetryPolicy,
) -> Result<u8, ReportError> {
    for attempt in 1..=policy.attempts {
        match transport.send(report).await {
            Ok(()) => return Ok(attempt),
            Err(ReportError::NoHost) => return Err(ReportError::NoHost),
            Err(_) if attempt < policy.attempts => transport.pause(policy.delay_ms).await,
            Err(_) => {}
        }
    }
    Err(ReportError::Exhausted)
}

/// Ergebnis der letzten Meldung an den LED-Server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOutcome {
    pub event: MotionEvent,
    /// Nummer des erfolgreichen Versuchs oder Fehler
    pub result: Result<u8, ReportError>,
}

/// Zustand des Sensors für die Statusseite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MotionStatus {
    active: bool,
    detections: u32,
    last_report: Option<ReportOutcome>,
}

impl MotionStatus {
    pub const fn new() -> Self {
        Self {
            active: false,
            detections: 0,
            last_report: None,
        }
    }

    /// Übernimmt ein Ereignis des Detektors
    pub fn record_event(&mut self, event: MotionEvent) {
        self.active = event == MotionEvent::Detected;
        if self.active {
            self.detections = self.detections.wrapping_add(1);
        }
    }

    pub fn record_report(&mut self, event: MotionEvent, result: Result<u8, ReportError>) {
        self.last_report = Some(ReportOutcome { event, result });
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Erkannte Bewegungen seit dem Start
    pub fn detections(&self) -> u32 {
        self.detections
    }

    pub fn last_report(&self) -> Option<ReportOutcome> {
        self.last_report
    }
}
