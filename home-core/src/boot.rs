//! Start- und Verbindungsanzeige über die LED-Streifen
//!
//! Solange kein WLAN verbunden ist, blinken alle Streifen. Nach dem
//! Verbinden leuchten sie kurz konstant und blenden dann aus; erst danach
//! übernimmt die Automatik. Bei Verbindungsverlust bleibt ein schwaches
//! Notlicht an.

/// Helligkeit beim Blinken und nach dem Verbinden
pub const BOOT_BRIGHTNESS: u8 = 20;
/// Notlicht ohne WLAN
pub const OFFLINE_BRIGHTNESS: u8 = 10;
/// Blink-Intervall während des Verbindens
pub const BOOT_BLINK_MS: u64 = 500;
/// Dauer der Bestätigung nach erfolgreicher Verbindung
pub const CONNECTED_HOLD_MS: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootPhase {
    /// Erster Verbindungsaufbau, Blinken
    Connecting,
    /// Verbunden, konstante Anzeige bis zum Zeitpunkt
    Connected { until_ms: u64 },
    /// Automatik aktiv
    Normal,
    /// Verbindung verloren, Notlicht
    Offline,
}

/// Auszuführende Änderung an allen LED-Streifen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootAction {
    pub brightness: u8,
    pub duration_ms: u32,
}

impl BootAction {
    const fn set(brightness: u8) -> Self {
        Self {
            brightness,
            duration_ms: 0,
        }
    }
}

pub struct BootSequence {
    phase: BootPhase,
    blink_on: bool,
    next_toggle_ms: u64,
    fade_ms: u32,
}

impl BootSequence {
    pub const fn new(fade_ms: u32) -> Self {
        Self {
            phase: BootPhase::Connecting,
            blink_on: false,
            next_toggle_ms: 0,
            fade_ms,
        }
    }

    pub fn phase(&self) -> BootPhase {
        self.phase
    }

    /// Automatik darf die Ausgänge steuern
    pub fn is_normal(&self) -> bool {
        self.phase == BootPhase::Normal
    }

    /// WLAN-Status hat sich geändert
    pub fn on_link(&mut self, up: bool, now_ms: u64) -> Option<BootAction> {
        match (self.phase, up) {
            (BootPhase::Connecting | BootPhase::Offline, true) => {
                self.phase = BootPhase::Connected {
                    until_ms: now_ms + CONNECTED_HOLD_MS,
                };
                Some(BootAction::set(BOOT_BRIGHTNESS))
            }
            (BootPhase::Connected { .. } | BootPhase::Normal, false) => {
                self.phase = BootPhase::Offline;
                Some(BootAction::set(OFFLINE_BRIGHTNESS))
            }
            _ => None,
        }
    }

    /// Zeitgesteuerte Schritte (Blinken, Ende der Bestätigung)
    pub fn poll(&mut self, now_ms: u64) -> Option<BootAction> {
        match self.phase {
            BootPhase::Connecting if now_ms >= self.next_toggle_ms => {
                self.blink_on = !self.blink_on;
                self.next_toggle_ms = now_ms + BOOT_BLINK_MS;
                Some(BootAction::set(if self.blink_on { BOOT_BRIGHTNESS } else { 0 }))
            }
            BootPhase::Connected { until_ms } if now_ms >= until_ms => {
                self.phase = BootPhase::Normal;
                Some(BootAction {
                    brightness: 0,
                    duration_ms: self.fade_ms,
                })
            }
            _ => None,
        }
    }
}
