// Library-Root: Wiederverwendbare Tasks, Treiber und Web-Handler
// der Geräte-Images
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Request-Bodies der HTTP-Handler liegen auf dem Heap
extern crate alloc;

// Module
pub mod config;
pub mod hal;
pub mod network;
pub mod tasks;
pub mod web;

// Re-exports von home-core
pub use home_core::{DimmerOutput, LedError, SmartLedWriter};

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_sync::watch;
use esp_hal::Blocking;
use esp_hal::delay::Delay;
use esp_hal::i2c::master::I2c;
use home_core::automation::{AutomationEngine, FadeCommand};
use home_core::inverter::Inverter;
use home_core::lights::LightsController;
use home_core::motion::{MotionEvent, MotionStatus};
use home_core::socket::SocketController;
use home_core::sntp::TimeBase;

use crate::hal::{Eeprom24, GpioRelay, UartInverterLink};

// ============================================================================
// Type-Aliase für geteilte Zustände und Channels
// ============================================================================
//
// Statt:  watch::Receiver<'static, NoopRawMutex, bool, 4>
// Nutze:  LinkReceiver

/// WLAN-Status (true = IP-Adresse vorhanden)
/// - 4: Maximale Anzahl Receiver (Status-LED, Automatik, Reporter, Reserve)
pub type LinkWatch = watch::Watch<NoopRawMutex, bool, 4>;

/// Sender für den WLAN-Status (WiFi Task)
pub type LinkSender = watch::Sender<'static, NoopRawMutex, bool, 4>;

/// Receiver für den WLAN-Status
pub type LinkReceiver = watch::Receiver<'static, NoopRawMutex, bool, 4>;

/// Lokale Aktivität für die Status-LED (z.B. erkannte Bewegung)
pub type ActivityWatch = watch::Watch<NoopRawMutex, bool, 1>;

/// Sender für lokale Aktivität
pub type ActivitySender = watch::Sender<'static, NoopRawMutex, bool, 1>;

/// Receiver für lokale Aktivität (Status-LED Task)
pub type ActivityReceiver = watch::Receiver<'static, NoopRawMutex, bool, 1>;

/// Automatik-Zustand, geteilt zwischen HTTP-Handlern und Automatik-Task
pub type SharedAutomation = Mutex<NoopRawMutex, AutomationEngine>;

/// Auftrag an den Dimmer Task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimmerRequest {
    /// Überblendung eines Items (nur im Normalbetrieb wirksam)
    Item(FadeCommand),
    /// Alle Kanäle (Boot-Anzeige); `automation` gibt Item-Aufträge frei
    All {
        brightness: u8,
        duration_ms: u32,
        automation: bool,
    },
}

/// Channel für Dimmer-Aufträge (Automatik + HTTP → Dimmer Task)
/// - 8: Kapazität (ein Tick kann alle Items gleichzeitig ausschalten)
pub type DimmerChannel = Channel<NoopRawMutex, DimmerRequest, 8>;

/// Sender für Dimmer-Aufträge
pub type DimmerSender = Sender<'static, NoopRawMutex, DimmerRequest, 8>;

/// Receiver für Dimmer-Aufträge (Dimmer Task)
pub type DimmerReceiver = Receiver<'static, NoopRawMutex, DimmerRequest, 8>;

/// Channel für Bewegungs-Ereignisse (PIR Task → Reporter Task)
pub type MotionChannel = Channel<NoopRawMutex, MotionEvent, 4>;

/// Sender für Bewegungs-Ereignisse
pub type MotionSender = Sender<'static, NoopRawMutex, MotionEvent, 4>;

/// Receiver für Bewegungs-Ereignisse
pub type MotionReceiver = Receiver<'static, NoopRawMutex, MotionEvent, 4>;

/// Wechselrichter am UART, geteilt zwischen den HTTP-Tasks
/// Der Mutex serialisiert die Abfragen auf der Leitung.
pub type SharedInverter = Mutex<NoopRawMutex, Inverter<UartInverterLink>>;

/// Uhrzeit aus SNTP, `None` bis zur ersten Synchronisation
pub type SharedClock = Mutex<NoopRawMutex, Option<TimeBase>>;

/// Zustand des Bewegungsmelders für den eigenen HTTP-Server
pub type SharedMotionStatus = Mutex<NoopRawMutex, MotionStatus>;

/// Steckdose, geteilt zwischen Abfrage-Task und HTTP-Handlern
pub type SharedSocket = Mutex<NoopRawMutex, SocketController<GpioRelay>>;

/// EEPROM am I²C-Bus (UV-Box, Lichtsteuerung)
pub type EepromStore = Eeprom24<I2c<'static, Blocking>, Delay>;

/// Lichter, geteilt zwischen Licht-Task und HTTP-Handlern
pub type SharedLights = Mutex<NoopRawMutex, LightsController<EepromStore>>;

/// HTTP → Licht-Task: Einstellungen geändert, Ziele neu berechnen
pub type LightsSignal = Signal<NoopRawMutex, ()>;
