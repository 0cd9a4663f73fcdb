// Aktionen hinter den Menüeinträgen
//
// Die Aktionen ändern nur ihren eigenen Zustand und melden per Event,
// was gespeichert oder geschaltet werden soll. Speicher und Ausgänge
// bedient `UvBox`.

use super::keys::Key;
use super::screen::TextScreen;
use super::timer::{TimerField, TimerValue};

// ============================================================================
// Timer einstellen
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetTimerEvent {
    Stay,
    /// Enter: Wert speichern und zurück
    Save(TimerValue),
}

/// Editor für die Belichtungszeit, beginnt bei den Sekunden
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetTimer {
    value: TimerValue,
    field: TimerField,
}

impl SetTimer {
    pub fn open(stored: TimerValue) -> Self {
        Self {
            value: stored,
            field: TimerField::Seconds,
        }
    }

    pub fn value(&self) -> TimerValue {
        self.value
    }

    pub fn field(&self) -> TimerField {
        self.field
    }

    pub fn handle(&mut self, key: Key) -> SetTimerEvent {
        match key {
            Key::Up => self.value.increment(self.field),
            Key::Down => self.value.decrement(self.field),
            Key::Left => self.field = self.field.larger().unwrap_or(self.field),
            Key::Right => self.field = self.field.smaller().unwrap_or(self.field),
            Key::Enter => return SetTimerEvent::Save(self.value),
        }
        SetTimerEvent::Stay
    }

    pub fn render(&self, screen: &mut TextScreen, name: &str) {
        screen.clear();
        screen.print(0, name);
        screen.print_fmt(2, format_args!("   {}", self.value));
        screen.print(4, self.field.label());
    }
}

// ============================================================================
// Hintergrundbeleuchtung
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackLightEvent {
    /// Hoch/Runter: sofort umschalten (noch nicht gespeichert)
    Preview(bool),
    /// Enter: speichern und zurück
    Save(bool),
    /// Links/Rechts: gespeicherten Wert wiederherstellen und zurück
    Revert(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackLightSetting {
    on: bool,
    stored: bool,
}

impl BackLightSetting {
    pub fn open(stored: bool) -> Self {
        Self { on: stored, stored }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn handle(&mut self, key: Key) -> BackLightEvent {
        match key {
            Key::Up | Key::Down => {
                self.on = !self.on;
                BackLightEvent::Preview(self.on)
            }
            Key::Enter => BackLightEvent::Save(self.on),
            Key::Left | Key::Right => {
                self.on = self.stored;
                BackLightEvent::Revert(self.stored)
            }
        }
    }

    pub fn render(&self, screen: &mut TextScreen, name: &str) {
        screen.clear();
        screen.print(0, name);
        screen.print(2, "back light:");
        screen.print_fmt(3, format_args!("{:>14}", if self.on { "on" } else { "off" }));
    }
}

// ============================================================================
// Belichtung
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEvent {
    Stay,
    /// Belichtung beginnt: Ausgang an, Beleuchtung an
    Start,
    /// Belichtung beendet oder abgebrochen: Ausgang aus
    Stop,
    /// Vor dem Start abgebrochen
    Cancel,
}

/// Belichtung mit Bestätigung und Countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerRun {
    /// Wartet auf Enter
    Ready(TimerValue),
    Running(TimerValue),
}

impl TimerRun {
    pub fn open(stored: TimerValue) -> Self {
        TimerRun::Ready(stored)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, TimerRun::Running(_))
    }

    /// Enter startet, Pfeiltasten brechen ab
    ///
    /// Eine Zeit von 00:00:00 startet nicht. Während der Belichtung
    /// beendet jede Pfeiltaste sofort.
    pub fn handle(&mut self, key: Key) -> RunEvent {
        match (*self, key) {
            (TimerRun::Ready(value), Key::Enter) if value.is_zero() => RunEvent::Cancel,
            (TimerRun::Ready(value), Key::Enter) => {
                *self = TimerRun::Running(value);
                RunEvent::Start
            }
            (TimerRun::Ready(_), _) => RunEvent::Cancel,
            (TimerRun::Running(_), key) if key.is_arrow() => RunEvent::Stop,
            (TimerRun::Running(_), _) => RunEvent::Stay,
        }
    }

    /// Sekundentakt
    pub fn tick(&mut self) -> RunEvent {
        match self {
            TimerRun::Running(remaining) => {
                if remaining.tick() && !remaining.is_zero() {
                    RunEvent::Stay
                } else {
                    RunEvent::Stop
                }
            }
            TimerRun::Ready(_) => RunEvent::Stay,
        }
    }

    pub fn render(&self, screen: &mut TextScreen, name: &str) {
        screen.clear();
        screen.print(0, name);
        match self {
            TimerRun::Ready(value) => {
                screen.print(1, "set to:");
                screen.print_fmt(2, format_args!("   {}", value));
                screen.print(4, "press enter");
                screen.print(5, "to continue");
            }
            TimerRun::Running(remaining) => {
                screen.print(1, "exposing:");
                screen.print_fmt(2, format_args!("   {}", remaining));
                screen.print(4, "arrow: abort");
            }
        }
    }
}
