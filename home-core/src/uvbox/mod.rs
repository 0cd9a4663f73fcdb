//! UV-Belichtungsbox: Tastatur, Menü, Timer und EEPROM-Einstellungen
//!
//! Menüstruktur:
//! ```text
//! Start     → Belichtung mit gespeicherter Zeit
//! Settings  → Timer      (Zeit einstellen)
//!           → Back light (Hintergrundbeleuchtung)
//! ```

mod actions;
mod keys;
mod menu;
mod screen;
mod timer;

pub use actions::{BackLightEvent, BackLightSetting, RunEvent, SetTimer, SetTimerEvent, TimerRun};
pub use keys::{Key, KeyScanner};
pub use menu::{Menu, MenuEvent};
pub use screen::{SCREEN_COLS, SCREEN_ROWS, TextScreen};
pub use crate::storage::{DataStorage, SlotId};
pub use timer::{MAX_FIELD, TimerField, TimerValue};

use crate::traits::{ByteStore, StorageError};

const ROOT_ENTRIES: &[&str] = &["Start", "Settings"];
const SETTINGS_ENTRIES: &[&str] = &["Timer", "Back light"];

/// Schaltausgänge der Box
pub trait UvOutputs {
    /// UV-Röhren (Relais)
    fn set_trigger(&mut self, on: bool);
    /// Display-Beleuchtung (Polarität regelt die Implementierung)
    fn set_backlight(&mut self, on: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Root,
    Settings,
    Run(TimerRun),
    SetTimer(SetTimer),
    BackLight(BackLightSetting),
}

pub struct UvBox<S: ByteStore, O: UvOutputs> {
    storage: DataStorage<S>,
    outputs: O,
    timer_slot: SlotId,
    backlight_slot: SlotId,
    root: Menu,
    settings: Menu,
    view: View,
    screen: TextScreen,
    dirty: bool,
}

impl<S: ByteStore, O: UvOutputs> UvBox<S, O> {
    /// Registriert die Einstellungen (Timer: 4 Bytes ab 0, Beleuchtung:
    /// 1 Byte ab 4) und schaltet die Beleuchtung auf den gespeicherten Wert
    pub fn new(store: S, capacity: u16, outputs: O) -> Result<Self, StorageError> {
        let mut storage = DataStorage::new(store, capacity);
        let timer_slot = storage.register(4)?;
        let backlight_slot = storage.register(1)?;

        let mut uv_box = Self {
            storage,
            outputs,
            timer_slot,
            backlight_slot,
            root: Menu::new(ROOT_ENTRIES, false),
            settings: Menu::new(SETTINGS_ENTRIES, true),
            view: View::Root,
            screen: TextScreen::new(),
            dirty: true,
        };
        uv_box.outputs.set_trigger(false);
        uv_box.backlight_to_default();
        uv_box.render();
        Ok(uv_box)
    }

    pub fn screen(&self) -> &TextScreen {
        &self.screen
    }

    /// Liefert einmal `true` nach jeder Änderung des Bildschirms
    pub fn take_dirty(&mut self) -> bool {
        core::mem::replace(&mut self.dirty, false)
    }

    pub fn is_exposing(&self) -> bool {
        matches!(self.view, View::Run(run) if run.is_running())
    }

    pub fn outputs(&self) -> &O {
        &self.outputs
    }

    pub fn storage(&self) -> &DataStorage<S> {
        &self.storage
    }

    /// Gespeicherte Belichtungszeit, 00:00:00 bei Lesefehler
    pub fn stored_timer(&mut self) -> TimerValue {
        self.storage
            .load_u32(self.timer_slot)
            .map(TimerValue::from_secs)
            .unwrap_or_default()
    }

    /// Gespeicherte Beleuchtung, aus bei Lesefehler
    pub fn stored_backlight(&mut self) -> bool {
        self.storage.load_bool(self.backlight_slot).unwrap_or(false)
    }

    fn backlight_to_default(&mut self) {
        let on = self.stored_backlight();
        self.outputs.set_backlight(on);
    }

    /// Verarbeitet einen Tastendruck
    ///
    /// Ein Fehler beim Speichern wird gemeldet, die Navigation findet
    /// trotzdem statt.
    pub fn handle_key(&mut self, key: Key) -> Result<(), StorageError> {
        let mut result = Ok(());

        let view = self.view;
        self.view = match view {
            View::Root => match self.root.handle(key) {
                MenuEvent::Open(0) => View::Run(TimerRun::open(self.stored_timer())),
                MenuEvent::Open(_) => View::Settings,
                _ => View::Root,
            },
            View::Settings => match self.settings.handle(key) {
                MenuEvent::Open(0) => View::SetTimer(SetTimer::open(self.stored_timer())),
                MenuEvent::Open(_) => View::BackLight(BackLightSetting::open(self.stored_backlight())),
                MenuEvent::Exit => View::Root,
                _ => View::Settings,
            },
            View::Run(mut run) => match run.handle(key) {
                RunEvent::Start => {
                    self.outputs.set_trigger(true);
                    self.outputs.set_backlight(true);
                    View::Run(run)
                }
                RunEvent::Stop => {
                    self.stop_exposure();
                    View::Root
                }
                RunEvent::Cancel => View::Root,
                RunEvent::Stay => View::Run(run),
            },
            View::SetTimer(mut editor) => match editor.handle(key) {
                SetTimerEvent::Save(value) => {
                    result = self.storage.save_u32(self.timer_slot, value.as_secs());
                    View::Settings
                }
                SetTimerEvent::Stay => View::SetTimer(editor),
            },
            View::BackLight(mut setting) => match setting.handle(key) {
                BackLightEvent::Preview(on) => {
                    self.outputs.set_backlight(on);
                    View::BackLight(setting)
                }
                BackLightEvent::Save(on) => {
                    self.outputs.set_backlight(on);
                    result = self.storage.save_bool(self.backlight_slot, on);
                    View::Settings
                }
                BackLightEvent::Revert(on) => {
                    self.outputs.set_backlight(on);
                    View::Settings
                }
            },
        };

        self.render();
        result
    }

    /// Sekundentakt für den Countdown
    pub fn tick_second(&mut self) {
        if let View::Run(mut run) = self.view {
            if !run.is_running() {
                return;
            }
            self.view = match run.tick() {
                RunEvent::Stop => {
                    self.stop_exposure();
                    View::Root
                }
                _ => View::Run(run),
            };
            self.render();
        }
    }

    fn stop_exposure(&mut self) {
        self.outputs.set_trigger(false);
        self.backlight_to_default();
    }

    fn render(&mut self) {
        match &self.view {
            View::Root => self.root.render(&mut self.screen),
            View::Settings => self.settings.render(&mut self.screen),
            View::Run(run) => run.render(&mut self.screen, ROOT_ENTRIES[0]),
            View::SetTimer(editor) => editor.render(&mut self.screen, SETTINGS_ENTRIES[0]),
            View::BackLight(setting) => setting.render(&mut self.screen, SETTINGS_ENTRIES[1]),
        }
        self.dirty = true;
    }
}
