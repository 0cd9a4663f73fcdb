//! Zeitgesteuerte Beleuchtung (Aquarium, Pflanzen)
//!
//! Jedes Licht hat eine im EEPROM gespeicherte Helligkeit (0-100 %).
//! Im Automatikbetrieb leuchtet es nur tagsüber, ohne gültige Uhrzeit
//! bleibt es dunkel. Im manuellen Betrieb schaltet der Benutzer.
//!
//! EEPROM-Layout pro Licht: Helligkeit (1 Byte), Automatik (1 Byte).

use heapless::Vec;

use crate::calendar::DateTime;
use crate::storage::{DataStorage, SlotId};
use crate::traits::{ByteStore, StorageError};

/// Maximale Anzahl Lichter (LEDC-Kanäle)
pub const MAX_LIGHTS: usize = 4;

/// Tagesfenster in lokaler Zeit, `end_hour` gehört nicht mehr dazu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightSchedule {
    pub start_hour: u8,
    pub end_hour: u8,
}

impl Default for LightSchedule {
    fn default() -> Self {
        Self {
            start_hour: 10,
            end_hour: 19,
        }
    }
}

impl LightSchedule {
    pub fn is_daytime(&self, time: &DateTime) -> bool {
        time.hour >= self.start_hour && time.hour < self.end_hour
    }
}

/// Zielhelligkeit im Automatikbetrieb
///
/// `None` (Uhr noch nicht synchronisiert) zählt als Nacht.
pub fn scheduled_brightness(time: Option<&DateTime>, schedule: &LightSchedule, brightness: u8) -> u8 {
    match time {
        Some(time) if schedule.is_daytime(time) => brightness.min(100),
        _ => 0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightsError {
    InvalidLight,
    Storage(StorageError),
}

impl From<StorageError> for LightsError {
    fn from(e: StorageError) -> Self {
        LightsError::Storage(e)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LightsError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            LightsError::InvalidLight => defmt::write!(fmt, "Invalid light"),
            LightsError::Storage(e) => defmt::write!(fmt, "{}", e),
        }
    }
}

/// Zustand eines Lichts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Light {
    pub brightness: u8,
    /// Nur im manuellen Betrieb wirksam
    pub on: bool,
    pub auto: bool,
}

#[derive(Debug, Clone, Copy)]
struct LightSlots {
    brightness: SlotId,
    auto: SlotId,
}

pub struct LightsController<S: ByteStore> {
    storage: DataStorage<S>,
    slots: Vec<LightSlots, MAX_LIGHTS>,
    lights: Vec<Light, MAX_LIGHTS>,
    schedule: LightSchedule,
}

impl<S: ByteStore> LightsController<S> {
    /// Registriert die Slots und lädt die Einstellungen
    ///
    /// Unlesbare oder gelöschte Werte (0xFF) ergeben 100 % und Automatik.
    pub fn new(
        store: S,
        capacity: u16,
        count: usize,
        schedule: LightSchedule,
    ) -> Result<Self, LightsError> {
        if count > MAX_LIGHTS {
            return Err(LightsError::InvalidLight);
        }

        let mut storage = DataStorage::new(store, capacity);
        let mut slots = Vec::new();
        let mut lights = Vec::new();

        for _ in 0..count {
            let light_slots = LightSlots {
                brightness: storage.register(1)?,
                auto: storage.register(1)?,
            };
            let light = Light {
                brightness: storage
                    .load_u8(light_slots.brightness)
                    .map(|value| value.min(100))
                    .unwrap_or(100),
                on: false,
                auto: storage.load_bool(light_slots.auto).unwrap_or(true),
            };
            // Kapazität ist oben geprüft
            let _ = slots.push(light_slots);
            let _ = lights.push(light);
        }

        Ok(Self {
            storage,
            slots,
            lights,
            schedule,
        })
    }

    fn light_mut(&mut self, index: usize) -> Result<&mut Light, LightsError> {
        self.lights.get_mut(index).ok_or(LightsError::InvalidLight)
    }

    /// Manuelles Ein-/Ausschalten, beendet den Automatikbetrieb
    ///
    /// Einschalten mit Helligkeit 0 setzt 100 %.
    pub fn set_on(&mut self, index: usize, on: bool) -> Result<(), LightsError> {
        let light = self.light_mut(index)?;
        light.auto = false;
        light.on = on;
        if on && light.brightness == 0 {
            light.brightness = 100;
        }
        Ok(())
    }

    /// Neue Helligkeit (nicht gespeichert, siehe `save`)
    pub fn set_brightness(&mut self, index: usize, percent: u8) -> Result<(), LightsError> {
        let light = self.light_mut(index)?;
        light.brightness = percent.min(100);
        light.on = light.brightness > 0;
        Ok(())
    }

    /// Automatik ein/aus, wird sofort gespeichert
    pub fn set_auto(&mut self, index: usize, auto: bool) -> Result<(), LightsError> {
        self.light_mut(index)?.auto = auto;
        let slot = self.slots[index].auto;
        self.storage.save_bool(slot, auto)?;
        Ok(())
    }

    /// Speichert die Helligkeit aller Lichter
    pub fn save(&mut self) -> Result<(), LightsError> {
        for (light, slots) in self.lights.iter().zip(self.slots.iter()) {
            self.storage.save_u8(slots.brightness, light.brightness)?;
        }
        Ok(())
    }

    /// Zielhelligkeit eines Lichts zum Zeitpunkt `time`
    pub fn target(&self, index: usize, time: Option<&DateTime>) -> Option<u8> {
        let light = self.lights.get(index)?;
        Some(if light.auto {
            scheduled_brightness(time, &self.schedule, light.brightness)
        } else if light.on {
            light.brightness
        } else {
            0
        })
    }

    pub fn targets(&self, time: Option<&DateTime>) -> Vec<u8, MAX_LIGHTS> {
        (0..self.lights.len())
            .filter_map(|index| self.target(index, time))
            .collect()
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn schedule(&self) -> &LightSchedule {
        &self.schedule
    }

    pub fn storage(&self) -> &DataStorage<S> {
        &self.storage
    }
}
