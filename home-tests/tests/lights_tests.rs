//! Integration Tests für die zeitgesteuerte Lichtsteuerung
//!
//! RamStore ersetzt das EEPROM.

use home_core::calendar::DateTime;
use home_core::lights::{LightSchedule, LightsController, LightsError, MAX_LIGHTS, scheduled_brightness};
use home_core::{ByteStore, StorageError};

// ============================================================================
// Mock EEPROM
// ============================================================================

pub struct RamStore {
    pub bytes: Vec<u8>,
    pub fail_writes: bool,
}

impl RamStore {
    pub fn erased(len: usize) -> Self {
        Self {
            bytes: vec![0xFF; len],
            fail_writes: false,
        }
    }
}

impl ByteStore for RamStore {
    fn read(&mut self, addr: u16, buf: &mut [u8]) -> Result<(), StorageError> {
        let start = addr as usize;
        let src = self
            .bytes
            .get(start..start + buf.len())
            .ok_or(StorageError::Io)?;
        buf.copy_from_slice(src);
        Ok(())
    }

    fn write(&mut self, addr: u16, data: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Io);
        }
        let start = addr as usize;
        let dst = self
            .bytes
            .get_mut(start..start + data.len())
            .ok_or(StorageError::Io)?;
        dst.copy_from_slice(data);
        Ok(())
    }
}

fn at(hour: u8, minute: u8) -> DateTime {
    DateTime {
        year: 2024,
        month: 3,
        day: 15,
        hour,
        minute,
        second: 0,
    }
}

fn controller(store: RamStore, count: usize) -> LightsController<RamStore> {
    LightsController::new(store, 16, count, LightSchedule::default()).unwrap()
}

// ============================================================================
// Tests: Zeitplan
// ============================================================================

#[test]
fn test_schedule_boundaries() {
    let schedule = LightSchedule::default();

    assert_eq!(scheduled_brightness(Some(&at(9, 59)), &schedule, 80), 0);
    assert_eq!(scheduled_brightness(Some(&at(10, 0)), &schedule, 80), 80);
    assert_eq!(scheduled_brightness(Some(&at(18, 59)), &schedule, 80), 80);
    assert_eq!(scheduled_brightness(Some(&at(19, 0)), &schedule, 80), 0);
}

#[test]
fn test_schedule_without_clock_is_dark() {
    assert_eq!(scheduled_brightness(None, &LightSchedule::default(), 100), 0);
}

#[test]
fn test_custom_schedule() {
    let schedule = LightSchedule {
        start_hour: 6,
        end_hour: 8,
    };
    assert_eq!(scheduled_brightness(Some(&at(6, 0)), &schedule, 50), 50);
    assert_eq!(scheduled_brightness(Some(&at(8, 0)), &schedule, 50), 0);
}

// ============================================================================
// Tests: Einstellungen
// ============================================================================

#[test]
fn test_erased_eeprom_defaults() {
    let lights = controller(RamStore::erased(16), 2);

    assert_eq!(lights.lights().len(), 2);
    for light in lights.lights() {
        assert_eq!(light.brightness, 100);
        assert!(light.auto);
        assert!(!light.on);
    }
    assert_eq!(lights.targets(Some(&at(12, 0))).as_slice(), &[100, 100]);
    assert_eq!(lights.targets(Some(&at(22, 0))).as_slice(), &[0, 0]);
}

#[test]
fn test_too_many_lights() {
    let result = LightsController::new(
        RamStore::erased(16),
        16,
        MAX_LIGHTS + 1,
        LightSchedule::default(),
    );
    assert!(matches!(result, Err(LightsError::InvalidLight)));
}

#[test]
fn test_save_and_reload_brightness() {
    let mut lights = controller(RamStore::erased(16), 2);
    lights.set_brightness(0, 40).unwrap();
    lights.set_brightness(1, 150).unwrap();
    lights.save().unwrap();

    let bytes = lights.storage().store().bytes.clone();
    let reloaded = controller(RamStore { bytes, fail_writes: false }, 2);
    assert_eq!(reloaded.lights()[0].brightness, 40);
    assert_eq!(reloaded.lights()[1].brightness, 100);
}

#[test]
fn test_auto_flag_persisted_immediately() {
    let mut lights = controller(RamStore::erased(16), 2);
    lights.set_auto(1, false).unwrap();

    let bytes = lights.storage().store().bytes.clone();
    let reloaded = controller(RamStore { bytes, fail_writes: false }, 2);
    assert!(reloaded.lights()[0].auto);
    assert!(!reloaded.lights()[1].auto);
}

#[test]
fn test_save_reports_storage_error() {
    let mut store = RamStore::erased(16);
    store.fail_writes = true;
    let mut lights = controller(store, 1);

    assert_eq!(
        lights.save(),
        Err(LightsError::Storage(StorageError::Io))
    );
}

// ============================================================================
// Tests: Manuelles Schalten
// ============================================================================

#[test]
fn test_manual_on_ignores_schedule() {
    let mut lights = controller(RamStore::erased(16), 2);
    lights.set_on(0, true).unwrap();

    // Nachts: Licht 0 manuell an, Licht 1 folgt dem Zeitplan
    assert_eq!(lights.target(0, Some(&at(23, 0))), Some(100));
    assert_eq!(lights.target(1, Some(&at(23, 0))), Some(0));
    assert!(!lights.lights()[0].auto);

    lights.set_on(0, false).unwrap();
    assert_eq!(lights.target(0, Some(&at(12, 0))), Some(0));
}

#[test]
fn test_switch_on_at_zero_brightness() {
    let mut lights = controller(RamStore::erased(16), 1);
    lights.set_brightness(0, 0).unwrap();
    assert!(!lights.lights()[0].on);

    lights.set_on(0, true).unwrap();
    assert_eq!(lights.lights()[0].brightness, 100);
}

#[test]
fn test_brightness_follows_schedule_in_auto() {
    let mut lights = controller(RamStore::erased(16), 1);
    lights.set_brightness(0, 30).unwrap();

    assert!(lights.lights()[0].auto);
    assert_eq!(lights.target(0, Some(&at(11, 0))), Some(30));
    assert_eq!(lights.target(0, None), Some(0));
}

#[test]
fn test_invalid_light_index() {
    let mut lights = controller(RamStore::erased(16), 1);
    assert_eq!(lights.set_on(1, true), Err(LightsError::InvalidLight));
    assert_eq!(lights.set_auto(4, true), Err(LightsError::InvalidLight));
    assert_eq!(lights.target(1, None), None);
}
