//! Integration Tests für die UV-Box
//!
//! RamStore ersetzt das EEPROM, MockUvOutputs die Relais und die
//! Display-Beleuchtung.

use home_core::uvbox::{Key, TimerValue, UvBox, UvOutputs};
use home_core::{ByteStore, StorageError};

// ============================================================================
// Mock EEPROM
// ============================================================================

pub struct RamStore {
    pub bytes: Vec<u8>,
    pub fail_writes: bool,
}

impl RamStore {
    /// Frisch gelöschtes EEPROM
    pub fn erased(len: usize) -> Self {
        Self {
            bytes: vec![0xFF; len],
            fail_writes: false,
        }
    }

    pub fn with(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
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

// ============================================================================
// Mock Ausgänge
// ============================================================================

#[derive(Default)]
pub struct MockUvOutputs {
    pub trigger: bool,
    pub backlight: bool,
    /// Anzahl Einschaltvorgänge der UV-Röhren
    pub exposures: usize,
}

impl UvOutputs for MockUvOutputs {
    fn set_trigger(&mut self, on: bool) {
        if on && !self.trigger {
            self.exposures += 1;
        }
        self.trigger = on;
    }

    fn set_backlight(&mut self, on: bool) {
        self.backlight = on;
    }
}

type TestBox = UvBox<RamStore, MockUvOutputs>;

/// Timer in Sekunden (Big-Endian) und Beleuchtung
fn uv_box(timer_secs: u32, backlight: bool) -> TestBox {
    let mut bytes = timer_secs.to_be_bytes().to_vec();
    bytes.push(u8::from(backlight));
    bytes.extend_from_slice(&[0xFF; 11]);
    UvBox::new(RamStore::with(&bytes), 16, MockUvOutputs::default()).unwrap()
}

fn press(uv_box: &mut TestBox, keys: &[Key]) {
    for &key in keys {
        uv_box.handle_key(key).unwrap();
    }
}

fn row(uv_box: &TestBox, row: usize) -> &str {
    uv_box.screen().row(row).trim_end()
}

// ============================================================================
// Tests: Start und Menü
// ============================================================================

#[test]
fn test_erased_eeprom_defaults() {
    let mut uv_box = UvBox::new(RamStore::erased(16), 16, MockUvOutputs::default()).unwrap();

    assert_eq!(
        uv_box.stored_timer(),
        TimerValue {
            hours: 59,
            minutes: 28,
            seconds: 15
        }
    );
    // 0xFF gilt als "an"
    assert!(uv_box.outputs().backlight);
    assert!(!uv_box.outputs().trigger);
}

#[test]
fn test_eeprom_too_small() {
    let result = UvBox::new(RamStore::erased(4), 4, MockUvOutputs::default());
    assert_eq!(result.err(), Some(StorageError::Full));
}

#[test]
fn test_root_menu_navigation() {
    let mut uv_box = uv_box(0, false);

    assert!(uv_box.take_dirty());
    assert!(!uv_box.take_dirty());
    assert_eq!(row(&uv_box, 0), ">Start<");
    assert_eq!(row(&uv_box, 1), " Settings");

    press(&mut uv_box, &[Key::Down]);
    assert!(uv_box.take_dirty());
    assert_eq!(row(&uv_box, 0), " Start");
    assert_eq!(row(&uv_box, 1), ">Settings<");

    // Kein Umlauf, Links/Rechts ohne Wirkung im Hauptmenü
    press(&mut uv_box, &[Key::Down, Key::Left]);
    assert_eq!(row(&uv_box, 1), ">Settings<");

    press(&mut uv_box, &[Key::Enter]);
    assert_eq!(row(&uv_box, 0), ">Timer<");
    assert_eq!(row(&uv_box, 1), " Back light");

    press(&mut uv_box, &[Key::Right]);
    assert_eq!(row(&uv_box, 1), ">Settings<");
}

// ============================================================================
// Tests: Timer einstellen
// ============================================================================

#[test]
fn test_set_timer_saves_big_endian() {
    let mut uv_box = uv_box(0, false);

    press(&mut uv_box, &[Key::Down, Key::Enter, Key::Enter]);
    assert_eq!(row(&uv_box, 0), "Timer");
    assert_eq!(row(&uv_box, 2), "   00:00:00");
    assert_eq!(row(&uv_box, 4), "Seconds");

    press(&mut uv_box, &[Key::Up, Key::Up, Key::Up, Key::Up, Key::Up]);
    press(&mut uv_box, &[Key::Left, Key::Up, Key::Up]);
    assert_eq!(row(&uv_box, 2), "   00:02:05");
    assert_eq!(row(&uv_box, 4), "Minutes");

    press(&mut uv_box, &[Key::Enter]);

    assert_eq!(&uv_box.storage().store().bytes[..4], &[0, 0, 0, 125]);
    assert_eq!(uv_box.stored_timer().as_secs(), 125);
    // Zurück im Einstellungsmenü
    assert_eq!(row(&uv_box, 0), ">Timer<");
}

#[test]
fn test_set_timer_wraps_fields() {
    let mut uv_box = uv_box(0, false);

    press(&mut uv_box, &[Key::Down, Key::Enter, Key::Enter]);
    press(&mut uv_box, &[Key::Left, Key::Left, Key::Down, Key::Enter]);

    assert_eq!(uv_box.stored_timer().as_secs(), 59 * 3600);
}

#[test]
fn test_failed_save_still_returns_to_settings() {
    let mut store = RamStore::with(&[0; 16]);
    store.fail_writes = true;
    let mut uv_box = UvBox::new(store, 16, MockUvOutputs::default()).unwrap();

    press(&mut uv_box, &[Key::Down, Key::Enter, Key::Enter, Key::Up]);
    assert_eq!(uv_box.handle_key(Key::Enter), Err(StorageError::Io));
    assert_eq!(row(&uv_box, 0), ">Timer<");
}

// ============================================================================
// Tests: Hintergrundbeleuchtung
// ============================================================================

#[test]
fn test_backlight_preview_and_revert() {
    let mut uv_box = uv_box(0, false);

    press(&mut uv_box, &[Key::Down, Key::Enter, Key::Down, Key::Enter]);
    assert_eq!(row(&uv_box, 0), "Back light");
    assert_eq!(row(&uv_box, 2), "back light:");
    assert_eq!(uv_box.screen().row(3), "           off");

    press(&mut uv_box, &[Key::Up]);
    assert!(uv_box.outputs().backlight);
    assert_eq!(uv_box.screen().row(3), "            on");
    // Vorschau wird nicht gespeichert
    assert_eq!(uv_box.storage().store().bytes[4], 0);

    press(&mut uv_box, &[Key::Left]);
    assert!(!uv_box.outputs().backlight);
    assert_eq!(row(&uv_box, 1), ">Back light<");
}

#[test]
fn test_backlight_save() {
    let mut uv_box = uv_box(0, false);

    press(&mut uv_box, &[Key::Down, Key::Enter, Key::Down, Key::Enter]);
    press(&mut uv_box, &[Key::Down, Key::Enter]);

    assert!(uv_box.outputs().backlight);
    assert_eq!(uv_box.storage().store().bytes[4], 1);
    assert!(uv_box.stored_backlight());
}

// ============================================================================
// Tests: Belichtung
// ============================================================================

#[test]
fn test_exposure_counts_down_and_stops() {
    let mut uv_box = uv_box(3, false);

    press(&mut uv_box, &[Key::Enter]);
    assert_eq!(row(&uv_box, 1), "set to:");
    assert_eq!(row(&uv_box, 2), "   00:00:03");
    assert!(!uv_box.is_exposing());

    press(&mut uv_box, &[Key::Enter]);
    assert!(uv_box.is_exposing());
    assert!(uv_box.outputs().trigger);
    assert!(uv_box.outputs().backlight);
    assert_eq!(row(&uv_box, 1), "exposing:");

    // Enter während der Belichtung ändert nichts
    press(&mut uv_box, &[Key::Enter]);
    assert!(uv_box.is_exposing());

    uv_box.tick_second();
    uv_box.tick_second();
    assert_eq!(row(&uv_box, 2), "   00:00:01");
    assert!(uv_box.outputs().trigger);

    uv_box.tick_second();
    assert!(!uv_box.is_exposing());
    assert!(!uv_box.outputs().trigger);
    // Beleuchtung zurück auf den gespeicherten Wert
    assert!(!uv_box.outputs().backlight);
    assert_eq!(row(&uv_box, 0), ">Start<");
    assert_eq!(uv_box.outputs().exposures, 1);
}

#[test]
fn test_arrow_aborts_exposure() {
    let mut uv_box = uv_box(600, true);

    press(&mut uv_box, &[Key::Enter, Key::Enter]);
    uv_box.tick_second();
    assert!(uv_box.outputs().trigger);

    press(&mut uv_box, &[Key::Right]);
    assert!(!uv_box.outputs().trigger);
    assert!(uv_box.outputs().backlight);
    assert_eq!(row(&uv_box, 0), ">Start<");

    // Gespeicherte Zeit bleibt unverändert
    assert_eq!(uv_box.stored_timer().as_secs(), 600);
}

#[test]
fn test_arrow_before_start_cancels() {
    let mut uv_box = uv_box(600, false);

    press(&mut uv_box, &[Key::Enter, Key::Down]);
    assert_eq!(row(&uv_box, 0), ">Start<");
    assert_eq!(uv_box.outputs().exposures, 0);
}

#[test]
fn test_zero_timer_does_not_start() {
    let mut uv_box = uv_box(0, false);

    press(&mut uv_box, &[Key::Enter, Key::Enter]);

    assert!(!uv_box.is_exposing());
    assert_eq!(uv_box.outputs().exposures, 0);
    assert_eq!(row(&uv_box, 0), ">Start<");
}

#[test]
fn test_tick_outside_exposure_is_ignored() {
    let mut uv_box = uv_box(5, false);
    uv_box.take_dirty();

    uv_box.tick_second();
    assert!(!uv_box.take_dirty());

    press(&mut uv_box, &[Key::Enter]);
    uv_box.take_dirty();
    uv_box.tick_second();
    assert!(!uv_box.take_dirty());
    assert_eq!(row(&uv_box, 2), "   00:00:05");
}
