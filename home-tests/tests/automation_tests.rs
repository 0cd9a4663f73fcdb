//! Integration Tests für die LED-Automatik
//!
//! Zeitachse in Millisekunden seit Start, wie `embassy_time::Instant`

use home_core::automation::{
    AutomationEngine, AutomationError, AutomationSettings, ControlMode, FadeCommand, ItemConfig,
    channel_count, channel_range,
};
use home_core::boot::{BootPhase, BootSequence};

static ITEMS: [ItemConfig; 3] = [
    ItemConfig {
        name: "Kitchen Counter",
        led_gpios: &[2, 3],
        sensors: &["kitchen-sensor-1"],
    },
    ItemConfig {
        name: "Stairs",
        led_gpios: &[4],
        sensors: &["stairs-sensor-1", "stairs-sensor-2"],
    },
    ItemConfig {
        name: "Hallway",
        led_gpios: &[5],
        sensors: &["stairs-sensor-2"],
    },
];

fn engine() -> AutomationEngine {
    AutomationEngine::new(&ITEMS, AutomationSettings::default()).unwrap()
}

fn fade(item: usize, brightness: u8) -> FadeCommand {
    FadeCommand {
        item,
        brightness,
        duration_ms: 1000,
    }
}

// ============================================================================
// Tests: Bewegung und Timer
// ============================================================================

#[test]
fn test_motion_turns_on_item_and_timer_turns_off() {
    let mut engine = engine();

    let fades = engine.handle_motion("kitchen-sensor-1", true, 1_000);
    assert_eq!(fades.as_slice(), &[fade(0, 50)]);

    let state = engine.item_state(0).unwrap();
    assert!(state.is_on);
    assert_eq!(state.timer_end_ms, Some(31_000));

    // Vor Ablauf passiert nichts
    assert!(engine.tick(30_999).is_empty());
    assert_eq!(engine.tick(31_000).as_slice(), &[fade(0, 0)]);
    assert!(!engine.item_state(0).unwrap().is_on);
}

#[test]
fn test_motion_retriggers_timer() {
    let mut engine = engine();

    engine.handle_motion("stairs-sensor-1", true, 0);
    engine.handle_motion("stairs-sensor-1", true, 20_000);

    assert!(engine.tick(30_000).is_empty());
    assert_eq!(engine.tick(50_000).as_slice(), &[fade(1, 0)]);
}

#[test]
fn test_sensor_shared_by_two_items() {
    let mut engine = engine();

    let fades = engine.handle_motion("stairs-sensor-2", true, 0);
    assert_eq!(fades.as_slice(), &[fade(1, 50), fade(2, 50)]);
}

#[test]
fn test_motion_cleared_and_unknown_sensor_do_nothing() {
    let mut engine = engine();

    assert!(engine.handle_motion("kitchen-sensor-1", false, 0).is_empty());
    assert!(engine.handle_motion("garage-sensor", true, 0).is_empty());
    assert!(!engine.item_state(0).unwrap().is_on);
}

// ============================================================================
// Tests: Manuelle Steuerung
// ============================================================================

#[test]
fn test_manual_on_ignores_motion_until_override_ends() {
    let mut engine = engine();

    let on = engine.set_manual(0, true, Some(80), 0).unwrap();
    assert_eq!(on, fade(0, 80));
    assert_eq!(engine.item_state(0).unwrap().control_mode, ControlMode::Manual);
    assert_eq!(engine.override_end_ms(), Some(3_600_000));

    // Bewegung ändert manuelle Items nicht
    assert!(engine.handle_motion("kitchen-sensor-1", true, 10_000).is_empty());
    assert_eq!(engine.item_state(0).unwrap().brightness, 80);

    // Override läuft ab → zurück in Automatik, ausgeblendet
    assert!(engine.tick(3_599_999).is_empty());
    assert_eq!(engine.tick(3_600_000).as_slice(), &[fade(0, 0)]);

    let state = engine.item_state(0).unwrap();
    assert_eq!(state.control_mode, ControlMode::Automatic);
    assert!(!state.is_on);
    assert_eq!(engine.override_end_ms(), None);
}

#[test]
fn test_manual_on_uses_configured_brightness() {
    let mut engine = engine();
    let on = engine.set_manual(1, true, None, 0).unwrap();
    assert_eq!(on.brightness, 50);

    let on = engine.set_manual(2, true, Some(255), 0).unwrap();
    assert_eq!(on.brightness, 100);
}

#[test]
fn test_manual_off_returns_to_automatic() {
    let mut engine = engine();
    engine.set_manual(1, true, None, 0).unwrap();

    let off = engine.set_manual(1, false, None, 5_000).unwrap();
    assert_eq!(off, fade(1, 0));

    let state = engine.item_state(1).unwrap();
    assert_eq!(state.control_mode, ControlMode::Automatic);
    assert!(!state.is_on);

    // Sofort wieder bewegungsgesteuert
    assert_eq!(
        engine.handle_motion("stairs-sensor-1", true, 6_000).as_slice(),
        &[fade(1, 50)]
    );
}

#[test]
fn test_manual_invalid_item() {
    let mut engine = engine();
    assert_eq!(
        engine.set_manual(3, true, None, 0),
        Err(AutomationError::InvalidItem)
    );
}

// ============================================================================
// Tests: Einstellungen
// ============================================================================

#[test]
fn test_settings_change_timer_and_brightness() {
    let mut engine = engine();

    let mut settings = *engine.settings();
    settings.automation_timer_secs = 5;
    settings.fade_duration_secs = 2;
    settings.item_brightness[0] = 120;
    engine.update_settings(settings);

    assert_eq!(engine.settings().item_brightness[0], 100);
    assert_eq!(engine.item_state(0).unwrap().brightness, 100);

    let fades = engine.handle_motion("kitchen-sensor-1", true, 0);
    assert_eq!(
        fades.as_slice(),
        &[FadeCommand {
            item: 0,
            brightness: 100,
            duration_ms: 2000,
        }]
    );
    assert_eq!(engine.tick(5_000).len(), 1);
}

#[test]
fn test_too_many_items_rejected() {
    static MANY: [ItemConfig; 7] = [
        ItemConfig { name: "1", led_gpios: &[], sensors: &[] },
        ItemConfig { name: "2", led_gpios: &[], sensors: &[] },
        ItemConfig { name: "3", led_gpios: &[], sensors: &[] },
        ItemConfig { name: "4", led_gpios: &[], sensors: &[] },
        ItemConfig { name: "5", led_gpios: &[], sensors: &[] },
        ItemConfig { name: "6", led_gpios: &[], sensors: &[] },
        ItemConfig { name: "7", led_gpios: &[], sensors: &[] },
    ];
    assert_eq!(
        AutomationEngine::new(&MANY, AutomationSettings::default()).err(),
        Some(AutomationError::TooManyItems)
    );
}

// ============================================================================
// Tests: Boot-Anzeige
// ============================================================================

#[test]
fn test_boot_sequence_lost_link_and_reconnect() {
    let mut boot = BootSequence::new(1000);
    boot.poll(0);

    boot.on_link(true, 1_000).unwrap();
    boot.poll(11_000).unwrap();
    assert!(boot.is_normal());

    // Verbindungsverlust: Notlicht, Automatik gesperrt
    let action = boot.on_link(false, 20_000).unwrap();
    assert_eq!(action.brightness, 10);
    assert_eq!(boot.phase(), BootPhase::Offline);
    assert!(!boot.is_normal());

    // Wiederverbunden: erneute Bestätigung, dann Normalbetrieb
    assert_eq!(boot.on_link(true, 30_000).unwrap().brightness, 20);
    assert_eq!(boot.poll(40_000).unwrap().brightness, 0);
    assert!(boot.is_normal());

    // Doppelte Meldungen ändern nichts
    assert_eq!(boot.on_link(true, 41_000), None);
}

// ============================================================================
// Tests: PWM-Kanäle
// ============================================================================

#[test]
fn test_channel_count_matches_ranges() {
    let channels = channel_count(&ITEMS);
    assert_eq!(channels, 4);
    assert_eq!(channel_range(&ITEMS, 0), 0..2);
    assert_eq!(channel_range(&ITEMS, 2), 3..4);
    assert_eq!(channel_range(&ITEMS, ITEMS.len() - 1).end, channels);
    assert_eq!(channel_count(&[]), 0);
}

#[test]
fn test_channel_count_in_const_context() {
    const SINGLE: [ItemConfig; 1] = [ItemConfig {
        name: "Porch",
        led_gpios: &[6, 7],
        sensors: &[],
    }];
    const CHANNELS: usize = channel_count(&SINGLE);
    assert_eq!(CHANNELS, 2);
}
