//! LED-Automatik: Bewegungsmelder schalten LED-Streifen
//!
//! Jedes Item (z.B. "Stairs") hat eigene LED-Streifen und Sensoren.
//! Im Automatik-Modus schaltet Bewegung das Item für eine feste Zeit ein,
//! im manuellen Modus bleibt es bis zum Ablauf des globalen Overrides
//! so wie gesetzt.
//!
//! Alle Zeiten sind Millisekunden einer monotonen Uhr.

use core::ops::Range;

use heapless::Vec;

/// Maximale Anzahl Items
pub const MAX_ITEMS: usize = 6;
/// Maximale Anzahl LED-Streifen pro Item
pub const MAX_LED_STRIPS_PER_ITEM: usize = 2;
/// Maximale Anzahl Sensoren pro Item
pub const MAX_SENSORS_PER_ITEM: usize = 2;

/// Maximale Helligkeit in Prozent
pub const MAX_BRIGHTNESS: u8 = 100;

/// Statische Beschreibung eines Items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemConfig {
    pub name: &'static str,
    /// GPIOs der LED-Streifen (je ein PWM-Kanal)
    pub led_gpios: &'static [u8],
    /// Namen der Bewegungsmelder, die dieses Item auslösen
    pub sensors: &'static [&'static str],
}

impl ItemConfig {
    pub fn listens_to(&self, sensor: &str) -> bool {
        self.sensors.iter().any(|name| *name == sensor)
    }
}

/// PWM-Kanäle eines Items
///
/// Kanäle werden in Tabellen-Reihenfolge durchnummeriert.
pub fn channel_range(items: &[ItemConfig], index: usize) -> Range<usize> {
    let start: usize = items[..index].iter().map(|item| item.led_gpios.len()).sum();
    start..start + items[index].led_gpios.len()
}

/// Anzahl PWM-Kanäle aller Items, auch zur Compile-Zeit auswertbar
pub const fn channel_count(items: &[ItemConfig]) -> usize {
    let mut count = 0;
    let mut index = 0;
    while index < items.len() {
        count += items[index].led_gpios.len();
        index += 1;
    }
    count
}

/// Zur Laufzeit änderbare Einstellungen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutomationSettings {
    /// Nachlaufzeit nach der letzten Bewegung
    pub automation_timer_secs: u32,
    /// Dauer des manuellen Overrides
    pub manual_override_hours: u32,
    /// Dauer eines Überblendvorgangs
    pub fade_duration_secs: u32,
    /// Helligkeit pro Item in Prozent
    pub item_brightness: [u8; MAX_ITEMS],
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            automation_timer_secs: 30,
            manual_override_hours: 1,
            fade_duration_secs: 1,
            item_brightness: [50; MAX_ITEMS],
        }
    }
}

impl AutomationSettings {
    pub fn fade_duration_ms(&self) -> u32 {
        self.fade_duration_secs.saturating_mul(1000)
    }

    fn clamped(mut self) -> Self {
        for brightness in self.item_brightness.iter_mut() {
            *brightness = (*brightness).min(MAX_BRIGHTNESS);
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    Automatic,
    Manual,
}

impl ControlMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ControlMode::Automatic => "automatic",
            ControlMode::Manual => "manual",
        }
    }
}

/// Laufzeit-Zustand eines Items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemState {
    pub control_mode: ControlMode,
    pub is_on: bool,
    pub brightness: u8,
    /// Ausschaltzeitpunkt im Automatik-Modus
    pub timer_end_ms: Option<u64>,
}

/// Überblendung eines Items auf eine Helligkeit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeCommand {
    pub item: usize,
    pub brightness: u8,
    pub duration_ms: u32,
}

pub type FadeCommands = Vec<FadeCommand, MAX_ITEMS>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutomationError {
    /// Index oder Name unbekannt
    InvalidItem,
    /// Mehr Items als `MAX_ITEMS`
    TooManyItems,
    /// Zu viele LED-Streifen oder Sensoren an einem Item
    TooManyOutputs,
}

pub struct AutomationEngine {
    items: &'static [ItemConfig],
    settings: AutomationSettings,
    states: Vec<ItemState, MAX_ITEMS>,
    /// Ende des globalen manuellen Overrides
    override_end_ms: Option<u64>,
}

impl AutomationEngine {
    /// Alle Items starten im Automatik-Modus und ausgeschaltet
    pub fn new(
        items: &'static [ItemConfig],
        settings: AutomationSettings,
    ) -> Result<Self, AutomationError> {
        if items.len() > MAX_ITEMS {
            return Err(AutomationError::TooManyItems);
        }
        if items.iter().any(|item| {
            item.led_gpios.len() > MAX_LED_STRIPS_PER_ITEM
                || item.sensors.len() > MAX_SENSORS_PER_ITEM
        }) {
            return Err(AutomationError::TooManyOutputs);
        }

        let settings = settings.clamped();
        let mut states = Vec::new();
        for index in 0..items.len() {
            let _ = states.push(ItemState {
                control_mode: ControlMode::Automatic,
                is_on: false,
                brightness: settings.item_brightness[index],
                timer_end_ms: None,
            });
        }

        Ok(Self {
            items,
            settings,
            states,
            override_end_ms: None,
        })
    }

    pub fn items(&self) -> &'static [ItemConfig] {
        self.items
    }

    pub fn item_state(&self, index: usize) -> Option<&ItemState> {
        self.states.get(index)
    }

    pub fn item_index_by_name(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|item| item.name == name)
    }

    pub fn settings(&self) -> &AutomationSettings {
        &self.settings
    }

    /// Übernimmt neue Einstellungen (Helligkeit auf 0..=100 begrenzt)
    ///
    /// Ausgeschaltete Automatik-Items übernehmen die neue Helligkeit sofort,
    /// laufende Timer behalten ihr Ende.
    pub fn update_settings(&mut self, settings: AutomationSettings) {
        self.settings = settings.clamped();
        for (index, state) in self.states.iter_mut().enumerate() {
            if state.control_mode == ControlMode::Automatic && !state.is_on {
                state.brightness = self.settings.item_brightness[index];
            }
        }
    }

    pub fn override_end_ms(&self) -> Option<u64> {
        self.override_end_ms
    }

    /// Bewegungsmeldung eines Sensors
    ///
    /// Nur `detected == true` schaltet ein; das Ausschalten übernimmt der
    /// Timer. Items im manuellen Modus ignorieren Bewegung.
    pub fn handle_motion(&mut self, sensor: &str, detected: bool, now_ms: u64) -> FadeCommands {
        let mut commands = FadeCommands::new();
        if !detected {
            return commands;
        }

        let timer_ms = u64::from(self.settings.automation_timer_secs) * 1000;
        let fade_ms = self.settings.fade_duration_ms();

        for (index, item) in self.items.iter().enumerate() {
            let state = &mut self.states[index];
            if !item.listens_to(sensor) || state.control_mode != ControlMode::Automatic {
                continue;
            }

            let brightness = self.settings.item_brightness[index];
            state.is_on = true;
            state.brightness = brightness;
            state.timer_end_ms = Some(now_ms + timer_ms);
            let _ = commands.push(FadeCommand {
                item: index,
                brightness,
                duration_ms: fade_ms,
            });
        }
        commands
    }

    /// Manuelles Ein- oder Ausschalten über die HTTP-API
    ///
    /// Einschalten startet (oder verlängert) den globalen Override,
    /// Ausschalten gibt das Item an die Automatik zurück.
    pub fn set_manual(
        &mut self,
        index: usize,
        on: bool,
        brightness: Option<u8>,
        now_ms: u64,
    ) -> Result<FadeCommand, AutomationError> {
        let configured = *self
            .settings
            .item_brightness
            .get(index)
            .ok_or(AutomationError::InvalidItem)?;
        let fade_ms = self.settings.fade_duration_ms();
        let override_ms = u64::from(self.settings.manual_override_hours) * 3_600_000;
        let state = self
            .states
            .get_mut(index)
            .ok_or(AutomationError::InvalidItem)?;

        if on {
            let brightness = brightness.unwrap_or(configured).min(MAX_BRIGHTNESS);
            state.control_mode = ControlMode::Manual;
            state.is_on = true;
            state.brightness = brightness;
            state.timer_end_ms = None;
            self.override_end_ms = Some(now_ms + override_ms);

            Ok(FadeCommand {
                item: index,
                brightness,
                duration_ms: fade_ms,
            })
        } else {
            state.control_mode = ControlMode::Automatic;
            state.is_on = false;
            state.timer_end_ms = None;

            Ok(FadeCommand {
                item: index,
                brightness: 0,
                duration_ms: fade_ms,
            })
        }
    }

    /// Periodischer Durchlauf (1 s)
    ///
    /// 1. Abgelaufener Override: manuelle Items zurück in Automatik
    /// 2. Abgelaufene Automatik-Timer: Item ausblenden
    pub fn tick(&mut self, now_ms: u64) -> FadeCommands {
        let mut commands = FadeCommands::new();
        let fade_ms = self.settings.fade_duration_ms();

        if self.override_end_ms.is_some_and(|end| now_ms >= end) {
            self.override_end_ms = None;
            for (index, state) in self.states.iter_mut().enumerate() {
                if state.control_mode != ControlMode::Manual {
                    continue;
                }
                state.control_mode = ControlMode::Automatic;
                state.timer_end_ms = None;
                if state.is_on {
                    state.is_on = false;
                    let _ = commands.push(FadeCommand {
                        item: index,
                        brightness: 0,
                        duration_ms: fade_ms,
                    });
                }
            }
        }

        for (index, state) in self.states.iter_mut().enumerate() {
            let expired = state.timer_end_ms.is_some_and(|end| now_ms >= end);
            if state.control_mode == ControlMode::Automatic && state.is_on && expired {
                state.is_on = false;
                state.timer_end_ms = None;
                let _ = commands.push(FadeCommand {
                    item: index,
                    brightness: 0,
                    duration_ms: fade_ms,
                });
            }
        }
        commands
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for AutomationError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            AutomationError::InvalidItem => defmt::write!(fmt, "Invalid item"),
            AutomationError::TooManyItems => defmt::write!(fmt, "Too many items"),
            AutomationError::TooManyOutputs => defmt::write!(fmt, "Too many outputs per item"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FadeCommand {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "Fade {{ item: {}, brightness: {}%, {} ms }}",
            self.item,
            self.brightness,
            self.duration_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static ITEMS: [ItemConfig; 2] = [
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
    ];

    #[test]
    fn test_channel_range() {
        assert_eq!(channel_range(&ITEMS, 0), 0..2);
        assert_eq!(channel_range(&ITEMS, 1), 2..3);
    }

    #[test]
    fn test_new_starts_automatic_and_off() {
        let engine = AutomationEngine::new(&ITEMS, AutomationSettings::default()).unwrap();
        let state = engine.item_state(1).unwrap();
        assert_eq!(state.control_mode, ControlMode::Automatic);
        assert!(!state.is_on);
        assert_eq!(state.brightness, 50);
        assert_eq!(engine.item_index_by_name("Stairs"), Some(1));
        assert_eq!(engine.item_index_by_name("Garage"), None);
    }

    #[test]
    fn test_brightness_clamped() {
        let mut settings = AutomationSettings::default();
        settings.item_brightness[0] = 180;
        let engine = AutomationEngine::new(&ITEMS, settings).unwrap();
        assert_eq!(engine.settings().item_brightness[0], 100);
    }

    #[test]
    fn test_too_many_strips_rejected() {
        static WIDE: [ItemConfig; 1] = [ItemConfig {
            name: "Hall",
            led_gpios: &[1, 2, 3],
            sensors: &[],
        }];
        assert_eq!(
            AutomationEngine::new(&WIDE, AutomationSettings::default()).err(),
            Some(AutomationError::TooManyOutputs)
        );
    }
}
