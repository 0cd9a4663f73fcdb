// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
//
// Gemeinsame Werte oben, danach ein Abschnitt pro Gerät.

use home_core::automation::{ItemConfig, channel_count};
use home_core::lights::MAX_LIGHTS;
use home_core::socket::SwitchMode;

// ============================================================================
// Status-LED Konfiguration (Onboard WS2812)
// ============================================================================

/// GPIO-Pin für die RGB LED (WS2812/Neopixel)
pub const LED_GPIO_PIN: u8 = 8;

/// Helligkeits-Level für die Status-LED (0-255)
/// Wert ist gedimmt für Augenschonung
pub const LED_BRIGHTNESS: u8 = 10;

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen.
/// Leer = Gerät ist nicht konfiguriert (Status-LED blinkt langsam)
pub const WIFI_SSID: &str = env!("WIFI_SSID");

/// WiFi Passwort
/// Wird zur Build-Zeit aus der Environment Variable WIFI_PASSWORD geladen
pub const WIFI_PASSWORD: &str = env!("WIFI_PASSWORD");

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

/// Wartezeit nach fehlgeschlagenem Verbindungsversuch
pub const WIFI_RETRY_DELAY_SECS: u64 = 5;

/// DNS Query Timeout in Sekunden
pub const DNS_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// HTTP Server Konfiguration
// ============================================================================

/// HTTP Port aller Geräte
pub const HTTP_PORT: u16 = 80;

/// HTTP Buffer-Größe in Bytes
/// Für HTTP Request/Response Headers und Body
pub const HTTP_BUFFER_SIZE: usize = 1024;

/// TCP RX Buffer-Größe in Bytes
pub const TCP_RX_BUFFER_SIZE: usize = 1024;

/// TCP TX Buffer-Größe in Bytes
pub const TCP_TX_BUFFER_SIZE: usize = 1024;

/// Maximale Größe eines JSON-Request-Bodys
pub const JSON_REQUEST_SIZE: usize = 256;

/// JSON Serialisierungs-Buffer für Antworten
/// Für {"items":[...]} mit MAX_ITEMS Einträgen
pub const JSON_RESPONSE_BUFFER_SIZE: usize = 768;

/// Text-Antworten (z.B. rohe QPIGS-Daten)
pub const TEXT_RESPONSE_BUFFER_SIZE: usize = 192;

// ============================================================================
// LED-Server Konfiguration
// ============================================================================

/// Items des LED-Servers
///
/// Die GPIOs müssen zu den LEDC-Kanälen in `bin/led_server.rs` passen,
/// Kanäle werden in Tabellen-Reihenfolge vergeben.
pub const ITEMS: &[ItemConfig] = &[
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

/// Anzahl PWM-Kanäle (Summe der LED-Streifen aller Items)
pub const PWM_CHANNELS: usize = 3;

// Tabelle und Kanalzahl müssen zusammen geändert werden
const _: () = assert!(PWM_CHANNELS == channel_count(ITEMS));

/// LEDC PWM-Frequenz in kHz
pub const PWM_FREQUENCY_KHZ: u32 = 5;

/// Tick der Software-Überblendung
pub const DIMMER_TICK_MS: u32 = 20;

/// Takt der Automatik (Timer-Prüfung)
pub const AUTOMATION_TICK_MS: u64 = 1000;

/// Takt der Boot-Anzeige (Blinken)
pub const BOOT_POLL_MS: u64 = 100;

// ============================================================================
// Bewegungsmelder Konfiguration
// ============================================================================

/// GPIO des PIR-Sensors
pub const PIR_GPIO_PIN: u8 = 5;

/// Hostname oder IP des LED-Servers (leer = keine Meldungen)
pub const LED_SERVER_HOST: &str = env!("LED_SERVER_HOST");

/// Name dieses Sensors, muss in `ITEMS` des LED-Servers stehen
pub const MOTION_SENSOR_NAME: &str = env!("MOTION_SENSOR_NAME");

/// Timeout pro HTTP-Versuch
pub const REPORT_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// Wechselrichter-Bridge Konfiguration
// ============================================================================

/// Baudrate der seriellen Schnittstelle des Wechselrichters
pub const INVERTER_BAUDRATE: u32 = 2400;

/// Maximale Wartezeit auf eine Antwort
pub const INVERTER_TIMEOUT_MS: u64 = 1000;

/// NTP-Server
pub const NTP_HOST: &str = "pool.ntp.org";

/// Lokaler UDP-Port für SNTP
pub const NTP_LOCAL_PORT: u16 = 50123;

/// Zeitzone: Offset zu UTC in Sekunden (MEZ)
pub const TIME_OFFSET_SECS: i32 = 3600;

/// Abstand der Zeit-Synchronisation
pub const NTP_SYNC_INTERVAL_SECS: u64 = 60;

/// Wartezeit auf die NTP-Antwort
pub const NTP_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// UV-Box Konfiguration
// ============================================================================

/// 7-Bit I²C-Adresse des EEPROMs (24C32, A0..A2 auf GND)
pub const EEPROM_ADDRESS: u8 = 0x50;

/// Kapazität des EEPROMs in Bytes
pub const EEPROM_CAPACITY: u16 = 4096;

/// Seitengröße für Schreibzugriffe
pub const EEPROM_PAGE_SIZE: usize = 32;

/// Schreibzyklus-Zeit des EEPROMs
pub const EEPROM_WRITE_CYCLE_MS: u32 = 5;

/// SPI-Takt des PCD8544 in kHz
pub const DISPLAY_SPI_KHZ: u32 = 4000;

/// Abfrage-Intervall der Tasten (Entprellung)
pub const KEY_SCAN_MS: u64 = 20;

// ============================================================================
// Steckdose Konfiguration
// ============================================================================

/// Anzeigename der Steckdose
pub const SOCKET_NAME: &str = "PV Socket";

/// GPIO des Relais (aktiv-high)
pub const SOCKET_RELAY_GPIO_PIN: u8 = 5;

/// Schaltverhalten dieser Steckdose
pub const SOCKET_SWITCH_MODE: SwitchMode = SwitchMode::Surplus;

/// Hostname oder IP der Wechselrichter-Bridge (leer = Steckdose bleibt aus)
pub const INVERTER_BRIDGE_HOST: &str = env!("INVERTER_BRIDGE_HOST");

/// Abstand der `/params`-Abfragen
pub const SOCKET_POLL_SECS: u64 = 60;

/// Timeout einer Abfrage
pub const SOCKET_REQUEST_TIMEOUT_SECS: u64 = 5;

// ============================================================================
// Lichtsteuerung Konfiguration
// ============================================================================

/// Namen der Lichter, Reihenfolge wie die LEDC-Kanäle in
/// `bin/lights_driver.rs` (GPIO2, GPIO3)
pub const LIGHT_NAMES: &[&str] = &["Fish Tank", "Plants"];

/// Anzahl PWM-Kanäle der Lichtsteuerung
pub const LIGHT_CHANNELS: usize = 2;

const _: () = assert!(LIGHT_NAMES.len() == LIGHT_CHANNELS && LIGHT_CHANNELS <= MAX_LIGHTS);

/// Beginn des Tagesbetriebs (lokale Stunde)
pub const LIGHT_DAY_START_HOUR: u8 = 10;

/// Ende des Tagesbetriebs (lokale Stunde, nicht mehr enthalten)
pub const LIGHT_DAY_END_HOUR: u8 = 19;

/// Abstand der Zeitplan-Prüfung
pub const LIGHT_CHECK_SECS: u64 = 60;

/// Sanftes Auf- und Abblenden nach Zeitplan
pub const LIGHT_SCHEDULE_FADE_MS: u32 = 25_500;

/// Überblendung nach Änderungen über HTTP
pub const LIGHT_MANUAL_FADE_MS: u32 = 300;
