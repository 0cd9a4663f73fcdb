// Web-Modul für die HTTP-Server der Geräte
// Organisiert Protokoll, Antworten und Handler

pub mod inverter_api;
pub mod led_api;
pub mod lights_api;
pub mod motion_api;
pub mod protocol;
pub mod response;
pub mod socket_api;

pub use response::ApiResponse;

// HTML-Datei zur Compile-Zeit einbinden
// Die Seite lädt den Zustand per /api/status nach
pub const LED_INDEX_HTML: &str = include_str!("led_index.html");

/// Startseite der Wechselrichter-Bridge
pub const INVERTER_INDEX_HTML: &str = "<div>ESB Driver</div>\
<div><a href=\"/params\">params</a></div>\
<div><a href=\"/stats\">stats</a></div>";

/// Statusseiten von Steckdose, Bewegungsmelder und Lichtsteuerung
/// (laden `/api/status` nach)
pub const SOCKET_INDEX_HTML: &str = include_str!("socket_index.html");
pub const MOTION_INDEX_HTML: &str = include_str!("motion_index.html");
pub const LIGHTS_INDEX_HTML: &str = include_str!("lights_index.html");
