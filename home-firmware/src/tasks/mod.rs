// Task-Modul: Enthält alle Embassy Tasks der Geräte-Images
//
// Jeder Task läuft asynchron und unabhängig.
// Tasks kommunizieren über Embassy Channels und Watches
// (WLAN → Status-LED/Automatik/Steckdose, HTTP/Automatik → Dimmer,
// PIR → Reporter, HTTP → Lichter).

pub mod automation;
pub mod dimmer;
pub mod http;
pub mod lights;
pub mod motion;
pub mod net;
pub mod sntp;
pub mod socket;
pub mod status_led;
pub mod uv_box;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use automation::automation_task;
pub use dimmer::dimmer_task;
pub use http::{
    inverter_http_task, led_http_task, lights_http_task, motion_http_task, socket_http_task,
};
pub use lights::lights_task;
pub use motion::{pir_task, reporter_task};
pub use sntp::sntp_task;
pub use socket::socket_task;
pub use status_led::status_led_task;
pub use uv_box::uv_box_task;
pub use wifi::{connection_task, link_task, net_task};
