// Hardware Abstraction Layer (HAL) Module
//
// Dieses Modul implementiert die Hardware-Traits aus home-core
// für die ESP32-C6 Peripherie.

pub mod eeprom;
pub mod led_writer;
pub mod ledc_dimmer;
pub mod pcd8544;
pub mod relay;
pub mod uart_link;
pub mod uv_outputs;

pub use eeprom::Eeprom24;
pub use led_writer::RmtLedWriter;
pub use ledc_dimmer::{LedcDimmer, LedcError};
pub use pcd8544::{DisplayError, FrameBuffer, Pcd8544};
pub use relay::GpioRelay;
pub use uart_link::UartInverterLink;
pub use uv_outputs::GpioUvOutputs;
