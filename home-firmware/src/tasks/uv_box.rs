// UV-Box Task - Tastatur, Countdown und Display
use defmt::{error, info};
use embassy_time::{Duration, Instant, Ticker};
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;
use embedded_hal_bus::spi::ExclusiveDevice;
use esp_hal::Blocking;
use esp_hal::delay::Delay;
use esp_hal::gpio::{Input, Output};
use esp_hal::spi::master::Spi;
use home_core::ByteStore;
use home_core::uvbox::{KeyScanner, UvBox, UvOutputs};

use crate::EepromStore;
use crate::config::KEY_SCAN_MS;
use crate::hal::{FrameBuffer, GpioUvOutputs, Pcd8544};

/// Tasten in der Reihenfolge von `Key::ALL` (Hoch, Runter, Links, Rechts, Enter)
pub type KeyInputs = [Input<'static>; 5];

/// UV-Box mit EEPROM am I²C-Bus und GPIO-Ausgängen
pub type UvBoxDevice = UvBox<EepromStore, GpioUvOutputs>;

/// PCD8544 am SPI-Bus (CS, DC und RST als GPIO)
pub type UvDisplay = Pcd8544<
    ExclusiveDevice<Spi<'static, Blocking>, Output<'static>, Delay>,
    Output<'static>,
    Output<'static>,
>;

/// UV-Box Logic
///
/// - Fragt alle 20 ms die Tasten ab (Flanken, erste Taste gewinnt)
/// - Zählt während der Belichtung im Sekundentakt herunter
/// - Überträgt den Bildschirm nur nach Änderungen
pub async fn uv_box_logic<S, O, SPI, DC, RST>(
    mut uv_box: UvBox<S, O>,
    keys: KeyInputs,
    mut display: Pcd8544<SPI, DC, RST>,
) where
    S: ByteStore,
    O: UvOutputs,
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
{
    let mut scanner = KeyScanner::new();
    let mut frame = FrameBuffer::new();
    let mut ticker = Ticker::every(Duration::from_millis(KEY_SCAN_MS));
    let mut next_second = Instant::now() + Duration::from_secs(1);

    loop {
        // Tasten sind low-aktiv (Pull-up)
        let levels = [
            keys[0].is_low(),
            keys[1].is_low(),
            keys[2].is_low(),
            keys[3].is_low(),
            keys[4].is_low(),
        ];
        if let Some(key) = scanner.scan(levels) {
            info!("UV: Key {}", key);
            if let Err(e) = uv_box.handle_key(key) {
                error!("UV: Saving setting failed: {}", e);
            }
        }

        // Countdown läuft nur während der Belichtung, dann im festen Raster
        if uv_box.is_exposing() {
            if Instant::now() >= next_second {
                next_second += Duration::from_secs(1);
                uv_box.tick_second();
                if !uv_box.is_exposing() {
                    info!("UV: Exposure finished");
                }
            }
        } else {
            next_second = Instant::now() + Duration::from_secs(1);
        }

        if uv_box.take_dirty() {
            frame.draw_screen(uv_box.screen());
            if let Err(e) = display.flush(&frame) {
                error!("UV: Display update failed: {}", e);
            }
        }

        ticker.next().await;
    }
}

/// UV-Box Task - Embassy Task für die konkrete Hardware
#[embassy_executor::task]
pub async fn uv_box_task(
    uv_box: UvBoxDevice,
    keys: KeyInputs,
    display: UvDisplay,
) {
    info!("UV: Box ready");
    uv_box_logic(uv_box, keys, display).await;
}
