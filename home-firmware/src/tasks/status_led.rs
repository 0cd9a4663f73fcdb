// Status-LED Task - Zeigt den Gerätezustand auf der Onboard-WS2812
use defmt::{Debug2Format, error, info};
use embassy_futures::select::{Either, Either3, select, select3};
use embassy_time::Timer;
use esp_hal_smartled::smart_led_buffer;
use home_core::SmartLedWriter;
use home_core::status::{DeviceMode, StatusBlinker, StatusPattern};
use rgb::RGB8;

use crate::config::{LED_BRIGHTNESS, LED_GPIO_PIN, RMT_CLOCK_MHZ};
use crate::hal::RmtLedWriter;
use crate::tasks::wifi::is_configured;
use crate::{ActivityReceiver, LinkReceiver};

/// Farbe der Status-LED
const STATUS_COLOR: RGB8 = RGB8 {
    r: 0,
    g: 0,
    b: LED_BRIGHTNESS,
};

fn device_mode(link_up: bool) -> DeviceMode {
    if !is_configured() {
        DeviceMode::Unconfigured
    } else if link_up {
        DeviceMode::Normal
    } else {
        DeviceMode::Connecting
    }
}

/// Status-LED Logic - Testbare Business Logic ohne Hardware-Abhängigkeit
///
/// - Leitet das Muster aus WLAN-Status und lokaler Aktivität ab
/// - Blinkt im Takt des Musters
/// - Dauerhafte Muster warten ohne Timer auf die nächste Änderung
///
/// # Parameter
/// - `led`: LED Writer (Hardware oder Mock)
/// - `link_receiver`: WLAN-Status
/// - `activity_receiver`: lokale Aktivität (z.B. Bewegung)
pub async fn status_led_logic<L: SmartLedWriter>(
    mut led: L,
    mut link_receiver: LinkReceiver,
    mut activity_receiver: ActivityReceiver,
) {
    let mut blinker = StatusBlinker::new(STATUS_COLOR);
    let mut link_up = link_receiver.try_get().unwrap_or(false);
    let mut active = activity_receiver.try_get().unwrap_or(false);

    loop {
        let pattern = StatusPattern::for_mode(device_mode(link_up), active);
        if blinker.apply(pattern) {
            info!("Status: Pattern {}", Debug2Format(&pattern));
        }

        let frame = blinker.next_frame();
        if led.write(frame.color).is_err() {
            error!("Status: Failed to write to LED");
        }

        // Warten auf Ablauf der Phase oder eine Zustandsänderung
        match frame.hold_ms {
            Some(hold_ms) => {
                match select3(
                    Timer::after_millis(hold_ms as u64),
                    link_receiver.changed(),
                    activity_receiver.changed(),
                )
                .await
                {
                    Either3::First(_) => {}
                    Either3::Second(up) => link_up = up,
                    Either3::Third(now_active) => active = now_active,
                }
            }
            None => match select(link_receiver.changed(), activity_receiver.changed()).await {
                Either::First(up) => link_up = up,
                Either::Second(now_active) => active = now_active,
            },
        }
    }
}

/// Status-LED Task - Embassy Task für parallele Ausführung
///
/// Dieser Task übernimmt die Hardware-Initialisierung und ruft dann
/// die testbare `status_led_logic()` Funktion auf.
#[embassy_executor::task]
pub async fn status_led_task(
    gpio8: esp_hal::peripherals::GPIO8<'static>,
    rmt_peripheral: esp_hal::peripherals::RMT<'static>,
    link_receiver: LinkReceiver,
    activity_receiver: ActivityReceiver,
) {
    // Buffer für SmartLED Daten erstellen (1 LED)
    let mut rmt_buffer = smart_led_buffer!(1);

    let led = match RmtLedWriter::new(gpio8, rmt_peripheral, RMT_CLOCK_MHZ, &mut rmt_buffer) {
        Ok(led) => led,
        Err(e) => {
            error!("Status: LED init failed: {}", e);
            return;
        }
    };

    info!("Status: LED ready on GPIO{}", LED_GPIO_PIN);
    status_led_logic(led, link_receiver, activity_receiver).await;
}
