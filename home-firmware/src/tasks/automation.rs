// Automatik Task - Boot-Anzeige, WLAN-Status und Timer der Items
use defmt::{Debug2Format, info};
use embassy_futures::select::{Either, select};
use embassy_time::{Instant, Timer};
use heapless::Vec;
use home_core::automation::{FadeCommand, MAX_ITEMS};
use home_core::boot::{BootAction, BootSequence};

use crate::config::{AUTOMATION_TICK_MS, BOOT_POLL_MS};
use crate::{DimmerRequest, DimmerSender, LinkReceiver, SharedAutomation};

async fn send_boot_action(dimmer: &DimmerSender, boot: &BootSequence, action: BootAction) {
    info!(
        "Automation: Boot phase {}, all strips to {}%",
        Debug2Format(&boot.phase()),
        action.brightness
    );
    dimmer
        .send(DimmerRequest::All {
            brightness: action.brightness,
            duration_ms: action.duration_ms,
            automation: boot.is_normal(),
        })
        .await;
}

/// Stellt nach der Boot-Anzeige den Zustand der Automatik wieder her
async fn restore_items(engine: &SharedAutomation, dimmer: &DimmerSender) {
    let mut requests: Vec<DimmerRequest, MAX_ITEMS> = Vec::new();
    {
        let engine = engine.lock().await;
        let duration_ms = engine.settings().fade_duration_ms();
        for item in 0..engine.items().len() {
            if let Some(state) = engine.item_state(item).filter(|state| state.is_on) {
                let _ = requests.push(DimmerRequest::Item(FadeCommand {
                    item,
                    brightness: state.brightness,
                    duration_ms,
                }));
            }
        }
    }

    for request in requests {
        dimmer.send(request).await;
    }
}

/// Automatik Task
///
/// - Treibt die Boot-Anzeige (Blinken, Bestätigung, Notlicht)
/// - Prüft jede Sekunde die Ausschalt-Timer und den manuellen Override
/// - Gibt die Items erst im Normalbetrieb frei
#[embassy_executor::task]
pub async fn automation_task(
    engine: &'static SharedAutomation,
    dimmer: DimmerSender,
    mut link_receiver: LinkReceiver,
) {
    let fade_ms = engine.lock().await.settings().fade_duration_ms();
    let mut boot = BootSequence::new(fade_ms);
    let mut next_tick_ms = 0;

    info!("Automation: Task started, waiting for WiFi");

    loop {
        if let Either::First(up) =
            select(link_receiver.changed(), Timer::after_millis(BOOT_POLL_MS)).await
        {
            info!("Automation: WiFi {}", if up { "up" } else { "down" });
            if let Some(action) = boot.on_link(up, Instant::now().as_millis()) {
                send_boot_action(&dimmer, &boot, action).await;
            }
        }

        let now_ms = Instant::now().as_millis();

        if let Some(action) = boot.poll(now_ms) {
            send_boot_action(&dimmer, &boot, action).await;
            if boot.is_normal() {
                restore_items(engine, &dimmer).await;
            }
        }

        if now_ms >= next_tick_ms {
            next_tick_ms = now_ms + AUTOMATION_TICK_MS;

            let fades = engine.lock().await.tick(now_ms);
            for fade in fades {
                info!("Automation: Item {} timer expired", fade.item);
                dimmer.send(DimmerRequest::Item(fade)).await;
            }
        }
    }
}
