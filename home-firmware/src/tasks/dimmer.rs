// Dimmer Task - Überblendungen auf den LEDC-Kanälen
use defmt::{error, info, warn};
use embassy_futures::select::{Either, select};
use embassy_time::{Duration, Ticker};
use home_core::DimmerOutput;
use home_core::automation::channel_range;
use home_core::dimmer::Dimmer;

use crate::config::{DIMMER_TICK_MS, ITEMS, PWM_CHANNELS};
use crate::{DimmerReceiver, DimmerRequest};

/// Führt einen Auftrag aus
///
/// Item-Aufträge werden verworfen solange die Boot-Anzeige die
/// Ausgänge belegt.
fn apply<D: DimmerOutput>(
    dimmer: &mut Dimmer<D, PWM_CHANNELS>,
    automation_enabled: &mut bool,
    request: DimmerRequest,
) {
    match request {
        DimmerRequest::Item(command) => {
            if !*automation_enabled {
                warn!("Dimmer: Ignoring item {} during boot sequence", command.item);
                return;
            }
            if command.item >= ITEMS.len() {
                warn!("Dimmer: Unknown item {}", command.item);
                return;
            }
            for channel in channel_range(ITEMS, command.item) {
                if let Err(e) = dimmer.fade_to(channel, command.brightness, command.duration_ms) {
                    error!("Dimmer: Channel {}: {}", channel, e);
                }
            }
        }
        DimmerRequest::All {
            brightness,
            duration_ms,
            automation,
        } => {
            *automation_enabled = automation;
            for channel in 0..PWM_CHANNELS {
                if let Err(e) = dimmer.fade_to(channel, brightness, duration_ms) {
                    error!("Dimmer: Channel {}: {}", channel, e);
                }
            }
        }
    }
}

/// Dimmer Logic - Testbare Business Logic ohne Hardware-Abhängigkeit
///
/// Wartet auf Aufträge; solange eine Rampe läuft, wird im festen Takt
/// ein Schritt ausgeführt.
pub async fn dimmer_logic<D: DimmerOutput>(output: D, receiver: DimmerReceiver) {
    let mut dimmer: Dimmer<D, PWM_CHANNELS> = Dimmer::new(output, DIMMER_TICK_MS);
    let mut ticker = Ticker::every(Duration::from_millis(DIMMER_TICK_MS as u64));
    let mut automation_enabled = false;
    let mut fading = false;

    info!("Dimmer: {} channels ready", PWM_CHANNELS);

    loop {
        // Während einer Rampe bestimmt nur der Ticker das Tempo
        let (request, tick) = if fading {
            match select(receiver.receive(), ticker.next()).await {
                Either::First(request) => (Some(request), false),
                Either::Second(()) => (None, true),
            }
        } else {
            let request = receiver.receive().await;
            ticker.reset();
            (Some(request), true)
        };

        if let Some(request) = request {
            apply(&mut dimmer, &mut automation_enabled, request);
        }

        if tick {
            fading = match dimmer.step() {
                Ok(active) => active,
                Err(e) => {
                    error!("Dimmer: Step failed: {}", e);
                    false
                }
            };
        }
    }
}

/// Dimmer Task - Embassy Task für parallele Ausführung
#[embassy_executor::task]
pub async fn dimmer_task(output: crate::hal::LedcDimmer, receiver: DimmerReceiver) {
    dimmer_logic(output, receiver).await;
}
