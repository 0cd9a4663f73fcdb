// Licht Task - Zeitplan und HTTP-Änderungen auf den LEDC-Kanälen
use defmt::{error, info};
use embassy_futures::select::{Either, select};
use embassy_time::{Duration, Instant, Ticker, Timer};
use home_core::DimmerOutput;
use home_core::dimmer::Dimmer;

use crate::config::{
    DIMMER_TICK_MS, LIGHT_CHANNELS, LIGHT_CHECK_SECS, LIGHT_MANUAL_FADE_MS,
    LIGHT_SCHEDULE_FADE_MS,
};
use crate::tasks::sntp::local_time;
use crate::{LightsSignal, SharedClock, SharedLights};

/// Blendet alle Kanäle auf die aktuellen Ziele
async fn apply_targets<D: DimmerOutput>(
    dimmer: &mut Dimmer<D, LIGHT_CHANNELS>,
    lights: &SharedLights,
    clock: &SharedClock,
    duration_ms: u32,
) {
    let now = local_time(clock).await;
    let targets = lights.lock().await.targets(now.as_ref());

    for (channel, target) in targets.iter().enumerate() {
        if let Err(e) = dimmer.fade_to(channel, *target, duration_ms) {
            error!("Lights: Channel {}: {}", channel, e);
        }
    }
}

/// Licht Logic - Testbare Business Logic ohne Hardware-Abhängigkeit
///
/// Prüft jede Minute den Zeitplan und blendet dann langsam über.
/// Änderungen per HTTP werden sofort mit kurzer Überblendung übernommen.
pub async fn lights_logic<D: DimmerOutput>(
    output: D,
    lights: &SharedLights,
    clock: &SharedClock,
    changed: &LightsSignal,
) {
    let mut dimmer: Dimmer<D, LIGHT_CHANNELS> = Dimmer::new(output, DIMMER_TICK_MS);
    let mut ticker = Ticker::every(Duration::from_millis(DIMMER_TICK_MS as u64));
    let mut next_check = Instant::now();
    let mut fading = false;

    info!("Lights: {} channels ready", LIGHT_CHANNELS);

    loop {
        // Während einer Rampe bestimmt nur der Ticker das Tempo
        let (fade_ms, tick) = if fading {
            match select(changed.wait(), ticker.next()).await {
                Either::First(()) => (Some(LIGHT_MANUAL_FADE_MS), false),
                Either::Second(()) => (None, true),
            }
        } else {
            let fade_ms = match select(changed.wait(), Timer::at(next_check)).await {
                Either::First(()) => LIGHT_MANUAL_FADE_MS,
                Either::Second(()) => {
                    next_check = Instant::now() + Duration::from_secs(LIGHT_CHECK_SECS);
                    LIGHT_SCHEDULE_FADE_MS
                }
            };
            ticker.reset();
            (Some(fade_ms), true)
        };

        if let Some(duration_ms) = fade_ms {
            apply_targets(&mut dimmer, lights, clock, duration_ms).await;
        }

        if tick {
            fading = match dimmer.step() {
                Ok(active) => active,
                Err(e) => {
                    error!("Lights: Step failed: {}", e);
                    false
                }
            };
        }
    }
}

/// Licht Task - Embassy Task für parallele Ausführung
#[embassy_executor::task]
pub async fn lights_task(
    output: crate::hal::LedcDimmer<LIGHT_CHANNELS>,
    lights: &'static SharedLights,
    clock: &'static SharedClock,
    changed: &'static LightsSignal,
) {
    lights_logic(output, lights, clock, changed).await;
}
