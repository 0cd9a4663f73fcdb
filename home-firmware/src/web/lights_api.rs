// HTTP-Handler der Lichtsteuerung
//
// Die Handler ändern nur den Zustand der Lichter und wecken danach den
// Licht Task, der die Überblendung ausführt.

use defmt::{info, warn};
use home_core::lights::LightsError;

use crate::config::LIGHT_NAMES;
use crate::tasks::sntp::local_time;
use crate::web::protocol::{LightRequest, LightsStatusResponse};
use crate::web::response::ApiResponse;
use crate::{LightsSignal, SharedClock, SharedLights};

fn lights_error(e: LightsError) -> ApiResponse {
    match e {
        LightsError::InvalidLight => ApiResponse::bad_request("Invalid id"),
        LightsError::Storage(e) => {
            warn!("HTTP: Saving lights failed: {}", e);
            ApiResponse::unavailable("EEPROM not responding")
        }
    }
}

/// Ergebnis einer Änderung; bei Erfolg wird der Licht Task geweckt
fn changed_response(result: Result<(), LightsError>, changed: &LightsSignal) -> ApiResponse {
    match result {
        Ok(()) => {
            changed.signal(());
            ApiResponse::ok()
        }
        Err(e) => lights_error(e),
    }
}

/// `GET /api/status`, `GET /conf`
pub async fn status(lights: &SharedLights, clock: &SharedClock) -> ApiResponse {
    let now = local_time(clock).await;
    let lights = lights.lock().await;
    let levels = lights.targets(now.as_ref());
    ApiResponse::json(&LightsStatusResponse::new(
        now.is_some(),
        LIGHT_NAMES,
        lights.lights(),
        &levels,
    ))
}

/// `POST /onoff` - Schaltet das Licht manuell (beendet den Zeitplan)
pub async fn on_off(lights: &SharedLights, changed: &LightsSignal, request: LightRequest) -> ApiResponse {
    let Some(index) = request.index() else {
        return ApiResponse::bad_request("Invalid id");
    };
    let on = request.value > 0;
    info!("HTTP: Light {} {}", request.id, if on { "on" } else { "off" });

    let result = lights.lock().await.set_on(index, on);
    changed_response(result, changed)
}

/// `POST /brightness` - Neue Helligkeit in Prozent
pub async fn brightness(
    lights: &SharedLights,
    changed: &LightsSignal,
    request: LightRequest,
) -> ApiResponse {
    let Some(index) = request.index() else {
        return ApiResponse::bad_request("Invalid id");
    };
    info!("HTTP: Light {} brightness {}%", request.id, request.value);

    let result = lights.lock().await.set_brightness(index, request.value);
    changed_response(result, changed)
}

/// `POST /auto` - Zeitplan ein/aus, sofort gespeichert
pub async fn auto(lights: &SharedLights, changed: &LightsSignal, request: LightRequest) -> ApiResponse {
    let Some(index) = request.index() else {
        return ApiResponse::bad_request("Invalid id");
    };
    let auto = request.value > 0;
    info!("HTTP: Light {} schedule {}", request.id, if auto { "on" } else { "off" });

    let result = lights.lock().await.set_auto(index, auto);
    changed_response(result, changed)
}

/// `POST /save` - Helligkeiten im EEPROM sichern
pub async fn save(lights: &SharedLights) -> ApiResponse {
    match lights.lock().await.save() {
        Ok(()) => {
            info!("HTTP: Light settings saved");
            ApiResponse::ok()
        }
        Err(e) => lights_error(e),
    }
}
