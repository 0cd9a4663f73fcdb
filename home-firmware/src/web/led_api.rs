// HTTP-Handler des LED-Servers
//
// Die Handler ändern nur den Automatik-Zustand; die resultierenden
// Überblendungen gehen über den Dimmer-Channel an den Dimmer Task.

use defmt::{info, warn};
use embassy_time::Instant;
use heapless::Vec;
use home_core::automation::MAX_ITEMS;

use crate::web::protocol::{ControlRequest, ItemStatus, MotionRequest, SettingsBody, StatusResponse};
use crate::web::response::ApiResponse;
use crate::{DimmerRequest, DimmerSender, SharedAutomation};

/// `GET /api/status`
pub async fn status(engine: &SharedAutomation) -> ApiResponse {
    let engine = engine.lock().await;
    let mut items: Vec<ItemStatus, MAX_ITEMS> = Vec::new();

    for (index, item) in engine.items().iter().enumerate() {
        if let Some(state) = engine.item_state(index) {
            let _ = items.push(ItemStatus {
                name: item.name,
                is_on: state.is_on,
                brightness: state.brightness,
                control_mode: state.control_mode.as_str(),
            });
        }
    }

    ApiResponse::json(&StatusResponse { items })
}

/// `POST /api/control` - Manuelles Schalten eines Items
pub async fn control(engine: &SharedAutomation, dimmer: &DimmerSender, body: &[u8]) -> ApiResponse {
    let Some(request) = ControlRequest::from_json(body) else {
        return ApiResponse::bad_request("Invalid JSON");
    };

    let fade = {
        let mut engine = engine.lock().await;

        let index = match (&request.item, request.item_index) {
            (Some(name), _) => engine.item_index_by_name(name),
            (None, index) => index,
        };
        let Some(index) = index else {
            return ApiResponse::bad_request("Missing or invalid 'item'/'item_index'");
        };

        match engine.set_manual(
            index,
            request.on,
            request.brightness,
            Instant::now().as_millis(),
        ) {
            Ok(fade) => fade,
            Err(_) => return ApiResponse::bad_request("Missing or invalid 'item'/'item_index'"),
        }
    };

    info!(
        "HTTP: Manual control item {} -> {}%",
        fade.item, fade.brightness
    );
    dimmer.send(DimmerRequest::Item(fade)).await;
    ApiResponse::ok()
}

/// `POST /api/motionSensor` - Meldung eines Bewegungsmelders
pub async fn motion(engine: &SharedAutomation, dimmer: &DimmerSender, body: &[u8]) -> ApiResponse {
    let Some(request) = MotionRequest::from_json(body) else {
        return ApiResponse::bad_request("Invalid JSON");
    };
    let detected = request.detected;
    info!(
        "HTTP: Motion from {} ({})",
        request.sensor.as_str(),
        if detected { "detected" } else { "cleared" }
    );

    let fades = engine.lock().await.handle_motion(
        &request.sensor,
        detected,
        Instant::now().as_millis(),
    );
    for fade in fades {
        dimmer.send(DimmerRequest::Item(fade)).await;
    }

    ApiResponse::ok()
}

/// `GET /api/settings`
pub async fn get_settings(engine: &SharedAutomation) -> ApiResponse {
    let engine = engine.lock().await;
    ApiResponse::json(&SettingsBody::from_settings(
        engine.settings(),
        engine.items().len(),
    ))
}

/// `POST /api/settings` - Änderungen gelten bis zum Neustart
pub async fn post_settings(engine: &SharedAutomation, body: SettingsBody) -> ApiResponse {
    let mut engine = engine.lock().await;

    if body.brightness.len() > engine.items().len() {
        warn!(
            "HTTP: Settings with {} brightness values for {} items",
            body.brightness.len(),
            engine.items().len()
        );
        return ApiResponse::bad_request("Too many brightness values");
    }

    let settings = body.apply_to(*engine.settings());
    engine.update_settings(settings);
    info!(
        "HTTP: Settings updated (timer {} s, override {} h, fade {} s)",
        settings.automation_timer_secs,
        settings.manual_override_hours,
        settings.fade_duration_secs
    );
    ApiResponse::ok()
}
