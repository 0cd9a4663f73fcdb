//! Host-Tests für das JSON-Protokoll der HTTP-APIs
//!
//! Das Protokoll-Modul der Firmware hängt nur von home-core, heapless und
//! serde ab und wird direkt eingebunden.

#[path = "../../home-firmware/src/web/protocol.rs"]
#[allow(dead_code)]
mod protocol;

use home_core::lights::Light;
use home_core::motion::{MotionEvent, MotionStatus, ReportError};
use home_core::socket::{PvReading, SocketController, SwitchMode, SwitchOutput};
use protocol::{
    ControlRequest, LightRequest, LightsStatusResponse, MotionRequest, MotionStatusResponse,
    SocketStatusResponse,
};

fn to_json<T: serde::Serialize>(value: &T) -> String {
    let mut buffer = [0u8; 512];
    let len = serde_json_core::to_slice(value, &mut buffer).unwrap();
    String::from_utf8(buffer[..len].to_vec()).unwrap()
}

struct NoRelay;

impl SwitchOutput for NoRelay {
    fn set(&mut self, _on: bool) {}
}

// ============================================================================
// Tests: POST /api/control
// ============================================================================

#[test]
fn test_control_state_as_text() {
    let on = ControlRequest::from_json(br#"{"item":"Stairs","state":"on"}"#).unwrap();
    assert_eq!(on.item.as_deref(), Some("Stairs"));
    assert!(on.on);

    let off = ControlRequest::from_json(br#"{"item_index":1,"state":"off"}"#).unwrap();
    assert_eq!(off.item, None);
    assert_eq!(off.item_index, Some(1));
    assert!(!off.on);
}

#[test]
fn test_control_state_as_bool() {
    let on = ControlRequest::from_json(br#"{"item":"Stairs","state":true}"#).unwrap();
    assert!(on.on);

    let off =
        ControlRequest::from_json(br#"{"item":"Stairs","state":false,"brightness":40}"#).unwrap();
    assert!(!off.on);
    assert_eq!(off.brightness, Some(40));
}

#[test]
fn test_control_rejects_unknown_state() {
    assert_eq!(ControlRequest::from_json(br#"{"item":"Stairs","state":"maybe"}"#), None);
    assert_eq!(ControlRequest::from_json(br#"{"item":"Stairs","state":1}"#), None);
    assert_eq!(ControlRequest::from_json(br#"{"item":"Stairs"}"#), None);
    assert_eq!(ControlRequest::from_json(b"not json"), None);
}

// ============================================================================
// Tests: POST /api/motionSensor
// ============================================================================

#[test]
fn test_motion_state_as_number_or_bool() {
    let detected = MotionRequest::from_json(br#"{"sensor":"stairs-sensor-1","state":1}"#).unwrap();
    assert_eq!(detected.sensor.as_str(), "stairs-sensor-1");
    assert!(detected.detected);

    let cleared = MotionRequest::from_json(br#"{"sensor":"stairs-sensor-1","state":0}"#).unwrap();
    assert!(!cleared.detected);

    let from_bool = MotionRequest::from_json(br#"{"sensor":"s","state":true}"#).unwrap();
    assert!(from_bool.detected);
}

#[test]
fn test_motion_rejects_text_state() {
    assert_eq!(MotionRequest::from_json(br#"{"sensor":"s","state":"on"}"#), None);
}

// ============================================================================
// Tests: Statusseiten
// ============================================================================

#[test]
fn test_socket_status_json() {
    let mut socket = SocketController::new(SwitchMode::Surplus, NoRelay);
    assert_eq!(
        to_json(&SocketStatusResponse::new("PV Socket", &socket)),
        r#"{"name":"PV Socket","is_on":false,"mode":"surplus","status":"low pv input","reading":null}"#
    );

    socket.on_reading(PvReading {
        pv_voltage: 262,
        pv_power: 300,
        active_power: 187,
    });
    assert_eq!(
        to_json(&SocketStatusResponse::new("PV Socket", &socket)),
        r#"{"name":"PV Socket","is_on":true,"mode":"surplus","status":"OK","reading":{"pv_voltage":262,"pv_power":300,"active_power":187}}"#
    );
}

#[test]
fn test_motion_status_json() {
    let mut status = MotionStatus::new();
    assert_eq!(
        to_json(&MotionStatusResponse::new("hall", &status)),
        r#"{"name":"hall","status":0,"detections":0,"last_report":null}"#
    );

    status.record_event(MotionEvent::Detected);
    status.record_report(MotionEvent::Detected, Err(ReportError::Exhausted));
    assert_eq!(
        to_json(&MotionStatusResponse::new("hall", &status)),
        r#"{"name":"hall","status":1,"detections":1,"last_report":{"event":"detected","delivered":false,"attempts":null,"error":"exhausted"}}"#
    );
}

// ============================================================================
// Tests: Lichtsteuerung
// ============================================================================

#[test]
fn test_light_request_ids_start_at_one() {
    let (request, _) =
        serde_json_core::from_slice::<LightRequest>(br#"{"id":2,"value":80}"#).unwrap();
    assert_eq!(request.index(), Some(1));
    assert_eq!(request.value, 80);

    let (zero, _) = serde_json_core::from_slice::<LightRequest>(br#"{"id":0,"value":1}"#).unwrap();
    assert_eq!(zero.index(), None);
}

#[test]
fn test_lights_status_json() {
    let lights = [
        Light {
            brightness: 80,
            on: false,
            auto: true,
        },
        Light {
            brightness: 100,
            on: true,
            auto: false,
        },
    ];
    let response = LightsStatusResponse::new(true, &["Tank", "Plants"], &lights, &[0, 100]);

    assert_eq!(
        to_json(&response),
        r#"{"clock":true,"lights":[{"id":1,"name":"Tank","brightness":80,"on":false,"auto":true,"level":0},{"id":2,"name":"Plants","brightness":100,"on":true,"auto":false,"level":100}]}"#
    );
}
