// HTTP Server Tasks - LED-Server, Wechselrichter-Bridge, Steckdose,
// Bewegungsmelder und Lichtsteuerung
use alloc::vec::Vec;

use defmt::info;
use embassy_net::Stack;
use embassy_time::Duration;
use heapless::String;
use home_core::inverter::OutputPriority;
use picoserve::extract::Json;
use picoserve::routing::{get, parse_path_segment, post};

use crate::config::*;
use crate::web::protocol::{LightRequest, SettingsBody};
use crate::web::{
    ApiResponse, INVERTER_INDEX_HTML, LED_INDEX_HTML, LIGHTS_INDEX_HTML, MOTION_INDEX_HTML,
    SOCKET_INDEX_HTML, inverter_api, led_api, lights_api, motion_api, socket_api,
};
use crate::{
    DimmerSender, LightsSignal, SharedAutomation, SharedClock, SharedInverter, SharedLights,
    SharedMotionStatus, SharedSocket,
};

/// Pfadsegment `yyyymm` bzw. `yyyymmdd` als Text
type PeriodSegment = String<8>;

/// Server-Konfiguration beider Images
fn server_config() -> picoserve::Config<Duration> {
    picoserve::Config::new(picoserve::Timeouts {
        start_read_request: Some(Duration::from_secs(5)),
        read_request: Some(Duration::from_secs(1)),
        write: Some(Duration::from_secs(1)),
        persistent_start_read_request: Some(Duration::from_secs(5)),
    })
    .keep_connection_alive()
}

/// HTTP Server Task des LED-Servers
///
/// - `GET /` Statusseite
/// - `GET /api/status` Zustand aller Items
/// - `POST /api/control` manuelles Schalten
/// - `POST /api/motionSensor` Meldungen der Bewegungsmelder
/// - `GET`/`POST /api/settings` Timer, Überblendung, Helligkeit
///
/// **Task Pool:** 4 Instanzen, damit Bewegungsmelder nicht hinter
/// einem Browser warten müssen.
#[embassy_executor::task(pool_size = 4)]
pub async fn led_http_task(
    task_id: usize,
    stack: &'static Stack<'static>,
    engine: &'static SharedAutomation,
    dimmer: DimmerSender,
) {
    info!("HTTP: LED server task {} starting on port {}...", task_id, HTTP_PORT);

    let app = picoserve::Router::new()
        .route("/", get(|| async { ApiResponse::Html(LED_INDEX_HTML) }))
        .route("/api/status", get(move || led_api::status(engine)))
        .route(
            "/api/control",
            post(move |body: Vec<u8>| async move {
                led_api::control(engine, &dimmer, &body).await
            }),
        )
        .route(
            "/api/motionSensor",
            post(move |body: Vec<u8>| async move {
                led_api::motion(engine, &dimmer, &body).await
            }),
        )
        .route(
            "/api/settings",
            get(move || led_api::get_settings(engine)).post(
                move |Json(body): Json<SettingsBody, JSON_REQUEST_SIZE>| {
                    led_api::post_settings(engine, body)
                },
            ),
        );

    let config = server_config();

    // HTTP-Buffer für Requests/Responses
    let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];

    // TCP-Buffers für Socket
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    let server = picoserve::Server::new(&app, &config, &mut http_buffer);
    let _ = server
        .listen_and_serve(task_id, *stack, HTTP_PORT, &mut rx_buffer, &mut tx_buffer)
        .await;

    info!("HTTP: LED server task {} ended", task_id);
}

/// HTTP Server Task der Wechselrichter-Bridge
///
/// Textausgaben für einfache Clients, JSON unter `/api`.
/// **Task Pool:** 2 Instanzen; der Wechselrichter bearbeitet ohnehin
/// nur eine Anfrage zur Zeit.
#[embassy_executor::task(pool_size = 2)]
pub async fn inverter_http_task(
    task_id: usize,
    stack: &'static Stack<'static>,
    inverter: &'static SharedInverter,
    clock: &'static SharedClock,
) {
    info!("HTTP: Inverter server task {} starting on port {}...", task_id, HTTP_PORT);

    let app = picoserve::Router::new()
        .route("/", get(|| async { ApiResponse::Html(INVERTER_INDEX_HTML) }))
        .route("/params", get(move || inverter_api::params_text(inverter)))
        .route("/api/params", get(move || inverter_api::params_json(inverter)))
        .route("/stats", get(move || inverter_api::stats_text(inverter, clock)))
        .route("/api/stats", get(move || inverter_api::stats_json(inverter, clock)))
        .route(
            ("/api/qem", parse_path_segment::<PeriodSegment>()),
            get(move |month: PeriodSegment| async move {
                inverter_api::energy(inverter, &month, 6).await
            }),
        )
        .route(
            ("/api/qed", parse_path_segment::<PeriodSegment>()),
            get(move |day: PeriodSegment| async move {
                inverter_api::energy(inverter, &day, 8).await
            }),
        )
        .route("/api/worktype", get(move || inverter_api::work_type(inverter)))
        .route(
            "/api/sub",
            get(move || inverter_api::set_work_type(inverter, OutputPriority::SolarFirst)),
        )
        .route(
            "/api/sbu",
            get(move || inverter_api::set_work_type(inverter, OutputPriority::Sbu)),
        );

    let config = server_config();

    let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    let server = picoserve::Server::new(&app, &config, &mut http_buffer);
    let _ = server
        .listen_and_serve(task_id, *stack, HTTP_PORT, &mut rx_buffer, &mut tx_buffer)
        .await;

    info!("HTTP: Inverter server task {} ended", task_id);
}

/// HTTP Server Task der Steckdose
///
/// - `GET /` Statusseite
/// - `GET /api/status` Schaltzustand, Status und letzte Messung
/// - `GET /on`, `GET /off` manuelles Schalten bis zur nächsten Messung
#[embassy_executor::task(pool_size = 2)]
pub async fn socket_http_task(
    task_id: usize,
    stack: &'static Stack<'static>,
    socket: &'static SharedSocket,
) {
    info!("HTTP: Socket server task {} starting on port {}...", task_id, HTTP_PORT);

    let app = picoserve::Router::new()
        .route("/", get(|| async { ApiResponse::Html(SOCKET_INDEX_HTML) }))
        .route("/api/status", get(move || socket_api::status(socket)))
        .route("/on", get(move || socket_api::switch(socket, true)))
        .route("/off", get(move || socket_api::switch(socket, false)));

    let config = server_config();

    let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    let server = picoserve::Server::new(&app, &config, &mut http_buffer);
    let _ = server
        .listen_and_serve(task_id, *stack, HTTP_PORT, &mut rx_buffer, &mut tx_buffer)
        .await;

    info!("HTTP: Socket server task {} ended", task_id);
}

/// HTTP Server Task des Bewegungsmelders
///
/// - `GET /` Statusseite
/// - `GET /api/status` Bewegung, Zähler und letzte Meldung
#[embassy_executor::task(pool_size = 2)]
pub async fn motion_http_task(
    task_id: usize,
    stack: &'static Stack<'static>,
    status: &'static SharedMotionStatus,
) {
    info!("HTTP: Motion server task {} starting on port {}...", task_id, HTTP_PORT);

    let app = picoserve::Router::new()
        .route("/", get(|| async { ApiResponse::Html(MOTION_INDEX_HTML) }))
        .route("/api/status", get(move || motion_api::status(status)));

    let config = server_config();

    let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    let server = picoserve::Server::new(&app, &config, &mut http_buffer);
    let _ = server
        .listen_and_serve(task_id, *stack, HTTP_PORT, &mut rx_buffer, &mut tx_buffer)
        .await;

    info!("HTTP: Motion server task {} ended", task_id);
}

/// HTTP Server Task der Lichtsteuerung
///
/// - `GET /` Statusseite
/// - `GET /api/status`, `GET /conf` Zustand aller Lichter
/// - `POST /onoff` `{"id":1,"value":1}` manuell schalten
/// - `POST /brightness` `{"id":1,"value":80}` Helligkeit in Prozent
/// - `POST /auto` `{"id":1,"value":1}` Zeitplan ein/aus (gespeichert)
/// - `POST /save` Helligkeiten im EEPROM sichern
#[embassy_executor::task(pool_size = 2)]
pub async fn lights_http_task(
    task_id: usize,
    stack: &'static Stack<'static>,
    lights: &'static SharedLights,
    clock: &'static SharedClock,
    changed: &'static LightsSignal,
) {
    info!("HTTP: Lights server task {} starting on port {}...", task_id, HTTP_PORT);

    let app = picoserve::Router::new()
        .route("/", get(|| async { ApiResponse::Html(LIGHTS_INDEX_HTML) }))
        .route("/api/status", get(move || lights_api::status(lights, clock)))
        .route("/conf", get(move || lights_api::status(lights, clock)))
        .route(
            "/onoff",
            post(
                move |Json(request): Json<LightRequest, JSON_REQUEST_SIZE>| {
                    lights_api::on_off(lights, changed, request)
                },
            ),
        )
        .route(
            "/brightness",
            post(
                move |Json(request): Json<LightRequest, JSON_REQUEST_SIZE>| {
                    lights_api::brightness(lights, changed, request)
                },
            ),
        )
        .route(
            "/auto",
            post(
                move |Json(request): Json<LightRequest, JSON_REQUEST_SIZE>| {
                    lights_api::auto(lights, changed, request)
                },
            ),
        )
        .route("/save", post(move || lights_api::save(lights)));

    let config = server_config();

    let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    let server = picoserve::Server::new(&app, &config, &mut http_buffer);
    let _ = server
        .listen_and_serve(task_id, *stack, HTTP_PORT, &mut rx_buffer, &mut tx_buffer)
        .await;

    info!("HTTP: Lights server task {} ended", task_id);
}
