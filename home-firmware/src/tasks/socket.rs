// Steckdose Task - Fragt die Wechselrichter-Bridge ab und schaltet das Relais
use core::fmt::Write as _;

use defmt::{info, warn};
use embassy_futures::select::{Either, select};
use embassy_net::Stack;
use embassy_time::{Duration, Timer};
use heapless::String;
use home_core::http::{parse_status_code, response_body};
use home_core::socket::{PollError, PvReading, parse_params};

use crate::config::{INVERTER_BRIDGE_HOST, SOCKET_POLL_SECS, SOCKET_REQUEST_TIMEOUT_SECS};
use crate::tasks::net::http_exchange;
use crate::{LinkReceiver, SharedSocket};

/// Header plus rohe QPIGS-Zeile
const PARAMS_RESPONSE_SIZE: usize = 512;

/// Eine Abfrage von `GET /params`
async fn fetch_reading(stack: &'static Stack<'static>) -> Result<PvReading, PollError> {
    if INVERTER_BRIDGE_HOST.is_empty() {
        return Err(PollError::Unreachable);
    }

    let mut request: String<128> = String::new();
    write!(
        request,
        "GET /params HTTP/1.0\r\nHost: {}\r\n\r\n",
        INVERTER_BRIDGE_HOST
    )
    .map_err(|_| PollError::Unreachable)?;

    let mut response = [0u8; PARAMS_RESPONSE_SIZE];
    let len = http_exchange(
        stack,
        INVERTER_BRIDGE_HOST,
        request.as_bytes(),
        &mut response,
        Duration::from_secs(SOCKET_REQUEST_TIMEOUT_SECS),
    )
    .await
    .map_err(|e| {
        warn!("Socket: Bridge request failed: {}", e);
        PollError::Unreachable
    })?;
    let response = &response[..len];

    if parse_status_code(response) != Some(200) {
        return Err(PollError::Unreachable);
    }

    let body = response_body(response).ok_or(PollError::Malformed)?;
    let text = core::str::from_utf8(body).map_err(|_| PollError::Malformed)?;
    parse_params(text).ok_or(PollError::Malformed)
}

/// Steckdosen Task
///
/// Fragt alle `SOCKET_POLL_SECS` die PV-Werte ab. Verliert das WLAN die
/// Verbindung, wird sofort abgeschaltet; nach dem Wiederverbinden wird
/// sofort abgefragt.
#[embassy_executor::task]
pub async fn socket_task(
    stack: &'static Stack<'static>,
    socket: &'static SharedSocket,
    mut link_receiver: LinkReceiver,
) {
    if INVERTER_BRIDGE_HOST.is_empty() {
        warn!("Socket: No inverter bridge configured, socket stays off");
    }
    info!("Socket: Polling every {} s", SOCKET_POLL_SECS);

    loop {
        let online = match select(
            link_receiver.changed(),
            Timer::after(Duration::from_secs(SOCKET_POLL_SECS)),
        )
        .await
        {
            Either::First(online) => online,
            Either::Second(()) => link_receiver.try_get().unwrap_or(false),
        };

        if !online {
            if socket.lock().await.on_error(PollError::ConnectionLost) {
                warn!("Socket: Connection lost, switched off");
            }
            continue;
        }

        let result = fetch_reading(stack).await;
        let mut socket = socket.lock().await;
        let switched = match result {
            Ok(reading) => {
                info!(
                    "Socket: PV {} V / {} W, load {} W",
                    reading.pv_voltage, reading.pv_power, reading.active_power
                );
                socket.on_reading(reading)
            }
            Err(e) => {
                warn!("Socket: {}", e);
                socket.on_error(e)
            }
        };

        if switched {
            info!(
                "Socket: Switched {}",
                if socket.is_on() { "on" } else { "off" }
            );
        }
    }
}
