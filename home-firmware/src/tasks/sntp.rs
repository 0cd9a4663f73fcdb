// SNTP Task - Holt die Uhrzeit für Energie-Statistik und Lichtsteuerung
use defmt::{info, warn};
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{IpAddress, Stack};
use embassy_time::{Duration, Instant, Timer, with_timeout};
use home_core::DateTime;
use home_core::sntp::{SNTP_PACKET_LEN, SNTP_PORT, TimeBase, build_request, parse_response};

use crate::SharedClock;
use crate::config::{
    NTP_HOST, NTP_LOCAL_PORT, NTP_SYNC_INTERVAL_SECS, NTP_TIMEOUT_SECS, TIME_OFFSET_SECS,
};
use crate::tasks::net::{NetError, resolve_hostname, wait_for_network};

/// Eine Anfrage an den NTP-Server, liefert Unix-Sekunden
async fn query_time(stack: &'static Stack<'static>) -> Result<u64, NetError> {
    let server = resolve_hostname(stack, NTP_HOST).await?;

    let mut rx_meta = [PacketMetadata::EMPTY; 2];
    let mut tx_meta = [PacketMetadata::EMPTY; 2];
    let mut rx_buffer = [0u8; 2 * SNTP_PACKET_LEN];
    let mut tx_buffer = [0u8; 2 * SNTP_PACKET_LEN];
    let mut socket = UdpSocket::new(
        *stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );
    socket
        .bind(NTP_LOCAL_PORT)
        .map_err(|_| NetError::SocketFailed)?;

    socket
        .send_to(&build_request(), (IpAddress::Ipv4(server), SNTP_PORT))
        .await
        .map_err(|_| NetError::SocketFailed)?;

    let mut packet = [0u8; SNTP_PACKET_LEN];
    let (len, _) = with_timeout(
        Duration::from_secs(NTP_TIMEOUT_SECS),
        socket.recv_from(&mut packet),
    )
    .await
    .map_err(|_| NetError::NoResponse)?
    .map_err(|_| NetError::SocketFailed)?;

    parse_response(&packet[..len]).map_err(|e| {
        warn!("SNTP: Invalid response: {}", e);
        NetError::NoResponse
    })
}

/// Lokale Uhrzeit, `None` solange die Uhr nicht synchronisiert ist
pub async fn local_time(clock: &SharedClock) -> Option<DateTime> {
    let time_base = (*clock.lock().await)?;
    Some(time_base.local_now(Instant::now().as_millis(), TIME_OFFSET_SECS))
}

/// SNTP Task
///
/// Synchronisiert periodisch die Uhr. Bis zur ersten erfolgreichen
/// Antwort bleibt `SharedClock` leer.
#[embassy_executor::task]
pub async fn sntp_task(stack: &'static Stack<'static>, clock: &'static SharedClock) {
    info!("SNTP: Task started, waiting for network...");
    wait_for_network(stack).await;

    loop {
        match query_time(stack).await {
            Ok(unix_secs) => {
                let time_base = TimeBase::new(unix_secs, Instant::now().as_millis());
                *clock.lock().await = Some(time_base);
                info!("SNTP: Time synchronised: {} UTC", DateTime::from_unix(unix_secs));
            }
            Err(e) => warn!("SNTP: Sync failed: {}", e),
        }

        Timer::after(Duration::from_secs(NTP_SYNC_INTERVAL_SECS)).await;
    }
}
