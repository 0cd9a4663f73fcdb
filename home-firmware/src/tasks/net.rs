// Netzwerk-Hilfsfunktionen für Clients (SNTP, Bewegungsmelder, Steckdose)
use embassy_net::tcp::TcpSocket;
use embassy_net::{IpAddress, Ipv4Address, Stack, dns::DnsQueryType};
use embassy_time::{Duration, Timer, with_timeout};

use crate::config::{DNS_TIMEOUT_SECS, HTTP_PORT};

/// TCP-Puffer für einfache HTTP-Clients
const CLIENT_BUFFER_SIZE: usize = 512;

/// Wartet bis Netzwerk-Verbindung verfügbar ist
///
/// Prüft kontinuierlich Link-Status und DHCP-Konfiguration.
pub async fn wait_for_network(stack: &'static Stack<'static>) {
    loop {
        if stack.is_link_up() && stack.config_v4().is_some() {
            break;
        }
        Timer::after(Duration::from_millis(500)).await;
    }
}

/// Löst Hostname zu IPv4-Adresse auf
///
/// Nutzt embassy-net DNS-Stack mit konfigurierbarem Timeout.
pub async fn resolve_hostname(
    stack: &'static Stack<'static>,
    hostname: &str,
) -> Result<Ipv4Address, NetError> {
    let result = with_timeout(
        Duration::from_secs(DNS_TIMEOUT_SECS),
        stack.dns_query(hostname, DnsQueryType::A),
    )
    .await;

    match result {
        Ok(Ok(addrs)) => addrs
            .iter()
            .find_map(|addr| match addr {
                IpAddress::Ipv4(ipv4) => Some(*ipv4),
                #[allow(unreachable_patterns)]
                _ => None,
            })
            .ok_or(NetError::DnsResolutionFailed),
        Ok(Err(_)) => Err(NetError::DnsResolutionFailed),
        Err(_) => Err(NetError::DnsTimeout),
    }
}

/// Sendet einen fertigen HTTP/1.0-Request an `host:80` und liest die Antwort
///
/// Gelesen wird bis der Server schließt oder `response` voll ist.
/// Gibt die Anzahl gelesener Bytes zurück.
pub async fn http_exchange(
    stack: &'static Stack<'static>,
    host: &str,
    request: &[u8],
    response: &mut [u8],
    timeout: Duration,
) -> Result<usize, NetError> {
    let server = resolve_hostname(stack, host).await?;

    let mut rx_buffer = [0u8; CLIENT_BUFFER_SIZE];
    let mut tx_buffer = [0u8; CLIENT_BUFFER_SIZE];
    let mut socket = TcpSocket::new(*stack, &mut rx_buffer, &mut tx_buffer);
    socket.set_timeout(Some(timeout));

    socket
        .connect((server, HTTP_PORT))
        .await
        .map_err(|_| NetError::SocketFailed)?;

    let mut rest = request;
    while !rest.is_empty() {
        let written = socket
            .write(rest)
            .await
            .map_err(|_| NetError::SocketFailed)?;
        rest = &rest[written..];
    }
    socket.flush().await.map_err(|_| NetError::SocketFailed)?;

    let mut len = 0;
    while len < response.len() {
        match socket.read(&mut response[len..]).await {
            Ok(0) => break,
            Ok(n) => len += n,
            Err(_) => return Err(NetError::SocketFailed),
        }
    }
    socket.close();

    if len == 0 {
        return Err(NetError::NoResponse);
    }
    Ok(len)
}

/// Netzwerk Fehler-Typen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetError {
    DnsResolutionFailed,
    DnsTimeout,
    SocketFailed,
    NoResponse,
}

impl defmt::Format for NetError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            NetError::DnsResolutionFailed => defmt::write!(fmt, "DNS failed"),
            NetError::DnsTimeout => defmt::write!(fmt, "DNS timeout"),
            NetError::SocketFailed => defmt::write!(fmt, "Socket error"),
            NetError::NoResponse => defmt::write!(fmt, "No response"),
        }
    }
}
