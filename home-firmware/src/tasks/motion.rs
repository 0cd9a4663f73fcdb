// Bewegungsmelder Tasks - PIR-Eingang und HTTP-Meldung an den LED-Server
use core::fmt::Write as _;

use defmt::{error, info, warn};
use embassy_net::Stack;
use embassy_time::{Duration, Timer};
use esp_hal::gpio::Input;
use heapless::{String, Vec};
use home_core::ReportTransport;
use home_core::http::parse_status_code;
use home_core::motion::{MotionDetector, MotionReport, ReportError, RetryPolicy, deliver};

use crate::config::{LED_SERVER_HOST, MOTION_SENSOR_NAME, REPORT_TIMEOUT_SECS};
use crate::tasks::net::{NetError, http_exchange};
use crate::{ActivitySender, LinkReceiver, MotionReceiver, MotionSender, SharedMotionStatus};

/// JSON-Body `{"sensor":"<32 Zeichen>","state":1}`
const BODY_SIZE: usize = 96;

/// Header plus Body
const REQUEST_SIZE: usize = 320;

/// Ausgewerteter Anfang der Antwort
const STATUS_LINE_SIZE: usize = 64;

/// PIR Task
///
/// Wartet auf Flanken am PIR-Eingang und meldet Beginn und Ende
/// einer Bewegung.
#[embassy_executor::task]
pub async fn pir_task(
    mut input: Input<'static>,
    events: MotionSender,
    activity: ActivitySender,
    status: &'static SharedMotionStatus,
) {
    let mut detector = MotionDetector::new();
    info!("Motion: PIR watcher started");

    loop {
        input.wait_for_any_edge().await;

        if let Some(event) = detector.update(input.is_high()) {
            info!("Motion: {}", event);
            activity.send(detector.is_active());
            status.lock().await.record_event(event);
            events.send(event).await;
        }
    }
}

/// `ReportTransport` per HTTP/1.0 POST über einen TCP-Socket
pub struct HttpReportTransport {
    stack: &'static Stack<'static>,
    host: &'static str,
}

impl HttpReportTransport {
    pub fn new(stack: &'static Stack<'static>, host: &'static str) -> Self {
        Self { stack, host }
    }

    /// Baut den Request: Header plus JSON-Body
    fn build_request(&self, report: &MotionReport) -> Result<Vec<u8, REQUEST_SIZE>, ReportError> {
        let mut body = [0u8; BODY_SIZE];
        let body_len =
            serde_json_core::to_slice(report, &mut body).map_err(|_| ReportError::Connection)?;

        let mut head: String<REQUEST_SIZE> = String::new();
        write!(
            head,
            "POST /api/motionSensor HTTP/1.0\r\nHost: {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n",
            self.host, body_len
        )
        .map_err(|_| ReportError::Connection)?;

        let mut request = Vec::new();
        request
            .extend_from_slice(head.as_bytes())
            .map_err(|_| ReportError::Connection)?;
        request
            .extend_from_slice(&body[..body_len])
            .map_err(|_| ReportError::Connection)?;
        Ok(request)
    }

    async fn exchange(&mut self, request: &[u8]) -> Result<u16, ReportError> {
        // Nur die Statuszeile wird ausgewertet
        let mut response = [0u8; STATUS_LINE_SIZE];
        let len = http_exchange(
            self.stack,
            self.host,
            request,
            &mut response,
            Duration::from_secs(REPORT_TIMEOUT_SECS),
        )
        .await
        .map_err(|e| match e {
            NetError::DnsResolutionFailed | NetError::DnsTimeout => ReportError::Dns,
            NetError::SocketFailed | NetError::NoResponse => ReportError::Connection,
        })?;

        parse_status_code(&response[..len]).ok_or(ReportError::Connection)
    }
}

impl ReportTransport for HttpReportTransport {
    async fn send(&mut self, report: &MotionReport) -> Result<(), ReportError> {
        if self.host.is_empty() {
            return Err(ReportError::NoHost);
        }

        let request = self.build_request(report)?;
        match self.exchange(&request).await? {
            200..=299 => Ok(()),
            code => Err(ReportError::Status(code)),
        }
    }

    async fn pause(&mut self, delay_ms: u32) {
        Timer::after_millis(delay_ms as u64).await;
    }
}

/// Reporter Task
///
/// Sendet jedes Ereignis mit bis zu drei Versuchen an den LED-Server.
/// Ohne WLAN oder ohne konfigurierten Host wird das Ereignis verworfen.
#[embassy_executor::task]
pub async fn reporter_task(
    stack: &'static Stack<'static>,
    events: MotionReceiver,
    mut link_receiver: LinkReceiver,
    status: &'static SharedMotionStatus,
) {
    let mut transport = HttpReportTransport::new(stack, LED_SERVER_HOST);
    if LED_SERVER_HOST.is_empty() {
        warn!("Motion: No LED server configured, reports disabled");
    }

    loop {
        let event = events.receive().await;

        if !link_receiver.try_get().unwrap_or(false) {
            warn!("Motion: Offline, dropping {}", event);
            continue;
        }

        let report = MotionReport::new(MOTION_SENSOR_NAME, event);
        let result = deliver(&mut transport, &report, RetryPolicy::default()).await;
        status.lock().await.record_report(event, result);

        match result {
            Ok(attempt) => info!("Motion: Reported {} (attempt {})", event, attempt),
            Err(ReportError::NoHost) => warn!("Motion: No host, report skipped"),
            Err(e) => error!("Motion: Report failed: {}", e),
        }
    }
}
