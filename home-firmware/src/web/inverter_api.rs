// HTTP-Handler der Wechselrichter-Bridge
//
// Jede Anfrage hält den Wechselrichter-Mutex für die gesamte
// Befehlsfolge, damit sich Abfragen auf der Leitung nicht mischen.

use defmt::{info, warn};
use home_core::inverter::{EnergyPeriod, InverterError, OutputPriority};

use crate::tasks::sntp::local_time;
use crate::web::protocol::{EnergyValue, ParamsResponse, StatsResponse};
use crate::web::response::ApiResponse;
use crate::{SharedClock, SharedInverter};

const INVERTER_UNAVAILABLE: &str = "Inverter not responding";

fn inverter_error(e: InverterError) -> ApiResponse {
    warn!("HTTP: Inverter request failed: {}", e);
    ApiResponse::unavailable(INVERTER_UNAVAILABLE)
}

/// `GET /params` - Rohe QPIGS-Antwort
pub async fn params_text(inverter: &SharedInverter) -> ApiResponse {
    let mut inverter = inverter.lock().await;
    match inverter.general_status_raw().await {
        Ok(raw) => ApiResponse::formatted(format_args!("{}", raw)),
        Err(e) => inverter_error(e),
    }
}

/// `GET /api/params`
pub async fn params_json(inverter: &SharedInverter) -> ApiResponse {
    let status = inverter.lock().await.general_status().await;
    match status {
        Ok(status) => ApiResponse::json(&ParamsResponse::from(&status)),
        Err(e) => inverter_error(e),
    }
}

/// Ertrag für das aktuelle Datum; `None` solange die Uhr nicht läuft
async fn statistics(
    inverter: &SharedInverter,
    clock: &SharedClock,
) -> Option<Result<StatsResponse, InverterError>> {
    let today = local_time(clock).await?;

    let result = inverter.lock().await.statistics(&today).await;
    Some(result.map(|stats| StatsResponse::from(&stats)))
}

/// `GET /stats` - `jahr.monat.tag.gesamt` in Wh
pub async fn stats_text(inverter: &SharedInverter, clock: &SharedClock) -> ApiResponse {
    match statistics(inverter, clock).await {
        Some(Ok(stats)) => ApiResponse::formatted(format_args!(
            "{}.{}.{}.{}",
            stats.year, stats.month, stats.day, stats.total
        )),
        Some(Err(e)) => inverter_error(e),
        None => ApiResponse::unavailable("Time not synchronised"),
    }
}

/// `GET /api/stats`
pub async fn stats_json(inverter: &SharedInverter, clock: &SharedClock) -> ApiResponse {
    match statistics(inverter, clock).await {
        Some(Ok(stats)) => ApiResponse::json(&stats),
        Some(Err(e)) => inverter_error(e),
        None => ApiResponse::unavailable("Time not synchronised"),
    }
}

/// `GET /api/qem/<yyyymm>` und `GET /api/qed/<yyyymmdd>`
///
/// `digits` gibt die erwartete Länge der Periode an (6 oder 8). Der
/// Pfad wird als Text übergeben, damit führende Nullen erhalten bleiben.
pub async fn energy(inverter: &SharedInverter, period: &str, digits: usize) -> ApiResponse {
    let Some(period) = EnergyPeriod::parse_compact(period).filter(|_| period.len() == digits)
    else {
        return ApiResponse::bad_request("Invalid date");
    };

    let value = inverter.lock().await.energy(period).await;
    match value {
        Ok(value) => ApiResponse::json(&EnergyValue { value }),
        Err(e) => inverter_error(e),
    }
}

/// `GET /api/worktype` - `sub`, `sbu` oder `utility`
pub async fn work_type(inverter: &SharedInverter) -> ApiResponse {
    let priority = inverter.lock().await.output_priority().await;
    match priority {
        Ok(priority) => ApiResponse::Text {
            status: 200,
            body: priority.label(),
        },
        Err(e) => inverter_error(e),
    }
}

/// `GET /api/sub`, `GET /api/sbu` - Ausgangs-Priorität umschalten
pub async fn set_work_type(inverter: &SharedInverter, priority: OutputPriority) -> ApiResponse {
    let result = inverter.lock().await.set_output_priority(priority).await;
    match result {
        Ok(()) => {
            info!("HTTP: Output priority set to {}", priority);
            ApiResponse::Text {
                status: 200,
                body: "ACK",
            }
        }
        Err(InverterError::Nak | InverterError::Malformed) => ApiResponse::Text {
            status: 200,
            body: "NAK",
        },
        Err(e) => inverter_error(e),
    }
}
