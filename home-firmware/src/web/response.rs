// HTTP-Antworten der APIs
//
// Alle Antworten tragen die CORS-Header, damit Dashboards aus anderen
// Origins die Endpunkte abfragen können.

use core::fmt::Write as _;

use defmt::error;
use heapless::String;
use picoserve::io::embedded_io_async;
use picoserve::response::{Connection, IntoResponse, Response, ResponseWriter, StatusCode};
use serde::Serialize;

use crate::config::{JSON_RESPONSE_BUFFER_SIZE, TEXT_RESPONSE_BUFFER_SIZE};

const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";
const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";
const CONTENT_TYPE_JSON: &str = "application/json";

/// Response-Enum für alle API-Endpunkte
pub enum ApiResponse {
    /// Eingebettete HTML-Seite
    Html(&'static str),
    /// Fester Text mit Status-Code
    Text { status: u16, body: &'static str },
    /// Zur Laufzeit formatierter Text (200)
    Formatted(String<TEXT_RESPONSE_BUFFER_SIZE>),
    /// Serialisiertes JSON (200)
    Json {
        buffer: [u8; JSON_RESPONSE_BUFFER_SIZE],
        len: usize,
    },
}

impl ApiResponse {
    pub const fn ok() -> Self {
        Self::Text {
            status: 200,
            body: "OK",
        }
    }

    pub const fn bad_request(body: &'static str) -> Self {
        Self::Text { status: 400, body }
    }

    pub const fn unavailable(body: &'static str) -> Self {
        Self::Text { status: 503, body }
    }

    /// Text aus `format_args!`; zu lange Ausgaben liefern 500
    pub fn formatted(args: core::fmt::Arguments<'_>) -> Self {
        let mut body = String::new();
        match body.write_fmt(args) {
            Ok(()) => Self::Formatted(body),
            Err(_) => {
                error!("HTTP: Text response exceeds {} bytes", TEXT_RESPONSE_BUFFER_SIZE);
                Self::Text {
                    status: 500,
                    body: "Response too large",
                }
            }
        }
    }

    /// Serialisiert `value` in den Antwort-Puffer
    pub fn json<T: Serialize>(value: &T) -> Self {
        let mut buffer = [0u8; JSON_RESPONSE_BUFFER_SIZE];
        match serde_json_core::to_slice(value, &mut buffer) {
            Ok(len) => Self::Json { buffer, len },
            Err(_) => {
                error!("HTTP: JSON response exceeds {} bytes", JSON_RESPONSE_BUFFER_SIZE);
                Self::Text {
                    status: 500,
                    body: "Failed to generate JSON",
                }
            }
        }
    }
}

/// Schreibt eine Antwort mit Content-Type und CORS-Headern
async fn write_with_cors<R, W>(
    connection: Connection<'_, R>,
    response_writer: W,
    status: u16,
    content_type: &'static str,
    body: &str,
) -> Result<picoserve::ResponseSent, W::Error>
where
    R: embedded_io_async::Read,
    W: ResponseWriter<Error = R::Error>,
{
    Response::new(StatusCode::new(status), body)
        .with_header("Content-Type", content_type)
        .with_header("Access-Control-Allow-Origin", "*")
        .with_header("Access-Control-Allow-Methods", "DELETE, POST, GET, OPTIONS")
        .with_header(
            "Access-Control-Allow-Headers",
            "Content-Type, Authorization, X-Requested-With",
        )
        .write_to(connection, response_writer)
        .await
}

impl IntoResponse for ApiResponse {
    async fn write_to<R: embedded_io_async::Read, W: ResponseWriter<Error = R::Error>>(
        self,
        connection: Connection<'_, R>,
        response_writer: W,
    ) -> Result<picoserve::ResponseSent, W::Error> {
        match self {
            ApiResponse::Html(page) => {
                write_with_cors(connection, response_writer, 200, CONTENT_TYPE_HTML, page).await
            }
            ApiResponse::Text { status, body } => {
                write_with_cors(connection, response_writer, status, CONTENT_TYPE_TEXT, body).await
            }
            ApiResponse::Formatted(body) => {
                write_with_cors(connection, response_writer, 200, CONTENT_TYPE_TEXT, &body).await
            }
            ApiResponse::Json { buffer, len } => {
                // serde-json-core erzeugt nur gültiges UTF-8
                let body = core::str::from_utf8(&buffer[..len]).unwrap_or("{}");
                write_with_cors(connection, response_writer, 200, CONTENT_TYPE_JSON, body).await
            }
        }
    }
}
