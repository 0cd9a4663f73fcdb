// HTTP-Handler der Steckdose

use defmt::info;

use crate::SharedSocket;
use crate::config::SOCKET_NAME;
use crate::web::protocol::SocketStatusResponse;
use crate::web::response::ApiResponse;

/// `GET /api/status`
pub async fn status(socket: &SharedSocket) -> ApiResponse {
    let socket = socket.lock().await;
    ApiResponse::json(&SocketStatusResponse::new(SOCKET_NAME, &socket))
}

/// `GET /on`, `GET /off`
pub async fn switch(socket: &SharedSocket, on: bool) -> ApiResponse {
    if socket.lock().await.set_manual(on) {
        info!("HTTP: Socket switched {}", if on { "on" } else { "off" });
    }
    ApiResponse::ok()
}
