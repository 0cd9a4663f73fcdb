// HTTP-Handler des Bewegungsmelders

use crate::SharedMotionStatus;
use crate::config::MOTION_SENSOR_NAME;
use crate::web::protocol::MotionStatusResponse;
use crate::web::response::ApiResponse;

/// `GET /api/status`
pub async fn status(status: &SharedMotionStatus) -> ApiResponse {
    let status = status.lock().await;
    ApiResponse::json(&MotionStatusResponse::new(MOTION_SENSOR_NAME, &status))
}
