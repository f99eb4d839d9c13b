use axum::Json;

use crate::types::HealthResponse;

/// 健康检查
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "系统 (System)",
    responses(
        (status = 200, description = "服务存活", body = HealthResponse)
    )
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
