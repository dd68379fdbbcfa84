//! 헬스 체크 endpoint.
//!
//! - `GET /api/health` - 서버 및 데이터베이스 상태 확인

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::state::AppState;

/// 헬스 체크 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
    /// "OK" 또는 "No data"
    pub database: String,
}

/// 헬스 체크.
///
/// GET /api/health
///
/// 저장소 질의 자체가 실패하면 500으로 응답합니다.
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<Value>)> {
    match state.store.has_data().await {
        Ok(has_data) => Ok(Json(HealthResponse {
            success: true,
            status: "healthy".to_string(),
            database: if has_data { "OK" } else { "No data" }.to_string(),
        })),
        Err(err) => {
            tracing::error!(error = %err, "헬스 체크 실패");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "status": "unhealthy",
                    "error": err.to_string(),
                })),
            ))
        }
    }
}
