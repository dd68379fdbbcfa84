//! API 에러 응답 헬퍼.
//!
//! 모든 엔드포인트는 원시 예외를 전파하지 않고 `{success: false, error}`
//! 형태의 구조화된 실패 응답으로 변환합니다. 상태 코드는 도메인 에러
//! 분류([`DashboardError`])를 따릅니다.

use axum::http::StatusCode;
use axum::Json;
use kospi_core::DashboardError;
use serde_json::{json, Value};
use std::fmt::Display;

/// 실패 응답 타입 별칭.
pub type ApiFailure = (StatusCode, Json<Value>);

/// 도메인 에러 분류에 따른 HTTP 상태 코드.
fn status_for(err: &DashboardError) -> StatusCode {
    match err {
        DashboardError::NotFound(_) | DashboardError::NoData(_) => StatusCode::NOT_FOUND,
        DashboardError::RateLimit(_) => StatusCode::TOO_MANY_REQUESTS,
        DashboardError::Validation(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// 도메인 에러를 실패 응답으로 변환합니다.
pub fn error_response(err: impl Into<DashboardError>) -> ApiFailure {
    let err = err.into();
    tracing::error!(error = %err, "요청 처리 실패");
    (
        status_for(&err),
        Json(json!({
            "success": false,
            "error": err.to_string(),
        })),
    )
}

/// 빈 데이터 배열이 포함된 실패 응답을 생성합니다 (목록 엔드포인트용).
pub fn error_response_with_empty_data(err: impl Into<DashboardError>) -> ApiFailure {
    let err = err.into();
    tracing::error!(error = %err, "요청 처리 실패");
    (
        status_for(&err),
        Json(json!({
            "success": false,
            "error": err.to_string(),
            "data": [],
        })),
    )
}

/// 404 응답을 생성합니다.
pub fn not_found(message: impl Display) -> ApiFailure {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": message.to_string(),
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_shape() {
        let (status, Json(body)) = not_found("Stock data not found");
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Stock data not found");
    }

    #[test]
    fn test_status_follows_error_classification() {
        let storage = DashboardError::Storage("disk full".to_string());
        assert_eq!(status_for(&storage), StatusCode::INTERNAL_SERVER_ERROR);

        let rate = DashboardError::RateLimit("naver".to_string());
        assert_eq!(status_for(&rate), StatusCode::TOO_MANY_REQUESTS);

        let missing = DashboardError::NotFound("005930".to_string());
        assert_eq!(status_for(&missing), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_error_response_keeps_empty_data_array() {
        let err = DashboardError::Storage("database locked".to_string());
        let (status, Json(body)) = error_response_with_empty_data(err);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["data"], json!([]));
    }
}
