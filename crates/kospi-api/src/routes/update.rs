//! 데이터 갱신 endpoint.
//!
//! - `POST /api/update-data` - 추적 종목 전체의 수집 파이프라인 실행
//!
//! 파이프라인은 요청 핸들러 안에서 완료까지 실행됩니다 (동기 배치).
//! 종목 수가 작고(10개) 페이싱이 있어 수십 초 수준입니다.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use kospi_collector::RefreshPipeline;
use kospi_core::{kospi_top10, Period};

use crate::error::{error_response, ApiFailure};
use crate::state::AppState;

/// 갱신 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub success: bool,
    pub message: String,
    /// 가격 배치 저장에 성공한 종목 수
    pub updated_count: usize,
    /// 총 소요 시간 (초)
    pub total_time: f64,
}

/// 주식 데이터 갱신 트리거.
///
/// POST /api/update-data
pub async fn update_stock_data(
    State(state): State<Arc<AppState>>,
) -> Result<Json<UpdateResponse>, ApiFailure> {
    let pipeline = RefreshPipeline::new(
        state.store.clone(),
        state.source.clone(),
        state.pacing.clone(),
    );

    let tracked = kospi_top10();
    let report = pipeline
        .run(&tracked, Period::Y1)
        .await
        .map_err(error_response)?;

    let total_time = (report.elapsed.as_secs_f64() * 100.0).round() / 100.0;
    Ok(Json(UpdateResponse {
        success: true,
        message: format!(
            "Stock data updated: {}/{} symbols",
            report.success, report.total
        ),
        updated_count: report.success,
        total_time,
    }))
}
