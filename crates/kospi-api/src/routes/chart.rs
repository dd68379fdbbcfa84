//! 차트 데이터 endpoint.
//!
//! - `GET /api/chart-data/{symbol}?days=N` - 차트용 시계열 데이터
//!
//! `days`는 서버 측에서 [`MAX_CHART_DAYS`](kospi_data::MAX_CHART_DAYS)로
//! 잘리며, 요청값과 무관하게 730일을 넘지 않습니다.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use kospi_data::MAX_CHART_DAYS;

use crate::error::{error_response, not_found, ApiFailure};
use crate::state::AppState;

/// 차트 데이터 쿼리 파라미터.
#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    /// 조회 일수 (기본 365, 최대 730)
    pub days: Option<usize>,
}

/// 차트용 시계열 (프론트엔드 차트 라이브러리 형식).
#[derive(Debug, Serialize, Deserialize)]
pub struct ChartPayload {
    /// 거래일 레이블 (오름차순)
    pub labels: Vec<String>,
    /// 종가
    pub prices: Vec<f64>,
    /// 거래량
    pub volumes: Vec<i64>,
}

/// 차트 데이터 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChartDataResponse {
    pub success: bool,
    pub data: ChartPayload,
    pub symbol: String,
    pub days: usize,
    pub data_points: usize,
}

/// 차트 데이터 조회.
///
/// GET /api/chart-data/{symbol}?days=N
pub async fn get_chart_data(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ChartDataResponse>, ApiFailure> {
    let requested = query.days.unwrap_or(365);
    let days = requested.clamp(1, MAX_CHART_DAYS);

    let series = state
        .summary
        .chart_series(&symbol, days)
        .await
        .map_err(error_response)?;

    let Some(series) = series else {
        return Err(not_found("No data found"));
    };

    let data_points = series.len();
    Ok(Json(ChartDataResponse {
        success: true,
        data: ChartPayload {
            labels: series.dates,
            prices: series.prices,
            volumes: series.volumes,
        },
        symbol,
        days,
        data_points,
    }))
}
