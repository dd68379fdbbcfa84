//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `GET /api/stocks` - 전 종목 요약
//! - `GET /api/stocks/{symbol}` - 종목 상세
//! - `POST /api/update-data` - 데이터 갱신 트리거
//! - `GET /api/companies` - 회사 목록
//! - `GET /api/chart-data/{symbol}?days=N` - 차트 데이터 (N ≤ 730)
//! - `GET /api/health` - 헬스 체크

pub mod chart;
pub mod companies;
pub mod health;
pub mod stocks;
pub mod update;

pub use chart::ChartDataResponse;
pub use companies::CompaniesResponse;
pub use health::HealthResponse;
pub use stocks::{StockDetailResponse, StocksResponse};
pub use update::UpdateResponse;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/stocks", get(stocks::get_stocks))
        .route("/api/stocks/{symbol}", get(stocks::get_stock_detail))
        .route("/api/update-data", post(update::update_stock_data))
        .route("/api/companies", get(companies::get_companies))
        .route("/api/chart-data/{symbol}", get(chart::get_chart_data))
        .route("/api/health", get(health::health_check))
}
