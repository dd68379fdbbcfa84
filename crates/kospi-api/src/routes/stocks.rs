//! 종목 요약/상세 endpoint.
//!
//! - `GET /api/stocks` - 전 종목 요약 (현재가, 1년 수익률)
//! - `GET /api/stocks/{symbol}` - 종목 상세 (회사 정보 + 1년 차트)

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use kospi_data::{StockDetail, StockSummary};

use crate::error::{error_response, error_response_with_empty_data, not_found, ApiFailure};
use crate::state::AppState;

/// 전 종목 요약 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct StocksResponse {
    pub success: bool,
    pub data: Vec<StockSummary>,
    pub count: usize,
}

/// 종목 상세 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct StockDetailResponse {
    pub success: bool,
    pub data: StockDetail,
}

/// 전 종목 요약 조회.
///
/// GET /api/stocks
///
/// 일봉이 없는 회사는 목록에서 제외됩니다.
pub async fn get_stocks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StocksResponse>, ApiFailure> {
    let summary = state
        .summary
        .all_stocks_summary()
        .await
        .map_err(error_response_with_empty_data)?;

    let count = summary.len();
    Ok(Json(StocksResponse {
        success: true,
        data: summary,
        count,
    }))
}

/// 종목 상세 조회.
///
/// GET /api/stocks/{symbol}
///
/// 미등록 종목이거나 가격 이력이 없으면 404를 반환합니다.
pub async fn get_stock_detail(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Json<StockDetailResponse>, ApiFailure> {
    let detail = state
        .summary
        .stock_detail(&symbol)
        .await
        .map_err(error_response)?;

    match detail {
        Some(data) => Ok(Json(StockDetailResponse {
            success: true,
            data,
        })),
        None => Err(not_found("Stock data not found")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_test_state;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use chrono::NaiveDate;
    use kospi_core::{Company, DailyBar};
    use tower::ServiceExt;

    fn app(state: Arc<crate::state::AppState>) -> Router {
        Router::new()
            .route("/api/stocks", get(get_stocks))
            .route("/api/stocks/{symbol}", get(get_stock_detail))
            .with_state(state)
    }

    async fn seed_samsung(state: &crate::state::AppState) {
        let company = Company::new("005930", "삼성전자", 400e12, "전기전자");
        state.store.upsert_company(&company).await.unwrap();

        let bars = vec![
            DailyBar::new(
                "005930",
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                70000.0,
                71000.0,
                69500.0,
                70500.0,
                12_000_000,
            ),
            DailyBar::new(
                "005930",
                NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                70500.0,
                72000.0,
                70000.0,
                71800.0,
                13_500_000,
            ),
        ];
        state.store.upsert_bars("005930", &bars).await.unwrap();
    }

    #[tokio::test]
    async fn test_get_stocks_empty_store_returns_empty_list() {
        let state = create_test_state().await;

        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/api/stocks")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let stocks: StocksResponse = serde_json::from_slice(&body).unwrap();
        assert!(stocks.success);
        assert_eq!(stocks.count, 0);
        assert!(stocks.data.is_empty());
    }

    #[tokio::test]
    async fn test_get_stocks_lists_seeded_company() {
        let state = create_test_state().await;
        seed_samsung(&state).await;

        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/api/stocks")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let stocks: StocksResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(stocks.count, 1);
        assert_eq!(stocks.data[0].symbol, "005930");
        assert_eq!(stocks.data[0].name, "삼성전자");
        assert_eq!(stocks.data[0].current_price, 71800.0);
    }

    #[tokio::test]
    async fn test_get_stock_detail_unknown_symbol_returns_404() {
        let state = create_test_state().await;

        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/api/stocks/999999")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload["success"], false);
        assert_eq!(payload["error"], "Stock data not found");
    }

    #[tokio::test]
    async fn test_get_stock_detail_includes_chart() {
        let state = create_test_state().await;
        seed_samsung(&state).await;

        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/api/stocks/005930")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let detail: StockDetailResponse = serde_json::from_slice(&body).unwrap();
        assert!(detail.success);
        assert_eq!(detail.data.symbol, "005930");
        assert_eq!(detail.data.chart.len(), 2);
        // 차트는 오름차순
        assert_eq!(detail.data.chart.dates, vec!["2024-01-02", "2024-01-03"]);
    }
}
