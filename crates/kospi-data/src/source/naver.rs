//! 네이버 금융 데이터 소스.
//!
//! 국내(KR) 주식의 일봉과 회사 기본 정보를 네이버 금융에서 수집합니다.
//!
//! ## 데이터 소스
//! - `siseJson.naver`: 일봉 OHLCV (한글 컬럼 레이블, `YYYYMMDD` 날짜)
//! - `/api/stock/{symbol}/integration`: 종목명, 업종, 시가총액
//!
//! 일봉 응답은 JSON과 유사하지만 작은따옴표를 사용하는 비표준 형식이므로
//! 관대하게 정리한 뒤 파싱합니다.

use super::{CompanyInfo, MarketDataSource, SourceError};
use crate::normalize::{RawBar, SourceSchema};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_SISE_BASE: &str = "https://api.finance.naver.com";
const DEFAULT_STOCK_API_BASE: &str = "https://m.stock.naver.com";

/// 네이버 금융 데이터 소스.
pub struct NaverFinanceSource {
    client: Client,
    sise_base: String,
    stock_api_base: String,
}

impl NaverFinanceSource {
    /// 기본 설정으로 생성합니다.
    pub fn new() -> Self {
        Self::with_base_urls(DEFAULT_SISE_BASE, DEFAULT_STOCK_API_BASE)
    }

    /// 커스텀 base URL로 생성합니다 (테스트용).
    pub fn with_base_urls(sise_base: impl Into<String>, stock_api_base: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
            .build()
            .unwrap_or_default();

        Self {
            client,
            sise_base: sise_base.into(),
            stock_api_base: stock_api_base.into(),
        }
    }

    /// siseJson 응답 본문을 원시 일봉 목록으로 파싱합니다.
    ///
    /// 응답은 첫 행이 컬럼 레이블인 2차원 배열입니다:
    /// `[["날짜","시가","고가","저가","종가","거래량",...], ["20240102",70000,...], ...]`
    fn parse_sise_body(symbol: &str, body: &str) -> Result<Vec<RawBar>, SourceError> {
        // 작은따옴표 → 큰따옴표 정리 후 JSON 파싱
        let sanitized = body.replace('\'', "\"");
        let table: Vec<Vec<Value>> = serde_json::from_str(sanitized.trim())
            .map_err(|e| SourceError::Parse(format!("siseJson: {}", e)))?;

        let mut rows = table.into_iter();
        let header: Vec<String> = rows
            .next()
            .ok_or_else(|| SourceError::NoData {
                symbol: symbol.to_string(),
            })?
            .into_iter()
            .filter_map(|v| v.as_str().map(|s| s.to_string()))
            .collect();

        if header.is_empty() {
            return Err(SourceError::Parse("siseJson: 헤더 행 없음".to_string()));
        }

        let mut bars = Vec::new();
        for row in rows {
            let mut raw = RawBar::new();
            for (label, value) in header.iter().zip(row.into_iter()) {
                raw.values.insert(label.clone(), value);
            }
            bars.push(raw);
        }

        Ok(bars)
    }

    /// integration 응답에서 회사 정보를 추출합니다.
    fn parse_company_body(symbol: &str, body: &Value) -> Option<CompanyInfo> {
        let name = body.get("stockName")?.as_str()?.to_string();

        let sector = body
            .get("industryCodeType")
            .and_then(|v| v.get("industryGroupKor"))
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown")
            .to_string();

        // 시가총액은 숫자 필드가 있을 때만 사용하고, 없으면 0 (알 수 없음)
        let market_cap = body
            .get("marketValue")
            .and_then(parse_loose_number)
            .filter(|v| *v >= 0.0)
            .unwrap_or(0.0);

        Some(CompanyInfo {
            symbol: symbol.to_string(),
            name,
            market_cap,
            sector,
            degraded: false,
        })
    }
}

impl Default for NaverFinanceSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataSource for NaverFinanceSource {
    fn name(&self) -> &'static str {
        "naver"
    }

    fn schema(&self) -> SourceSchema {
        SourceSchema::korean()
    }

    async fn fetch_company_info(&self, symbol: &str) -> Result<CompanyInfo, SourceError> {
        let url = format!("{}/api/stock/{}/integration", self.stock_api_base, symbol);

        let result = async {
            let response = self.client.get(&url).send().await?;
            if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(SourceError::RateLimited);
            }
            let body: Value = response
                .error_for_status()?
                .json()
                .await
                .map_err(|e| SourceError::Parse(e.to_string()))?;

            Self::parse_company_body(symbol, &body)
                .ok_or_else(|| SourceError::Parse("integration: 종목명 없음".to_string()))
        }
        .await;

        match result {
            Ok(info) => {
                debug!(symbol = symbol, name = %info.name, "회사 정보 조회 성공");
                Ok(info)
            }
            Err(e) => {
                // 조회 실패는 폴백 테이블로 대체하되, degraded로 표시
                warn!(symbol = symbol, error = %e, "회사 정보 조회 실패, 폴백 사용");
                Ok(CompanyInfo::fallback(symbol))
            }
        }
    }

    async fn fetch_price_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>, SourceError> {
        let url = format!(
            "{}/siseJson.naver?symbol={}&requestType=1&startTime={}&endTime={}&timeframe=day",
            self.sise_base,
            symbol,
            start.format("%Y%m%d"),
            end.format("%Y%m%d"),
        );

        let response = self.client.get(&url).send().await?;
        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimited);
        }

        let body = response.error_for_status()?.text().await?;
        let bars = Self::parse_sise_body(symbol, &body)?;

        if bars.is_empty() {
            return Err(SourceError::NoData {
                symbol: symbol.to_string(),
            });
        }

        debug!(symbol = symbol, count = bars.len(), "일봉 조회 성공");
        Ok(bars)
    }
}

/// 숫자 또는 쉼표 포함 문자열을 f64로 파싱합니다.
fn parse_loose_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

// =============================================================================
// 테스트
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_series;

    const SISE_BODY: &str = "[['날짜', '시가', '고가', '저가', '종가', '거래량', '외국인소진율'],
['20240102', 70000, 71000, 69500, 70500, 12345678, 54.2],
['20240103', 70500, 70900, 69800, 70000, 9876543, 54.1]]";

    #[test]
    fn test_parse_sise_body() {
        let bars = NaverFinanceSource::parse_sise_body("005930", SISE_BODY).unwrap();
        assert_eq!(bars.len(), 2);

        let (normalized, dropped) =
            normalize_series("005930", &bars, &SourceSchema::korean());
        assert_eq!(dropped, 0);
        assert_eq!(normalized[0].date_str(), "2024-01-02");
        assert_eq!(normalized[0].close, 70500.0);
        assert_eq!(normalized[1].volume, 9_876_543);
    }

    #[test]
    fn test_parse_sise_body_garbage_is_parse_error() {
        let err = NaverFinanceSource::parse_sise_body("005930", "<html>점검중</html>").unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }

    #[test]
    fn test_parse_company_body() {
        let body: Value = serde_json::json!({
            "stockName": "삼성전자",
            "industryCodeType": { "industryGroupKor": "반도체와반도체장비" },
            "marketValue": 400_000_000_000_000_u64,
        });

        let info = NaverFinanceSource::parse_company_body("005930", &body).unwrap();
        assert_eq!(info.name, "삼성전자");
        assert_eq!(info.sector, "반도체와반도체장비");
        assert_eq!(info.market_cap, 400e12);
        assert!(!info.degraded);
    }

    #[test]
    fn test_parse_company_body_missing_market_cap_is_zero() {
        let body: Value = serde_json::json!({ "stockName": "삼성전자" });
        let info = NaverFinanceSource::parse_company_body("005930", &body).unwrap();
        assert_eq!(info.market_cap, 0.0);
        assert_eq!(info.sector, "Unknown");
    }

    #[tokio::test]
    async fn test_fetch_price_history_via_mock_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "GET",
                mockito::Matcher::Regex(r"^/siseJson\.naver.*symbol=005930.*".to_string()),
            )
            .with_status(200)
            .with_body(SISE_BODY)
            .create_async()
            .await;

        let source = NaverFinanceSource::with_base_urls(server.url(), server.url());
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();

        let bars = source
            .fetch_price_history("005930", start, end)
            .await
            .unwrap();
        assert_eq!(bars.len(), 2);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_company_info_falls_back_on_http_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/stock/005930/integration")
            .with_status(500)
            .create_async()
            .await;

        let source = NaverFinanceSource::with_base_urls(server.url(), server.url());
        let info = source.fetch_company_info("005930").await.unwrap();

        assert!(info.degraded);
        assert_eq!(info.name, "삼성전자");
        assert_eq!(info.market_cap, 0.0);
    }
}
