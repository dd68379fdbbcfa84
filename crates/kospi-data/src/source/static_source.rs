//! 결정론적 오프라인 데이터 소스.
//!
//! 네트워크 없이 동작하는 합성 데이터 소스입니다. 개발 환경과 파이프라인
//! 테스트에서 사용하며, 종목별로 실패/빈 응답 시나리오를 스크립트할 수
//! 있습니다. 같은 입력에는 항상 같은 데이터를 반환합니다.

use super::{CompanyInfo, MarketDataSource, SourceError};
use crate::normalize::{RawBar, SourceSchema};
use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::HashSet;

/// 결정론적 오프라인 데이터 소스.
#[derive(Debug, Default)]
pub struct StaticDataSource {
    /// 가격 조회가 전송 오류로 실패하는 종목
    fail_prices: HashSet<String>,
    /// 가격 조회가 0건을 반환하는 종목
    empty_prices: HashSet<String>,
    /// 회사 정보 조회가 실패하는 종목
    fail_company: HashSet<String>,
}

impl StaticDataSource {
    /// 새 소스를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 해당 종목의 가격 조회가 전송 오류로 실패하도록 합니다.
    pub fn with_price_failure(mut self, symbol: impl Into<String>) -> Self {
        self.fail_prices.insert(symbol.into());
        self
    }

    /// 해당 종목의 가격 조회가 0건을 반환하도록 합니다.
    pub fn with_empty_prices(mut self, symbol: impl Into<String>) -> Self {
        self.empty_prices.insert(symbol.into());
        self
    }

    /// 해당 종목의 회사 정보 조회가 실패하도록 합니다.
    pub fn with_company_failure(mut self, symbol: impl Into<String>) -> Self {
        self.fail_company.insert(symbol.into());
        self
    }

    /// 종목 코드에서 결정론적 기준 가격을 유도합니다.
    fn base_price(symbol: &str) -> f64 {
        let seed: u32 = symbol
            .bytes()
            .fold(0u32, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u32));
        10_000.0 + (seed % 90_000) as f64
    }
}

#[async_trait]
impl MarketDataSource for StaticDataSource {
    fn name(&self) -> &'static str {
        "static"
    }

    fn schema(&self) -> SourceSchema {
        SourceSchema::english()
    }

    async fn fetch_company_info(&self, symbol: &str) -> Result<CompanyInfo, SourceError> {
        if self.fail_company.contains(symbol) {
            return Err(SourceError::Http("scripted company failure".to_string()));
        }

        Ok(CompanyInfo {
            symbol: symbol.to_string(),
            name: kospi_core::fallback_name(symbol),
            market_cap: 0.0,
            sector: "Unknown".to_string(),
            degraded: false,
        })
    }

    async fn fetch_price_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>, SourceError> {
        if self.fail_prices.contains(symbol) {
            return Err(SourceError::Http("scripted transport failure".to_string()));
        }
        if self.empty_prices.contains(symbol) {
            return Err(SourceError::NoData {
                symbol: symbol.to_string(),
            });
        }

        let base = Self::base_price(symbol);
        let mut bars = Vec::new();
        let mut day = start;
        let mut i = 0u32;

        while day <= end {
            // 주말은 휴장
            if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
                let drift = (i % 20) as f64 * 0.002;
                let close = base * (1.0 + drift);
                bars.push(
                    RawBar::new()
                        .with("Date", day.format("%Y-%m-%d").to_string())
                        .with("Open", close * 0.99)
                        .with("High", close * 1.01)
                        .with("Low", close * 0.98)
                        .with("Close", close)
                        .with("Volume", 100_000 + (i as i64) * 137),
                );
                i += 1;
            }
            day += Duration::days(1);
        }

        if bars.is_empty() {
            return Err(SourceError::NoData {
                symbol: symbol.to_string(),
            });
        }

        Ok(bars)
    }
}

// =============================================================================
// 테스트
// =============================================================================
