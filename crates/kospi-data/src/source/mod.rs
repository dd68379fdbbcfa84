//! 시장 데이터 소스.
//!
//! 수집 파이프라인은 구체적인 업스트림(네이버, KRX, Yahoo 등)을 알지 못하고
//! `MarketDataSource` 추상 인터페이스에만 의존합니다. 소스는 교체 가능하며,
//! 테스트용 결정론적 오프라인 소스도 제공합니다.
//!
//! ## 구현체
//! - `NaverFinanceSource`: 네이버 금융 기반 실 데이터 소스
//! - `StaticDataSource`: 결정론적 오프라인 소스 (테스트/개발용)

pub mod naver;
pub mod static_source;

pub use naver::NaverFinanceSource;
pub use static_source::StaticDataSource;

use crate::normalize::{RawBar, SourceSchema};
use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

/// 데이터 소스 오류.
///
/// `NoData`(조회 성공, 0건)와 전송/파싱 오류를 구분합니다. 둘 다
/// 파이프라인 수준에서는 복구 가능하지만 로그는 다르게 남습니다.
#[derive(Debug, Error)]
pub enum SourceError {
    /// 조회는 성공했으나 데이터가 0건
    #[error("no data for symbol: {symbol}")]
    NoData { symbol: String },

    /// HTTP 전송 오류
    #[error("HTTP 요청 실패: {0}")]
    Http(String),

    /// 응답 파싱 오류
    #[error("응답 파싱 실패: {0}")]
    Parse(String),

    /// 요청 한도 초과
    #[error("Rate limit 초과")]
    RateLimited,
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Http(err.to_string())
    }
}

/// 회사 기본 정보 조회 결과.
///
/// `degraded`가 true면 업스트림 조회가 실패해 정적 폴백 테이블로 채운
/// 결과입니다. 호출자와 테스트는 실 데이터와 폴백을 구분할 수 있습니다.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyInfo {
    /// 종목 코드
    pub symbol: String,
    /// 종목명
    pub name: String,
    /// 시가총액 (원). 알 수 없으면 0
    pub market_cap: f64,
    /// 업종(섹터)
    pub sector: String,
    /// 폴백 결과 여부
    pub degraded: bool,
}

impl CompanyInfo {
    /// 정적 폴백 테이블 기반의 축소된 결과를 생성합니다.
    ///
    /// 시가총액은 실제 값을 알 수 없으므로 추정하지 않고 0으로 둡니다.
    pub fn fallback(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: kospi_core::fallback_name(symbol),
            market_cap: 0.0,
            sector: "Unknown".to_string(),
            degraded: true,
        }
    }

    /// 도메인 `Company`로 변환합니다.
    pub fn into_company(self) -> kospi_core::Company {
        kospi_core::Company::new(self.symbol, self.name, self.market_cap, self.sector)
    }
}

/// 시장 데이터 소스 추상 인터페이스.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// 소스 이름 (로그용).
    fn name(&self) -> &'static str;

    /// 이 소스가 반환하는 원시 행의 스키마.
    fn schema(&self) -> SourceSchema;

    /// 회사 기본 정보를 조회합니다.
    ///
    /// 구현체는 업스트림 조회 실패 시 오류를 전파하는 대신 폴백 테이블
    /// 기반의 `degraded` 결과를 반환할 수 있습니다.
    async fn fetch_company_info(&self, symbol: &str) -> Result<CompanyInfo, SourceError>;

    /// 주어진 날짜 구간의 원시 일봉 시퀀스를 조회합니다.
    ///
    /// 데이터가 0건이면 `SourceError::NoData`로 실패해야 합니다.
    async fn fetch_price_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<RawBar>, SourceError>;
}
