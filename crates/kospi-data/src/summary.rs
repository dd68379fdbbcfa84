//! 읽기 전용 요약/집계 서비스.
//!
//! 저장소에 캐시된 일봉만 사용하며 업스트림을 호출하지 않습니다.
//! HTTP 계층이 이 서비스의 결과를 그대로 직렬화합니다.

use crate::error::Result;
use crate::store::{BarStatistics, LatestClose, PriceStore};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// 차트 조회 시 적용되는 최대 일수 (행 수 상한).
pub const MAX_CHART_DAYS: usize = 730;

/// 1년 전 기준가를 찾는 구간: 오늘로부터 365일 전 ~ 350일 전.
///
/// 정확히 1년 전 날짜가 휴장일일 수 있어 15일 폭의 창에서 첫 거래일을
/// 사용합니다.
const YEAR_AGO_WINDOW_START_DAYS: i64 = 365;
const YEAR_AGO_WINDOW_END_DAYS: i64 = 350;

/// 종목 요약 (전체 목록 응답용).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockSummary {
    /// 종목 코드
    pub symbol: String,
    /// 종목명
    pub name: String,
    /// 현재가 (가장 최근 종가)
    pub current_price: f64,
    /// 1년 수익률 (%, 소수점 2자리 반올림)
    pub year_return: f64,
}

/// 차트 시리즈 (날짜 오름차순, 세 배열은 길이가 같음).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSeries {
    /// 거래일 (ISO-8601, 오름차순)
    pub dates: Vec<String>,
    /// 종가
    pub prices: Vec<f64>,
    /// 거래량
    pub volumes: Vec<i64>,
}

impl ChartSeries {
    /// 데이터 포인트 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// 종목 상세 (단일 종목 응답용).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockDetail {
    /// 종목 코드
    pub symbol: String,
    /// 종목명
    pub name: String,
    /// 시가총액 (원, 0 = 알 수 없음)
    pub market_cap: f64,
    /// 업종(섹터)
    pub sector: String,
    /// 최근 1년 차트
    pub chart: ChartSeries,
}

/// 요약/집계 서비스.
#[derive(Clone)]
pub struct SummaryService {
    store: PriceStore,
}

impl SummaryService {
    /// 새 서비스를 생성합니다.
    pub fn new(store: PriceStore) -> Self {
        Self { store }
    }

    /// 전 종목 요약을 조회합니다.
    ///
    /// 일봉이 하나도 없는 회사는 결과에서 제외됩니다 (오류 아님).
    pub async fn all_stocks_summary(&self) -> Result<Vec<StockSummary>> {
        self.all_stocks_summary_as_of(Utc::now().date_naive()).await
    }

    /// 기준일을 지정해 전 종목 요약을 조회합니다.
    #[instrument(skip(self))]
    pub async fn all_stocks_summary_as_of(&self, today: NaiveDate) -> Result<Vec<StockSummary>> {
        let companies = self.store.companies().await?;
        let mut summary = Vec::with_capacity(companies.len());

        for company in companies {
            let Some(latest) = self.store.latest_bar(&company.symbol).await? else {
                continue;
            };

            let year_return = self
                .year_return(&company.symbol, latest.close, today)
                .await?;

            summary.push(StockSummary {
                symbol: company.symbol,
                name: company.name,
                current_price: latest.close,
                year_return,
            });
        }

        Ok(summary)
    }

    /// 1년 수익률을 계산합니다.
    ///
    /// 기준 구간에 거래일이 없으면 0을 반환합니다.
    async fn year_return(&self, symbol: &str, current: f64, today: NaiveDate) -> Result<f64> {
        let from = today - Duration::days(YEAR_AGO_WINDOW_START_DAYS);
        let to = today - Duration::days(YEAR_AGO_WINDOW_END_DAYS);

        let window = self.store.bars_in_range(symbol, from, to).await?;
        let Some(year_ago) = window.first() else {
            return Ok(0.0);
        };

        if year_ago.close <= 0.0 {
            return Ok(0.0);
        }

        let pct = (current - year_ago.close) / year_ago.close * 100.0;
        Ok((pct * 100.0).round() / 100.0)
    }

    /// 종목 상세를 조회합니다.
    ///
    /// 미등록 종목이거나 일봉이 없으면 `None` (호출자가 404로 변환).
    pub async fn stock_detail(&self, symbol: &str) -> Result<Option<StockDetail>> {
        let Some(company) = self.store.company(symbol).await? else {
            return Ok(None);
        };

        let Some(chart) = self.chart_series(symbol, 365).await? else {
            return Ok(None);
        };

        Ok(Some(StockDetail {
            symbol: company.symbol,
            name: company.name,
            market_cap: company.market_cap,
            sector: company.sector,
            chart,
        }))
    }

    /// 차트 시리즈를 조회합니다.
    ///
    /// `days`는 서버 측에서 [`MAX_CHART_DAYS`]로 잘립니다. 날짜는 항상
    /// 오름차순이며 세 배열의 길이는 같습니다. 데이터가 없으면 `None`.
    #[instrument(skip(self))]
    pub async fn chart_series(&self, symbol: &str, days: usize) -> Result<Option<ChartSeries>> {
        let capped = days.clamp(1, MAX_CHART_DAYS);

        let mut bars = self.store.bars(symbol, capped).await?;
        if bars.is_empty() {
            return Ok(None);
        }

        // 최신순 → 시간순
        bars.reverse();

        let mut series = ChartSeries {
            dates: Vec::with_capacity(bars.len()),
            prices: Vec::with_capacity(bars.len()),
            volumes: Vec::with_capacity(bars.len()),
        };
        for bar in &bars {
            series.dates.push(bar.date_str());
            series.prices.push(bar.close);
            series.volumes.push(bar.volume);
        }

        Ok(Some(series))
    }

    /// 종목별 가격 통계를 조회합니다 (진단/리포트용).
    pub async fn price_statistics(&self) -> Result<Vec<BarStatistics>> {
        self.store.bar_statistics().await
    }

    /// 회사별 최신 종가를 조회합니다 (진단/리포트용, 종가 내림차순).
    pub async fn latest_prices(&self) -> Result<Vec<LatestClose>> {
        self.store.latest_close_join().await
    }
}

// =============================================================================
// 테스트
// =============================================================================
