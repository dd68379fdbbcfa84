//! 데이터 수집 파이프라인.
//!
//! 추적 종목마다 "조회 → 정규화 → upsert" 순서를 수행합니다. 종목 하나의
//! 실패는 그 종목에서 끝나며 전체 실행을 중단시키지 않습니다. 전체 실행이
//! 실패하는 경우는 저장소 자체를 사용할 수 없을 때뿐입니다.
//!
//! 종목 사이에는 주입된 pacing 정책이 적용됩니다. 업스트림 rate limit을
//! 지키기 위한 의도된 직렬 처리이며, 병렬 수집은 하지 않습니다.

use crate::error::{CollectorError, Result};
use crate::pacing::PacingPolicy;
use crate::stats::{RefreshReport, SymbolStatus};
use kospi_core::{Period, TrackedSymbol};
use kospi_data::{normalize_series, MarketDataSource, PriceStore, SourceError};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// 수집 파이프라인.
pub struct RefreshPipeline {
    store: PriceStore,
    source: Arc<dyn MarketDataSource>,
    pacing: Arc<dyn PacingPolicy>,
}

impl RefreshPipeline {
    /// 새 파이프라인을 생성합니다.
    pub fn new(
        store: PriceStore,
        source: Arc<dyn MarketDataSource>,
        pacing: Arc<dyn PacingPolicy>,
    ) -> Self {
        Self {
            store,
            source,
            pacing,
        }
    }

    /// 추적 종목 전체를 수집합니다.
    ///
    /// 종목 순서대로:
    /// 1. 회사 정보 조회 + upsert (실패해도 가격 수집은 계속)
    /// 2. 기간 구간의 가격 이력 조회
    /// 3. 정규화 후 일봉 배치 upsert
    /// 4. pacing 정책 적용 (실패한 종목 뒤에도 적용)
    pub async fn run(&self, tracked: &[TrackedSymbol], period: Period) -> Result<RefreshReport> {
        let start = Instant::now();
        let mut report = RefreshReport::new();
        report.total = tracked.len();

        info!(
            source = self.source.name(),
            symbols = tracked.len(),
            period = %period,
            "데이터 수집 시작"
        );

        // 저장소를 쓸 수 없으면 전체 실행 중단
        self.store
            .init_schema()
            .await
            .map_err(CollectorError::Storage)?;

        let (start_date, end_date) = period.date_range();
        let schema = self.source.schema();

        for (idx, tracked_symbol) in tracked.iter().enumerate() {
            let symbol = tracked_symbol.symbol.as_str();
            info!(
                symbol = symbol,
                name = %tracked_symbol.name,
                progress = format!("{}/{}", idx + 1, tracked.len()),
                "종목 수집 시작"
            );

            // 1. 회사 정보: 실패해도 가격 수집은 계속
            self.refresh_company(symbol).await;

            // 2-3. 가격 이력 조회 → 정규화 → 저장
            let status = self
                .refresh_prices(symbol, start_date, end_date, &schema, &mut report)
                .await;
            report.record(symbol, status);

            // 4. Rate limiting (실패 여부와 무관하게 적용)
            self.pacing.pause().await;
        }

        report.elapsed = start.elapsed();
        report.log_summary("데이터 수집");
        Ok(report)
    }

    /// 회사 정보를 조회해 저장합니다. 어떤 실패도 전파하지 않습니다.
    async fn refresh_company(&self, symbol: &str) {
        match self.source.fetch_company_info(symbol).await {
            Ok(info) => {
                if info.degraded {
                    warn!(symbol = symbol, "회사 정보 폴백 사용 (업스트림 조회 실패)");
                }
                if let Err(e) = self.store.upsert_company(&info.into_company()).await {
                    error!(symbol = symbol, error = %e, "회사 정보 저장 실패");
                }
            }
            Err(e) => {
                error!(symbol = symbol, error = %e, "회사 정보 조회 실패");
            }
        }
    }

    /// 가격 이력을 조회해 저장하고 종목 결과를 반환합니다.
    async fn refresh_prices(
        &self,
        symbol: &str,
        start_date: chrono::NaiveDate,
        end_date: chrono::NaiveDate,
        schema: &kospi_data::SourceSchema,
        report: &mut RefreshReport,
    ) -> SymbolStatus {
        let raw_bars = match self
            .source
            .fetch_price_history(symbol, start_date, end_date)
            .await
        {
            Ok(raw) => raw,
            Err(SourceError::NoData { .. }) => {
                warn!(symbol = symbol, "데이터 없음");
                return SymbolStatus::Empty;
            }
            Err(e) => {
                error!(symbol = symbol, error = %e, "가격 이력 조회 실패");
                return SymbolStatus::Failed {
                    reason: e.to_string(),
                };
            }
        };

        let (bars, dropped) = normalize_series(symbol, &raw_bars, schema);
        report.dropped_rows += dropped;

        if bars.is_empty() {
            warn!(symbol = symbol, "정규화 후 남은 일봉 없음");
            return SymbolStatus::Empty;
        }

        match self.store.upsert_bars(symbol, &bars).await {
            Ok(written) => {
                info!(symbol = symbol, bars = written, "수집 및 저장 완료");
                SymbolStatus::Updated { bars: written }
            }
            Err(e) => {
                error!(symbol = symbol, error = %e, "일봉 저장 실패");
                SymbolStatus::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

// =============================================================================
// 테스트
// =============================================================================
