//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! 전역 싱글톤 대신 프로세스 시작 시 한 번 구성되는 명시적 컨텍스트
//! 객체입니다. Arc로 래핑되어 Axum의 State extractor를 통해 핸들러에
//! 주입됩니다.

use kospi_collector::PacingPolicy;
use kospi_data::{MarketDataSource, PriceStore, SummaryService};
use std::sync::Arc;

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 가격 캐시 저장소
    pub store: PriceStore,

    /// 읽기 전용 요약 서비스
    pub summary: SummaryService,

    /// 갱신 트리거에 사용되는 시장 데이터 소스
    pub source: Arc<dyn MarketDataSource>,

    /// 종목 간 요청 간격 정책
    pub pacing: Arc<dyn PacingPolicy>,
}

impl AppState {
    /// 새 상태를 생성합니다.
    pub fn new(
        store: PriceStore,
        source: Arc<dyn MarketDataSource>,
        pacing: Arc<dyn PacingPolicy>,
    ) -> Self {
        let summary = SummaryService::new(store.clone());
        Self {
            store,
            summary,
            source,
            pacing,
        }
    }
}

/// 테스트용 상태 생성 (인메모리 저장소 + 정적 데이터 소스).
#[cfg(test)]
pub(crate) async fn create_test_state() -> Arc<AppState> {
    use kospi_collector::NoPacing;
    use kospi_data::StaticDataSource;

    let store = PriceStore::connect_in_memory()
        .await
        .expect("in-memory store");
    Arc::new(AppState::new(
        store,
        Arc::new(StaticDataSource::new()),
        Arc::new(NoPacing),
    ))
}
