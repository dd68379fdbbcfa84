//! 데이터 관리 및 저장.
//!
//! 이 crate는 다음을 제공합니다:
//! - SQLite 기반 가격 캐시 저장소 (`PriceStore`)
//! - 소스별 컬럼/날짜 형식을 표준 일봉으로 변환하는 정규화 계층
//! - 교체 가능한 시장 데이터 소스 (`MarketDataSource`)
//! - 읽기 전용 요약/집계 서비스 (`SummaryService`)

pub mod error;
pub mod normalize;
pub mod source;
pub mod store;
pub mod summary;

pub use error::{DataError, Result};
pub use normalize::{normalize, normalize_series, NormalizeError, RawBar, SourceSchema};
pub use source::{CompanyInfo, MarketDataSource, NaverFinanceSource, SourceError, StaticDataSource};
pub use store::{BarStatistics, LatestClose, PriceStore};
pub use summary::{ChartSeries, StockDetail, StockSummary, SummaryService, MAX_CHART_DAYS};
