//! Standalone data collector for the KOSPI dashboard.
//!
//! 이 crate는 API 서버와 독립적으로 데이터를 수집하는 바이너리를 제공합니다:
//! - 코스피 상위 10개 종목의 회사 정보/일봉 수집
//! - 종목 간 요청 간격 조절 (pacing)
//! - 종목 단위 실패 격리 및 수집 리포트

pub mod config;
pub mod error;
pub mod pacing;
pub mod pipeline;
pub mod stats;

pub use config::CollectorConfig;
pub use error::{CollectorError, Result};
pub use pacing::{FixedDelay, NoPacing, PacingPolicy};
pub use pipeline::RefreshPipeline;
pub use stats::{RefreshReport, SymbolOutcome, SymbolStatus};
