//! # KOSPI Core
//!
//! KOSPI 대시보드의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 회사 정보 및 일봉(OHLCV) 구조체
//! - 조회 기간 정의
//! - 추적 대상 종목 테이블 (코스피 시총 상위 10개)
//! - 에러 타입
//! - 로깅 인프라

pub mod error;
pub mod logging;
pub mod types;

pub use error::*;
pub use logging::*;
pub use types::*;
