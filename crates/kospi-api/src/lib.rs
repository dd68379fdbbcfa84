//! KOSPI 대시보드 API 서버 라이브러리.
//!
//! Axum 기반 REST API를 제공합니다. 브라우저 차트 UI가 이 API를
//! 소비합니다:
//! - 전 종목 요약 / 종목 상세
//! - 차트 데이터 (일수 제한 포함)
//! - 데이터 갱신 트리거
//! - 회사 목록, 헬스 체크

pub mod error;
pub mod routes;
pub mod state;

pub use routes::create_api_router;
pub use state::AppState;
