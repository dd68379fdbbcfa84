//! 대시보드 시스템의 에러 타입.
//!
//! 이 모듈은 시스템 전반에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 핵심 대시보드 에러.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 데이터 소스 에러 (네트워크/파싱)
    #[error("데이터 소스 에러: {0}")]
    Source(String),

    /// 조회 성공, 데이터 없음
    #[error("데이터 없음: {0}")]
    NoData(String),

    /// 찾을 수 없음
    #[error("찾을 수 없음: {0}")]
    NotFound(String),

    /// 저장소 에러 (SQLite I/O)
    #[error("저장소 에러: {0}")]
    Storage(String),

    /// 잘못된 데이터 (검증 실패)
    #[error("잘못된 데이터: {0}")]
    Validation(String),

    /// 요청 한도 초과
    #[error("요청 한도 초과: {0}")]
    RateLimit(String),

    /// 내부 에러
    #[error("내부 에러: {0}")]
    Internal(String),
}

/// 대시보드 작업을 위한 Result 타입.
pub type DashboardResult<T> = Result<T, DashboardError>;

impl DashboardError {
    /// 재시도 가능한 에러인지 확인합니다.
    ///
    /// 소스/네트워크 계열 에러는 다음 수집 주기에 다시 시도할 수 있습니다.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            DashboardError::Source(_) | DashboardError::NoData(_) | DashboardError::RateLimit(_)
        )
    }

    /// 전체 작업을 중단시켜야 하는 에러인지 확인합니다.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DashboardError::Storage(_) | DashboardError::Config(_))
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(err: serde_json::Error) -> Self {
        DashboardError::Validation(err.to_string())
    }
}
