//! 환경변수 기반 설정 모듈.

use crate::Result;
use kospi_core::Period;
use std::time::Duration;

/// Collector 전체 설정
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// 데이터베이스 URL
    pub database_url: String,
    /// API 요청 간 딜레이 (밀리초)
    pub request_delay_ms: u64,
    /// 기본 수집 기간
    pub period: Period,
}

impl CollectorConfig {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://stock_data.db".to_string());

        Ok(Self {
            database_url,
            request_delay_ms: env_var_parse("COLLECT_REQUEST_DELAY_MS", 2000),
            period: env_var_parse("COLLECT_PERIOD", Period::Y1),
        })
    }

    /// API 요청 간 딜레이를 Duration으로 반환
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

/// 환경변수에서 값을 파싱 (실패 시 기본값 사용)
fn env_var_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_delay_default() {
        let config = CollectorConfig {
            database_url: "sqlite::memory:".to_string(),
            request_delay_ms: 2000,
            period: Period::Y1,
        };
        assert_eq!(config.request_delay(), Duration::from_secs(2));
    }
}
