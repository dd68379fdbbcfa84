//! 요청 간격 조절 정책.
//!
//! 업스트림 rate limit을 지키기 위해 종목 간 수집 사이에 일시 정지를
//! 넣습니다. 고정 지연을 하드코딩하는 대신 주입 가능한 정책으로 분리해
//! 테스트에서는 no-op으로 대체합니다.

use async_trait::async_trait;
use std::time::Duration;

/// 연속 업스트림 호출 사이의 지연 정책.
#[async_trait]
pub trait PacingPolicy: Send + Sync {
    /// 다음 호출 전에 일시 정지합니다.
    async fn pause(&self);
}

/// 고정 지연 정책 (기본 2초).
#[derive(Debug, Clone)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    /// 주어진 지연으로 생성합니다.
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// 지연 시간을 반환합니다.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

#[async_trait]
impl PacingPolicy for FixedDelay {
    async fn pause(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

/// 지연 없는 정책 (테스트용).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

#[async_trait]
impl PacingPolicy for NoPacing {
    async fn pause(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_fixed_delay_sleeps() {
        let policy = FixedDelay::new(Duration::from_secs(1));
        let before = tokio::time::Instant::now();
        policy.pause().await;
        assert!(before.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_no_pacing_returns_immediately() {
        NoPacing.pause().await;
    }
}
