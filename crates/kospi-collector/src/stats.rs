//! 수집 리포트 구조체.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 종목 하나의 수집 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SymbolStatus {
    /// 일봉 배치 저장 성공
    Updated {
        /// 저장된 일봉 수
        bars: usize,
    },
    /// 조회 성공, 데이터 0건
    Empty,
    /// 조회 또는 저장 실패
    Failed {
        /// 실패 사유
        reason: String,
    },
}

/// 종목별 수집 결과 항목.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolOutcome {
    /// 종목 코드
    pub symbol: String,
    /// 결과
    pub status: SymbolStatus,
}

/// 수집 작업 리포트.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshReport {
    /// 총 시도 종목 수
    pub total: usize,
    /// 성공 종목 수 (일봉 배치 저장 완료)
    pub success: usize,
    /// 실패 종목 수
    pub errors: usize,
    /// 빈 데이터 종목 수 (조회 성공, 데이터 없음)
    pub empty: usize,
    /// 저장된 총 일봉 수
    pub total_bars: usize,
    /// 정규화 단계에서 버린 행 수
    pub dropped_rows: usize,
    /// 종목별 결과
    pub outcomes: Vec<SymbolOutcome>,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl RefreshReport {
    /// 새 리포트를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.success as f64 / self.total as f64) * 100.0
        }
    }

    /// 종목 결과를 기록합니다.
    pub fn record(&mut self, symbol: &str, status: SymbolStatus) {
        match &status {
            SymbolStatus::Updated { bars } => {
                self.success += 1;
                self.total_bars += bars;
            }
            SymbolStatus::Empty => self.empty += 1,
            SymbolStatus::Failed { .. } => self.errors += 1,
        }
        self.outcomes.push(SymbolOutcome {
            symbol: symbol.to_string(),
            status,
        });
    }

    /// 리포트 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            total = self.total,
            success = self.success,
            errors = self.errors,
            empty = self.empty,
            total_bars = self.total_bars,
            dropped_rows = self.dropped_rows,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "수집 완료"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_tallies_by_status() {
        let mut report = RefreshReport::new();
        report.total = 3;
        report.record("005930", SymbolStatus::Updated { bars: 200 });
        report.record("000660", SymbolStatus::Failed {
            reason: "timeout".to_string(),
        });
        report.record("005380", SymbolStatus::Empty);

        assert_eq!(report.success, 1);
        assert_eq!(report.errors, 1);
        assert_eq!(report.empty, 1);
        assert_eq!(report.total_bars, 200);
        assert_eq!(report.outcomes.len(), 3);
    }

    #[test]
    fn test_success_rate() {
        let mut report = RefreshReport::new();
        assert_eq!(report.success_rate(), 0.0);

        report.total = 4;
        report.success = 3;
        assert_eq!(report.success_rate(), 75.0);
    }
}
