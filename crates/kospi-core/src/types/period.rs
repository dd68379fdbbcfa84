//! 가격 이력 조회 기간 정의.
//!
//! 수집 파이프라인이 "현재로부터 N일 전"의 고정 구간을 계산할 때 사용합니다.

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 가격 이력 조회 기간.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// 1개월
    #[serde(rename = "1m")]
    M1,
    /// 3개월
    #[serde(rename = "3m")]
    M3,
    /// 6개월
    #[serde(rename = "6m")]
    M6,
    /// 1년
    #[default]
    #[serde(rename = "1y")]
    Y1,
}

impl Period {
    /// 이 기간의 일수를 반환합니다.
    pub fn lookback_days(&self) -> i64 {
        match self {
            Period::M1 => 30,
            Period::M3 => 90,
            Period::M6 => 180,
            Period::Y1 => 365,
        }
    }

    /// 오늘을 종료일로 하는 `(시작일, 종료일)` 구간을 계산합니다.
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        self.date_range_from(Utc::now().date_naive())
    }

    /// 주어진 종료일 기준의 `(시작일, 종료일)` 구간을 계산합니다.
    pub fn date_range_from(&self, end: NaiveDate) -> (NaiveDate, NaiveDate) {
        (end - Duration::days(self.lookback_days()), end)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::M1 => write!(f, "1m"),
            Period::M3 => write!(f, "3m"),
            Period::M6 => write!(f, "6m"),
            Period::Y1 => write!(f, "1y"),
        }
    }
}

impl FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1m" => Ok(Period::M1),
            "3m" => Ok(Period::M3),
            "6m" => Ok(Period::M6),
            "1y" => Ok(Period::Y1),
            _ => Err(format!("Unknown period: {} (expected 1m/3m/6m/1y)", s)),
        }
    }
}
