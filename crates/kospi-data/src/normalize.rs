//! 소스별 원시 데이터 정규화.
//!
//! 데이터 소스마다 컬럼 이름(한글 레이블 또는 대소문자가 다른 영문)과
//! 날짜 표현이 다릅니다. 이 모듈은 소스 스키마를 적용해 원시 행을
//! 표준 `DailyBar`로 변환하는 순수 함수를 제공합니다.
//!
//! # 규칙
//!
//! - 가격은 `f64`로 강제 변환하며, 종가가 음수이거나 유한하지 않으면
//!   해당 행을 버립니다 (저장하지 않음).
//! - 거래량은 음수 불가 정수로 변환하며, 결측/NaN은 0으로 처리합니다.
//! - 날짜는 소스 형식에서 파싱해 시간 정보 없는 달력 날짜로 만듭니다.

use chrono::NaiveDate;
use kospi_core::DailyBar;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::warn;

/// 정규화 오류.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// 필수 필드 누락
    #[error("missing field: {0}")]
    MissingField(String),

    /// 날짜 파싱 실패
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// 종가가 음수이거나 유한하지 않음
    #[error("invalid close price: {0}")]
    InvalidClose(String),
}

/// 소스별 필드 이름과 날짜 형식.
#[derive(Debug, Clone)]
pub struct SourceSchema {
    /// 날짜 필드 이름
    pub date_key: &'static str,
    /// 시가 필드 이름
    pub open_key: &'static str,
    /// 고가 필드 이름
    pub high_key: &'static str,
    /// 저가 필드 이름
    pub low_key: &'static str,
    /// 종가 필드 이름
    pub close_key: &'static str,
    /// 거래량 필드 이름
    pub volume_key: &'static str,
    /// chrono 날짜 형식 문자열 (예: "%Y%m%d")
    pub date_format: &'static str,
}

impl SourceSchema {
    /// 한글 레이블 스키마 (네이버/KRX 계열, `YYYYMMDD` 날짜).
    pub fn korean() -> Self {
        Self {
            date_key: "날짜",
            open_key: "시가",
            high_key: "고가",
            low_key: "저가",
            close_key: "종가",
            volume_key: "거래량",
            date_format: "%Y%m%d",
        }
    }

    /// 영문 레이블 스키마 (Yahoo/FDR 계열, ISO-8601 날짜).
    pub fn english() -> Self {
        Self {
            date_key: "Date",
            open_key: "Open",
            high_key: "High",
            low_key: "Low",
            close_key: "Close",
            volume_key: "Volume",
            date_format: "%Y-%m-%d",
        }
    }
}

/// 소스가 반환한 원시 일봉 행.
///
/// 필드 이름은 소스마다 다르므로 레이블 → 값 맵으로 보관합니다.
#[derive(Debug, Clone, Default)]
pub struct RawBar {
    /// 레이블 → 값
    pub values: BTreeMap<String, Value>,
}

impl RawBar {
    /// 빈 원시 행을 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 필드를 추가합니다 (빌더 스타일, 테스트 편의용).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// 레이블로 값을 찾습니다. 정확히 일치하는 키를 우선하고,
    /// 없으면 대소문자를 무시하고 다시 찾습니다.
    fn get(&self, key: &str) -> Option<&Value> {
        if let Some(v) = self.values.get(key) {
            return Some(v);
        }
        self.values
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }
}

/// 원시 행 하나를 표준 일봉으로 변환합니다.
pub fn normalize(
    symbol: &str,
    raw: &RawBar,
    schema: &SourceSchema,
) -> Result<DailyBar, NormalizeError> {
    let date = parse_date(raw, schema)?;

    let open = field_as_f64(raw, schema.open_key).unwrap_or(0.0);
    let high = field_as_f64(raw, schema.high_key).unwrap_or(0.0);
    let low = field_as_f64(raw, schema.low_key).unwrap_or(0.0);
    let close = field_as_f64(raw, schema.close_key)
        .ok_or_else(|| NormalizeError::MissingField(schema.close_key.to_string()))?;

    if !close.is_finite() || close < 0.0 {
        return Err(NormalizeError::InvalidClose(format!(
            "{} {}: {}",
            symbol,
            date.format("%Y-%m-%d"),
            close
        )));
    }

    // 결측/NaN/음수 거래량은 0으로
    let volume = field_as_f64(raw, schema.volume_key)
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v as i64)
        .unwrap_or(0);

    Ok(DailyBar::new(symbol, date, open, high, low, close, volume))
}

/// 원시 행 시퀀스를 변환합니다.
///
/// 검증에 실패한 행은 경고 로그와 함께 버리고, `(정규화된 일봉, 버린 행 수)`를
/// 반환합니다. 잘못된 행 하나가 배치 전체를 막지 않습니다.
pub fn normalize_series(
    symbol: &str,
    raw_bars: &[RawBar],
    schema: &SourceSchema,
) -> (Vec<DailyBar>, usize) {
    let mut bars = Vec::with_capacity(raw_bars.len());
    let mut dropped = 0;

    for raw in raw_bars {
        match normalize(symbol, raw, schema) {
            Ok(bar) => bars.push(bar),
            Err(e) => {
                dropped += 1;
                warn!(symbol = symbol, error = %e, "잘못된 일봉 행 버림");
            }
        }
    }

    (bars, dropped)
}

/// 날짜 필드를 파싱합니다. JSON 문자열과 숫자(예: 20240102) 모두 허용합니다.
fn parse_date(raw: &RawBar, schema: &SourceSchema) -> Result<NaiveDate, NormalizeError> {
    let value = raw
        .get(schema.date_key)
        .ok_or_else(|| NormalizeError::MissingField(schema.date_key.to_string()))?;

    let text = match value {
        Value::String(s) => s.trim().trim_matches('"').to_string(),
        Value::Number(n) => n.to_string(),
        other => return Err(NormalizeError::InvalidDate(other.to_string())),
    };

    NaiveDate::parse_from_str(&text, schema.date_format)
        .or_else(|_| NaiveDate::parse_from_str(&text, "%Y-%m-%d"))
        .map_err(|_| NormalizeError::InvalidDate(text))
}

/// 숫자 필드를 f64로 변환합니다. 문자열 숫자("70,000" 포함)도 허용합니다.
fn field_as_f64(raw: &RawBar, key: &str) -> Option<f64> {
    match raw.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse().ok(),
        _ => None,
    }
}

// =============================================================================
// 테스트
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn korean_raw() -> RawBar {
        RawBar::new()
            .with("날짜", "20240102")
            .with("시가", 70000)
            .with("고가", 71000)
            .with("저가", 69500)
            .with("종가", 70500)
            .with("거래량", 12345678)
    }

    #[test]
    fn test_normalize_korean_labels() {
        let bar = normalize("005930", &korean_raw(), &SourceSchema::korean()).unwrap();
        assert_eq!(bar.symbol, "005930");
        assert_eq!(bar.date_str(), "2024-01-02");
        assert_eq!(bar.open, 70000.0);
        assert_eq!(bar.close, 70500.0);
        assert_eq!(bar.volume, 12_345_678);
    }

    #[test]
    fn test_normalize_english_labels_case_insensitive() {
        let raw = RawBar::new()
            .with("date", "2024-01-02")
            .with("open", 100.0)
            .with("high", 110.0)
            .with("low", 95.0)
            .with("close", 105.0)
            .with("volume", 1000);

        let bar = normalize("TEST", &raw, &SourceSchema::english()).unwrap();
        assert_eq!(bar.close, 105.0);
    }

    #[test]
    fn test_normalize_numeric_date_key() {
        let raw = korean_raw().with("날짜", 20240102);
        let bar = normalize("005930", &raw, &SourceSchema::korean()).unwrap();
        assert_eq!(bar.date_str(), "2024-01-02");
    }

    #[test]
    fn test_missing_volume_becomes_zero() {
        let mut raw = korean_raw();
        raw.values.remove("거래량");
        let bar = normalize("005930", &raw, &SourceSchema::korean()).unwrap();
        assert_eq!(bar.volume, 0);
    }

    #[test]
    fn test_negative_volume_becomes_zero() {
        let raw = korean_raw().with("거래량", -10);
        let bar = normalize("005930", &raw, &SourceSchema::korean()).unwrap();
        assert_eq!(bar.volume, 0);
    }

    #[test]
    fn test_negative_close_is_rejected() {
        let raw = korean_raw().with("종가", -1.0);
        let err = normalize("005930", &raw, &SourceSchema::korean()).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidClose(_)));
    }

    #[test]
    fn test_missing_close_is_rejected() {
        let mut raw = korean_raw();
        raw.values.remove("종가");
        let err = normalize("005930", &raw, &SourceSchema::korean()).unwrap_err();
        assert!(matches!(err, NormalizeError::MissingField(_)));
    }

    #[test]
    fn test_comma_separated_string_price() {
        let raw = korean_raw().with("종가", "70,500");
        let bar = normalize("005930", &raw, &SourceSchema::korean()).unwrap();
        assert_eq!(bar.close, 70500.0);
    }

    #[test]
    fn test_normalize_series_drops_bad_rows() {
        let rows = vec![
            korean_raw(),
            korean_raw().with("종가", -5.0),
            korean_raw().with("날짜", "20240103"),
        ];

        let (bars, dropped) = normalize_series("005930", &rows, &SourceSchema::korean());
        assert_eq!(bars.len(), 2);
        assert_eq!(dropped, 1);
    }
}
