//! 일봉(OHLCV) 데이터 타입.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 정규화된 일봉 데이터.
///
/// `(symbol, date)`가 자연 키이며, 같은 키로 다시 저장하면 기존 행을
/// 대체합니다 (replace-on-conflict). 날짜는 ISO-8601(`YYYY-MM-DD`)
/// 문자열로 저장되어 사전순 정렬이 곧 날짜순 정렬이 됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// 종목 코드
    pub symbol: String,
    /// 거래일 (시간 정보 없음)
    pub date: NaiveDate,
    /// 시가
    pub open: f64,
    /// 고가
    pub high: f64,
    /// 저가
    pub low: f64,
    /// 종가
    pub close: f64,
    /// 거래량 (음수 불가, 결측 시 0)
    pub volume: i64,
}

impl DailyBar {
    /// 새 일봉을 생성합니다.
    pub fn new(
        symbol: impl Into<String>,
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: i64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            date,
            open,
            high,
            low,
            close,
            volume: volume.max(0),
        }
    }

    /// 날짜를 ISO-8601 문자열로 반환합니다.
    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    /// 양봉(종가 > 시가)인지 확인합니다.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }
}
