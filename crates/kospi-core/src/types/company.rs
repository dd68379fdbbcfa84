//! 회사 정보 타입.

use serde::{Deserialize, Serialize};

/// 상장 회사 기본 정보.
///
/// `symbol`이 자연 키이며, 저장 시 insert-or-replace로 갱신됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    /// 종목 코드 (6자리, 예: "005930")
    pub symbol: String,
    /// 종목명
    pub name: String,
    /// 시가총액 (원). 조회 실패 시 0 (알 수 없음)
    pub market_cap: f64,
    /// 업종(섹터)
    pub sector: String,
}

impl Company {
    /// 새 회사 정보를 생성합니다.
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        market_cap: f64,
        sector: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
            market_cap: market_cap.max(0.0),
            sector: sector.into(),
        }
    }

    /// 시가총액을 알 수 없는지 확인합니다.
    pub fn market_cap_unknown(&self) -> bool {
        self.market_cap <= 0.0
    }
}
