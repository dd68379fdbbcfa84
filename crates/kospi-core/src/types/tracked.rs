//! 추적 대상 종목 테이블.
//!
//! 코스피 시가총액 상위 10개 종목을 고정 목록으로 관리합니다.
//! 업스트림 종목명 조회가 실패할 때 폴백 이름 테이블로도 사용됩니다.

use serde::{Deserialize, Serialize};

/// 추적 대상 종목 (코드 + 표시 이름).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedSymbol {
    /// 종목 코드 (6자리)
    pub symbol: String,
    /// 표시 이름 (한글 종목명)
    pub name: String,
}

impl TrackedSymbol {
    /// 새 추적 종목을 생성합니다.
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
        }
    }
}

/// 코스피 시총 상위 10개 종목 (순서 고정).
const KOSPI_TOP10: [(&str, &str); 10] = [
    ("005930", "삼성전자"),
    ("000660", "SK하이닉스"),
    ("207940", "삼성바이오로직스"),
    ("005380", "현대차"),
    ("051910", "LG화학"),
    ("006400", "삼성SDI"),
    ("035420", "NAVER"),
    ("005490", "POSCO홀딩스"),
    ("028260", "삼성물산"),
    ("012330", "현대모비스"),
];

/// 코스피 시총 상위 10개 종목 목록을 반환합니다.
pub fn kospi_top10() -> Vec<TrackedSymbol> {
    KOSPI_TOP10
        .iter()
        .map(|(symbol, name)| TrackedSymbol::new(*symbol, *name))
        .collect()
}

/// 종목 코드로 폴백 이름을 조회합니다.
///
/// 목록에 없는 종목은 `종목{코드}` 형태의 이름을 반환합니다.
pub fn fallback_name(symbol: &str) -> String {
    KOSPI_TOP10
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| format!("종목{}", symbol))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kospi_top10_order_is_stable() {
        let tracked = kospi_top10();
        assert_eq!(tracked.len(), 10);
        assert_eq!(tracked[0].symbol, "005930");
        assert_eq!(tracked[0].name, "삼성전자");
        assert_eq!(tracked[9].symbol, "012330");
    }

    #[test]
    fn test_fallback_name() {
        assert_eq!(fallback_name("035420"), "NAVER");
        assert_eq!(fallback_name("999999"), "종목999999");
    }
}
