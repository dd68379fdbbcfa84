//! SQLite 가격 캐시 저장소.
//!
//! 회사 정보(`companies`)와 일봉(`stock_prices`) 두 테이블을 관리합니다.
//!
//! # 동작 방식
//!
//! 1. 수집 파이프라인이 회사 정보와 일봉을 upsert (자연 키 기준 대체)
//! 2. 요약 서비스와 API는 읽기 전용으로 조회
//! 3. `(symbol, date)` 유니크 제약으로 재수집 시 중복이 생기지 않음
//!
//! 날짜는 ISO-8601(`YYYY-MM-DD`) TEXT로 저장되어 사전순 정렬이
//! 날짜순 정렬과 일치합니다.

use crate::error::{DataError, Result};
use chrono::NaiveDate;
use kospi_core::{Company, DailyBar};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::str::FromStr;
use tracing::{debug, info, instrument};

/// 회사 정보 데이터베이스 레코드.
#[derive(Debug, Clone, FromRow)]
struct CompanyRecord {
    symbol: String,
    name: String,
    market_cap: f64,
    sector: String,
}

impl CompanyRecord {
    /// 도메인 객체로 변환.
    fn into_company(self) -> Company {
        Company {
            symbol: self.symbol,
            name: self.name,
            market_cap: self.market_cap,
            sector: self.sector,
        }
    }
}

/// 일봉 데이터베이스 레코드.
#[derive(Debug, Clone, FromRow)]
struct BarRecord {
    symbol: String,
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: i64,
}

impl BarRecord {
    /// 도메인 객체로 변환.
    fn into_bar(self) -> DailyBar {
        DailyBar {
            symbol: self.symbol,
            date: self.date,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        }
    }
}

/// 회사별 최신 종가 (회사명 조인 결과).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct LatestClose {
    /// 종목 코드
    pub symbol: String,
    /// 종목명
    pub name: String,
    /// 최신 거래일
    pub date: NaiveDate,
    /// 최신 종가
    pub close: f64,
    /// 최신 거래일의 거래량
    pub volume: i64,
}

/// 종목별 가격 통계.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct BarStatistics {
    /// 종목 코드
    pub symbol: String,
    /// 종목명
    pub name: String,
    /// 저장된 일봉 수
    pub count: i64,
    /// 최저 종가
    pub min_close: f64,
    /// 최고 종가
    pub max_close: f64,
    /// 평균 종가
    pub avg_close: f64,
    /// 첫 거래일
    pub first_date: NaiveDate,
    /// 마지막 거래일
    pub last_date: NaiveDate,
}

/// SQLite 가격 캐시 저장소.
///
/// 연결 풀을 내부에 보유하며 Clone이 저렴합니다.
#[derive(Clone)]
pub struct PriceStore {
    pool: SqlitePool,
}

impl PriceStore {
    /// 주어진 URL로 연결하고 스키마를 초기화합니다.
    ///
    /// 파일이 없으면 생성합니다 (예: `sqlite://stock_data.db`).
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| DataError::ConnectionError(e.to_string()))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// 인메모리 데이터베이스로 연결합니다 (테스트용).
    ///
    /// 인메모리 SQLite는 연결마다 별도 DB가 되므로 풀을 연결 1개로 제한합니다.
    pub async fn connect_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// 테이블이 없으면 생성합니다 (멱등).
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS companies (
                symbol     TEXT PRIMARY KEY,
                name       TEXT NOT NULL,
                market_cap REAL NOT NULL DEFAULT 0,
                sector     TEXT NOT NULL DEFAULT '',
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DataError::MigrationError(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS stock_prices (
                symbol TEXT NOT NULL,
                date   TEXT NOT NULL,
                open   REAL NOT NULL,
                high   REAL NOT NULL,
                low    REAL NOT NULL,
                close  REAL NOT NULL,
                volume INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (symbol, date)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DataError::MigrationError(e.to_string()))?;

        debug!("스키마 초기화 완료");
        Ok(())
    }

    /// 연결 풀을 반환합니다.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// 회사 정보를 저장합니다 (symbol 기준 insert-or-replace).
    #[instrument(skip(self, company), fields(symbol = %company.symbol))]
    pub async fn upsert_company(&self, company: &Company) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO companies (symbol, name, market_cap, sector, updated_at)
            VALUES (?1, ?2, ?3, ?4, datetime('now'))
            ON CONFLICT(symbol) DO UPDATE SET
                name = excluded.name,
                market_cap = excluded.market_cap,
                sector = excluded.sector,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&company.symbol)
        .bind(&company.name)
        .bind(company.market_cap)
        .bind(&company.sector)
        .execute(&self.pool)
        .await
        .map_err(|e| DataError::InsertError(e.to_string()))?;

        debug!(name = %company.name, "회사 정보 저장");
        Ok(())
    }

    /// 일봉 배치를 저장합니다 (`(symbol, date)` 기준 insert-or-replace).
    ///
    /// 전체 배치가 하나의 트랜잭션으로 커밋되며, 실패 시 아무것도
    /// 저장되지 않습니다. 저장된 행 수를 반환합니다.
    #[instrument(skip(self, bars), fields(symbol = symbol, count = bars.len()))]
    pub async fn upsert_bars(&self, symbol: &str, bars: &[DailyBar]) -> Result<usize> {
        if bars.is_empty() {
            return Ok(0);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DataError::InsertError(e.to_string()))?;

        let mut written = 0;
        for bar in bars {
            let result = sqlx::query(
                r#"
                INSERT INTO stock_prices (symbol, date, open, high, low, close, volume)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT(symbol, date) DO UPDATE SET
                    open = excluded.open,
                    high = excluded.high,
                    low = excluded.low,
                    close = excluded.close,
                    volume = excluded.volume
                "#,
            )
            .bind(symbol)
            .bind(bar.date)
            .bind(bar.open)
            .bind(bar.high)
            .bind(bar.low)
            .bind(bar.close)
            .bind(bar.volume)
            .execute(&mut *tx)
            .await
            .map_err(|e| DataError::InsertError(e.to_string()))?;

            written += result.rows_affected() as usize;
        }

        tx.commit()
            .await
            .map_err(|e| DataError::InsertError(e.to_string()))?;

        info!(symbol = symbol, written = written, "일봉 데이터 저장");
        Ok(written)
    }

    /// 등록된 회사 목록을 종목 코드순으로 조회합니다.
    pub async fn companies(&self) -> Result<Vec<Company>> {
        let records: Vec<CompanyRecord> = sqlx::query_as(
            r#"
            SELECT symbol, name, market_cap, sector
            FROM companies
            ORDER BY symbol
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(CompanyRecord::into_company).collect())
    }

    /// 특정 회사를 조회합니다.
    pub async fn company(&self, symbol: &str) -> Result<Option<Company>> {
        let record: Option<CompanyRecord> = sqlx::query_as(
            r#"
            SELECT symbol, name, market_cap, sector
            FROM companies
            WHERE symbol = ?1
            "#,
        )
        .bind(symbol)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(CompanyRecord::into_company))
    }

    /// 최근 일봉을 최신순으로 조회합니다.
    ///
    /// `max_rows`는 달력 기준 일수가 아니라 행 수 제한입니다. 휴장일로
    /// 데이터에 공백이 있으면 그만큼 짧은 달력 구간이 반환됩니다.
    /// 시간순(오름차순)이 필요한 호출자는 직접 재정렬해야 합니다.
    #[instrument(skip(self))]
    pub async fn bars(&self, symbol: &str, max_rows: usize) -> Result<Vec<DailyBar>> {
        let records: Vec<BarRecord> = sqlx::query_as(
            r#"
            SELECT symbol, date, open, high, low, close, volume
            FROM stock_prices
            WHERE symbol = ?1
            ORDER BY date DESC
            LIMIT ?2
            "#,
        )
        .bind(symbol)
        .bind(i64::try_from(max_rows).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        debug!(symbol = symbol, count = records.len(), "일봉 조회");
        Ok(records.into_iter().map(BarRecord::into_bar).collect())
    }

    /// 가장 최근 일봉을 조회합니다.
    pub async fn latest_bar(&self, symbol: &str) -> Result<Option<DailyBar>> {
        let record: Option<BarRecord> = sqlx::query_as(
            r#"
            SELECT symbol, date, open, high, low, close, volume
            FROM stock_prices
            WHERE symbol = ?1
            ORDER BY date DESC
            LIMIT 1
            "#,
        )
        .bind(symbol)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record.map(BarRecord::into_bar))
    }

    /// 특정 날짜 구간의 일봉을 오름차순으로 조회합니다 (양끝 포함).
    pub async fn bars_in_range(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyBar>> {
        let records: Vec<BarRecord> = sqlx::query_as(
            r#"
            SELECT symbol, date, open, high, low, close, volume
            FROM stock_prices
            WHERE symbol = ?1 AND date >= ?2 AND date <= ?3
            ORDER BY date ASC
            "#,
        )
        .bind(symbol)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(records.into_iter().map(BarRecord::into_bar).collect())
    }

    /// 종목별 가격 통계를 조회합니다 (진단/리포트용).
    pub async fn bar_statistics(&self) -> Result<Vec<BarStatistics>> {
        let stats: Vec<BarStatistics> = sqlx::query_as(
            r#"
            SELECT
                c.symbol             AS symbol,
                c.name               AS name,
                COUNT(sp.date)       AS count,
                MIN(sp.close)        AS min_close,
                MAX(sp.close)        AS max_close,
                AVG(sp.close)        AS avg_close,
                MIN(sp.date)         AS first_date,
                MAX(sp.date)         AS last_date
            FROM companies c
            JOIN stock_prices sp ON c.symbol = sp.symbol
            GROUP BY c.symbol, c.name
            ORDER BY avg_close DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(stats)
    }

    /// 회사별 최신 종가를 회사명과 조인해 조회합니다 (진단/리포트용).
    ///
    /// 각 회사의 가장 최근 거래일 행만 선택하며, 종가 내림차순으로
    /// 정렬합니다. 일봉이 없는 회사는 결과에서 빠집니다.
    pub async fn latest_close_join(&self) -> Result<Vec<LatestClose>> {
        let rows: Vec<LatestClose> = sqlx::query_as(
            r#"
            SELECT
                c.symbol   AS symbol,
                c.name     AS name,
                sp.date    AS date,
                sp.close   AS close,
                sp.volume  AS volume
            FROM companies c
            JOIN stock_prices sp ON c.symbol = sp.symbol
            WHERE sp.date = (
                SELECT MAX(date) FROM stock_prices sp2 WHERE sp2.symbol = c.symbol
            )
            ORDER BY sp.close DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// 일봉 데이터가 하나라도 존재하는지 확인합니다 (헬스 체크용).
    pub async fn has_data(&self) -> Result<bool> {
        let (exists,): (i64,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM stock_prices)")
                .fetch_one(&self.pool)
                .await?;

        Ok(exists != 0)
    }
}

// =============================================================================
// 테스트
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bar(symbol: &str, d: NaiveDate, close: f64) -> DailyBar {
        DailyBar::new(symbol, d, close - 100.0, close + 200.0, close - 300.0, close, 1000)
    }

    #[tokio::test]
    async fn test_upsert_company_replaces_by_symbol() {
        let store = PriceStore::connect_in_memory().await.unwrap();

        let first = Company::new("005930", "삼성전자", 0.0, "Unknown");
        store.upsert_company(&first).await.unwrap();

        let second = Company::new("005930", "삼성전자", 400e12, "전기전자");
        store.upsert_company(&second).await.unwrap();

        let companies = store.companies().await.unwrap();
        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].sector, "전기전자");
        assert_eq!(companies[0].market_cap, 400e12);
    }

    #[tokio::test]
    async fn test_upsert_bars_is_idempotent() {
        let store = PriceStore::connect_in_memory().await.unwrap();
        let bars = vec![bar("005930", date(2024, 1, 2), 70000.0)];

        store.upsert_bars("005930", &bars).await.unwrap();
        store.upsert_bars("005930", &bars).await.unwrap();

        let stored = store.bars("005930", 100).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].close, 70000.0);
    }

    #[tokio::test]
    async fn test_conflicting_bar_keeps_latest_values() {
        let store = PriceStore::connect_in_memory().await.unwrap();
        let d = date(2024, 1, 2);

        store
            .upsert_bars("005930", &[bar("005930", d, 70000.0)])
            .await
            .unwrap();
        store
            .upsert_bars("005930", &[bar("005930", d, 71500.0)])
            .await
            .unwrap();

        let stored = store.bars("005930", 100).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].close, 71500.0);
    }

    #[tokio::test]
    async fn test_bars_most_recent_first_with_row_cap() {
        let store = PriceStore::connect_in_memory().await.unwrap();
        let bars: Vec<DailyBar> = (1..=5)
            .map(|d| bar("005930", date(2024, 1, d), 70000.0 + d as f64))
            .collect();
        store.upsert_bars("005930", &bars).await.unwrap();

        let stored = store.bars("005930", 3).await.unwrap();
        assert_eq!(stored.len(), 3);
        assert_eq!(stored[0].date, date(2024, 1, 5));
        assert_eq!(stored[2].date, date(2024, 1, 3));
    }

    #[tokio::test]
    async fn test_bars_row_cap_above_i64_max_returns_everything() {
        let store = PriceStore::connect_in_memory().await.unwrap();
        let bars: Vec<DailyBar> = (1..=5)
            .map(|d| bar("005930", date(2024, 1, d), 70000.0))
            .collect();
        store.upsert_bars("005930", &bars).await.unwrap();

        let stored = store.bars("005930", usize::MAX).await.unwrap();
        assert_eq!(stored.len(), 5);
    }

    #[tokio::test]
    async fn test_bars_unknown_symbol_is_empty() {
        let store = PriceStore::connect_in_memory().await.unwrap();
        let stored = store.bars("UNKNOWN", 30).await.unwrap();
        assert!(stored.is_empty());
        assert!(store.latest_bar("UNKNOWN").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_bars_in_range_is_ascending_and_inclusive() {
        let store = PriceStore::connect_in_memory().await.unwrap();
        let bars: Vec<DailyBar> = (1..=10)
            .map(|d| bar("005930", date(2024, 1, d), 70000.0))
            .collect();
        store.upsert_bars("005930", &bars).await.unwrap();

        let stored = store
            .bars_in_range("005930", date(2024, 1, 3), date(2024, 1, 7))
            .await
            .unwrap();
        assert_eq!(stored.len(), 5);
        assert_eq!(stored[0].date, date(2024, 1, 3));
        assert_eq!(stored[4].date, date(2024, 1, 7));
    }

    #[tokio::test]
    async fn test_bar_statistics() {
        let store = PriceStore::connect_in_memory().await.unwrap();
        store
            .upsert_company(&Company::new("005930", "삼성전자", 0.0, "전기전자"))
            .await
            .unwrap();
        store
            .upsert_bars(
                "005930",
                &[
                    bar("005930", date(2024, 1, 2), 60000.0),
                    bar("005930", date(2024, 1, 3), 80000.0),
                ],
            )
            .await
            .unwrap();

        let stats = store.bar_statistics().await.unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[0].min_close, 60000.0);
        assert_eq!(stats[0].max_close, 80000.0);
        assert_eq!(stats[0].avg_close, 70000.0);
        assert_eq!(stats[0].first_date, date(2024, 1, 2));
        assert_eq!(stats[0].last_date, date(2024, 1, 3));
    }

    #[tokio::test]
    async fn test_latest_close_join_picks_newest_row_per_company() {
        let store = PriceStore::connect_in_memory().await.unwrap();
        store
            .upsert_company(&Company::new("005930", "삼성전자", 0.0, "전기전자"))
            .await
            .unwrap();
        store
            .upsert_company(&Company::new("000660", "SK하이닉스", 0.0, "반도체"))
            .await
            .unwrap();
        // 일봉 없는 회사는 결과에서 빠짐
        store
            .upsert_company(&Company::new("035420", "NAVER", 0.0, "서비스업"))
            .await
            .unwrap();

        store
            .upsert_bars(
                "005930",
                &[
                    bar("005930", date(2024, 1, 2), 70000.0),
                    bar("005930", date(2024, 1, 3), 71000.0),
                ],
            )
            .await
            .unwrap();
        store
            .upsert_bars("000660", &[bar("000660", date(2024, 1, 2), 140000.0)])
            .await
            .unwrap();

        let latest = store.latest_close_join().await.unwrap();
        assert_eq!(latest.len(), 2);

        // 종가 내림차순
        assert_eq!(latest[0].symbol, "000660");
        assert_eq!(latest[0].close, 140000.0);

        // 종목마다 최신 거래일 행만 포함
        assert_eq!(latest[1].symbol, "005930");
        assert_eq!(latest[1].name, "삼성전자");
        assert_eq!(latest[1].date, date(2024, 1, 3));
        assert_eq!(latest[1].close, 71000.0);
    }

    #[tokio::test]
    async fn test_has_data() {
        let store = PriceStore::connect_in_memory().await.unwrap();
        assert!(!store.has_data().await.unwrap());

        store
            .upsert_bars("005930", &[bar("005930", date(2024, 1, 2), 1.0)])
            .await
            .unwrap();
        assert!(store.has_data().await.unwrap());
    }
}
