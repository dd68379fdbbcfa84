//! 데이터 모듈 오류 타입.

use thiserror::Error;

/// 데이터 관련 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 데이터베이스 연결 오류
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    /// 쿼리 실행 오류
    #[error("Query error: {0}")]
    QueryError(String),

    /// 데이터 삽입 오류
    #[error("Insert error: {0}")]
    InsertError(String),

    /// 레코드를 찾을 수 없음
    #[error("Record not found: {0}")]
    NotFound(String),

    /// 잘못된 데이터 형식
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// 직렬화/역직렬화 오류
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// 마이그레이션(스키마 초기화) 오류
    #[error("Migration error: {0}")]
    MigrationError(String),

    /// 데이터 가져오기 오류 (외부 소스)
    #[error("Fetch error: {0}")]
    FetchError(String),
}

impl From<sqlx::Error> for DataError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DataError::NotFound("Row not found".to_string()),
            sqlx::Error::Database(db_err) => DataError::QueryError(db_err.message().to_string()),
            _ => DataError::QueryError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::SerializationError(err.to_string())
    }
}

impl From<DataError> for kospi_core::DashboardError {
    fn from(err: DataError) -> Self {
        use kospi_core::DashboardError;
        match err {
            DataError::NotFound(msg) => DashboardError::NotFound(msg),
            DataError::FetchError(msg) => DashboardError::Source(msg),
            DataError::InvalidData(msg) | DataError::SerializationError(msg) => {
                DashboardError::Validation(msg)
            }
            DataError::ConnectionError(msg)
            | DataError::QueryError(msg)
            | DataError::InsertError(msg)
            | DataError::MigrationError(msg) => DashboardError::Storage(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
