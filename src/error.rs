//! 파이프라인 단계별 오류 타입.
//!
//! 단계마다 명시적인 오류 타입을 두어 호출자가 전파 여부를 직접 결정합니다:
//! - Fetch 단계 오류는 fetch 내부에서 흡수되어 "no data"가 됩니다.
//! - Transform / Storage 오류는 심볼 단위 루프까지 전파됩니다.

use thiserror::Error;

/// 설정 오류. 시작 시점에만 발생하며 프로세스를 종료시킵니다.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 필수 환경변수 누락
    #[error("Missing environment variable: {0}")]
    MissingVar(&'static str),

    /// 환경변수 값 파싱 실패
    #[error("Invalid value for {key}: {value}")]
    InvalidVar { key: &'static str, value: String },
}

/// 시세 조회 단계 오류.
///
/// fetch 내부에서 로그 후 "no data"로 변환되며 밖으로 전파되지 않습니다.
#[derive(Debug, Error)]
pub enum FetchError {
    /// 네트워크 요청 실패
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// 응답 본문 형식 오류
    #[error("Malformed response body: {0}")]
    BadBody(String),
}

/// 변환 단계 오류.
#[derive(Debug, Error)]
pub enum TransformError {
    /// 변환할 입력이 없음 (fetch가 "no data"를 반환한 경우)
    #[error("No data to transform")]
    NoInput,
}

/// 저장소 오류.
#[derive(Debug, Error)]
pub enum StorageError {
    /// 데이터베이스 연결 오류
    #[error("Database connection error: {0}")]
    Connect(String),

    /// 쿼리 실행 오류
    #[error("Query error: {0}")]
    Query(String),

    /// 허용되지 않는 심볼 식별자 (테이블 이름으로 사용 불가)
    #[error("Invalid symbol identifier: {0:?}")]
    InvalidSymbol(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                Self::Connect(err.to_string())
            }
            _ => Self::Query(err.to_string()),
        }
    }
}

/// 심볼 하나의 처리 중 전파되는 오류.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, PipelineError>;
