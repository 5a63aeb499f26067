//! MySQL 저장소 게이트웨이.
//!
//! 심볼별 테이블을 지연 생성하고, `timestamp` UNIQUE 제약 위에서
//! `INSERT IGNORE`로 중복 행을 제거합니다. 연결은 단일 커넥션 풀 하나를
//! 실행 전체에서 재사용합니다.

use chrono::{DateTime, Utc};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::{debug, error, info};

use crate::error::StorageError;
use crate::transform::QuoteFrame;

/// MySQL "table doesn't exist" SQLSTATE
const SQLSTATE_NO_SUCH_TABLE: &str = "42S02";

/// 심볼 식별자 허용 목록 검사.
///
/// 심볼이 테이블 이름으로 SQL에 직접 들어가므로, 문장을 만들기 전에
/// 반드시 이 검사를 통과해야 합니다. ASCII 영숫자와 `.` `-` `^` `=` 만
/// 허용하며 길이는 1~32바이트입니다.
pub fn validate_symbol(symbol: &str) -> Result<&str, StorageError> {
    let ok = !symbol.is_empty()
        && symbol.len() <= 32
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));

    if ok {
        Ok(symbol)
    } else {
        Err(StorageError::InvalidSymbol(symbol.to_string()))
    }
}

/// 저장소 게이트웨이.
pub struct StorageGateway {
    pool: MySqlPool,
}

impl StorageGateway {
    /// 단일 커넥션 풀을 열어 게이트웨이를 생성합니다.
    ///
    /// 끊어진 연결은 풀이 다음 사용 시점에 다시 맺으므로 별도의
    /// 재연결 검사는 필요 없습니다.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .map_err(|e| {
                error!(error = %e, "데이터베이스 연결 실패");
                StorageError::Connect(e.to_string())
            })?;

        info!("데이터베이스 연결 성공");
        Ok(Self { pool })
    }

    /// 심볼 테이블이 없으면 고정 스키마로 생성합니다. 멱등.
    pub async fn ensure_table(&self, symbol: &str) -> Result<(), StorageError> {
        let table = validate_symbol(symbol)?;
        let query = format!(
            "CREATE TABLE IF NOT EXISTS `{table}` (
                id INT AUTO_INCREMENT PRIMARY KEY,
                open_price FLOAT,
                high_price FLOAT,
                low_price FLOAT,
                close_price FLOAT,
                volume INT,
                timestamp DATETIME UNIQUE,
                moving_average FLOAT,
                volatility FLOAT
            )"
        );

        sqlx::query(&query).execute(&self.pool).await.map_err(|e| {
            error!(table = table, error = %e, "테이블 생성 실패");
            StorageError::from(e)
        })?;

        debug!(table = table, "테이블 확인 완료");
        Ok(())
    }

    /// 심볼 테이블에서 가장 최근 `timestamp`를 조회합니다.
    ///
    /// 테이블이 아직 없거나 비어 있으면 None (첫 실행).
    pub async fn last_timestamp(
        &self,
        symbol: &str,
    ) -> Result<Option<DateTime<Utc>>, StorageError> {
        let table = validate_symbol(symbol)?;
        let query = format!("SELECT MAX(timestamp) FROM `{table}`");

        let row: Result<(Option<DateTime<Utc>>,), sqlx::Error> =
            sqlx::query_as(&query).fetch_one(&self.pool).await;

        match row {
            Ok((ts,)) => Ok(ts),
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(SQLSTATE_NO_SUCH_TABLE) => {
                Ok(None)
            }
            Err(e) => {
                error!(table = table, error = %e, "최근 timestamp 조회 실패");
                Err(e.into())
            }
        }
    }

    /// 변환된 한 행을 `INSERT IGNORE`로 저장합니다.
    ///
    /// 반환값은 실제 삽입된 행 수. 동일 `timestamp`가 이미 있으면 0입니다.
    pub async fn insert_row(&self, symbol: &str, frame: &QuoteFrame) -> Result<u64, StorageError> {
        let table = validate_symbol(symbol)?;
        let query = format!(
            "INSERT IGNORE INTO `{table}` (
                open_price, high_price, low_price, close_price, volume, timestamp,
                moving_average, volatility
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        );

        let record = &frame.record;
        let result = sqlx::query(&query)
            .bind(record.open_price)
            .bind(record.high_price)
            .bind(record.low_price)
            .bind(record.close_price)
            .bind(record.volume)
            .bind(record.timestamp)
            .bind(record.moving_average)
            .bind(record.volatility)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!(table = table, error = %e, "행 저장 실패");
                StorageError::from(e)
            })?;

        let inserted = result.rows_affected();
        if inserted == 0 {
            debug!(table = table, "동일 timestamp 행이 이미 존재, 건너뜀");
        } else {
            info!(table = table, rows = inserted, "행 저장 완료");
        }
        Ok(inserted)
    }

    /// 연결 풀을 닫습니다.
    pub async fn close(self) {
        self.pool.close().await;
        info!("데이터베이스 연결 종료");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_symbol_accepts_production_list() {
        for symbol in ["AAPL", "MSFT", "^SPX", "^NYA", "GAZP.ME", "SIBN.ME", "GEECEE.NS"] {
            assert!(validate_symbol(symbol).is_ok(), "거부됨: {symbol}");
        }
        assert!(validate_symbol("BTC-USD").is_ok());
        assert!(validate_symbol("ES=F").is_ok());
    }

    #[test]
    fn test_validate_symbol_rejects_injection_shapes() {
        for symbol in [
            "x; DROP TABLE users",
            "a`b",
            "a'b",
            "a b",
            "한글",
            "a(b)",
            "",
        ] {
            assert!(validate_symbol(symbol).is_err(), "허용됨: {symbol:?}");
        }
    }

    #[test]
    fn test_validate_symbol_rejects_over_long_names() {
        let long = "A".repeat(33);
        assert!(validate_symbol(&long).is_err());
        let max = "A".repeat(32);
        assert!(validate_symbol(&max).is_ok());
    }
}
