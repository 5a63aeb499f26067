//! 심볼 순차 처리 오케스트레이터.
//!
//! 심볼마다 fetch → transform → load를 순서대로 실행하며, 한 심볼의
//! 실패는 로그만 남기고 다음 심볼로 넘어갑니다. 재시도와 롤백은 없습니다.

use std::time::Instant;

use tracing::{error, info};

use crate::error::{PipelineError, Result, TransformError};
use crate::fetcher::QuoteFetcher;
use crate::stats::RunStats;
use crate::storage::StorageGateway;
use crate::transform;

/// 파이프라인 오케스트레이터.
pub struct Pipeline {
    fetcher: QuoteFetcher,
    storage: StorageGateway,
}

impl Pipeline {
    pub fn new(fetcher: QuoteFetcher, storage: StorageGateway) -> Self {
        Self { fetcher, storage }
    }

    /// 모든 심볼을 순차 처리합니다.
    ///
    /// 항상 마지막 심볼까지 진행한 뒤 통계를 반환하며, 실행 전체의
    /// 성공/실패 신호는 따로 없습니다.
    pub async fn run(&self, symbols: &[&str]) -> RunStats {
        let start = Instant::now();
        let mut stats = RunStats::new();

        for (idx, symbol) in symbols.iter().enumerate() {
            stats.total += 1;
            info!(
                symbol = %symbol,
                progress = format!("{}/{}", idx + 1, symbols.len()),
                "심볼 처리 시작"
            );

            match self.process_symbol(symbol).await {
                Ok(inserted) => {
                    stats.success += 1;
                    if inserted == 0 {
                        stats.duplicates += 1;
                    } else {
                        stats.rows_inserted += inserted as usize;
                    }
                }
                Err(PipelineError::Transform(TransformError::NoInput)) => {
                    stats.no_data += 1;
                    error!(symbol = %symbol, "유효한 시세 없음, 다음 심볼로 진행");
                }
                Err(e) => {
                    stats.errors += 1;
                    error!(symbol = %symbol, error = %e, "심볼 처리 실패");
                }
            }
        }

        stats.elapsed = start.elapsed();
        stats
    }

    /// 심볼 하나의 fetch → transform → load.
    async fn process_symbol(&self, symbol: &str) -> Result<u64> {
        // 시작일 힌트 용도로만 쓰이는 마지막 저장 시각 조회
        let last_timestamp = self.storage.last_timestamp(symbol).await?;

        let record = self.fetcher.fetch(symbol, last_timestamp).await;
        let frame = transform::transform(record)?;

        self.storage.ensure_table(symbol).await?;
        let inserted = self.storage.insert_row(symbol, &frame).await?;
        Ok(inserted)
    }

    /// 저장소 연결을 닫고 파이프라인을 종료합니다.
    pub async fn close(self) {
        self.storage.close().await;
    }
}
