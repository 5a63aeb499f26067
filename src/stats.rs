//! 실행 통계 구조체.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 한 번의 파이프라인 실행 통계.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// 총 심볼 수
    pub total: usize,
    /// 적재까지 완료한 심볼 수
    pub success: usize,
    /// 시세 없음 (조회는 됐지만 유효한 데이터 없음)
    pub no_data: usize,
    /// 오류로 중단된 심볼 수
    pub errors: usize,
    /// 새로 삽입된 행 수
    pub rows_inserted: usize,
    /// 동일 timestamp로 무시된 행 수
    pub duplicates: usize,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl RunStats {
    /// 새 통계 객체 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// 성공률 계산 (%)
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.success as f64 / self.total as f64) * 100.0
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self) {
        tracing::info!(
            total = self.total,
            success = self.success,
            no_data = self.no_data,
            errors = self.errors,
            rows_inserted = self.rows_inserted,
            duplicates = self.duplicates,
            success_rate = format!("{:.1}%", self.success_rate()),
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "수집 완료"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_rate() {
        let stats = RunStats {
            total: 4,
            success: 3,
            ..Default::default()
        };
        assert_eq!(stats.success_rate(), 75.0);
    }

    #[test]
    fn test_success_rate_empty_run() {
        assert_eq!(RunStats::new().success_rate(), 0.0);
    }
}
