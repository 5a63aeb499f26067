//! 주식 시세 스냅샷 수집기.
//!
//! 설정된 심볼 목록에 대해 시세 API에서 현재 스냅샷을 가져와
//! 롤링 통계를 계산한 뒤 심볼별 테이블에 저장합니다:
//! - 심볼별 fetch → transform → load 순차 실행
//! - 실패는 심볼 단위로 격리 (전체 실행은 항상 끝까지 진행)
//! - `timestamp` UNIQUE 제약 + INSERT IGNORE로 중복 제거

pub mod config;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod pipeline;
pub mod quote;
pub mod stats;
pub mod storage;
pub mod transform;

pub use config::CollectorConfig;
pub use error::{PipelineError, Result};
pub use pipeline::Pipeline;
pub use quote::QuoteRecord;
pub use stats::RunStats;
