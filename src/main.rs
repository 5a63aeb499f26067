//! 시세 수집기 진입점.
//!
//! 고정 심볼 목록에 대해 파이프라인을 한 번 실행하고 종료합니다.
//! 주기 실행은 외부 스케줄러(cron 등)에 맡깁니다.

use std::path::Path;

use quote_collector::{
    fetcher::QuoteFetcher, logging, storage::StorageGateway, CollectorConfig, Pipeline,
};

/// 수집 대상 심볼 목록
const STOCK_SYMBOLS: &[&str] = &[
    "AAPL",
    "MSFT",
    "^SPX",
    "^NYA",
    "GAZP.ME",
    "SIBN.ME",
    "GEECEE.NS",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CollectorConfig::from_env()?;
    logging::init(&config.log_level, Path::new(&config.log_file))?;

    tracing::info!(symbols = STOCK_SYMBOLS.len(), "시세 수집기 시작");

    let storage = StorageGateway::connect(&config.database.url()).await?;
    let fetcher = QuoteFetcher::with_base_url(&config.api_key, &config.quote_api_url);

    let pipeline = Pipeline::new(fetcher, storage);
    let stats = pipeline.run(STOCK_SYMBOLS).await;
    stats.log_summary();

    pipeline.close().await;
    tracing::info!("시세 수집기 종료");

    Ok(())
}
