//! 롤링 통계 변환 단계.
//!
//! 조회한 스냅샷 한 건을 한 행짜리 프레임으로 감싸고, 가격 네 개 컬럼과
//! 거래량에 대해 5기간 롤링 평균/표준편차 컬럼을 추가합니다.
//! 행이 하나뿐이므로 윈도우를 채우지 못해 파생 컬럼은 모두 None이 됩니다.

use tracing::debug;

use crate::error::TransformError;
use crate::quote::QuoteRecord;

/// 롤링 윈도우 크기 (기간 수)
pub const ROLLING_WINDOW: usize = 5;

/// 변환 결과 한 행.
///
/// 원본 레코드에 롤링 통계 컬럼이 추가된 형태입니다. 적재 대상 컬럼은
/// 원본 필드와 업스트림 힌트이며, 파생 컬럼은 프레임에만 존재합니다.
#[derive(Debug, Clone)]
pub struct QuoteFrame {
    pub record: QuoteRecord,
    pub open_moving_average: Option<f64>,
    pub high_moving_average: Option<f64>,
    pub low_moving_average: Option<f64>,
    pub close_moving_average: Option<f64>,
    pub volume_moving_average: Option<f64>,
    pub open_volatility: Option<f64>,
    pub high_volatility: Option<f64>,
    pub low_volatility: Option<f64>,
    pub close_volatility: Option<f64>,
    pub volume_volatility: Option<f64>,
}

/// 시리즈 마지막 위치 기준 롤링 평균.
///
/// 관측치가 `window` 미만이면 None (pandas `rolling(window).mean()`과 동일).
pub fn rolling_mean(values: &[f64], window: usize) -> Option<f64> {
    if window == 0 || values.len() < window {
        return None;
    }
    let tail = &values[values.len() - window..];
    Some(tail.iter().sum::<f64>() / window as f64)
}

/// 시리즈 마지막 위치 기준 롤링 표본 표준편차 (ddof=1).
pub fn rolling_std(values: &[f64], window: usize) -> Option<f64> {
    if window < 2 || values.len() < window {
        return None;
    }
    let tail = &values[values.len() - window..];
    let mean = tail.iter().sum::<f64>() / window as f64;
    let variance =
        tail.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (window as f64 - 1.0);
    Some(variance.sqrt())
}

/// 스냅샷을 롤링 통계가 붙은 한 행 프레임으로 변환합니다.
///
/// 입력이 None이면 [`TransformError::NoInput`] — 해당 심볼의 실행만 중단됩니다.
pub fn transform(record: Option<QuoteRecord>) -> Result<QuoteFrame, TransformError> {
    let record = record.ok_or(TransformError::NoInput)?;

    let opens = [record.open_price];
    let highs = [record.high_price];
    let lows = [record.low_price];
    let closes = [record.close_price];
    let volumes = [record.volume as f64];

    let frame = QuoteFrame {
        open_moving_average: rolling_mean(&opens, ROLLING_WINDOW),
        high_moving_average: rolling_mean(&highs, ROLLING_WINDOW),
        low_moving_average: rolling_mean(&lows, ROLLING_WINDOW),
        close_moving_average: rolling_mean(&closes, ROLLING_WINDOW),
        volume_moving_average: rolling_mean(&volumes, ROLLING_WINDOW),
        open_volatility: rolling_std(&opens, ROLLING_WINDOW),
        high_volatility: rolling_std(&highs, ROLLING_WINDOW),
        low_volatility: rolling_std(&lows, ROLLING_WINDOW),
        close_volatility: rolling_std(&closes, ROLLING_WINDOW),
        volume_volatility: rolling_std(&volumes, ROLLING_WINDOW),
        record,
    };

    debug!(symbol = %frame.record.symbol, "변환 완료");
    Ok(frame)
}
