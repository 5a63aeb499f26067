//! 시세 스냅샷 레코드와 응답 파싱.
//!
//! 시세 API의 중첩 응답(`quoteResponse.result[]`)을 역직렬화하고,
//! 필수 필드 검사를 거쳐 [`QuoteRecord`]로 변환합니다.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// 한 번의 조회로 얻은 종목 시세 스냅샷.
///
/// fetch 시점에 한 번 생성되며 이후 변경되지 않고, 적재 후 폐기됩니다.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRecord {
    pub symbol: String,
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,
    pub volume: i64,
    /// 수집 시각 (테이블의 UNIQUE 키)
    pub timestamp: DateTime<Utc>,
    /// 업스트림 50일 평균 (응답에 없으면 None)
    pub moving_average: Option<f64>,
    /// 업스트림 베타 값. 변동성 지표로 그대로 저장합니다.
    pub volatility: Option<f64>,
}

/// 시세 API 응답 전체.
#[derive(Debug, Deserialize)]
pub struct QuoteResponseBody {
    #[serde(rename = "quoteResponse", default)]
    pub quote_response: QuoteResponse,
}

/// `quoteResponse` 노드. `result`가 비어 있으면 해당 심볼의 데이터가 없는 것입니다.
#[derive(Debug, Deserialize, Default)]
pub struct QuoteResponse {
    #[serde(default)]
    pub result: Vec<RawQuote>,
}

/// 응답 내 개별 종목 시세. 모든 필드가 생략될 수 있습니다.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawQuote {
    pub regular_market_open: Option<f64>,
    pub regular_market_day_high: Option<f64>,
    pub regular_market_day_low: Option<f64>,
    pub regular_market_previous_close: Option<f64>,
    pub previous_close: Option<f64>,
    pub regular_market_volume: Option<i64>,
    pub fifty_day_average: Option<f64>,
    pub beta: Option<f64>,
}

/// 누락과 0을 모두 "없음"으로 취급합니다 (업스트림의 falsy 규칙 유지).
fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

impl RawQuote {
    /// 필수 필드를 검사해 [`QuoteRecord`]로 변환.
    ///
    /// open/high/low/close/volume 중 하나라도 누락되거나 0이면 None.
    /// 종가는 `regularMarketPreviousClose`가 없거나 0일 때
    /// `previousClose`로 대체합니다.
    pub fn into_record(self, symbol: &str, timestamp: DateTime<Utc>) -> Option<QuoteRecord> {
        let open_price = present(self.regular_market_open)?;
        let high_price = present(self.regular_market_day_high)?;
        let low_price = present(self.regular_market_day_low)?;
        let close_price = present(self.regular_market_previous_close)
            .or_else(|| present(self.previous_close))?;
        let volume = self.regular_market_volume.filter(|v| *v != 0)?;

        Some(QuoteRecord {
            symbol: symbol.to_string(),
            open_price,
            high_price,
            low_price,
            close_price,
            volume,
            timestamp,
            moving_average: self.fifty_day_average,
            volatility: self.beta,
        })
    }
}
