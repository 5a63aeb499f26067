//! 시세 API 클라이언트.
//!
//! 심볼 하나당 GET 요청 한 번으로 현재 스냅샷을 조회합니다.
//! 네트워크 오류와 응답 형식 오류는 이 단계에서 모두 흡수되어
//! "no data"(None)로 변환되고 로그만 남습니다.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{debug, error, warn};

use crate::error::FetchError;
use crate::quote::{QuoteRecord, QuoteResponseBody};

/// 기본 시세 엔드포인트 (RapidAPI Yahoo Finance)
pub const DEFAULT_BASE_URL: &str = "https://yh-finance.p.rapidapi.com/market/v2/get-quotes";

/// 시세 API 클라이언트.
pub struct QuoteFetcher {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl QuoteFetcher {
    /// 기본 엔드포인트를 향하는 클라이언트 생성.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// base URL을 지정해 클라이언트 생성 (테스트 서버용).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("HTTP 클라이언트 생성 실패"),
            api_key: api_key.into(),
            base_url: base_url.into(),
        }
    }

    /// 심볼 하나의 현재 시세 스냅샷을 조회합니다.
    ///
    /// `last_timestamp`는 마지막으로 저장된 행의 시각입니다. 증분 수집을
    /// 가정한 시작일 힌트 계산에만 쓰이며, 현재 엔드포인트는 최신 스냅샷만
    /// 반환하므로 요청 자체에는 반영되지 않습니다.
    ///
    /// 실패는 종류와 무관하게 None으로 흡수됩니다.
    pub async fn fetch(
        &self,
        symbol: &str,
        last_timestamp: Option<DateTime<Utc>>,
    ) -> Option<QuoteRecord> {
        let start_date = start_date_hint(last_timestamp);
        debug!(symbol = %symbol, start_date = %start_date, "시세 조회 시작");

        match self.request(symbol).await {
            Ok(Some(record)) => Some(record),
            Ok(None) => {
                warn!(symbol = %symbol, "응답에 유효한 시세가 없음");
                None
            }
            Err(e) => {
                error!(symbol = %symbol, error = %e, "시세 조회 실패");
                None
            }
        }
    }

    async fn request(&self, symbol: &str) -> Result<Option<QuoteRecord>, FetchError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("region", "US"), ("symbols", symbol)])
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", host_of(&self.base_url))
            .send()
            .await?;

        let body: QuoteResponseBody = response
            .json()
            .await
            .map_err(|e| FetchError::BadBody(e.to_string()))?;

        let raw = match body.quote_response.result.into_iter().next() {
            Some(raw) => raw,
            None => return Ok(None),
        };

        Ok(raw.into_record(symbol, Utc::now()))
    }
}

/// 마지막 저장 시각 기준 수집 시작일. 저장 이력이 없으면 7일 전.
pub(crate) fn start_date_hint(last_timestamp: Option<DateTime<Utc>>) -> NaiveDate {
    last_timestamp
        .unwrap_or_else(|| Utc::now() - Duration::days(7))
        .date_naive()
}

/// base URL에서 `x-rapidapi-host` 헤더 값을 추출합니다.
fn host_of(base_url: &str) -> String {
    reqwest::Url::parse(base_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUOTE_BODY: &str = r#"{"quoteResponse":{"result":[{
        "regularMarketOpen":150.0,
        "regularMarketDayHigh":152.0,
        "regularMarketDayLow":149.0,
        "regularMarketPreviousClose":151.0,
        "regularMarketVolume":1000000,
        "fiftyDayAverage":148.5,
        "beta":1.2
    }]}}"#;

    #[tokio::test]
    async fn test_fetch_well_formed_quote() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("region".into(), "US".into()),
                mockito::Matcher::UrlEncoded("symbols".into(), "AAPL".into()),
            ]))
            .match_header("x-rapidapi-key", "test-key")
            .with_header("content-type", "application/json")
            .with_body(QUOTE_BODY)
            .create_async()
            .await;

        let fetcher = QuoteFetcher::with_base_url("test-key", server.url());
        let record = fetcher.fetch("AAPL", None).await.expect("시세가 있어야 함");

        mock.assert_async().await;
        assert_eq!(record.open_price, 150.0);
        assert_eq!(record.close_price, 151.0);
        assert_eq!(record.volume, 1_000_000);
        assert_eq!(record.moving_average, Some(148.5));
        assert_eq!(record.volatility, Some(1.2));
    }

    #[tokio::test]
    async fn test_fetch_empty_result_is_no_data() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(mockito::Matcher::Any)
            .with_header("content-type", "application/json")
            .with_body(r#"{"quoteResponse":{"result":[]}}"#)
            .create_async()
            .await;

        let fetcher = QuoteFetcher::with_base_url("test-key", server.url());
        assert!(fetcher.fetch("ZZZZ", None).await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_missing_field_is_no_data() {
        // volume 없음
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(mockito::Matcher::Any)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"quoteResponse":{"result":[{
                    "regularMarketOpen":150.0,
                    "regularMarketDayHigh":152.0,
                    "regularMarketDayLow":149.0,
                    "regularMarketPreviousClose":151.0
                }]}}"#,
            )
            .create_async()
            .await;

        let fetcher = QuoteFetcher::with_base_url("test-key", server.url());
        assert!(fetcher.fetch("AAPL", None).await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_malformed_body_is_absorbed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let fetcher = QuoteFetcher::with_base_url("test-key", server.url());
        assert!(fetcher.fetch("AAPL", None).await.is_none());
    }

    #[tokio::test]
    async fn test_fetch_connection_error_is_absorbed() {
        // 아무도 듣지 않는 주소
        let fetcher = QuoteFetcher::with_base_url("test-key", "http://127.0.0.1:1/quotes");
        assert!(fetcher.fetch("AAPL", None).await.is_none());
    }

    #[test]
    fn test_start_date_hint_defaults_to_seven_days_back() {
        let hint = start_date_hint(None);
        let expected = (Utc::now() - Duration::days(7)).date_naive();
        assert_eq!(hint, expected);
    }

    #[test]
    fn test_start_date_hint_uses_last_timestamp() {
        let last = Utc::now() - Duration::days(2);
        assert_eq!(start_date_hint(Some(last)), last.date_naive());
    }

    #[test]
    fn test_host_of() {
        assert_eq!(
            host_of("https://yh-finance.p.rapidapi.com/market/v2/get-quotes"),
            "yh-finance.p.rapidapi.com"
        );
        assert_eq!(host_of("http://127.0.0.1:8080/x"), "127.0.0.1");
        assert_eq!(host_of("not a url"), "");
    }
}
