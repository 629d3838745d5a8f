//! CoinGecko REST listing client.
//!
//! Fetches `/coins/markets` pages in ascending market cap order with the
//! 24h and 7d change fields included.

use crate::error::FeedError;
use async_trait::async_trait;
use radar_core::AssetRecord;
use std::time::Duration;
use tracing::debug;

/// A paginated source of asset listings.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch one page (1-based).
    async fn fetch_page(&self, page: u32) -> Result<Vec<AssetRecord>, FeedError>;
}

/// CoinGecko `/coins/markets` client.
pub struct CoinGeckoClient {
    http: reqwest::Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub const BASE_URL: &'static str = "https://api.coingecko.com/api/v3";
    pub const PER_PAGE: u32 = 250;
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a client against the public API.
    pub fn new() -> Result<Self, FeedError> {
        Self::with_base_url(Self::BASE_URL)
    }

    /// Create a client against a different base URL (mirror or proxy).
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FeedError::Request(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Build the listing URL for a page.
    pub fn page_url(&self, page: u32) -> String {
        format!(
            "{}/coins/markets?vs_currency=usd&order=market_cap_asc&per_page={}&page={}\
             &price_change_percentage=24h,7d&sparkline=false",
            self.base_url,
            Self::PER_PAGE,
            page
        )
    }
}

#[async_trait]
impl ListingSource for CoinGeckoClient {
    async fn fetch_page(&self, page: u32) -> Result<Vec<AssetRecord>, FeedError> {
        let url = self.page_url(page);
        debug!(page, "CoinGecko: fetching markets page");

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FeedError::HttpStatus(response.status().as_u16()));
        }

        let json: serde_json::Value = response.json().await?;
        parse_listing(json)
    }
}

/// Decode a listing body. Anything other than a JSON array is rejected.
pub fn parse_listing(json: serde_json::Value) -> Result<Vec<AssetRecord>, FeedError> {
    if !json.is_array() {
        return Err(FeedError::UnexpectedPayload(format!(
            "expected a list, got {}",
            json_kind(&json)
        )));
    }
    Ok(serde_json::from_value(json)?)
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_page_url() {
        let client = CoinGeckoClient::with_base_url("http://localhost:9000/api/v3/").unwrap();
        assert_eq!(
            client.page_url(3),
            "http://localhost:9000/api/v3/coins/markets?vs_currency=usd&order=market_cap_asc\
             &per_page=250&page=3&price_change_percentage=24h,7d&sparkline=false"
        );
    }

    #[test]
    fn test_parse_listing_array() {
        let body = json!([
            {"id": "a", "symbol": "a", "name": "A", "market_cap": 1.0},
            {"id": "b", "symbol": "b", "name": "B", "market_cap": null}
        ]);
        let records = parse_listing(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].market_cap, Some(1.0));
        assert_eq!(records[1].market_cap, None);
    }

    #[test]
    fn test_parse_listing_rejects_non_list() {
        let body = json!({"status": {"error_code": 429, "error_message": "rate limited"}});
        let err = parse_listing(body).unwrap_err();
        assert!(matches!(err, FeedError::UnexpectedPayload(ref m) if m.contains("object")));
    }

    #[test]
    fn test_parse_listing_empty_array() {
        assert!(parse_listing(json!([])).unwrap().is_empty());
    }
}
