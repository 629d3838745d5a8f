//! Asset listing records as returned by the markets endpoint.

use serde::Deserialize;

/// One tradable asset at a point in time.
///
/// Every field is optional because the upstream listing may omit or null
/// any of them. Candidacy requires all of them to be present, see
/// [`AssetRecord::has_required_fields`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AssetRecord {
    /// Source identifier (e.g., "bitcoin"), also used for the deep link
    #[serde(default)]
    pub id: Option<String>,
    /// Ticker symbol as reported upstream (usually lowercase)
    #[serde(default)]
    pub symbol: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Price in USD
    #[serde(default)]
    pub current_price: Option<f64>,
    /// Market capitalization in USD
    #[serde(default)]
    pub market_cap: Option<f64>,
    /// 24h trading volume in USD
    #[serde(default)]
    pub total_volume: Option<f64>,
    /// 24h price change in percent
    #[serde(default)]
    pub price_change_percentage_24h_in_currency: Option<f64>,
    /// 7d price change in percent
    #[serde(default)]
    pub price_change_percentage_7d_in_currency: Option<f64>,
}

impl AssetRecord {
    /// Names of the fields that must be present and non-null.
    pub const REQUIRED_FIELDS: [&'static str; 8] = [
        "id",
        "symbol",
        "name",
        "current_price",
        "market_cap",
        "total_volume",
        "price_change_percentage_24h_in_currency",
        "price_change_percentage_7d_in_currency",
    ];

    /// Returns the first required field that is missing or null, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        let present = [
            self.id.is_some(),
            self.symbol.is_some(),
            self.name.is_some(),
            self.current_price.is_some(),
            self.market_cap.is_some(),
            self.total_volume.is_some(),
            self.price_change_percentage_24h_in_currency.is_some(),
            self.price_change_percentage_7d_in_currency.is_some(),
        ];
        Self::REQUIRED_FIELDS
            .iter()
            .zip(present)
            .find(|(_, ok)| !ok)
            .map(|(name, _)| *name)
    }

    /// Check that every required field is present.
    #[inline]
    pub fn has_required_fields(&self) -> bool {
        self.missing_field().is_none()
    }

    #[inline]
    pub fn market_cap_or_zero(&self) -> f64 {
        self.market_cap.unwrap_or(0.0)
    }

    #[inline]
    pub fn volume_or_zero(&self) -> f64 {
        self.total_volume.unwrap_or(0.0)
    }

    #[inline]
    pub fn change_24h_or_zero(&self) -> f64 {
        self.price_change_percentage_24h_in_currency.unwrap_or(0.0)
    }

    #[inline]
    pub fn change_7d_or_zero(&self) -> f64 {
        self.price_change_percentage_7d_in_currency.unwrap_or(0.0)
    }

    /// Identifier, or an empty string when absent.
    pub fn id_str(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_coingecko_item() {
        let json = r#"{
            "id": "foo-token",
            "symbol": "foo",
            "name": "Foo Token",
            "image": "https://example.com/foo.png",
            "current_price": 0.0123,
            "market_cap": 25000000,
            "total_volume": 1200000.5,
            "price_change_percentage_24h_in_currency": 7.5,
            "price_change_percentage_7d_in_currency": 31.2,
            "roi": null
        }"#;
        let record: AssetRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id.as_deref(), Some("foo-token"));
        assert_eq!(record.market_cap, Some(25_000_000.0));
        assert!(record.has_required_fields());
    }

    #[test]
    fn test_null_and_missing_fields_are_none() {
        let json = r#"{"id": "bar", "symbol": "bar", "name": "Bar", "market_cap": null}"#;
        let record: AssetRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.market_cap, None);
        assert_eq!(record.missing_field(), Some("current_price"));
        assert_eq!(record.market_cap_or_zero(), 0.0);
        assert_eq!(record.change_7d_or_zero(), 0.0);
    }
}
