//! Paginated market scan with early termination.

use crate::error::FeedError;
use crate::rest::ListingSource;
use radar_core::{select, AssetRecord, FilterThresholds};
use tracing::{debug, info, warn};

/// Default number of listing pages scanned per cycle.
pub const DEFAULT_MAX_PAGES: u32 = 8;

/// Why pagination ended.
#[derive(Debug)]
pub enum StopReason {
    /// All requested pages were retrieved.
    PageLimit,
    /// The upstream returned an empty page.
    EmptyPage { page: u32 },
    /// The last market cap on a page passed the pagination ceiling.
    MarketCapCeiling { page: u32, last_market_cap: f64 },
    /// A page could not be retrieved. Earlier pages are kept.
    Failed { page: u32, error: FeedError },
}

/// Result of one paginated scan.
#[derive(Debug)]
pub struct FetchOutcome {
    /// Records accumulated across all retrieved pages, in listing order
    pub records: Vec<AssetRecord>,
    /// Pages that contributed records
    pub pages_fetched: u32,
    pub stop: StopReason,
}

impl FetchOutcome {
    /// Check whether pagination was cut short by a retrieval failure.
    pub fn is_partial(&self) -> bool {
        matches!(self.stop, StopReason::Failed { .. })
    }
}

/// Scans a listing source and selects candidates.
pub struct MarketScanner<S> {
    source: S,
    thresholds: FilterThresholds,
}

impl<S: ListingSource> MarketScanner<S> {
    pub fn new(source: S, thresholds: FilterThresholds) -> Self {
        Self { source, thresholds }
    }

    /// Retrieve pages `1..=max_pages` in order.
    ///
    /// A failed page ends pagination and is reported in the outcome rather
    /// than returned as an error; whatever was accumulated is kept.
    pub async fn fetch_all_candidates(&self, max_pages: u32) -> FetchOutcome {
        let ceiling = self.thresholds.pagination_ceiling();
        let mut records = Vec::new();
        let mut pages_fetched = 0;

        for page in 1..=max_pages {
            let items = match self.source.fetch_page(page).await {
                Ok(items) => items,
                Err(error) => {
                    warn!(page, error = %error, "Listing fetch failed, keeping partial results");
                    return FetchOutcome {
                        records,
                        pages_fetched,
                        stop: StopReason::Failed { page, error },
                    };
                }
            };

            if items.is_empty() {
                debug!(page, "Empty listing page, stopping");
                return FetchOutcome {
                    records,
                    pages_fetched,
                    stop: StopReason::EmptyPage { page },
                };
            }

            let last_market_cap = items.last().map_or(0.0, |r| r.market_cap_or_zero());
            debug!(page, items = items.len(), last_market_cap, "Listing page fetched");
            records.extend(items);
            pages_fetched += 1;

            if last_market_cap > ceiling {
                debug!(page, last_market_cap, ceiling, "Market cap ceiling passed, stopping");
                return FetchOutcome {
                    records,
                    pages_fetched,
                    stop: StopReason::MarketCapCeiling {
                        page,
                        last_market_cap,
                    },
                };
            }
        }

        FetchOutcome {
            records,
            pages_fetched,
            stop: StopReason::PageLimit,
        }
    }

    /// Fetch, filter and rank one cycle's candidates.
    pub async fn find_candidates(&self, max_pages: u32) -> Vec<AssetRecord> {
        let outcome = self.fetch_all_candidates(max_pages).await;
        let scanned = outcome.records.len();
        let partial = outcome.is_partial();
        let candidates = select(outcome.records, &self.thresholds);
        info!(
            scanned,
            pages = outcome.pages_fetched,
            candidates = candidates.len(),
            partial,
            stop = ?outcome.stop,
            "Market scan complete"
        );
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// Serves pre-scripted pages; `None` simulates a failed request.
    /// Pages past the script are empty.
    struct ScriptedSource {
        pages: Vec<Option<Vec<AssetRecord>>>,
        requested: Mutex<Vec<u32>>,
    }

    impl ScriptedSource {
        fn new(pages: Vec<Option<Vec<AssetRecord>>>) -> Self {
            Self {
                pages,
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ListingSource for ScriptedSource {
        async fn fetch_page(&self, page: u32) -> Result<Vec<AssetRecord>, FeedError> {
            self.requested.lock().unwrap().push(page);
            match self.pages.get(page as usize - 1) {
                Some(Some(items)) => Ok(items.clone()),
                Some(None) => Err(FeedError::HttpStatus(500)),
                None => Ok(Vec::new()),
            }
        }
    }

    fn item(id: &str, market_cap: f64) -> AssetRecord {
        AssetRecord {
            id: Some(id.to_string()),
            symbol: Some(id.to_string()),
            name: Some(id.to_string()),
            current_price: Some(1.0),
            market_cap: Some(market_cap),
            total_volume: Some(1_000_000.0),
            price_change_percentage_24h_in_currency: Some(10.0),
            price_change_percentage_7d_in_currency: Some(25.0),
        }
    }

    fn page(prefix: &str, market_caps: &[f64]) -> Option<Vec<AssetRecord>> {
        Some(
            market_caps
                .iter()
                .enumerate()
                .map(|(i, mc)| item(&format!("{}{}", prefix, i), *mc))
                .collect(),
        )
    }

    fn scanner(pages: Vec<Option<Vec<AssetRecord>>>) -> MarketScanner<ScriptedSource> {
        MarketScanner::new(ScriptedSource::new(pages), FilterThresholds::default())
    }

    fn requested(scanner: &MarketScanner<ScriptedSource>) -> Vec<u32> {
        scanner.source.requested.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_stops_at_first_empty_page() {
        let scanner = scanner(vec![
            page("a", &[1e6, 2e6]),
            page("b", &[3e6, 4e6]),
            Some(Vec::new()),
            page("c", &[5e6]),
        ]);
        let outcome = scanner.fetch_all_candidates(8).await;

        assert_eq!(requested(&scanner), vec![1, 2, 3]);
        assert_eq!(outcome.pages_fetched, 2);
        assert_eq!(outcome.records.len(), 4);
        assert!(matches!(outcome.stop, StopReason::EmptyPage { page: 3 }));
    }

    #[tokio::test]
    async fn test_stops_when_last_market_cap_passes_ceiling() {
        let mcap_max = FilterThresholds::default().mcap_max as f64;
        let scanner = scanner(vec![
            page("a", &[1e6, mcap_max * 4.0]),
            page("b", &[5e8]),
        ]);
        let outcome = scanner.fetch_all_candidates(8).await;

        assert_eq!(requested(&scanner), vec![1]);
        assert_eq!(outcome.records.len(), 2);
        assert!(matches!(
            outcome.stop,
            StopReason::MarketCapCeiling { page: 1, .. }
        ));
    }

    #[tokio::test]
    async fn test_ceiling_is_strictly_greater() {
        let mcap_max = FilterThresholds::default().mcap_max as f64;
        let scanner = scanner(vec![page("a", &[mcap_max * 3.0]), Some(Vec::new())]);
        scanner.fetch_all_candidates(8).await;
        assert_eq!(requested(&scanner), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_failure_keeps_partial_results() {
        let scanner = scanner(vec![page("a", &[1e6]), page("b", &[2e6]), None, page("c", &[3e6])]);
        let outcome = scanner.fetch_all_candidates(8).await;

        assert_eq!(requested(&scanner), vec![1, 2, 3]);
        assert!(outcome.is_partial());
        let ids: Vec<_> = outcome.records.iter().map(|r| r.id_str()).collect();
        assert_eq!(ids, vec!["a0", "b0"]);
        assert!(matches!(
            outcome.stop,
            StopReason::Failed {
                page: 3,
                error: FeedError::HttpStatus(500)
            }
        ));
    }

    #[tokio::test]
    async fn test_respects_max_pages() {
        let scanner = scanner(vec![page("a", &[1e6]), page("b", &[2e6]), page("c", &[3e6])]);
        let outcome = scanner.fetch_all_candidates(2).await;

        assert_eq!(requested(&scanner), vec![1, 2]);
        assert!(matches!(outcome.stop, StopReason::PageLimit));
    }

    #[tokio::test]
    async fn test_find_candidates_filters_and_ranks() {
        let mut weak = item("weak", 20e6);
        weak.price_change_percentage_7d_in_currency = Some(21.0);
        let mut strong = item("strong", 30e6);
        strong.price_change_percentage_7d_in_currency = Some(90.0);
        let too_small = item("too-small", 1e6);

        let scanner = scanner(vec![Some(vec![too_small, weak, strong])]);
        let candidates = scanner.find_candidates(DEFAULT_MAX_PAGES).await;

        let ids: Vec<_> = candidates.iter().map(|r| r.id_str()).collect();
        assert_eq!(ids, vec!["strong", "weak"]);
    }

    #[tokio::test]
    async fn test_find_candidates_uses_pages_before_failure() {
        let scanner = scanner(vec![Some(vec![item("early", 20e6)]), None]);
        let candidates = scanner.find_candidates(DEFAULT_MAX_PAGES).await;

        assert_eq!(requested(&scanner), vec![1, 2]);
        let ids: Vec<_> = candidates.iter().map(|r| r.id_str()).collect();
        assert_eq!(ids, vec!["early"]);
    }
}
