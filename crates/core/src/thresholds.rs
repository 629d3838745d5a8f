//! Screening thresholds.

/// Immutable snapshot of the screening configuration.
///
/// Built once at startup and handed to every component that needs it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterThresholds {
    /// Lower market cap bound in USD (inclusive)
    pub mcap_min: u64,
    /// Upper market cap bound in USD (inclusive)
    pub mcap_max: u64,
    /// Minimum 24h volume in USD
    pub min_vol_24h: f64,
    /// Minimum 7d change in percent
    pub min_change_7d: f64,
    /// Minimum 24h change in percent
    pub min_change_24h: f64,
    /// Maximum candidates delivered per cycle
    pub max_alerts_per_cycle: usize,
    /// Minutes between scheduled cycles
    pub poll_interval_minutes: u64,
}

impl Default for FilterThresholds {
    fn default() -> Self {
        Self {
            mcap_min: 10_000_000,
            mcap_max: 100_000_000,
            min_vol_24h: 500_000.0,
            min_change_7d: 20.0,
            min_change_24h: 5.0,
            max_alerts_per_cycle: 20,
            poll_interval_minutes: 30,
        }
    }
}

impl FilterThresholds {
    /// Market cap past which the ascending listing is assumed irrelevant.
    ///
    /// Assumes the upstream listing is sorted ascending by market cap. This
    /// is not verified against the payload.
    pub fn pagination_ceiling(&self) -> f64 {
        self.mcap_max as f64 * 3.0
    }
}
