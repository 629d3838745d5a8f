//! Application state shared by the scheduler and the command handler.

use crate::config::RadarConfig;
use radar_alerts::{DispatchReport, FileDestination, Notifier, NotifierError, TelegramBot};
use radar_core::AssetRecord;
use radar_feeds::{CoinGeckoClient, FeedError, MarketScanner};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Counters across cycles, logged after each run.
#[derive(Debug, Default)]
pub struct CycleStats {
    /// Completed scans.
    pub cycles: AtomicU64,
    /// Candidate messages delivered.
    pub alerts_sent: AtomicU64,
    /// Candidate messages that failed.
    pub alerts_failed: AtomicU64,
    /// Dispatches that failed at the header or notice.
    pub dispatch_failures: AtomicU64,
}

impl CycleStats {
    pub fn record_cycle(&self) {
        self.cycles.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_report(&self, report: &DispatchReport) {
        if let DispatchReport::Delivered { summary, .. } = report {
            self.alerts_sent.fetch_add(summary.sent as u64, Ordering::Relaxed);
            self.alerts_failed
                .fetch_add(summary.failed.len() as u64, Ordering::Relaxed);
        }
    }

    pub fn record_dispatch_failure(&self) {
        self.dispatch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn summary(&self) -> String {
        format!(
            "cycles={} sent={} failed={} dispatch_failures={}",
            self.cycles.load(Ordering::Relaxed),
            self.alerts_sent.load(Ordering::Relaxed),
            self.alerts_failed.load(Ordering::Relaxed),
            self.dispatch_failures.load(Ordering::Relaxed),
        )
    }
}

/// Everything one cycle needs, built once at startup.
pub struct RadarState {
    pub config: RadarConfig,
    pub scanner: MarketScanner<CoinGeckoClient>,
    pub notifier: Notifier,
    pub destination: Arc<FileDestination>,
    pub bot: Arc<TelegramBot>,
    pub max_pages: u32,
    pub stats: CycleStats,
}

pub type SharedState = Arc<RadarState>;

impl RadarState {
    pub fn new(config: RadarConfig, chat_file: PathBuf, max_pages: u32) -> Result<Self, FeedError> {
        let bot = Arc::new(TelegramBot::new(&config.bot_token));
        let destination = Arc::new(FileDestination::new(chat_file, config.default_chat_id.clone()));
        let scanner = MarketScanner::new(CoinGeckoClient::new()?, config.thresholds);
        let notifier = Notifier::new(bot.clone(), destination.clone(), config.thresholds);

        Ok(Self {
            config,
            scanner,
            notifier,
            destination,
            bot,
            max_pages,
            stats: CycleStats::default(),
        })
    }

    /// Time between scheduled cycles. Never zero.
    pub fn poll_interval(&self) -> Duration {
        let secs = self
            .config
            .thresholds
            .poll_interval_minutes
            .checked_mul(60)
            .unwrap_or(u64::MAX);
        Duration::from_secs(secs.max(1))
    }

    /// Fetch, filter and rank.
    pub async fn find_candidates(&self) -> Vec<AssetRecord> {
        let candidates = self.scanner.find_candidates(self.max_pages).await;
        self.stats.record_cycle();
        candidates
    }

    /// One full cycle: scan, then deliver to the resolved destination.
    pub async fn run_cycle(&self) -> Result<DispatchReport, NotifierError> {
        let candidates = self.find_candidates().await;
        let result = self.notifier.dispatch(&candidates).await;
        match &result {
            Ok(report) => self.stats.record_report(report),
            Err(_) => self.stats.record_dispatch_failure(),
        }
        info!(stats = %self.stats.summary(), "Cycle finished");
        result
    }
}

pub fn create_state(config: RadarConfig, chat_file: PathBuf, max_pages: u32) -> Result<SharedState, FeedError> {
    Ok(Arc::new(RadarState::new(config, chat_file, max_pages)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use radar_alerts::{DeliverySummary, SendFailure, TelegramError};

    #[test]
    fn test_cycle_stats_counts_delivery() {
        let stats = CycleStats::default();
        stats.record_cycle();
        stats.record_report(&DispatchReport::Delivered {
            chat_id: "1".to_string(),
            summary: DeliverySummary {
                sent: 2,
                failed: vec![SendFailure {
                    asset_id: "x".to_string(),
                    error: TelegramError::InvalidChatId("1".to_string()),
                }],
            },
        });
        stats.record_report(&DispatchReport::NoDestination);
        stats.record_dispatch_failure();

        assert_eq!(stats.summary(), "cycles=1 sent=2 failed=1 dispatch_failures=1");
    }

    #[test]
    fn test_poll_interval() {
        let config = RadarConfig::from_lookup(|key| {
            match key {
                "TELEGRAM_BOT_TOKEN" => Some("123:abc".to_string()),
                "POLL_INTERVAL_MINUTES" => Some("2".to_string()),
                _ => None,
            }
        })
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let state = RadarState::new(config, dir.path().join("chat_id.txt"), 1).unwrap();
        assert_eq!(state.poll_interval(), Duration::from_secs(120));
    }

    #[test]
    fn test_poll_interval_never_zero() {
        let mut config = RadarConfig::from_lookup(|key| {
            (key == "TELEGRAM_BOT_TOKEN").then(|| "123:abc".to_string())
        })
        .unwrap();
        config.thresholds.poll_interval_minutes = 0;
        let dir = tempfile::tempdir().unwrap();
        let state = RadarState::new(config, dir.path().join("chat_id.txt"), 1).unwrap();
        assert_eq!(state.poll_interval(), Duration::from_secs(1));
    }
}
