//! Alert notification logic.

use crate::destination::DestinationResolver;
use crate::format::{format_alert, format_cycle_header, format_empty_notice};
use crate::telegram::{AlertTransport, TelegramError};
use radar_core::{AssetRecord, FilterThresholds};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("Failed to send cycle header: {0}")]
    Header(#[source] TelegramError),
}

/// A candidate message that could not be delivered.
#[derive(Debug)]
pub struct SendFailure {
    pub asset_id: String,
    pub error: TelegramError,
}

/// Per-candidate delivery summary.
#[derive(Debug, Default)]
pub struct DeliverySummary {
    pub sent: usize,
    pub failed: Vec<SendFailure>,
}

/// Outcome of one dispatch.
#[derive(Debug)]
pub enum DispatchReport {
    /// Neither an override nor a default destination is configured.
    NoDestination,
    /// The batch was empty; only the notice was sent.
    EmptyNotice { chat_id: String },
    /// Header plus one message per candidate.
    Delivered {
        chat_id: String,
        summary: DeliverySummary,
    },
}

/// Sends cycle results to the resolved destination.
pub struct Notifier {
    transport: Arc<dyn AlertTransport>,
    destination: Arc<dyn DestinationResolver>,
    thresholds: FilterThresholds,
    pacing: Duration,
}

impl Notifier {
    /// Delay held between consecutive candidate messages.
    pub const DEFAULT_PACING: Duration = Duration::from_millis(700);

    pub fn new(
        transport: Arc<dyn AlertTransport>,
        destination: Arc<dyn DestinationResolver>,
        thresholds: FilterThresholds,
    ) -> Self {
        Self {
            transport,
            destination,
            thresholds,
            pacing: Self::DEFAULT_PACING,
        }
    }

    /// Override the inter-message delay.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Deliver one cycle's batch.
    ///
    /// Without a destination this is a silent no-op. An empty batch gets a
    /// single notice and no header. Header failures end the dispatch;
    /// candidate failures are recorded and skipped.
    pub async fn dispatch(&self, candidates: &[AssetRecord]) -> Result<DispatchReport, NotifierError> {
        let Some(chat_id) = self.destination.resolve() else {
            debug!("No destination configured, skipping dispatch");
            return Ok(DispatchReport::NoDestination);
        };

        if candidates.is_empty() {
            self.transport
                .send(&chat_id, &format_empty_notice())
                .await
                .map_err(NotifierError::Header)?;
            info!(chat_id = %chat_id, "No candidates this cycle, notice sent");
            return Ok(DispatchReport::EmptyNotice { chat_id });
        }

        let header = format_cycle_header(&self.thresholds, chrono::Utc::now());
        self.transport
            .send(&chat_id, &header)
            .await
            .map_err(NotifierError::Header)?;

        let summary = self.send_candidates(&chat_id, candidates).await;
        info!(
            chat_id = %chat_id,
            sent = summary.sent,
            failed = summary.failed.len(),
            "Cycle alerts dispatched"
        );
        Ok(DispatchReport::Delivered { chat_id, summary })
    }

    /// Send one message per candidate to `chat_id`, in order.
    ///
    /// A failed send is logged and skipped; later candidates are still tried.
    pub async fn send_candidates(&self, chat_id: &str, candidates: &[AssetRecord]) -> DeliverySummary {
        let mut summary = DeliverySummary::default();

        for (i, candidate) in candidates.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.pacing).await;
            }

            match self.transport.send(chat_id, &format_alert(candidate)).await {
                Ok(()) => {
                    debug!(chat_id, asset = candidate.id_str(), "Alert sent");
                    summary.sent += 1;
                }
                Err(error) => {
                    warn!(
                        chat_id,
                        asset = candidate.id_str(),
                        error = %error,
                        "Failed to send alert"
                    );
                    summary.failed.push(SendFailure {
                        asset_id: candidate.id_str().to_string(),
                        error,
                    });
                }
            }
        }

        summary
    }
}
