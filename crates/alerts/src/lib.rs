//! Telegram alerting for radar candidates.
//!
//! This crate provides:
//! - Message templates for alerts, cycle headers and the config snapshot
//! - Destination resolution with a persisted override file
//! - Telegram transport and the paced, failure-isolated dispatcher

pub mod destination;
pub mod format;
pub mod notifier;
pub mod telegram;

pub use destination::{DestinationResolver, FileDestination};
pub use format::{format_alert, format_config, format_cycle_header, format_empty_notice};
pub use notifier::{DeliverySummary, DispatchReport, Notifier, NotifierError, SendFailure};
pub use telegram::{AlertTransport, TelegramBot, TelegramError};
