//! Telegram bot commands and the scheduled job.

use crate::state::SharedState;
use radar_alerts::{format_config, TelegramError};
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::utils::command::BotCommands;
use teloxide::utils::html::escape;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// Delay before the first scheduled cycle in poll mode.
pub const FIRST_RUN_DELAY: Duration = Duration::from_secs(10);

/// Bot commands.
#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Scan now and send the candidates to this chat")]
    Radar,
    #[command(description = "Show the active filters")]
    Config,
    #[command(description = "Deliver scheduled alerts to this chat")]
    Setchat,
    #[command(description = "Show help")]
    Help,
}

/// Run the bot command handler until Ctrl-C.
pub async fn run(state: SharedState) {
    let bot = state.bot.bot().clone();
    let handler = Update::filter_message().filter_command::<Command>().endpoint(
        move |bot: Bot, msg: Message, cmd: Command| {
            let state = Arc::clone(&state);
            async move { handle_command(state, bot, msg, cmd).await }
        },
    );

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn handle_command(
    state: SharedState,
    bot: Bot,
    msg: Message,
    cmd: Command,
) -> Result<(), TelegramError> {
    let chat_id = msg.chat.id.to_string();
    info!(chat_id = %chat_id, command = ?cmd, "Command received");

    match cmd {
        Command::Radar => {
            bot.send_message(msg.chat.id, "🔎 <b>Low-Cap Radar</b>: searching...")
                .parse_mode(ParseMode::Html)
                .await?;

            // Own task so a panic in the scan surfaces as a JoinError reply
            let worker = Arc::clone(&state);
            let scan = tokio::spawn(async move { worker.find_candidates().await }).await;

            match scan {
                Err(e) => {
                    warn!(chat_id = %chat_id, error = %e, "On-demand scan failed");
                    bot.send_message(msg.chat.id, format!("❗ Search failed: {}", e))
                        .await?;
                }
                Ok(candidates) if candidates.is_empty() => {
                    bot.send_message(msg.chat.id, "No results right now.").await?;
                }
                Ok(candidates) => {
                    let summary = state.notifier.send_candidates(&chat_id, &candidates).await;
                    info!(
                        chat_id = %chat_id,
                        sent = summary.sent,
                        failed = summary.failed.len(),
                        "On-demand alerts sent"
                    );
                }
            }
        }

        Command::Config => {
            bot.send_message(msg.chat.id, format_config(&state.config.thresholds))
                .parse_mode(ParseMode::Html)
                .await?;
        }

        Command::Setchat => match state.destination.persist(&chat_id) {
            Ok(()) => {
                info!(chat_id = %chat_id, path = %state.destination.path().display(), "Destination saved");
                bot.send_message(msg.chat.id, format!("✅ Chat {} saved as destination.", chat_id))
                    .await?;
            }
            Err(e) => {
                warn!(chat_id = %chat_id, error = %e, "Failed to save destination");
                bot.send_message(msg.chat.id, format!("❗ Failed to save: {}", e))
                    .await?;
            }
        },

        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }
    }

    Ok(())
}

/// Run a cycle after `FIRST_RUN_DELAY`, then every poll interval.
///
/// Failures are logged and the next tick proceeds.
pub async fn run_periodic(state: SharedState) {
    tokio::time::sleep(FIRST_RUN_DELAY).await;

    let mut ticker = tokio::time::interval(state.poll_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if let Err(e) = state.run_cycle().await {
            warn!(error = %e, "Scheduled cycle failed");
        }
    }
}

/// Format a cycle failure for the best-effort error report.
pub fn format_cycle_error(error: &dyn std::error::Error) -> String {
    format!("❗ <b>Radar error:</b> {}", escape(&error.to_string()))
}
