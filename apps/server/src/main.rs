//! Low-Cap Radar - Telegram screener
//!
//! Polls the CoinGecko markets listing, keeps low-cap assets that pass the
//! configured thresholds, ranks them and sends them to a Telegram chat.

mod commands;
mod config;
mod state;

use clap::Parser;
use config::RadarConfig;
use radar_alerts::{AlertTransport, DispatchReport, FileDestination};
use radar_feeds::DEFAULT_MAX_PAGES;
use state::{create_state, SharedState};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Low-Cap Radar CLI
#[derive(Parser, Debug)]
#[command(name = "radar-bot")]
#[command(about = "Low-cap crypto screener with Telegram alerts", long_about = None)]
struct Args {
    /// Run a single cycle, print the candidates and notify (default)
    #[arg(long, conflicts_with_all = ["run_loop", "poll"])]
    once: bool,

    /// Repeat cycles forever; requires TELEGRAM_CHAT_ID
    #[arg(long = "loop", conflicts_with = "poll")]
    run_loop: bool,

    /// Serve bot commands and run scheduled cycles
    #[arg(long)]
    poll: bool,

    /// Listing pages scanned per cycle
    #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
    max_pages: u32,

    /// Destination override file
    #[arg(long, default_value = FileDestination::DEFAULT_PATH)]
    chat_file: PathBuf,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Once,
    Loop,
    Poll,
}

impl Args {
    fn mode(&self) -> Mode {
        if self.poll {
            Mode::Poll
        } else if self.run_loop {
            Mode::Loop
        } else {
            Mode::Once
        }
    }
}

fn init_logging(level: &str) {
    let level = match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

fn log_report(report: &DispatchReport) {
    match report {
        DispatchReport::NoDestination => info!("No destination configured, nothing sent"),
        DispatchReport::EmptyNotice { chat_id } => info!(chat_id = %chat_id, "Sent empty-cycle notice"),
        DispatchReport::Delivered { chat_id, summary } => info!(
            chat_id = %chat_id,
            sent = summary.sent,
            failed = summary.failed.len(),
            "Alerts delivered"
        ),
    }
}

async fn run_once(state: SharedState) -> ExitCode {
    let candidates = state.find_candidates().await;
    for c in &candidates {
        println!(
            "{} {} {}",
            c.id_str(),
            c.symbol.as_deref().unwrap_or_default(),
            c.market_cap_or_zero()
        );
    }

    match state.notifier.dispatch(&candidates).await {
        Ok(report) => {
            log_report(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Dispatch failed");
            ExitCode::FAILURE
        }
    }
}

async fn run_loop(state: SharedState, default_chat_id: String) {
    info!(interval = ?state.poll_interval(), "Starting radar loop");

    loop {
        match state.run_cycle().await {
            Ok(report) => log_report(&report),
            Err(e) => {
                error!(error = %e, "Cycle failed");
                let text = commands::format_cycle_error(&e);
                if let Err(send_err) = state.bot.send(&default_chat_id, &text).await {
                    debug!(error = %send_err, "Failed to report cycle error");
                }
            }
        }

        tokio::time::sleep(state.poll_interval()).await;
    }
}

async fn run_poll(state: SharedState) {
    info!("Starting command handler and scheduled cycles");

    let periodic = tokio::spawn(commands::run_periodic(state.clone()));
    commands::run(state).await;

    periodic.abort();
    info!("Command handler stopped");
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();
    init_logging(&args.log_level);

    let config = match RadarConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mode = args.mode();
    info!("🚀 Low-Cap Radar starting...");
    info!("  Mode: {:?}", mode);
    info!("  Max pages: {}", args.max_pages);
    info!("  Chat file: {}", args.chat_file.display());
    info!("  Thresholds: {:?}", config.thresholds);

    let default_chat_id = config.default_chat_id.clone();
    if mode == Mode::Loop && default_chat_id.is_none() {
        error!("Missing TELEGRAM_CHAT_ID in environment, required for --loop");
        return ExitCode::FAILURE;
    }

    let state = match create_state(config, args.chat_file, args.max_pages) {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client");
            return ExitCode::FAILURE;
        }
    };

    match (mode, default_chat_id) {
        (Mode::Once, _) => run_once(state).await,
        (Mode::Loop, Some(chat_id)) => {
            run_loop(state, chat_id).await;
            ExitCode::SUCCESS
        }
        (Mode::Loop, None) => {
            warn!("Loop mode without a default destination");
            ExitCode::FAILURE
        }
        (Mode::Poll, _) => {
            run_poll(state).await;
            ExitCode::SUCCESS
        }
    }
}
