//! Message templates (Telegram HTML).

use chrono::{DateTime, Utc};
use radar_core::{AssetRecord, FilterThresholds};
use teloxide::utils::html::escape;

const COIN_PAGE_URL: &str = "https://www.coingecko.com/en/coins";

/// Format a number with `decimals` fraction digits and comma-grouped thousands.
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    let mut out = String::with_capacity(formatted.len() + int_part.len() / 3 + 1);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac_part) = frac_part {
        out.push('.');
        out.push_str(frac_part);
    }

    // No "-0" after rounding
    if value < 0.0 && out.chars().any(|c| matches!(c, '1'..='9')) {
        out.insert(0, '-');
    }
    out
}

/// Deep link to the asset's page.
pub fn coin_link(id: &str) -> String {
    format!("{}/{}", COIN_PAGE_URL, id)
}

/// Format one candidate as an alert message.
pub fn format_alert(record: &AssetRecord) -> String {
    let name = record.name.as_deref().unwrap_or_default();
    let symbol = record.symbol.as_deref().unwrap_or_default().to_uppercase();

    format!(
        "🔥 <b>Low-Cap Radar</b>\n\n\
         <b>{}</b> ({})\n\
         💲 <b>Price:</b> ${}\n\
         🏦 <b>Market cap:</b> ${}\n\
         📊 <b>Volume 24h:</b> ${}\n\
         ⏫ <b>7d:</b> {:+.2}%  |  ⏩ <b>24h:</b> {:+.2}%\n\
         🔗 <a href=\"{}\">CoinGecko</a>\n\n\
         ⚠️ <b>Warning:</b> low caps are highly volatile. <i>Not financial advice.</i>",
        escape(name),
        escape(&symbol),
        group_thousands(record.current_price.unwrap_or(0.0), 6),
        group_thousands(record.market_cap_or_zero(), 0),
        group_thousands(record.volume_or_zero(), 0),
        record.change_7d_or_zero(),
        record.change_24h_or_zero(),
        escape(&coin_link(record.id_str())),
    )
}

/// Header sent before a non-empty batch.
pub fn format_cycle_header(thresholds: &FilterThresholds, now: DateTime<Utc>) -> String {
    format!(
        "🚨 <b>Low-Cap Radar - cycle candidates</b>\n\
         🕒 {}\n\
         🎯 Filters: MCAP ${}–${}; Vol≥${}; 7d≥{}%; 24h≥{}%",
        now.format("%Y-%m-%d %H:%M UTC"),
        group_thousands(thresholds.mcap_min as f64, 0),
        group_thousands(thresholds.mcap_max as f64, 0),
        group_thousands(thresholds.min_vol_24h, 0),
        thresholds.min_change_7d,
        thresholds.min_change_24h,
    )
}

/// Notice sent instead of the header when nothing matched.
pub fn format_empty_notice() -> String {
    "🔎 <b>Low-Cap Radar</b>: no asset matched the filters this cycle.\n\n\
     Tip: adjust the thresholds in .env or run /radar later."
        .to_string()
}

/// Active configuration snapshot, for `/config`.
pub fn format_config(thresholds: &FilterThresholds) -> String {
    format!(
        "⚙️ <b>Current config</b>\n\
         MCap: ${} – ${}\n\
         Vol 24h ≥ ${}\n\
         Δ7d ≥ {}%\n\
         Δ24h ≥ {}%\n\
         Max alerts/cycle: {}\n\
         Interval: {} min",
        group_thousands(thresholds.mcap_min as f64, 0),
        group_thousands(thresholds.mcap_max as f64, 0),
        group_thousands(thresholds.min_vol_24h, 0),
        thresholds.min_change_7d,
        thresholds.min_change_24h,
        thresholds.max_alerts_per_cycle,
        thresholds.poll_interval_minutes,
    )
}
