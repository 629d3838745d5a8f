//! Candidate filter: required fields plus threshold predicates.

use crate::{AssetRecord, FilterThresholds};

/// Check whether a record qualifies as a candidate.
///
/// All required fields must be present. The five threshold comparisons are
/// AND-ed; there is no partial-match mode.
pub fn is_valid(record: &AssetRecord, thresholds: &FilterThresholds) -> bool {
    if !record.has_required_fields() {
        return false;
    }

    let mcap = record.market_cap_or_zero();
    let volume = record.volume_or_zero();
    let change_24h = record.change_24h_or_zero();
    let change_7d = record.change_7d_or_zero();

    mcap >= thresholds.mcap_min as f64
        && mcap <= thresholds.mcap_max as f64
        && volume >= thresholds.min_vol_24h
        && change_7d >= thresholds.min_change_7d
        && change_24h >= thresholds.min_change_24h
}
