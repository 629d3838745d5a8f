//! Candidate ranking.

use crate::filter::is_valid;
use crate::{AssetRecord, FilterThresholds};
use std::cmp::Ordering;

/// Compare two records by (7d change, 24h change, 24h volume), descending.
///
/// Missing values count as zero. `total_cmp` gives a total order so NaN
/// from a malformed payload cannot break the sort.
pub fn rank_order(a: &AssetRecord, b: &AssetRecord) -> Ordering {
    b.change_7d_or_zero()
        .total_cmp(&a.change_7d_or_zero())
        .then_with(|| b.change_24h_or_zero().total_cmp(&a.change_24h_or_zero()))
        .then_with(|| b.volume_or_zero().total_cmp(&a.volume_or_zero()))
}

/// Filter, rank and truncate a fetched listing into a candidate batch.
///
/// Returns exactly `min(valid count, max_alerts_per_cycle)` records. The sort
/// is stable, so exact ties keep their input order.
pub fn select(records: Vec<AssetRecord>, thresholds: &FilterThresholds) -> Vec<AssetRecord> {
    let mut candidates: Vec<AssetRecord> = records
        .into_iter()
        .filter(|r| is_valid(r, thresholds))
        .collect();
    candidates.sort_by(rank_order);
    candidates.truncate(thresholds.max_alerts_per_cycle);
    candidates
}
