//! Historical value log entries and the day-replacement merge.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One asset's computed value recorded against one calendar day. The log
/// holds at most one snapshot per (date, ticker) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySnapshot {
    pub date: NaiveDate,
    pub ticker: String,
    pub value: f64,
}

/// Merges a day's snapshots into the prior log, replacing any entries
/// already recorded for that date. Re-running on the same day therefore
/// overwrites rather than duplicates. The result is sorted date-descending,
/// ticker-ascending within a day.
pub fn merge_day(
    prior: Vec<HistorySnapshot>,
    date: NaiveDate,
    snapshots: &[HistorySnapshot],
) -> Vec<HistorySnapshot> {
    let mut merged: Vec<HistorySnapshot> =
        prior.into_iter().filter(|s| s.date != date).collect();
    merged.extend_from_slice(snapshots);
    merged.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.ticker.cmp(&b.ticker)));
    merged
}
