//! Persistent store boundaries: the asset registry (read-only input) and
//! the historical value log (full-log read, full-log rewrite).

pub mod csv;

use crate::core::asset::AssetRecord;
use crate::core::history::HistorySnapshot;
use anyhow::Result;
use chrono::NaiveDate;

pub trait RegistryStore {
    fn read_all(&self) -> Result<Vec<AssetRecord>>;
}

pub trait HistoryStore {
    fn read_all(&self) -> Result<Vec<HistorySnapshot>>;

    /// Rewrites the log with `snapshots` replacing any entries already
    /// recorded for `date`. Same-day re-runs overwrite, never duplicate.
    fn replace_day(&self, date: NaiveDate, snapshots: &[HistorySnapshot]) -> Result<()>;
}
