//! CSV-backed registry and history stores.
//!
//! The registry sheet is operator-maintained, so parsing is tolerant:
//! numeric fields that fail to parse coerce to zero, an empty currency
//! column means the home currency, and rows with an unusable type tag are
//! skipped with a warning instead of failing the read.

use crate::core::asset::{AssetKind, AssetRecord, ManualValue};
use crate::core::history::{HistorySnapshot, merge_day};
use crate::store::{HistoryStore, RegistryStore};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub struct CsvRegistry {
    path: PathBuf,
    home_currency: String,
}

impl CsvRegistry {
    pub fn new<P: AsRef<Path>>(path: P, home_currency: &str) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            home_currency: home_currency.to_string(),
        }
    }
}

/// One registry row exactly as it appears in the sheet, before coercion.
#[derive(Debug, Deserialize)]
struct RawAssetRow {
    ticker: String,
    asset_type: String,
    #[serde(default)]
    quantity: Option<String>,
    #[serde(default)]
    purchase_price: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    annual_interest_rate: Option<String>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    manual_current_value: Option<String>,
    #[serde(default)]
    manual_total_cost: Option<String>,
}

/// Numeric sheet cells coerce leniently; anything unparseable counts as
/// zero rather than failing the whole registry read.
fn num(field: &Option<String>) -> f64 {
    field
        .as_deref()
        .map(str::trim)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.0)
}

impl RawAssetRow {
    fn into_record(self, home_currency: &str) -> Option<AssetRecord> {
        let currency = match self.currency.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => code.to_string(),
            _ => home_currency.to_string(),
        };

        let manual_value = num(&self.manual_current_value);
        let manual = (manual_value > 0.0).then(|| ManualValue {
            current_value: manual_value,
            total_cost: num(&self.manual_total_cost),
        });

        let kind = match self.asset_type.trim().to_lowercase().as_str() {
            "stock" | "crypto" | "fx" => AssetKind::Market {
                quantity: num(&self.quantity),
                purchase_price: num(&self.purchase_price),
            },
            "fund" => AssetKind::Fund {
                quantity: num(&self.quantity),
                purchase_price: num(&self.purchase_price),
            },
            "deposit" => AssetKind::Deposit {
                principal: num(&self.quantity),
                annual_rate_pct: num(&self.annual_interest_rate),
                start_date: self.start_date.as_deref().map(str::trim).and_then(|s| {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d")
                        .inspect_err(|e| {
                            warn!("Invalid start date '{}' for {}: {}", s, self.ticker, e);
                        })
                        .ok()
                }),
            },
            "manual" => AssetKind::Manual,
            other => {
                if manual.is_some() {
                    // A manual value rescues a row with a bad type tag.
                    AssetKind::Manual
                } else {
                    warn!(
                        "Skipping registry row {}: unknown asset type '{}'",
                        self.ticker, other
                    );
                    return None;
                }
            }
        };

        Some(AssetRecord {
            ticker: self.ticker.trim().to_string(),
            currency,
            kind,
            manual,
        })
    }
}

impl RegistryStore for CsvRegistry {
    fn read_all(&self) -> Result<Vec<AssetRecord>> {
        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Failed to open registry: {}", self.path.display()))?;

        let mut records = Vec::new();
        for row in reader.deserialize::<RawAssetRow>() {
            let raw =
                row.with_context(|| format!("Malformed registry row in {}", self.path.display()))?;
            if let Some(record) = raw.into_record(&self.home_currency) {
                records.push(record);
            }
        }

        debug!("Loaded {} asset records from the registry", records.len());
        Ok(records)
    }
}

pub struct CsvHistoryLog {
    path: PathBuf,
}

impl CsvHistoryLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl HistoryStore for CsvHistoryLog {
    fn read_all(&self) -> Result<Vec<HistorySnapshot>> {
        // A log that does not exist yet is an empty log, not an error.
        if !self.path.exists() {
            debug!("History log {} not found; starting empty", self.path.display());
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)
            .with_context(|| format!("Failed to open history log: {}", self.path.display()))?;

        let mut snapshots = Vec::new();
        for row in reader.deserialize::<HistorySnapshot>() {
            snapshots.push(
                row.with_context(|| format!("Malformed history row in {}", self.path.display()))?,
            );
        }
        Ok(snapshots)
    }

    fn replace_day(&self, date: NaiveDate, snapshots: &[HistorySnapshot]) -> Result<()> {
        // Read-merge-write over the whole log, like the sheet it replaces.
        // An unreadable prior log degrades to a fresh one here; the caller
        // has already surfaced that condition while computing performance.
        let prior = self.read_all().unwrap_or_else(|e| {
            warn!("Rewriting history log from scratch, prior log unreadable: {}", e);
            Vec::new()
        });

        let merged = merge_day(prior, date, snapshots);

        let mut writer = csv::Writer::from_path(&self.path)
            .with_context(|| format!("Failed to open history log for writing: {}", self.path.display()))?;
        for snapshot in &merged {
            writer.serialize(snapshot)?;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to write history log: {}", self.path.display()))?;

        debug!(
            "History log updated: {} entries for {}, {} total",
            snapshots.len(),
            date,
            merged.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn write_registry(dir: &tempfile::TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("assets.csv");
        fs::write(&path, content).unwrap();
        path
    }

    const HEADER: &str = "ticker,asset_type,quantity,purchase_price,currency,annual_interest_rate,start_date,manual_current_value,manual_total_cost\n";

    #[test]
    fn parses_every_asset_kind() {
        let dir = tempfile::tempdir().unwrap();
        let content = format!(
            "{HEADER}\
             AAPL,stock,10,100,USD,,,,\n\
             BTC-USD,crypto,0.5,40000,USD,,,,\n\
             AFT,fund,100,10,,,,,\n\
             VADELI,deposit,10000,,,12,2026-01-01,,\n\
             HOUSE,manual,,,,,,500000,400000\n"
        );
        let path = write_registry(&dir, &content);

        let registry = CsvRegistry::new(&path, "TRY");
        let records = registry.read_all().unwrap();

        assert_eq!(records.len(), 5);
        assert_eq!(
            records[0].kind,
            AssetKind::Market {
                quantity: 10.0,
                purchase_price: 100.0
            }
        );
        assert_eq!(records[0].currency, "USD");
        assert_eq!(
            records[2].kind,
            AssetKind::Fund {
                quantity: 100.0,
                purchase_price: 10.0
            }
        );
        // Empty currency column means home currency.
        assert_eq!(records[2].currency, "TRY");
        assert_eq!(
            records[3].kind,
            AssetKind::Deposit {
                principal: 10000.0,
                annual_rate_pct: 12.0,
                start_date: Some(date("2026-01-01")),
            }
        );
        assert_eq!(records[4].kind, AssetKind::Manual);
        assert_eq!(
            records[4].manual,
            Some(ManualValue {
                current_value: 500000.0,
                total_cost: 400000.0
            })
        );
    }

    #[test]
    fn unparseable_numerics_coerce_to_zero() {
        let dir = tempfile::tempdir().unwrap();
        let content = format!("{HEADER}AAPL,stock,ten,n/a,USD,,,,\n");
        let path = write_registry(&dir, &content);

        let records = CsvRegistry::new(&path, "TRY").read_all().unwrap();
        assert_eq!(
            records[0].kind,
            AssetKind::Market {
                quantity: 0.0,
                purchase_price: 0.0
            }
        );
    }

    #[test]
    fn manual_value_attaches_to_any_type_tag() {
        let dir = tempfile::tempdir().unwrap();
        let content = format!("{HEADER}AAPL,stock,10,100,USD,,,1234.5,1000\n");
        let path = write_registry(&dir, &content);

        let records = CsvRegistry::new(&path, "TRY").read_all().unwrap();
        assert!(matches!(records[0].kind, AssetKind::Market { .. }));
        assert_eq!(
            records[0].manual,
            Some(ManualValue {
                current_value: 1234.5,
                total_cost: 1000.0
            })
        );
    }

    #[test]
    fn unknown_type_without_manual_value_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let content = format!(
            "{HEADER}\
             WAT,derivative,1,1,,,,,\n\
             OLDCAR,whatever,,,,,,25000,30000\n"
        );
        let path = write_registry(&dir, &content);

        let records = CsvRegistry::new(&path, "TRY").read_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].ticker, "OLDCAR");
        assert_eq!(records[0].kind, AssetKind::Manual);
    }

    #[test]
    fn missing_registry_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let registry = CsvRegistry::new(dir.path().join("nope.csv"), "TRY");
        assert!(registry.read_all().is_err());
    }

    #[test]
    fn missing_history_log_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let log = CsvHistoryLog::new(dir.path().join("daily_log.csv"));
        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn history_roundtrips_through_csv() {
        let dir = tempfile::tempdir().unwrap();
        let log = CsvHistoryLog::new(dir.path().join("daily_log.csv"));

        let snapshots = vec![
            HistorySnapshot {
                date: date("2026-08-06"),
                ticker: "AAPL".to_string(),
                value: 1234.5,
            },
            HistorySnapshot {
                date: date("2026-08-06"),
                ticker: "VADELI".to_string(),
                value: 11200.0,
            },
        ];
        log.replace_day(date("2026-08-06"), &snapshots).unwrap();

        let read_back = log.read_all().unwrap();
        assert_eq!(read_back, snapshots);
    }

    #[test]
    fn replace_day_is_idempotent_and_keeps_other_days() {
        let dir = tempfile::tempdir().unwrap();
        let log = CsvHistoryLog::new(dir.path().join("daily_log.csv"));

        let yesterday = vec![HistorySnapshot {
            date: date("2026-08-05"),
            ticker: "AAPL".to_string(),
            value: 1000.0,
        }];
        log.replace_day(date("2026-08-05"), &yesterday).unwrap();

        let todays = vec![HistorySnapshot {
            date: date("2026-08-06"),
            ticker: "AAPL".to_string(),
            value: 1100.0,
        }];
        log.replace_day(date("2026-08-06"), &todays).unwrap();
        log.replace_day(date("2026-08-06"), &todays).unwrap();

        let all = log.read_all().unwrap();
        assert_eq!(all.len(), 2);
        let today_entries: Vec<_> = all
            .iter()
            .filter(|s| s.date == date("2026-08-06"))
            .collect();
        assert_eq!(today_entries.len(), 1);
        assert_eq!(today_entries[0].value, 1100.0);
    }
}
