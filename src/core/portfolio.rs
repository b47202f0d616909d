//! Portfolio aggregation: one daily valuation run over the whole registry.

use crate::core::asset::{AssetRecord, Valuation};
use crate::core::error::EngineError;
use crate::core::history::HistorySnapshot;
use crate::core::performance::{PerformanceResult, trailing_returns};
use crate::core::valuation::Valuator;
use tracing::debug;

/// One fully-derived registry row: valuation plus trailing returns.
#[derive(Debug, Clone)]
pub struct AssetRow {
    pub ticker: String,
    pub kind_label: &'static str,
    pub valuation: Valuation,
    pub performance: PerformanceResult,
}

#[derive(Debug, Clone, Copy)]
pub struct PortfolioTotals {
    pub current_value: f64,
    pub total_cost: f64,
    pub profit_loss: f64,
    pub return_pct: f64,
}

/// Everything one run produces: the report rows, the portfolio totals and
/// the day's history snapshot to persist.
#[derive(Debug)]
pub struct DailyRun {
    pub rows: Vec<AssetRow>,
    pub totals: PortfolioTotals,
    pub snapshot: Vec<HistorySnapshot>,
}

/// Valuates every registry record in order and derives its performance
/// against the prior history. Assets are processed one at a time; per-asset
/// price failures have already been degraded to zero values inside the
/// valuator, so the only errors that escape here abort the whole run.
///
/// Performance is always measured against `prior_history`, never against
/// values computed in this run.
pub async fn run_daily_valuation(
    records: &[AssetRecord],
    valuator: &Valuator<'_>,
    prior_history: &[HistorySnapshot],
    progress: &(dyn Fn()),
) -> Result<DailyRun, EngineError> {
    let today = valuator.today();

    let mut rows = Vec::with_capacity(records.len());
    let mut snapshot = Vec::with_capacity(records.len());
    let mut total_value = 0.0;
    let mut total_cost = 0.0;

    for record in records {
        debug!("Processing {} ({})", record.ticker, record.kind.label());
        let valuation = valuator.value(record).await?;
        let performance =
            trailing_returns(prior_history, &record.ticker, valuation.current_value, today);

        total_value += valuation.current_value;
        total_cost += valuation.total_cost;

        snapshot.push(HistorySnapshot {
            date: today,
            ticker: record.ticker.clone(),
            value: valuation.current_value,
        });
        rows.push(AssetRow {
            ticker: record.ticker.clone(),
            kind_label: record.kind.label(),
            valuation,
            performance,
        });
        progress();
    }

    let profit_loss = total_value - total_cost;
    let return_pct = if total_cost != 0.0 {
        (profit_loss / total_cost) * 100.0
    } else {
        0.0
    };

    Ok(DailyRun {
        rows,
        totals: PortfolioTotals {
            current_value: total_value,
            total_cost,
            profit_loss,
            return_pct,
        },
        snapshot,
    })
}
