//! Trailing-window performance derivation.
//!
//! Returns are computed against the asset's own persisted history, never
//! against prices fetched in the same run. Reference selection per window:
//! the most recent snapshot dated on or before the window start; if none
//! qualifies, the oldest snapshot the asset has (best-effort baseline for
//! young assets); if the asset has no history at all, every return is zero.

use crate::core::history::HistorySnapshot;
use chrono::{Days, NaiveDate};
use std::collections::BTreeMap;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum Window {
    OneDay,
    OneWeek,
    OneMonth,
}

impl Window {
    pub const ALL: [Window; 3] = [Window::OneDay, Window::OneWeek, Window::OneMonth];

    pub fn days(&self) -> u64 {
        match self {
            Window::OneDay => 1,
            Window::OneWeek => 7,
            Window::OneMonth => 30,
        }
    }
}

impl Display for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Window::OneDay => "1D",
                Window::OneWeek => "1W",
                Window::OneMonth => "1M",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowReturn {
    /// Historical value the window was measured against; `None` when the
    /// asset has no history and the return is zero by definition.
    pub reference_value: Option<f64>,
    pub absolute: f64,
    pub percent: f64,
}

impl WindowReturn {
    fn zero() -> Self {
        Self {
            reference_value: None,
            absolute: 0.0,
            percent: 0.0,
        }
    }

    fn against(reference_value: f64, current_value: f64) -> Self {
        let absolute = current_value - reference_value;
        let percent = if reference_value != 0.0 {
            (absolute / reference_value) * 100.0
        } else {
            0.0
        };
        Self {
            reference_value: Some(reference_value),
            absolute,
            percent,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceResult {
    pub returns: BTreeMap<Window, WindowReturn>,
}

impl PerformanceResult {
    pub fn window(&self, window: Window) -> &WindowReturn {
        &self.returns[&window]
    }
}

/// Derives 1D/1W/1M returns for `ticker` from its historical snapshots.
pub fn trailing_returns(
    history: &[HistorySnapshot],
    ticker: &str,
    current_value: f64,
    today: NaiveDate,
) -> PerformanceResult {
    let mut entries: Vec<&HistorySnapshot> =
        history.iter().filter(|s| s.ticker == ticker).collect();
    entries.sort_by(|a, b| b.date.cmp(&a.date));

    let mut returns = BTreeMap::new();

    if entries.is_empty() {
        for window in Window::ALL {
            returns.insert(window, WindowReturn::zero());
        }
        return PerformanceResult { returns };
    }

    for window in Window::ALL {
        let target_date = today - Days::new(window.days());

        // Entries are date-descending, so the first match is the closest
        // previous sample. No interpolation, and a sample newer than the
        // window start is never preferred over a qualifying one.
        let reference = entries
            .iter()
            .find(|s| s.date <= target_date)
            .or_else(|| entries.last())
            .expect("non-empty history");

        returns.insert(window, WindowReturn::against(reference.value, current_value));
    }

    PerformanceResult { returns }
}
