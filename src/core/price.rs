//! Pricing abstractions.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Latest close for a market-quoted instrument, in its quote currency.
#[derive(Debug, Clone)]
pub struct Quote {
    pub price: f64,
    pub currency: String,
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Latest close price for `symbol`, scoped to a single trading day.
    async fn latest_close(&self, symbol: &str) -> Result<Quote>;
}

#[async_trait]
pub trait FundPriceProvider: Send + Sync {
    /// Published fund price for exactly one calendar day, `Ok(None)` when
    /// the day has no price row (non-trading day). Walking backward across
    /// days is the caller's policy, not the provider's.
    async fn price_on(&self, code: &str, date: NaiveDate) -> Result<Option<f64>>;
}
