//! Currency conversion abstractions.

use crate::core::cache::RunCache;
use crate::core::error::EngineError;
use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64>;
}

/// Per-run conversion context into the home currency.
///
/// Wraps a rate provider with a run-scoped memo so each foreign currency is
/// quoted upstream at most once per run. Built fresh for every run; never
/// shared across runs.
pub struct FxConverter<'a> {
    provider: &'a (dyn CurrencyRateProvider + Send + Sync),
    home: String,
    rates: RunCache<String, f64>,
}

impl<'a> FxConverter<'a> {
    pub fn new(provider: &'a (dyn CurrencyRateProvider + Send + Sync), home: &str) -> Self {
        Self {
            provider,
            home: home.to_string(),
            rates: RunCache::new(),
        }
    }

    pub fn home_currency(&self) -> &str {
        &self.home
    }

    /// Rate converting one unit of `currency` into the home currency.
    ///
    /// A missing rate is fatal for the whole run: without it no valuation is
    /// meaningful, so the error propagates instead of degrading.
    pub async fn to_home_rate(&self, currency: &str) -> Result<f64, EngineError> {
        if currency == self.home {
            return Ok(1.0);
        }

        if let Some(rate) = self.rates.get(&currency.to_string()).await {
            return Ok(rate);
        }

        match self.provider.get_rate(currency, &self.home).await {
            Ok(rate) => {
                debug!("Current {}/{} rate: {:.4}", currency, self.home, rate);
                self.rates.put(currency.to_string(), rate).await;
                Ok(rate)
            }
            Err(source) => Err(EngineError::RateUnavailable {
                currency: currency.to_string(),
                source,
            }),
        }
    }

    /// Converts `value` quoted in `currency` into the home currency.
    pub async fn to_home(&self, value: f64, currency: &str) -> Result<f64, EngineError> {
        let rate = self.to_home_rate(currency).await?;
        Ok(value * rate)
    }
}
