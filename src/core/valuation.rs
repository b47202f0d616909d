//! Asset valuation.
//!
//! Turns one registry record plus live market inputs into a current value
//! and total cost, both in the home currency. Dispatch is by asset kind,
//! with the manual override checked first. A missing price degrades the
//! asset to zero value for the run; a missing FX rate aborts the run.

use crate::core::asset::{AssetKind, AssetRecord, Valuation};
use crate::core::currency::FxConverter;
use crate::core::error::EngineError;
use crate::core::price::{FundPriceProvider, PriceProvider};
use anyhow::anyhow;
use chrono::{Days, NaiveDate};
use std::time::Duration;
use tracing::{debug, warn};

/// How many calendar days the fund price lookup walks backward to skip
/// non-trading days. The walk starts at yesterday, as published fund prices
/// lag by one day.
const FUND_PRICE_LOOKBACK_DAYS: u64 = 5;

pub struct Valuator<'a> {
    quotes: &'a (dyn PriceProvider + Send + Sync),
    funds: &'a (dyn FundPriceProvider + Send + Sync),
    fx: &'a FxConverter<'a>,
    today: NaiveDate,
    /// Delay inserted before each remote price fetch to respect upstream
    /// call-rate limits.
    throttle: Duration,
}

impl<'a> Valuator<'a> {
    pub fn new(
        quotes: &'a (dyn PriceProvider + Send + Sync),
        funds: &'a (dyn FundPriceProvider + Send + Sync),
        fx: &'a FxConverter<'a>,
        today: NaiveDate,
        throttle: Duration,
    ) -> Self {
        Self {
            quotes,
            funds,
            fx,
            today,
            throttle,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Values one asset record in the home currency.
    pub async fn value(&self, record: &AssetRecord) -> Result<Valuation, EngineError> {
        if let Some(manual) = record.manual {
            debug!("Valuing {} from its manual entry", record.ticker);
            let current_value = self.fx.to_home(manual.current_value, &record.currency).await?;
            return Ok(Valuation {
                current_value,
                total_cost: manual.total_cost,
            });
        }

        match record.kind {
            AssetKind::Market {
                quantity,
                purchase_price,
            } => {
                let price = self.market_price(&record.ticker).await;
                self.priced_valuation(record, quantity, purchase_price, price)
                    .await
            }
            AssetKind::Fund {
                quantity,
                purchase_price,
            } => {
                let price = self.fund_price(&record.ticker).await;
                self.priced_valuation(record, quantity, purchase_price, price)
                    .await
            }
            AssetKind::Deposit {
                principal,
                annual_rate_pct,
                start_date,
            } => {
                let value = deposit_value(principal, annual_rate_pct, start_date, self.today);
                let rate = self.fx.to_home_rate(&record.currency).await?;
                Ok(Valuation {
                    current_value: value * rate,
                    total_cost: principal * rate,
                })
            }
            AssetKind::Manual => {
                // A manually-valued row without a positive manual entry has
                // nothing to derive a value from.
                warn!(
                    "Manual asset {} has no current value entered; valuing at zero",
                    record.ticker
                );
                Ok(Valuation {
                    current_value: 0.0,
                    total_cost: 0.0,
                })
            }
        }
    }

    /// Value and cost for quantity-times-price assets. `price` is `None`
    /// when the lookup failed; the asset then contributes zero value this
    /// run while its cost basis is still reported.
    async fn priced_valuation(
        &self,
        record: &AssetRecord,
        quantity: f64,
        purchase_price: f64,
        price: Option<f64>,
    ) -> Result<Valuation, EngineError> {
        let rate = self.fx.to_home_rate(&record.currency).await?;

        let current_value = match price {
            Some(p) if p > 0.0 => quantity * p * rate,
            _ => 0.0,
        };

        Ok(Valuation {
            current_value,
            total_cost: quantity * purchase_price * rate,
        })
    }

    async fn market_price(&self, symbol: &str) -> Option<f64> {
        tokio::time::sleep(self.throttle).await;

        match self.quotes.latest_close(symbol).await {
            Ok(quote) => {
                debug!(
                    "Latest close for {}: {} {}",
                    symbol, quote.price, quote.currency
                );
                Some(quote.price)
            }
            Err(source) => {
                let err = EngineError::PriceUnavailable {
                    symbol: symbol.to_string(),
                    source,
                };
                warn!(error = %err, "Valuing {} at zero for this run", symbol);
                None
            }
        }
    }

    /// Latest published fund price, trying yesterday first and walking
    /// backward across non-trading days.
    async fn fund_price(&self, code: &str) -> Option<f64> {
        tokio::time::sleep(self.throttle).await;

        for days_back in 1..=FUND_PRICE_LOOKBACK_DAYS {
            let date = self.today - Days::new(days_back);
            match self.funds.price_on(code, date).await {
                Ok(Some(price)) => return Some(price),
                Ok(None) => debug!("No fund price for {} on {}", code, date),
                Err(e) => debug!("Fund price lookup failed for {} on {}: {}", code, date, e),
            }
        }

        let err = EngineError::PriceUnavailable {
            symbol: code.to_string(),
            source: anyhow!(
                "no price published in the last {} days",
                FUND_PRICE_LOOKBACK_DAYS
            ),
        };
        warn!(error = %err, "Valuing {} at zero for this run", code);
        None
    }
}

/// Current value of a time deposit under simple (non-compounding) daily
/// interest, truncated to whole elapsed days. A missing or future start
/// date yields the principal unchanged.
fn deposit_value(
    principal: f64,
    annual_rate_pct: f64,
    start_date: Option<NaiveDate>,
    today: NaiveDate,
) -> f64 {
    let Some(start) = start_date else {
        return principal;
    };
    if start > today {
        return principal;
    }

    let days_passed = (today - start).num_days() as f64;
    let daily_rate = annual_rate_pct / 100.0 / 365.0;
    principal + principal * daily_rate * days_passed
}
