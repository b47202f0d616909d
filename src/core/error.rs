//! Run-level error taxonomy.
//!
//! A run either aborts before anything is persisted (missing FX rate,
//! unreadable registry) or degrades per asset and keeps going. The variants
//! here encode that policy; callers decide fatality by variant, not by
//! message.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The foreign exchange rate could not be obtained. Fatal: no meaningful
    /// valuation is possible, the run aborts before persisting anything.
    #[error("exchange rate unavailable for {currency}")]
    RateUnavailable {
        currency: String,
        #[source]
        source: anyhow::Error,
    },

    /// A market or fund price is missing for one asset. Recoverable: the
    /// asset is valued at zero for this run and the run continues.
    #[error("price unavailable for {symbol}")]
    PriceUnavailable {
        symbol: String,
        #[source]
        source: anyhow::Error,
    },

    /// The asset registry could not be read. Fatal.
    #[error("asset registry unreadable")]
    RegistryUnreadable(#[source] anyhow::Error),

    /// The history log could not be read. Degraded: the run proceeds with an
    /// empty history and all trailing returns report zero.
    #[error("history log unreadable")]
    HistoryUnreadable(#[source] anyhow::Error),

    /// Writing the day's snapshot failed. The computed report is already on
    /// screen; nothing is rolled back or retried.
    #[error("failed to persist daily snapshot")]
    PersistenceFailure(#[source] anyhow::Error),
}
