//! Core business logic abstractions

pub mod asset;
pub mod cache;
pub mod config;
pub mod currency;
pub mod error;
pub mod history;
pub mod log;
pub mod performance;
pub mod portfolio;
pub mod price;
pub mod valuation;

// Re-export main types for cleaner imports
pub use asset::{AssetKind, AssetRecord, ManualValue, Valuation};
pub use currency::{CurrencyRateProvider, FxConverter};
pub use error::EngineError;
pub use history::HistorySnapshot;
pub use performance::{PerformanceResult, Window};
pub use price::{FundPriceProvider, PriceProvider, Quote};
