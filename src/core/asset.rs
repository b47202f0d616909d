//! Asset registry domain model.
//!
//! One registry row becomes one `AssetRecord`. The asset type tag selects
//! exactly one valuation path; a manual value is an orthogonal override that
//! wins over any type tag when present.

use chrono::NaiveDate;

/// How an asset's current value is derived.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetKind {
    /// Market-quoted instrument: stock, crypto or FX spot. Valued at
    /// `quantity * latest close`.
    Market { quantity: f64, purchase_price: f64 },
    /// Fund with a published net-asset-value price (TEFAS).
    Fund { quantity: f64, purchase_price: f64 },
    /// Interest-accruing time deposit, simple daily interest.
    Deposit {
        principal: f64,
        annual_rate_pct: f64,
        start_date: Option<NaiveDate>,
    },
    /// No automatic source; only meaningful together with a manual value.
    Manual,
}

impl AssetKind {
    pub fn label(&self) -> &'static str {
        match self {
            AssetKind::Market { .. } => "Market",
            AssetKind::Fund { .. } => "Fund",
            AssetKind::Deposit { .. } => "Deposit",
            AssetKind::Manual => "Manual",
        }
    }
}

/// Operator-entered value and cost, already researched by hand.
/// `current_value` is quoted in the record's currency; `total_cost` is
/// always home currency, as in the registry sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManualValue {
    pub current_value: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetRecord {
    pub ticker: String,
    /// ISO currency code the asset is quoted in ("TRY", "USD", ...).
    pub currency: String,
    pub kind: AssetKind,
    /// Present when the registry row carries a positive manual current
    /// value. Takes precedence over `kind` during valuation.
    pub manual: Option<ManualValue>,
}

/// Per-asset outcome of one valuation run, in home currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Valuation {
    pub current_value: f64,
    pub total_cost: f64,
}

impl Valuation {
    pub fn profit_loss(&self) -> f64 {
        self.current_value - self.total_cost
    }
}
